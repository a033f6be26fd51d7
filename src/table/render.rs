//! Generic table projection: column descriptors applied to whatever rows the
//! adapter currently holds. Pure projection, no fetching or sorting; the
//! output is structured cell values any front end (terminal, JSON, HTML) can
//! consume.

use std::fmt::{Display, Formatter};

use serde::Serialize;

use crate::table::query::QueryState;

/// A rendered cell. Tagged so consumers can format numbers and flags
/// differently from plain text without re-parsing strings.
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "snake_case", tag = "kind", content = "value")]
pub enum CellValue {
    Text(String),
    Integer(i64),
    Flag(bool),
    Empty,
}

impl Display for CellValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            CellValue::Text(text) => write!(f, "{text}"),
            CellValue::Integer(value) => write!(f, "{value}"),
            CellValue::Flag(true) => write!(f, "yes"),
            CellValue::Flag(false) => write!(f, "no"),
            CellValue::Empty => write!(f, "-"),
        }
    }
}

enum ColumnKind<T> {
    /// Plain text straight from an accessor.
    Text(Box<dyn Fn(&T) -> String>),
    /// Arbitrary structured cell.
    Custom(Box<dyn Fn(&T) -> CellValue>),
}

/// One column of an admin table: a header, an optional minimum width hint,
/// and a way to turn a row into a cell.
pub struct Column<T> {
    header: String,
    width: Option<usize>,
    kind: ColumnKind<T>,
}

impl<T> Column<T> {
    pub fn text(header: impl Into<String>, accessor: impl Fn(&T) -> String + 'static) -> Self {
        Self {
            header: header.into(),
            width: None,
            kind: ColumnKind::Text(Box::new(accessor)),
        }
    }

    pub fn custom(header: impl Into<String>, render: impl Fn(&T) -> CellValue + 'static) -> Self {
        Self {
            header: header.into(),
            width: None,
            kind: ColumnKind::Custom(Box::new(render)),
        }
    }

    /// Minimum width hint for fixed-layout renderers.
    pub fn width(mut self, width: usize) -> Self {
        self.width = Some(width);
        self
    }

    pub fn header(&self) -> &str {
        &self.header
    }

    fn cell(&self, row: &T) -> CellValue {
        match &self.kind {
            ColumnKind::Text(accessor) => CellValue::Text(accessor(row)),
            ColumnKind::Custom(render) => render(row),
        }
    }
}

/// A fully projected table: headers plus one cell row per result row, both
/// in the order the columns and results were given.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct RenderedTable {
    pub headers: Vec<String>,
    pub widths: Vec<usize>,
    pub rows: Vec<Vec<CellValue>>,
}

impl RenderedTable {
    /// Formats the table as aligned monospace text.
    ///
    /// The header row defines the column count; width hints and row cells
    /// beyond it are ignored, missing cells render empty. The struct fields
    /// are public, so a hand-built table must not be able to panic here.
    pub fn to_text(&self) -> String {
        let columns = self.headers.len();
        let mut widths = vec![0usize; columns];
        for (column, width) in widths.iter_mut().enumerate() {
            *width = self.widths.get(column).copied().unwrap_or(0);
            *width = (*width).max(self.headers[column].len());
            for row in &self.rows {
                if let Some(cell) = row.get(column) {
                    *width = (*width).max(cell.to_string().len());
                }
            }
        }

        let mut out = String::new();
        let format_row = |cells: &[String]| {
            let mut line = String::new();
            for (column, cell) in cells.iter().enumerate() {
                if column > 0 {
                    line.push_str("  ");
                }
                line.push_str(&format!("{cell:<width$}", width = widths[column]));
            }
            line.trim_end().to_string()
        };

        out.push_str(&format_row(&self.headers));
        out.push('\n');
        for row in &self.rows {
            let cells: Vec<String> = (0..columns)
                .map(|column| row.get(column).map(CellValue::to_string).unwrap_or_default())
                .collect();
            out.push_str(&format_row(&cells));
            out.push('\n');
        }
        out
    }
}

/// What the renderer produced for the adapter's current state.
#[derive(Clone, Debug, PartialEq)]
pub enum TableOutput {
    /// No data yet for this page.
    Loading,
    /// The fetch failed and nothing older is available to show.
    Failed(String),
    Table(RenderedTable),
}

/// Projects the adapter's current rows through the column definitions.
/// When no data is available, yields a loading or error placeholder instead.
pub fn project<T>(columns: &[Column<T>], state: &QueryState<T>) -> TableOutput {
    let Some(data) = &state.data else {
        return match &state.error {
            Some(err) => TableOutput::Failed(err.to_string()),
            None => TableOutput::Loading,
        };
    };

    let rows = data
        .results
        .iter()
        .map(|row| columns.iter().map(|column| column.cell(row)).collect())
        .collect();

    TableOutput::Table(RenderedTable {
        headers: columns.iter().map(|c| c.header.clone()).collect(),
        widths: columns.iter().map(|c| c.width.unwrap_or(0)).collect(),
        rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::page::PageResponse;
    use crate::table::source::FetchError;

    #[derive(Clone)]
    struct Row {
        name: &'static str,
        seats: i64,
        active: bool,
    }

    fn columns() -> Vec<Column<Row>> {
        vec![
            Column::text("Name", |row: &Row| row.name.to_string()).width(10),
            Column::custom("Seats", |row: &Row| CellValue::Integer(row.seats)),
            Column::custom("Active", |row: &Row| CellValue::Flag(row.active)),
        ]
    }

    fn state(data: Option<PageResponse<Row>>, error: Option<FetchError>) -> QueryState<Row> {
        QueryState {
            data,
            error,
            is_loading: false,
            is_fetching: false,
            is_previous_data: false,
        }
    }

    #[test]
    fn projects_rows_in_given_order() {
        let rows = vec![
            Row {
                name: "Acme",
                seats: 3,
                active: true,
            },
            Row {
                name: "Globex",
                seats: 1,
                active: false,
            },
        ];
        let output = project(&columns(), &state(Some(PageResponse::new(rows, 2, 5)), None));
        let TableOutput::Table(table) = output else {
            panic!("expected a table");
        };
        assert_eq!(table.headers, vec!["Name", "Seats", "Active"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0][0], CellValue::Text("Acme".into()));
        assert_eq!(table.rows[1][1], CellValue::Integer(1));
        assert_eq!(table.rows[1][2], CellValue::Flag(false));
    }

    #[test]
    fn missing_data_shows_placeholders() {
        assert_eq!(project(&columns(), &state(None, None)), TableOutput::Loading);
        let failed = project(
            &columns(),
            &state(None, Some(FetchError::Connection("refused".into()))),
        );
        assert!(matches!(failed, TableOutput::Failed(message) if message.contains("refused")));
    }

    #[test]
    fn text_rendering_tolerates_ragged_hand_built_tables() {
        let table = RenderedTable {
            headers: vec!["Name".to_string(), "Seats".to_string()],
            widths: vec![10],
            rows: vec![
                vec![CellValue::Text("Acme".into())],
                vec![
                    CellValue::Text("Globex".into()),
                    CellValue::Integer(2),
                    CellValue::Flag(true),
                ],
            ],
        };
        let text = table.to_text();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Name"));
        assert!(lines[2].ends_with('2'));
    }

    #[test]
    fn cells_serialize_with_a_kind_tag() {
        assert_eq!(
            serde_json::to_value(CellValue::Integer(3)).unwrap(),
            serde_json::json!({"kind": "integer", "value": 3})
        );
        assert_eq!(
            serde_json::to_value(CellValue::Empty).unwrap(),
            serde_json::json!({"kind": "empty"})
        );
    }

    #[test]
    fn text_rendering_aligns_columns() {
        let rows = vec![Row {
            name: "Acme",
            seats: 12,
            active: true,
        }];
        let TableOutput::Table(table) =
            project(&columns(), &state(Some(PageResponse::new(rows, 1, 5)), None))
        else {
            panic!("expected a table");
        };
        let text = table.to_text();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("Name"));
        assert!(lines[1].contains("yes"));
    }
}
