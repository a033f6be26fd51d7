//! Position admin list: page source, column definitions, and mutations.

use std::cell::RefCell;
use std::rc::Rc;

use async_trait::async_trait;

use crate::domain::position::{NewPosition, Position, UpdatePosition};
use crate::domain::types::{CompanyId, PositionId};
use crate::repository::{PositionListQuery, PositionReader, PositionWriter};
use crate::services::{ServiceError, ServiceResult};
use crate::table::cache::QueryCache;
use crate::table::mutation::{MutationReport, Notifier, run_mutation};
use crate::table::page::{PageRequest, PageResponse};
use crate::table::query::PagedQuery;
use crate::table::render::{CellValue, Column};
use crate::table::source::{FetchError, FetchResult, PageSource};

/// Serves pages of positions, optionally scoped to one company. Nested
/// lists ("positions of company 3") cache under their own identity.
pub struct PositionSource<R> {
    repo: R,
    company_id: Option<CompanyId>,
    collection: String,
}

impl<R> PositionSource<R> {
    pub fn new(repo: R, company_id: Option<CompanyId>) -> Self {
        let collection = match company_id {
            Some(id) => format!("companies/{id}/positions"),
            None => "positions".to_string(),
        };
        Self {
            repo,
            company_id,
            collection,
        }
    }
}

#[async_trait(?Send)]
impl<R: PositionReader> PageSource for PositionSource<R> {
    type Row = Position;

    fn collection(&self) -> &str {
        &self.collection
    }

    async fn fetch_page(&self, request: PageRequest) -> FetchResult<PageResponse<Position>> {
        let mut query = PositionListQuery::new().paginate(request);
        if let Some(company_id) = self.company_id {
            query = query.company(company_id);
        }
        let (total, rows) = self
            .repo
            .list_positions(query)
            .map_err(|err| FetchError::Backend(err.to_string()))?;
        Ok(PageResponse::new(rows, total, request.page_size))
    }
}

/// Builds the adapter for a mounted positions table.
pub fn position_table<R: PositionReader>(
    cache: Rc<RefCell<QueryCache>>,
    repo: R,
    company_id: Option<CompanyId>,
) -> PagedQuery<PositionSource<R>> {
    PagedQuery::new(cache, Rc::new(PositionSource::new(repo, company_id)))
}

/// Column definitions for the positions table.
pub fn columns() -> Vec<Column<Position>> {
    vec![
        Column::custom("Id", |position: &Position| {
            CellValue::Integer(position.id.get().into())
        }),
        Column::text("Title", |position: &Position| position.title.to_string()).width(24),
        Column::text("Category", |position: &Position| {
            position.category.to_string()
        }),
        Column::custom("Seats", |position: &Position| {
            CellValue::Integer(position.seats.into())
        }),
        Column::custom("Active", |position: &Position| {
            CellValue::Flag(position.active)
        }),
    ]
}

pub async fn create_position<R, S, N>(
    repo: &R,
    table: &PagedQuery<S>,
    notifier: &N,
    new_position: NewPosition,
) -> ServiceResult<(Position, MutationReport)>
where
    R: PositionWriter + ?Sized,
    S: PageSource<Row = Position>,
    N: Notifier + ?Sized,
{
    run_mutation(table, notifier, async {
        repo.create_position(&new_position).map_err(|err| {
            log::error!("Failed to create position: {err}");
            ServiceError::from(err)
        })
    })
    .await
}

pub async fn update_position<R, S, N>(
    repo: &R,
    table: &PagedQuery<S>,
    notifier: &N,
    id: PositionId,
    updates: UpdatePosition,
) -> ServiceResult<(Position, MutationReport)>
where
    R: PositionWriter + ?Sized,
    S: PageSource<Row = Position>,
    N: Notifier + ?Sized,
{
    run_mutation(table, notifier, async {
        repo.update_position(id, &updates).map_err(|err| {
            log::error!("Failed to update position {id}: {err}");
            ServiceError::from(err)
        })
    })
    .await
}

pub async fn delete_position<R, S, N>(
    repo: &R,
    table: &PagedQuery<S>,
    notifier: &N,
    id: PositionId,
) -> ServiceResult<MutationReport>
where
    R: PositionWriter + ?Sized,
    S: PageSource<Row = Position>,
    N: Notifier + ?Sized,
{
    let ((), report) = run_mutation(table, notifier, async {
        repo.delete_position(id).map_err(|err| {
            log::error!("Failed to delete position {id}: {err}");
            ServiceError::from(err)
        })
    })
    .await?;
    Ok(report)
}
