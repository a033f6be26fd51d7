//! Company admin list: page source, column definitions, and mutations.

use std::cell::RefCell;
use std::rc::Rc;

use async_trait::async_trait;

use crate::domain::company::{Company, NewCompany, UpdateCompany};
use crate::domain::types::CompanyId;
use crate::repository::{CompanyListQuery, CompanyReader, CompanyWriter};
use crate::services::{ServiceError, ServiceResult};
use crate::table::cache::QueryCache;
use crate::table::mutation::{MutationReport, Notifier, run_mutation};
use crate::table::page::{PageRequest, PageResponse};
use crate::table::query::PagedQuery;
use crate::table::render::{CellValue, Column};
use crate::table::source::{FetchError, FetchResult, PageSource};

/// Serves pages of companies, optionally narrowed by a search term. The
/// filter is baked into the collection name so differently filtered lists
/// cache under distinct identities.
pub struct CompanySource<R> {
    repo: R,
    search: Option<String>,
    collection: String,
}

impl<R> CompanySource<R> {
    pub fn new(repo: R, search: Option<String>) -> Self {
        let search = search
            .map(|term| term.trim().to_string())
            .filter(|term| !term.is_empty());
        let collection = match &search {
            Some(term) => format!("companies?q={term}"),
            None => "companies".to_string(),
        };
        Self {
            repo,
            search,
            collection,
        }
    }
}

#[async_trait(?Send)]
impl<R: CompanyReader> PageSource for CompanySource<R> {
    type Row = Company;

    fn collection(&self) -> &str {
        &self.collection
    }

    async fn fetch_page(&self, request: PageRequest) -> FetchResult<PageResponse<Company>> {
        let mut query = CompanyListQuery::new().paginate(request);
        if let Some(term) = &self.search {
            query = query.search(term.clone());
        }
        let (total, rows) = self
            .repo
            .list_companies(query)
            .map_err(|err| FetchError::Backend(err.to_string()))?;
        Ok(PageResponse::new(rows, total, request.page_size))
    }
}

/// Builds the adapter for a mounted companies table.
pub fn company_table<R: CompanyReader>(
    cache: Rc<RefCell<QueryCache>>,
    repo: R,
    search: Option<String>,
) -> PagedQuery<CompanySource<R>> {
    PagedQuery::new(cache, Rc::new(CompanySource::new(repo, search)))
}

/// Column definitions for the companies table.
pub fn columns() -> Vec<Column<Company>> {
    vec![
        Column::custom("Id", |company: &Company| {
            CellValue::Integer(company.id.get().into())
        }),
        Column::text("Name", |company: &Company| company.name.to_string()).width(20),
        Column::text("Contact", |company: &Company| {
            company.contact_email.to_string()
        })
        .width(24),
        Column::custom("Website", |company: &Company| match &company.website {
            Some(url) => CellValue::Text(url.to_string()),
            None => CellValue::Empty,
        }),
    ]
}

/// Creates a company and refreshes the table through the invalidation
/// policy.
pub async fn create_company<R, S, N>(
    repo: &R,
    table: &PagedQuery<S>,
    notifier: &N,
    new_company: NewCompany,
) -> ServiceResult<(Company, MutationReport)>
where
    R: CompanyWriter + ?Sized,
    S: PageSource<Row = Company>,
    N: Notifier + ?Sized,
{
    run_mutation(table, notifier, async {
        repo.create_company(&new_company).map_err(|err| {
            log::error!("Failed to create company: {err}");
            ServiceError::from(err)
        })
    })
    .await
}

/// Applies updates to a company and refreshes the table.
pub async fn update_company<R, S, N>(
    repo: &R,
    table: &PagedQuery<S>,
    notifier: &N,
    id: CompanyId,
    updates: UpdateCompany,
) -> ServiceResult<(Company, MutationReport)>
where
    R: CompanyWriter + ?Sized,
    S: PageSource<Row = Company>,
    N: Notifier + ?Sized,
{
    run_mutation(table, notifier, async {
        repo.update_company(id, &updates).map_err(|err| {
            log::error!("Failed to update company {id}: {err}");
            ServiceError::from(err)
        })
    })
    .await
}

/// Deletes a company and refreshes the table, walking the page index back
/// if the current page came up empty.
pub async fn delete_company<R, S, N>(
    repo: &R,
    table: &PagedQuery<S>,
    notifier: &N,
    id: CompanyId,
) -> ServiceResult<MutationReport>
where
    R: CompanyWriter + ?Sized,
    S: PageSource<Row = Company>,
    N: Notifier + ?Sized,
{
    let ((), report) = run_mutation(table, notifier, async {
        repo.delete_company(id).map_err(|err| {
            log::error!("Failed to delete company {id}: {err}");
            ServiceError::from(err)
        })
    })
    .await?;
    Ok(report)
}
