//! Application review list: page source, column definitions, and mutations.
//!
//! Rows are applications joined with their participants so the reviewer
//! sees who applied without a second lookup.

use std::cell::RefCell;
use std::rc::Rc;

use async_trait::async_trait;

use crate::domain::application::{Application, ApplicationStatus, NewApplication};
use crate::domain::participant::Participant;
use crate::domain::types::{ApplicationId, PositionId};
use crate::repository::{ApplicationListQuery, ApplicationReader, ApplicationWriter};
use crate::services::{ServiceError, ServiceResult};
use crate::table::cache::QueryCache;
use crate::table::mutation::{MutationReport, Notifier, run_mutation};
use crate::table::page::{PageRequest, PageResponse};
use crate::table::query::PagedQuery;
use crate::table::render::{CellValue, Column};
use crate::table::source::{FetchError, FetchResult, PageSource};

pub type ApplicationRow = (Application, Participant);

/// Serves pages of applications, optionally scoped to one position and/or
/// one review status.
pub struct ApplicationSource<R> {
    repo: R,
    position_id: Option<PositionId>,
    status: Option<ApplicationStatus>,
    collection: String,
}

impl<R> ApplicationSource<R> {
    pub fn new(repo: R, position_id: Option<PositionId>, status: Option<ApplicationStatus>) -> Self {
        let mut collection = match position_id {
            Some(id) => format!("positions/{id}/applications"),
            None => "applications".to_string(),
        };
        if let Some(status) = status {
            collection.push_str(&format!("?status={status}"));
        }
        Self {
            repo,
            position_id,
            status,
            collection,
        }
    }
}

#[async_trait(?Send)]
impl<R: ApplicationReader> PageSource for ApplicationSource<R> {
    type Row = ApplicationRow;

    fn collection(&self) -> &str {
        &self.collection
    }

    async fn fetch_page(&self, request: PageRequest) -> FetchResult<PageResponse<ApplicationRow>> {
        let mut query = ApplicationListQuery::new().paginate(request);
        if let Some(position_id) = self.position_id {
            query = query.position(position_id);
        }
        if let Some(status) = self.status {
            query = query.status(status);
        }
        let (total, rows) = self
            .repo
            .list_applications(query)
            .map_err(|err| FetchError::Backend(err.to_string()))?;
        Ok(PageResponse::new(rows, total, request.page_size))
    }
}

/// Builds the adapter for a mounted applications table.
pub fn application_table<R: ApplicationReader>(
    cache: Rc<RefCell<QueryCache>>,
    repo: R,
    position_id: Option<PositionId>,
    status: Option<ApplicationStatus>,
) -> PagedQuery<ApplicationSource<R>> {
    PagedQuery::new(
        cache,
        Rc::new(ApplicationSource::new(repo, position_id, status)),
    )
}

/// Column definitions for the application review table.
pub fn columns() -> Vec<Column<ApplicationRow>> {
    vec![
        Column::custom("Id", |(application, _): &ApplicationRow| {
            CellValue::Integer(application.id.get().into())
        }),
        Column::text("Reference", |(application, _): &ApplicationRow| {
            application.reference.to_string()
        })
        .width(36),
        Column::text("Participant", |(_, participant): &ApplicationRow| {
            participant.name.to_string()
        })
        .width(20),
        Column::text("Email", |(_, participant): &ApplicationRow| {
            participant.email.to_string()
        })
        .width(24),
        Column::text("Status", |(application, _): &ApplicationRow| {
            application.status.to_string()
        }),
    ]
}

pub async fn submit_application<R, S, N>(
    repo: &R,
    table: &PagedQuery<S>,
    notifier: &N,
    new_application: NewApplication,
) -> ServiceResult<(Application, MutationReport)>
where
    R: ApplicationWriter + ?Sized,
    S: PageSource<Row = ApplicationRow>,
    N: Notifier + ?Sized,
{
    run_mutation(table, notifier, async {
        repo.create_application(&new_application).map_err(|err| {
            log::error!("Failed to submit application: {err}");
            ServiceError::from(err)
        })
    })
    .await
}

pub async fn review_application<R, S, N>(
    repo: &R,
    table: &PagedQuery<S>,
    notifier: &N,
    id: ApplicationId,
    status: ApplicationStatus,
) -> ServiceResult<(Application, MutationReport)>
where
    R: ApplicationWriter + ?Sized,
    S: PageSource<Row = ApplicationRow>,
    N: Notifier + ?Sized,
{
    run_mutation(table, notifier, async {
        repo.set_application_status(id, status).map_err(|err| {
            log::error!("Failed to review application {id}: {err}");
            ServiceError::from(err)
        })
    })
    .await
}

pub async fn withdraw_application<R, S, N>(
    repo: &R,
    table: &PagedQuery<S>,
    notifier: &N,
    id: ApplicationId,
) -> ServiceResult<MutationReport>
where
    R: ApplicationWriter + ?Sized,
    S: PageSource<Row = ApplicationRow>,
    N: Notifier + ?Sized,
{
    let ((), report) = run_mutation(table, notifier, async {
        repo.delete_application(id).map_err(|err| {
            log::error!("Failed to withdraw application {id}: {err}");
            ServiceError::from(err)
        })
    })
    .await?;
    Ok(report)
}
