//! Repository traits and list queries for the back-office collections.
//!
//! Readers return `(total, rows)` so callers can compute page counts;
//! ordering is always ascending by primary identifier and stable across
//! calls for the same query.

use crate::domain::application::{Application, ApplicationStatus, NewApplication};
use crate::domain::company::{Company, NewCompany, UpdateCompany};
use crate::domain::participant::{NewParticipant, Participant};
use crate::domain::position::{NewPosition, Position, PositionCategory, UpdatePosition};
use crate::domain::types::{ApplicationId, CompanyId, ContactEmail, ParticipantId, PositionId};
use crate::repository::errors::RepositoryResult;
use crate::table::page::PageRequest;

pub mod errors;
pub mod memory;
#[cfg(feature = "test-mocks")]
pub mod mock;

#[derive(Clone, Debug, Default)]
pub struct CompanyListQuery {
    pub search: Option<String>,
    pub pagination: Option<PageRequest>,
}

impl CompanyListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn paginate(mut self, request: PageRequest) -> Self {
        self.pagination = Some(request);
        self
    }
}

#[derive(Clone, Debug, Default)]
pub struct PositionListQuery {
    pub company_id: Option<CompanyId>,
    pub category: Option<PositionCategory>,
    pub pagination: Option<PageRequest>,
}

impl PositionListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn company(mut self, company_id: CompanyId) -> Self {
        self.company_id = Some(company_id);
        self
    }

    pub fn category(mut self, category: PositionCategory) -> Self {
        self.category = Some(category);
        self
    }

    pub fn paginate(mut self, request: PageRequest) -> Self {
        self.pagination = Some(request);
        self
    }
}

#[derive(Clone, Debug, Default)]
pub struct ParticipantListQuery {
    pub search: Option<String>,
    pub pagination: Option<PageRequest>,
}

impl ParticipantListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn paginate(mut self, request: PageRequest) -> Self {
        self.pagination = Some(request);
        self
    }
}

#[derive(Clone, Debug, Default)]
pub struct ApplicationListQuery {
    pub position_id: Option<PositionId>,
    pub status: Option<ApplicationStatus>,
    pub pagination: Option<PageRequest>,
}

impl ApplicationListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn position(mut self, position_id: PositionId) -> Self {
        self.position_id = Some(position_id);
        self
    }

    pub fn status(mut self, status: ApplicationStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn paginate(mut self, request: PageRequest) -> Self {
        self.pagination = Some(request);
        self
    }
}

pub trait CompanyReader {
    fn get_company_by_id(&self, id: CompanyId) -> RepositoryResult<Option<Company>>;
    fn list_companies(&self, query: CompanyListQuery) -> RepositoryResult<(usize, Vec<Company>)>;
}

pub trait CompanyWriter {
    fn create_company(&self, new_company: &NewCompany) -> RepositoryResult<Company>;
    fn update_company(&self, id: CompanyId, updates: &UpdateCompany) -> RepositoryResult<Company>;
    fn delete_company(&self, id: CompanyId) -> RepositoryResult<()>;
}

pub trait PositionReader {
    fn get_position_by_id(&self, id: PositionId) -> RepositoryResult<Option<Position>>;
    fn list_positions(&self, query: PositionListQuery) -> RepositoryResult<(usize, Vec<Position>)>;
}

pub trait PositionWriter {
    fn create_position(&self, new_position: &NewPosition) -> RepositoryResult<Position>;
    fn update_position(
        &self,
        id: PositionId,
        updates: &UpdatePosition,
    ) -> RepositoryResult<Position>;
    fn delete_position(&self, id: PositionId) -> RepositoryResult<()>;
}

pub trait ParticipantReader {
    fn get_participant_by_id(&self, id: ParticipantId) -> RepositoryResult<Option<Participant>>;
    fn get_participant_by_email(
        &self,
        email: &ContactEmail,
    ) -> RepositoryResult<Option<Participant>>;
    fn list_participants(
        &self,
        query: ParticipantListQuery,
    ) -> RepositoryResult<(usize, Vec<Participant>)>;
}

pub trait ParticipantWriter {
    fn create_participant(&self, new_participant: &NewParticipant) -> RepositoryResult<Participant>;
    fn delete_participant(&self, id: ParticipantId) -> RepositoryResult<()>;
}

pub trait ApplicationReader {
    fn get_application_by_id(&self, id: ApplicationId) -> RepositoryResult<Option<Application>>;
    /// Applications joined with their participants, for the review table.
    fn list_applications(
        &self,
        query: ApplicationListQuery,
    ) -> RepositoryResult<(usize, Vec<(Application, Participant)>)>;
}

pub trait ApplicationWriter {
    fn create_application(&self, new_application: &NewApplication) -> RepositoryResult<Application>;
    fn set_application_status(
        &self,
        id: ApplicationId,
        status: ApplicationStatus,
    ) -> RepositoryResult<Application>;
    fn delete_application(&self, id: ApplicationId) -> RepositoryResult<()>;
}
