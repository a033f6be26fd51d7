//! In-memory repository backing the admin console and the integration
//! tests. Rows live in `BTreeMap`s keyed by raw id, which gives every list
//! the stable ascending-id ordering the table kit relies on.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::Utc;

use crate::domain::application::{Application, ApplicationStatus, NewApplication};
use crate::domain::company::{Company, NewCompany, UpdateCompany};
use crate::domain::participant::{NewParticipant, Participant};
use crate::domain::position::{NewPosition, Position, UpdatePosition};
use crate::domain::types::{ApplicationId, CompanyId, ContactEmail, ParticipantId, PositionId};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{
    ApplicationListQuery, ApplicationReader, ApplicationWriter, CompanyListQuery, CompanyReader,
    CompanyWriter, ParticipantListQuery, ParticipantReader, ParticipantWriter, PositionListQuery,
    PositionReader, PositionWriter,
};
use crate::table::page::PageRequest;

#[derive(Default)]
struct Inner {
    companies: BTreeMap<i32, Company>,
    positions: BTreeMap<i32, Position>,
    participants: BTreeMap<i32, Participant>,
    applications: BTreeMap<i32, Application>,
    last_company_id: i32,
    last_position_id: i32,
    last_participant_id: i32,
    last_application_id: i32,
}

/// Thread-safe in-memory store. Cloning is cheap and clones share state,
/// mirroring how a pooled database handle behaves.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    inner: Arc<Mutex<Inner>>,
}

/// Applies the optional page request to an already filtered, ordered list.
fn paginate<T>(rows: Vec<T>, pagination: Option<PageRequest>) -> (usize, Vec<T>) {
    let total = rows.len();
    let Some(request) = pagination else {
        return (total, rows);
    };
    let start = request
        .page_index
        .saturating_mul(request.page_size)
        .min(total);
    let page = rows
        .into_iter()
        .skip(start)
        .take(request.page_size)
        .collect();
    (total, page)
}

fn matches_search(haystack: &str, term: &str) -> bool {
    haystack.to_lowercase().contains(&term.to_lowercase())
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // A poisoned lock only means another thread panicked mid-write;
        // the data itself is still usable for an in-memory store.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl CompanyReader for InMemoryRepository {
    fn get_company_by_id(&self, id: CompanyId) -> RepositoryResult<Option<Company>> {
        Ok(self.lock().companies.get(&id.get()).cloned())
    }

    fn list_companies(&self, query: CompanyListQuery) -> RepositoryResult<(usize, Vec<Company>)> {
        let inner = self.lock();
        let rows: Vec<Company> = inner
            .companies
            .values()
            .filter(|company| {
                query.search.as_deref().is_none_or(|term| {
                    matches_search(company.name.as_str(), term)
                        || matches_search(company.contact_email.as_str(), term)
                })
            })
            .cloned()
            .collect();
        Ok(paginate(rows, query.pagination))
    }
}

impl CompanyWriter for InMemoryRepository {
    fn create_company(&self, new_company: &NewCompany) -> RepositoryResult<Company> {
        let mut inner = self.lock();
        if inner
            .companies
            .values()
            .any(|company| company.name.as_str().eq_ignore_ascii_case(new_company.name.as_str()))
        {
            return Err(RepositoryError::ConstraintViolation(format!(
                "company name already taken: {}",
                new_company.name
            )));
        }
        inner.last_company_id += 1;
        let now = Utc::now().naive_utc();
        let company = Company {
            id: CompanyId::new(inner.last_company_id)?,
            name: new_company.name.clone(),
            contact_email: new_company.contact_email.clone(),
            website: new_company.website.clone(),
            description: new_company.description.clone(),
            created_at: now,
            updated_at: now,
        };
        inner.companies.insert(company.id.get(), company.clone());
        Ok(company)
    }

    fn update_company(&self, id: CompanyId, updates: &UpdateCompany) -> RepositoryResult<Company> {
        let mut inner = self.lock();
        let company = inner
            .companies
            .get_mut(&id.get())
            .ok_or(RepositoryError::NotFound)?;
        company.name = updates.name.clone();
        company.contact_email = updates.contact_email.clone();
        company.website = updates.website.clone();
        company.description = updates.description.clone();
        company.updated_at = Utc::now().naive_utc();
        Ok(company.clone())
    }

    fn delete_company(&self, id: CompanyId) -> RepositoryResult<()> {
        let mut inner = self.lock();
        if inner
            .positions
            .values()
            .any(|position| position.company_id == id)
        {
            return Err(RepositoryError::ConstraintViolation(
                "company still has open positions".to_string(),
            ));
        }
        inner
            .companies
            .remove(&id.get())
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }
}

impl PositionReader for InMemoryRepository {
    fn get_position_by_id(&self, id: PositionId) -> RepositoryResult<Option<Position>> {
        Ok(self.lock().positions.get(&id.get()).cloned())
    }

    fn list_positions(&self, query: PositionListQuery) -> RepositoryResult<(usize, Vec<Position>)> {
        let inner = self.lock();
        let rows: Vec<Position> = inner
            .positions
            .values()
            .filter(|position| {
                query.company_id.is_none_or(|company| position.company_id == company)
                    && query
                        .category
                        .is_none_or(|category| position.category == category)
            })
            .cloned()
            .collect();
        Ok(paginate(rows, query.pagination))
    }
}

impl PositionWriter for InMemoryRepository {
    fn create_position(&self, new_position: &NewPosition) -> RepositoryResult<Position> {
        let mut inner = self.lock();
        if !inner
            .companies
            .contains_key(&new_position.company_id.get())
        {
            return Err(RepositoryError::ConstraintViolation(format!(
                "unknown company: {}",
                new_position.company_id
            )));
        }
        inner.last_position_id += 1;
        let now = Utc::now().naive_utc();
        let position = Position {
            id: PositionId::new(inner.last_position_id)?,
            company_id: new_position.company_id,
            title: new_position.title.clone(),
            category: new_position.category,
            seats: new_position.seats,
            active: true,
            created_at: now,
            updated_at: now,
        };
        inner.positions.insert(position.id.get(), position.clone());
        Ok(position)
    }

    fn update_position(
        &self,
        id: PositionId,
        updates: &UpdatePosition,
    ) -> RepositoryResult<Position> {
        let mut inner = self.lock();
        let position = inner
            .positions
            .get_mut(&id.get())
            .ok_or(RepositoryError::NotFound)?;
        position.title = updates.title.clone();
        position.category = updates.category;
        position.seats = updates.seats;
        position.active = updates.active;
        position.updated_at = Utc::now().naive_utc();
        Ok(position.clone())
    }

    fn delete_position(&self, id: PositionId) -> RepositoryResult<()> {
        let mut inner = self.lock();
        if inner
            .applications
            .values()
            .any(|application| application.position_id == id)
        {
            return Err(RepositoryError::ConstraintViolation(
                "position still has applications".to_string(),
            ));
        }
        inner
            .positions
            .remove(&id.get())
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }
}

impl ParticipantReader for InMemoryRepository {
    fn get_participant_by_id(&self, id: ParticipantId) -> RepositoryResult<Option<Participant>> {
        Ok(self.lock().participants.get(&id.get()).cloned())
    }

    fn get_participant_by_email(
        &self,
        email: &ContactEmail,
    ) -> RepositoryResult<Option<Participant>> {
        Ok(self
            .lock()
            .participants
            .values()
            .find(|participant| participant.email == *email)
            .cloned())
    }

    fn list_participants(
        &self,
        query: ParticipantListQuery,
    ) -> RepositoryResult<(usize, Vec<Participant>)> {
        let inner = self.lock();
        let rows: Vec<Participant> = inner
            .participants
            .values()
            .filter(|participant| {
                query.search.as_deref().is_none_or(|term| {
                    matches_search(participant.name.as_str(), term)
                        || matches_search(participant.email.as_str(), term)
                })
            })
            .cloned()
            .collect();
        Ok(paginate(rows, query.pagination))
    }
}

impl ParticipantWriter for InMemoryRepository {
    fn create_participant(
        &self,
        new_participant: &NewParticipant,
    ) -> RepositoryResult<Participant> {
        let mut inner = self.lock();
        if inner
            .participants
            .values()
            .any(|participant| participant.email == new_participant.email)
        {
            return Err(RepositoryError::ConstraintViolation(format!(
                "participant already registered: {}",
                new_participant.email
            )));
        }
        inner.last_participant_id += 1;
        let participant = Participant {
            id: ParticipantId::new(inner.last_participant_id)?,
            name: new_participant.name.clone(),
            email: new_participant.email.clone(),
            university: new_participant.university.clone(),
            created_at: Utc::now().naive_utc(),
        };
        inner
            .participants
            .insert(participant.id.get(), participant.clone());
        Ok(participant)
    }

    fn delete_participant(&self, id: ParticipantId) -> RepositoryResult<()> {
        let mut inner = self.lock();
        if inner
            .applications
            .values()
            .any(|application| application.participant_id == id)
        {
            return Err(RepositoryError::ConstraintViolation(
                "participant still has applications".to_string(),
            ));
        }
        inner
            .participants
            .remove(&id.get())
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }
}

impl ApplicationReader for InMemoryRepository {
    fn get_application_by_id(&self, id: ApplicationId) -> RepositoryResult<Option<Application>> {
        Ok(self.lock().applications.get(&id.get()).cloned())
    }

    fn list_applications(
        &self,
        query: ApplicationListQuery,
    ) -> RepositoryResult<(usize, Vec<(Application, Participant)>)> {
        let inner = self.lock();
        let mut rows = Vec::new();
        for application in inner.applications.values() {
            if let Some(position_id) = query.position_id
                && application.position_id != position_id
            {
                continue;
            }
            if let Some(status) = query.status
                && application.status != status
            {
                continue;
            }
            let participant = inner
                .participants
                .get(&application.participant_id.get())
                .ok_or_else(|| {
                    RepositoryError::Unexpected(format!(
                        "application {} references missing participant {}",
                        application.id, application.participant_id
                    ))
                })?;
            rows.push((application.clone(), participant.clone()));
        }
        Ok(paginate(rows, query.pagination))
    }
}

impl ApplicationWriter for InMemoryRepository {
    fn create_application(
        &self,
        new_application: &NewApplication,
    ) -> RepositoryResult<Application> {
        let mut inner = self.lock();
        if !inner
            .participants
            .contains_key(&new_application.participant_id.get())
        {
            return Err(RepositoryError::ConstraintViolation(format!(
                "unknown participant: {}",
                new_application.participant_id
            )));
        }
        if !inner
            .positions
            .contains_key(&new_application.position_id.get())
        {
            return Err(RepositoryError::ConstraintViolation(format!(
                "unknown position: {}",
                new_application.position_id
            )));
        }
        if inner.applications.values().any(|application| {
            application.participant_id == new_application.participant_id
                && application.position_id == new_application.position_id
        }) {
            return Err(RepositoryError::ConstraintViolation(
                "participant already applied to this position".to_string(),
            ));
        }
        inner.last_application_id += 1;
        let now = Utc::now().naive_utc();
        let application = Application {
            id: ApplicationId::new(inner.last_application_id)?,
            reference: new_application.reference,
            participant_id: new_application.participant_id,
            position_id: new_application.position_id,
            status: ApplicationStatus::Submitted,
            created_at: now,
            updated_at: now,
        };
        inner
            .applications
            .insert(application.id.get(), application.clone());
        Ok(application)
    }

    fn set_application_status(
        &self,
        id: ApplicationId,
        status: ApplicationStatus,
    ) -> RepositoryResult<Application> {
        let mut inner = self.lock();
        let application = inner
            .applications
            .get_mut(&id.get())
            .ok_or(RepositoryError::NotFound)?;
        application.status = status;
        application.updated_at = Utc::now().naive_utc();
        Ok(application.clone())
    }

    fn delete_application(&self, id: ApplicationId) -> RepositoryResult<()> {
        self.lock()
            .applications
            .remove(&id.get())
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }
}
