//! Mock repository implementations for isolating services in tests.

use mockall::mock;

use crate::domain::application::{Application, ApplicationStatus, NewApplication};
use crate::domain::company::{Company, NewCompany, UpdateCompany};
use crate::domain::participant::{NewParticipant, Participant};
use crate::domain::position::{NewPosition, Position, UpdatePosition};
use crate::domain::types::{ApplicationId, CompanyId, ContactEmail, ParticipantId, PositionId};
use crate::repository::errors::RepositoryResult;
use crate::repository::{
    ApplicationListQuery, ApplicationReader, ApplicationWriter, CompanyListQuery, CompanyReader,
    CompanyWriter, ParticipantListQuery, ParticipantReader, ParticipantWriter, PositionListQuery,
    PositionReader, PositionWriter,
};

mock! {
    pub Repository {}

    impl Clone for Repository {
        fn clone(&self) -> Self;
    }

    impl CompanyReader for Repository {
        fn get_company_by_id(&self, id: CompanyId) -> RepositoryResult<Option<Company>>;
        fn list_companies(&self, query: CompanyListQuery) -> RepositoryResult<(usize, Vec<Company>)>;
    }

    impl CompanyWriter for Repository {
        fn create_company(&self, new_company: &NewCompany) -> RepositoryResult<Company>;
        fn update_company(&self, id: CompanyId, updates: &UpdateCompany) -> RepositoryResult<Company>;
        fn delete_company(&self, id: CompanyId) -> RepositoryResult<()>;
    }

    impl PositionReader for Repository {
        fn get_position_by_id(&self, id: PositionId) -> RepositoryResult<Option<Position>>;
        fn list_positions(&self, query: PositionListQuery) -> RepositoryResult<(usize, Vec<Position>)>;
    }

    impl PositionWriter for Repository {
        fn create_position(&self, new_position: &NewPosition) -> RepositoryResult<Position>;
        fn update_position(&self, id: PositionId, updates: &UpdatePosition) -> RepositoryResult<Position>;
        fn delete_position(&self, id: PositionId) -> RepositoryResult<()>;
    }

    impl ParticipantReader for Repository {
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

    impl ParticipantWriter for Repository {
        fn create_participant(&self, new_participant: &NewParticipant) -> RepositoryResult<Participant>;
        fn delete_participant(&self, id: ParticipantId) -> RepositoryResult<()>;
    }

    impl ApplicationReader for Repository {
        fn get_application_by_id(&self, id: ApplicationId) -> RepositoryResult<Option<Application>>;
        fn list_applications(
            &self,
            query: ApplicationListQuery,
        ) -> RepositoryResult<(usize, Vec<(Application, Participant)>)>;
    }

    impl ApplicationWriter for Repository {
        fn create_application(&self, new_application: &NewApplication) -> RepositoryResult<Application>;
        fn set_application_status(
            &self,
            id: ApplicationId,
            status: ApplicationStatus,
        ) -> RepositoryResult<Application>;
        fn delete_application(&self, id: ApplicationId) -> RepositoryResult<()>;
    }
}
