use cariere::domain::application::ApplicationStatus;
use cariere::domain::application::NewApplication;
use cariere::domain::company::{NewCompany, UpdateCompany};
use cariere::domain::participant::NewParticipant;
use cariere::domain::position::{NewPosition, PositionCategory, UpdatePosition};
use cariere::domain::types::{CompanyId, ContactEmail, DisplayName};
use cariere::repository::memory::InMemoryRepository;
use cariere::repository::{
    ApplicationListQuery, ApplicationReader, ApplicationWriter, CompanyListQuery, CompanyReader,
    CompanyWriter, ParticipantListQuery, ParticipantReader, ParticipantWriter, PositionListQuery,
    PositionReader, PositionWriter,
};
use cariere::table::PageRequest;

fn new_company(name: &str) -> NewCompany {
    NewCompany::try_new(
        name,
        &format!("jobs@{}.example", name.to_lowercase()),
        None,
        None,
    )
    .expect("valid company")
}

#[test]
fn company_repository_crud() {
    let repo = InMemoryRepository::new();

    let acme = repo.create_company(&new_company("Acme")).unwrap();
    let globex = repo.create_company(&new_company("Globex")).unwrap();
    assert!(acme.id < globex.id);

    let (total, items) = repo.list_companies(CompanyListQuery::new()).unwrap();
    assert_eq!(total, 2);
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].name.as_str(), "Acme");

    let (search_total, search_items) = repo
        .list_companies(CompanyListQuery::new().search("glo"))
        .unwrap();
    assert_eq!(search_total, 1);
    assert_eq!(search_items[0].name.as_str(), "Globex");

    let updated = repo
        .update_company(
            globex.id,
            &UpdateCompany {
                name: DisplayName::new("Globex Energy").unwrap(),
                contact_email: globex.contact_email.clone(),
                website: None,
                description: Some("Grid software".to_string()),
            },
        )
        .unwrap();
    assert_eq!(updated.name.as_str(), "Globex Energy");

    repo.delete_company(acme.id).unwrap();
    assert!(repo.get_company_by_id(acme.id).unwrap().is_none());
    let (total_after, _) = repo.list_companies(CompanyListQuery::new()).unwrap();
    assert_eq!(total_after, 1);
}

#[test]
fn company_names_are_unique() {
    let repo = InMemoryRepository::new();
    repo.create_company(&new_company("Acme")).unwrap();
    assert!(repo.create_company(&new_company("ACME")).is_err());
}

#[test]
fn deleting_a_company_with_positions_is_rejected() {
    let repo = InMemoryRepository::new();
    let company = repo.create_company(&new_company("Acme")).unwrap();
    repo.create_position(
        &NewPosition::try_new(company.id, "Intern", PositionCategory::Internship, 2).unwrap(),
    )
    .unwrap();

    assert!(repo.delete_company(company.id).is_err());
    assert!(repo.get_company_by_id(company.id).unwrap().is_some());
}

#[test]
fn position_repository_crud_and_scoping() {
    let repo = InMemoryRepository::new();
    let acme = repo.create_company(&new_company("Acme")).unwrap();
    let globex = repo.create_company(&new_company("Globex")).unwrap();

    let intern = repo
        .create_position(
            &NewPosition::try_new(acme.id, "Intern", PositionCategory::Internship, 4).unwrap(),
        )
        .unwrap();
    repo.create_position(
        &NewPosition::try_new(globex.id, "Graduate", PositionCategory::Graduate, 2).unwrap(),
    )
    .unwrap();

    // Positions of an unknown company cannot be created.
    assert!(
        repo.create_position(
            &NewPosition::try_new(CompanyId::new(99).unwrap(), "Ghost", PositionCategory::Graduate, 1)
                .unwrap()
        )
        .is_err()
    );

    let (total, _) = repo.list_positions(PositionListQuery::new()).unwrap();
    assert_eq!(total, 2);
    let (scoped_total, scoped) = repo
        .list_positions(PositionListQuery::new().company(acme.id))
        .unwrap();
    assert_eq!(scoped_total, 1);
    assert_eq!(scoped[0].id, intern.id);

    let updated = repo
        .update_position(
            intern.id,
            &UpdatePosition {
                title: intern.title.clone(),
                category: intern.category,
                seats: 6,
                active: false,
            },
        )
        .unwrap();
    assert_eq!(updated.seats, 6);
    assert!(!updated.active);

    repo.delete_position(intern.id).unwrap();
    assert!(repo.get_position_by_id(intern.id).unwrap().is_none());
}

#[test]
fn participant_emails_are_unique() {
    let repo = InMemoryRepository::new();
    let ana = repo
        .create_participant(
            &NewParticipant::try_new("Ana", "ana@student.example", None).unwrap(),
        )
        .unwrap();

    assert!(
        repo.create_participant(
            &NewParticipant::try_new("Ana Again", "ANA@student.example", None).unwrap()
        )
        .is_err()
    );

    let found = repo
        .get_participant_by_email(&ContactEmail::new("ana@student.example").unwrap())
        .unwrap();
    assert_eq!(found.map(|p| p.id), Some(ana.id));
}

#[test]
fn application_lifecycle_and_filters() {
    let repo = InMemoryRepository::new();
    let company = repo.create_company(&new_company("Acme")).unwrap();
    let position = repo
        .create_position(
            &NewPosition::try_new(company.id, "Intern", PositionCategory::Internship, 4).unwrap(),
        )
        .unwrap();
    let ana = repo
        .create_participant(
            &NewParticipant::try_new("Ana", "ana@student.example", None).unwrap(),
        )
        .unwrap();
    let mihai = repo
        .create_participant(
            &NewParticipant::try_new("Mihai", "mihai@student.example", None).unwrap(),
        )
        .unwrap();

    let application = repo
        .create_application(&NewApplication::new(ana.id, position.id))
        .unwrap();
    repo.create_application(&NewApplication::new(mihai.id, position.id))
        .unwrap();

    // One application per participant and position.
    assert!(
        repo.create_application(&NewApplication::new(ana.id, position.id))
            .is_err()
    );

    let (total, rows) = repo
        .list_applications(ApplicationListQuery::new().position(position.id))
        .unwrap();
    assert_eq!(total, 2);
    assert_eq!(rows[0].1.name.as_str(), "Ana");

    let accepted = repo
        .set_application_status(application.id, ApplicationStatus::Accepted)
        .unwrap();
    assert_eq!(accepted.status, ApplicationStatus::Accepted);

    let (accepted_total, accepted_rows) = repo
        .list_applications(ApplicationListQuery::new().status(ApplicationStatus::Accepted))
        .unwrap();
    assert_eq!(accepted_total, 1);
    assert_eq!(accepted_rows[0].0.id, application.id);

    // The participant cannot be removed while the application exists.
    assert!(repo.delete_participant(ana.id).is_err());
    repo.delete_application(application.id).unwrap();
    repo.delete_participant(ana.id).unwrap();
}

#[test]
fn listing_paginates_in_ascending_id_order() {
    let repo = InMemoryRepository::new();
    for index in 1..=12 {
        repo.create_company(&new_company(&format!("Company{index:02}")))
            .unwrap();
    }

    let (total, page) = repo
        .list_companies(CompanyListQuery::new().paginate(PageRequest::new(2, 5).unwrap()))
        .unwrap();
    assert_eq!(total, 12);
    assert_eq!(page.len(), 2);
    assert_eq!(page[0].id.get(), 11);
    assert_eq!(page[1].id.get(), 12);

    let (_, participants_page) = repo
        .list_participants(ParticipantListQuery::new().paginate(PageRequest::new(5, 5).unwrap()))
        .unwrap();
    assert!(participants_page.is_empty());
}
