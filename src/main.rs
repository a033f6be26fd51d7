//! Interactive back-office console for the career fair data set.
//!
//! Drives the paginated table kit against the in-memory repository: switch
//! between the companies, positions, and applications lists, page through
//! them, and mutate rows while the cache-invalidation policy keeps the
//! displayed page consistent.

use std::cell::RefCell;
use std::env;
use std::io::{self, BufRead, Write};
use std::rc::Rc;

use config::Config;
use dotenvy::dotenv;

use cariere::domain::application::{ApplicationStatus, NewApplication};
use cariere::domain::company::NewCompany;
use cariere::domain::participant::NewParticipant;
use cariere::domain::position::{NewPosition, PositionCategory};
use cariere::domain::types::{ApplicationId, CompanyId, ParticipantId, PositionId};
use cariere::models::config::AppConfig;
use cariere::repository::memory::InMemoryRepository;
use cariere::repository::{ApplicationWriter, CompanyWriter, ParticipantWriter, PositionWriter};
use cariere::services::applications::{self, ApplicationSource};
use cariere::services::companies::{self, CompanySource};
use cariere::services::positions::{self, PositionSource};
use cariere::table::pager;
use cariere::table::render::project;
use cariere::table::{
    Column, LogNotifier, PAGE_SIZE_OPTIONS, PageRequest, PagedQuery, PagerView, PageSource,
    QueryCache, TableOutput,
};

/// One mounted admin list: the adapter plus its column definitions.
struct Screen<S: PageSource> {
    table: PagedQuery<S>,
    columns: Vec<Column<S::Row>>,
}

impl<S: PageSource> Screen<S> {
    fn new(table: PagedQuery<S>, columns: Vec<Column<S::Row>>, page_size: usize) -> Self {
        if let Ok(request) = PageRequest::new(0, page_size) {
            table.set_request(request);
        }
        Self { table, columns }
    }

    async fn reload(&self) {
        // Fetch errors stay in the snapshot and render as a placeholder.
        if let Err(err) = self.table.load().await {
            log::error!("Failed to load {}: {err}", self.table.identity());
        }
    }

    fn print(&self) {
        let state = self.table.snapshot();
        match project(&self.columns, &state) {
            TableOutput::Loading => println!("(loading)"),
            TableOutput::Failed(message) => println!("error: {message}"),
            TableOutput::Table(table) => print!("{}", table.to_text()),
        }
        let view = PagerView::for_state(&state, self.table.request());
        let links: Vec<String> = view
            .links
            .iter()
            .map(|link| match link {
                Some(page) => page.to_string(),
                None => "..".to_string(),
            })
            .collect();
        println!(
            "page {}/{} | size {} | pages: {}",
            view.page,
            view.page_count,
            view.page_size,
            links.join(" ")
        );
    }

    async fn next(&self) {
        let page_count = self.table.page_count().unwrap_or(0);
        if let Some(request) = pager::next(self.table.request(), page_count) {
            self.table.set_request(request);
            self.reload().await;
        }
    }

    async fn prev(&self) {
        if let Some(request) = pager::prev(self.table.request()) {
            self.table.set_request(request);
            self.reload().await;
        }
    }

    async fn goto(&self, page: usize) {
        let page_count = self.table.page_count().unwrap_or(0);
        self.table
            .set_request(pager::goto(self.table.request(), page, page_count));
        self.reload().await;
    }

    async fn resize(&self, page_size: usize) {
        match pager::set_page_size(page_size) {
            Ok(request) => {
                self.table.set_request(request);
                self.reload().await;
            }
            Err(err) => println!("{err}; allowed: {PAGE_SIZE_OPTIONS:?}"),
        }
    }
}

enum Active {
    Companies(Screen<CompanySource<InMemoryRepository>>),
    Positions(Screen<PositionSource<InMemoryRepository>>),
    Applications(Screen<ApplicationSource<InMemoryRepository>>),
}

macro_rules! with_active {
    ($active:expr, $screen:ident => $body:expr) => {
        match $active {
            Active::Companies($screen) => $body,
            Active::Positions($screen) => $body,
            Active::Applications($screen) => $body,
        }
    };
}

fn parse_status(value: &str) -> Option<ApplicationStatus> {
    match value.trim().to_lowercase().as_str() {
        "submitted" => Some(ApplicationStatus::Submitted),
        "accepted" => Some(ApplicationStatus::Accepted),
        "rejected" => Some(ApplicationStatus::Rejected),
        _ => None,
    }
}

/// Seeds a small but multi-page fair: twelve companies so the default
/// screens actually paginate, a few positions, and a round of applications.
fn seed_demo_data(repo: &InMemoryRepository) -> Result<(), cariere::services::ServiceError> {
    let names = [
        ("Acme Robotics", "Industrial automation"),
        ("Globex Energy", "Grid software"),
        ("Initech Systems", "Enterprise tooling"),
        ("Umbrella Labs", "Biotech platforms"),
        ("Stark Dynamics", "Embedded control"),
        ("Wayne Analytics", "Risk modeling"),
        ("Tyrell Compute", "GPU infrastructure"),
        ("Cyberdyne Works", "Vision systems"),
        ("Aperture Optics", "Sensor fusion"),
        ("Hooli Cloud", "Developer platform"),
        ("Vandelay Trade", "Logistics software"),
        ("Soylent Foods", "Supply forecasting"),
    ];
    let mut company_ids = Vec::new();
    for (name, blurb) in names {
        let slug: String = name
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_lowercase();
        let company = repo.create_company(&NewCompany::try_new(
            name,
            &format!("jobs@{slug}.example"),
            Some(&format!("https://{slug}.example")),
            Some(blurb),
        )?)?;
        company_ids.push(company.id);
    }

    let mut position_ids = Vec::new();
    for (index, company_id) in company_ids.iter().take(3).enumerate() {
        for (title, category, seats) in [
            ("Software Engineering Intern", PositionCategory::Internship, 4),
            ("Graduate Backend Engineer", PositionCategory::Graduate, 2),
        ] {
            let position = repo.create_position(&NewPosition::try_new(
                *company_id,
                &format!("{title} ({})", index + 1),
                category,
                seats,
            )?)?;
            position_ids.push(position.id);
        }
    }

    let students = [
        ("Ana Popescu", "ana.popescu"),
        ("Mihai Ionescu", "mihai.ionescu"),
        ("Ioana Radu", "ioana.radu"),
        ("Andrei Stan", "andrei.stan"),
        ("Elena Dumitru", "elena.dumitru"),
        ("Vlad Georgescu", "vlad.georgescu"),
        ("Maria Constantin", "maria.constantin"),
        ("Radu Marinescu", "radu.marinescu"),
    ];
    let mut participant_ids = Vec::new();
    for (name, handle) in students {
        let participant = repo.create_participant(&NewParticipant::try_new(
            name,
            &format!("{handle}@student.example"),
            Some("Politehnica"),
        )?)?;
        participant_ids.push(participant.id);
    }

    for (index, participant_id) in participant_ids.iter().enumerate() {
        let position_id = position_ids[index % position_ids.len()];
        repo.create_application(&NewApplication::new(*participant_id, position_id))?;
        if index % 2 == 0 {
            let second = position_ids[(index + 1) % position_ids.len()];
            repo.create_application(&NewApplication::new(*participant_id, second))?;
        }
    }

    Ok(())
}

const HELP: &str = "\
commands:
  companies [search]          switch to the companies table
  positions [company_id]      switch to the positions table
  applications [position_id] [status]
                              switch to the application review table
  show                        render the current table
  next | prev | goto N        page navigation (N is 1-based)
  size N                      page size (5, 10, 25 or 50)
  add-company NAME EMAIL [URL]
  apply PARTICIPANT_ID POSITION_ID
  review ID STATUS            set an application's status
  delete ID                   delete a row from the current table
  quit";

#[tokio::main(flavor = "current_thread")]
async fn main() {
    dotenv().ok(); // Load .env file
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    // Select config profile (defaults to `local`).
    let app_env = env::var("APP_ENV").unwrap_or_else(|_| "local".into());

    let settings = Config::builder()
        .add_source(config::File::with_name("config/default").required(false))
        .add_source(config::File::with_name(&format!("config/{app_env}")).required(false))
        .add_source(config::Environment::with_prefix("APP"))
        .build();

    let settings = match settings {
        Ok(settings) => settings,
        Err(err) => {
            log::error!("Error loading settings: {err}");
            std::process::exit(1);
        }
    };

    let mut app_config = match settings.try_deserialize::<AppConfig>() {
        Ok(app_config) => app_config,
        Err(err) => {
            log::error!("Error loading app config: {err}");
            std::process::exit(1);
        }
    };
    if !PAGE_SIZE_OPTIONS.contains(&app_config.default_page_size) {
        log::warn!(
            "configured page size {} not in {PAGE_SIZE_OPTIONS:?}, using default",
            app_config.default_page_size
        );
        app_config = AppConfig::default();
    }

    let repo = InMemoryRepository::new();
    if let Err(err) = seed_demo_data(&repo) {
        log::error!("Failed to seed demo data: {err}");
        std::process::exit(1);
    }

    let cache = Rc::new(RefCell::new(QueryCache::new()));
    let notifier = LogNotifier;
    let page_size = app_config.default_page_size;

    let mut active = Active::Companies(Screen::new(
        companies::company_table(cache.clone(), repo.clone(), None),
        companies::columns(),
        page_size,
    ));
    with_active!(&active, screen => {
        screen.reload().await;
        screen.print();
    });

    let stdin = io::stdin();
    loop {
        print!("> ");
        if io::stdout().flush().is_err() {
            break;
        }
        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        let mut words = line.split_whitespace();
        let Some(command) = words.next() else {
            continue;
        };
        let args: Vec<&str> = words.collect();

        match command {
            "companies" => {
                let search = (!args.is_empty()).then(|| args.join(" "));
                let screen = Screen::new(
                    companies::company_table(cache.clone(), repo.clone(), search),
                    companies::columns(),
                    page_size,
                );
                screen.reload().await;
                screen.print();
                active = Active::Companies(screen);
            }
            "positions" => {
                let company_id = match args.first().map(|raw| raw.parse::<i32>()) {
                    Some(Ok(raw)) => match CompanyId::new(raw) {
                        Ok(id) => Some(id),
                        Err(err) => {
                            println!("{err}");
                            continue;
                        }
                    },
                    Some(Err(_)) => {
                        println!("usage: positions [company_id]");
                        continue;
                    }
                    None => None,
                };
                let screen = Screen::new(
                    positions::position_table(cache.clone(), repo.clone(), company_id),
                    positions::columns(),
                    page_size,
                );
                screen.reload().await;
                screen.print();
                active = Active::Positions(screen);
            }
            "applications" => {
                let position_id = match args.first().map(|raw| raw.parse::<i32>()) {
                    Some(Ok(raw)) => match PositionId::new(raw) {
                        Ok(id) => Some(id),
                        Err(err) => {
                            println!("{err}");
                            continue;
                        }
                    },
                    Some(Err(_)) => {
                        println!("usage: applications [position_id] [status]");
                        continue;
                    }
                    None => None,
                };
                let status = args.get(1).and_then(|raw| parse_status(raw));
                let screen = Screen::new(
                    applications::application_table(
                        cache.clone(),
                        repo.clone(),
                        position_id,
                        status,
                    ),
                    applications::columns(),
                    page_size,
                );
                screen.reload().await;
                screen.print();
                active = Active::Applications(screen);
            }
            "show" => with_active!(&active, screen => screen.print()),
            "next" => {
                with_active!(&active, screen => {
                    screen.next().await;
                    screen.print();
                });
            }
            "prev" => {
                with_active!(&active, screen => {
                    screen.prev().await;
                    screen.print();
                });
            }
            "goto" => {
                let Some(Ok(page)) = args.first().map(|raw| raw.parse::<usize>()) else {
                    println!("usage: goto N");
                    continue;
                };
                with_active!(&active, screen => {
                    screen.goto(page).await;
                    screen.print();
                });
            }
            "size" => {
                let Some(Ok(size)) = args.first().map(|raw| raw.parse::<usize>()) else {
                    println!("usage: size N");
                    continue;
                };
                with_active!(&active, screen => {
                    screen.resize(size).await;
                    screen.print();
                });
            }
            "add-company" => {
                let (Some(name), Some(email)) = (args.first(), args.get(1)) else {
                    println!("usage: add-company NAME EMAIL [URL]");
                    continue;
                };
                let Active::Companies(screen) = &active else {
                    println!("add-company works on the companies table");
                    continue;
                };
                let new_company =
                    match NewCompany::try_new(name, email, args.get(2).copied(), None) {
                        Ok(new_company) => new_company,
                        Err(err) => {
                            println!("{err}");
                            continue;
                        }
                    };
                match companies::create_company(&repo, &screen.table, &notifier, new_company).await
                {
                    Ok((company, _)) => {
                        println!("created company {}", company.id);
                        screen.print();
                    }
                    Err(err) => println!("{err}"),
                }
            }
            "apply" => {
                let (Some(Ok(participant)), Some(Ok(position))) = (
                    args.first().map(|raw| raw.parse::<i32>()),
                    args.get(1).map(|raw| raw.parse::<i32>()),
                ) else {
                    println!("usage: apply PARTICIPANT_ID POSITION_ID");
                    continue;
                };
                let Active::Applications(screen) = &active else {
                    println!("apply works on the applications table");
                    continue;
                };
                let new_application = match (ParticipantId::new(participant), PositionId::new(position)) {
                    (Ok(participant_id), Ok(position_id)) => {
                        NewApplication::new(participant_id, position_id)
                    }
                    (Err(err), _) | (_, Err(err)) => {
                        println!("{err}");
                        continue;
                    }
                };
                match applications::submit_application(&repo, &screen.table, &notifier, new_application)
                    .await
                {
                    Ok((application, _)) => {
                        println!("submitted application {}", application.reference);
                        screen.print();
                    }
                    Err(err) => println!("{err}"),
                }
            }
            "review" => {
                let (Some(Ok(raw_id)), Some(status)) = (
                    args.first().map(|raw| raw.parse::<i32>()),
                    args.get(1).and_then(|raw| parse_status(raw)),
                ) else {
                    println!("usage: review ID submitted|accepted|rejected");
                    continue;
                };
                let Active::Applications(screen) = &active else {
                    println!("review works on the applications table");
                    continue;
                };
                let id = match ApplicationId::new(raw_id) {
                    Ok(id) => id,
                    Err(err) => {
                        println!("{err}");
                        continue;
                    }
                };
                match applications::review_application(&repo, &screen.table, &notifier, id, status)
                    .await
                {
                    Ok(_) => screen.print(),
                    Err(err) => println!("{err}"),
                }
            }
            "delete" => {
                let Some(Ok(raw_id)) = args.first().map(|raw| raw.parse::<i32>()) else {
                    println!("usage: delete ID");
                    continue;
                };
                let outcome = match &active {
                    Active::Companies(screen) => match CompanyId::new(raw_id) {
                        Ok(id) => companies::delete_company(&repo, &screen.table, &notifier, id)
                            .await
                            .map(|report| {
                                screen.print();
                                report
                            }),
                        Err(err) => {
                            println!("{err}");
                            continue;
                        }
                    },
                    Active::Positions(screen) => match PositionId::new(raw_id) {
                        Ok(id) => positions::delete_position(&repo, &screen.table, &notifier, id)
                            .await
                            .map(|report| {
                                screen.print();
                                report
                            }),
                        Err(err) => {
                            println!("{err}");
                            continue;
                        }
                    },
                    Active::Applications(screen) => match ApplicationId::new(raw_id) {
                        Ok(id) => {
                            applications::withdraw_application(&repo, &screen.table, &notifier, id)
                                .await
                                .map(|report| {
                                    screen.print();
                                    report
                                })
                        }
                        Err(err) => {
                            println!("{err}");
                            continue;
                        }
                    },
                };
                match outcome {
                    Ok(report) if report.page_clamped => {
                        println!("(page was empty, stepped back one page)")
                    }
                    Ok(_) => {}
                    Err(err) => println!("{err}"),
                }
            }
            "help" => println!("{HELP}"),
            "quit" | "exit" => break,
            other => println!("unknown command '{other}', try 'help'"),
        }
    }
}
