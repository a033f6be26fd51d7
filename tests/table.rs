//! End-to-end behavior of the paginated table kit against the in-memory
//! repository: page shapes, invalidation reach, page-index walk-back,
//! request coalescing, and superseded responses.

use std::cell::RefCell;
use std::rc::Rc;

use async_trait::async_trait;
use tokio::sync::Notify;
use tokio::task::yield_now;

use cariere::domain::company::{Company, NewCompany};
use cariere::domain::types::CompanyId;
use cariere::repository::memory::InMemoryRepository;
use cariere::repository::{CompanyReader, CompanyWriter};
use cariere::services::companies::{self, CompanySource};
use cariere::table::mutation::Notifier as TableNotifier;
use cariere::table::{
    FetchResult, LoadOutcome, PageRequest, PageResponse, PageSource, PagedQuery, QueryCache,
};

/// Wraps a source and records every request that actually reaches it, so
/// tests can assert which pages were refetched after an invalidation.
struct CountingSource<S> {
    inner: S,
    calls: RefCell<Vec<PageRequest>>,
}

impl<S> CountingSource<S> {
    fn new(inner: S) -> Self {
        Self {
            inner,
            calls: RefCell::new(Vec::new()),
        }
    }

    fn fetches_of_page(&self, page_index: usize) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|request| request.page_index == page_index)
            .count()
    }

    fn total_fetches(&self) -> usize {
        self.calls.borrow().len()
    }
}

#[async_trait(?Send)]
impl<S: PageSource> PageSource for CountingSource<S> {
    type Row = S::Row;

    fn collection(&self) -> &str {
        self.inner.collection()
    }

    async fn fetch_page(&self, request: PageRequest) -> FetchResult<PageResponse<Self::Row>> {
        self.calls.borrow_mut().push(request);
        self.inner.fetch_page(request).await
    }
}

/// Wraps a source and holds every fetch until the gate is released, so
/// tests can overlap a fetch with other work deterministically.
struct GatedSource<S> {
    inner: S,
    gate: Rc<Notify>,
}

#[async_trait(?Send)]
impl<S: PageSource> PageSource for GatedSource<S> {
    type Row = S::Row;

    fn collection(&self) -> &str {
        self.inner.collection()
    }

    async fn fetch_page(&self, request: PageRequest) -> FetchResult<PageResponse<Self::Row>> {
        self.gate.notified().await;
        self.inner.fetch_page(request).await
    }
}

#[derive(Default)]
struct RecordingNotifier {
    errors: RefCell<Vec<String>>,
}

impl TableNotifier for RecordingNotifier {
    fn notify_error(&self, message: &str) {
        self.errors.borrow_mut().push(message.to_string());
    }
}

fn seeded_repo(count: usize) -> InMemoryRepository {
    let repo = InMemoryRepository::new();
    for index in 1..=count {
        repo.create_company(
            &NewCompany::try_new(
                &format!("Company{index:02}"),
                &format!("jobs@company{index:02}.example"),
                None,
                None,
            )
            .expect("valid company"),
        )
        .expect("create company");
    }
    repo
}

type CountingTable = PagedQuery<CountingSource<CompanySource<InMemoryRepository>>>;

fn counting_table(
    repo: &InMemoryRepository,
    page_size: usize,
) -> (Rc<RefCell<QueryCache>>, Rc<CountingSource<CompanySource<InMemoryRepository>>>, CountingTable)
{
    let cache = Rc::new(RefCell::new(QueryCache::new()));
    let source = Rc::new(CountingSource::new(CompanySource::new(repo.clone(), None)));
    let table = PagedQuery::with_request(
        cache.clone(),
        source.clone(),
        PageRequest::new(0, page_size).expect("allowed page size"),
    );
    (cache, source, table)
}

fn shown_ids<S: PageSource<Row = Company>>(table: &PagedQuery<S>) -> Vec<i32> {
    table
        .snapshot()
        .data
        .expect("loaded data")
        .results
        .iter()
        .map(|company: &Company| company.id.get())
        .collect()
}

#[tokio::test(flavor = "current_thread")]
async fn page_shapes_match_the_collection() {
    let repo = seeded_repo(12);
    let (_cache, _source, table) = counting_table(&repo, 5);

    // 12 items at size 5: three pages of 5, 5, 2.
    for (page_index, expected_len) in [(0, 5), (1, 5), (2, 2)] {
        table.set_request(PageRequest::new(page_index, 5).unwrap());
        table.load().await.expect("load page");
        let data = table.snapshot().data.expect("page data");
        assert_eq!(data.page_count, 3);
        assert_eq!(data.results.len(), expected_len);
        assert!(data.results.len() <= 5);
    }
}

#[tokio::test(flavor = "current_thread")]
async fn rows_keep_stable_ascending_order() {
    let repo = seeded_repo(12);
    let (_cache, _source, table) = counting_table(&repo, 5);

    table.load().await.expect("load page");
    assert_eq!(shown_ids(&table), vec![1, 2, 3, 4, 5]);
    table.set_request(PageRequest::new(1, 5).unwrap());
    table.load().await.expect("load page");
    assert_eq!(shown_ids(&table), vec![6, 7, 8, 9, 10]);
}

#[tokio::test(flavor = "current_thread")]
async fn fresh_pages_are_served_from_cache() {
    let repo = seeded_repo(12);
    let (_cache, source, table) = counting_table(&repo, 5);

    assert_eq!(table.load().await.unwrap(), LoadOutcome::Fetched);
    assert_eq!(table.load().await.unwrap(), LoadOutcome::FromCache);
    assert_eq!(source.total_fetches(), 1);
}

#[tokio::test(flavor = "current_thread")]
async fn seeded_first_page_skips_the_initial_fetch() {
    let repo = seeded_repo(3);
    let (_cache, source, table) = counting_table(&repo, 5);

    let (total, rows) = repo
        .list_companies(Default::default())
        .expect("list companies");
    table.seed(PageResponse::new(rows, total, 5));

    assert_eq!(table.load().await.unwrap(), LoadOutcome::FromCache);
    assert_eq!(source.total_fetches(), 0);
    assert!(!table.snapshot().is_loading);
}

#[tokio::test(flavor = "current_thread")]
async fn previous_rows_stay_visible_while_changing_page() {
    let repo = seeded_repo(12);
    let (_cache, _source, table) = counting_table(&repo, 5);

    table.load().await.expect("load page");
    table.set_request(PageRequest::new(1, 5).unwrap());

    let state = table.snapshot();
    assert!(state.is_previous_data);
    assert_eq!(state.data.expect("previous page").results.len(), 5);

    table.load().await.expect("load page");
    assert!(!table.snapshot().is_previous_data);
}

#[tokio::test(flavor = "current_thread")]
async fn delete_invalidates_current_page_through_last() {
    let repo = seeded_repo(12);
    let (_cache, source, table) = counting_table(&repo, 5);
    let notifier = RecordingNotifier::default();

    // Warm all three pages, then return to the first.
    for page_index in [0, 1, 2, 0] {
        table.set_request(PageRequest::new(page_index, 5).unwrap());
        table.load().await.expect("load page");
    }
    assert_eq!(source.total_fetches(), 3);

    let first_id = CompanyId::new(1).unwrap();
    let report = companies::delete_company(&repo, &table, &notifier, first_id)
        .await
        .expect("delete should succeed");
    assert!(!report.page_clamped);

    // The policy refetched the current page immediately.
    assert_eq!(source.fetches_of_page(0), 2);

    // Pages 1 and 2 were invalidated too: visiting them refetches.
    table.set_request(PageRequest::new(1, 5).unwrap());
    assert_eq!(table.load().await.unwrap(), LoadOutcome::Fetched);
    table.set_request(PageRequest::new(2, 5).unwrap());
    assert_eq!(table.load().await.unwrap(), LoadOutcome::Fetched);

    // 11 items at size 5 still make three pages; the last now holds one.
    let data = table.snapshot().data.expect("last page");
    assert_eq!(data.page_count, 3);
    assert_eq!(data.results.len(), 1);
    assert!(notifier.errors.borrow().is_empty());
}

#[tokio::test(flavor = "current_thread")]
async fn emptying_the_last_page_steps_the_index_back() {
    let repo = seeded_repo(12);
    let (_cache, _source, table) = counting_table(&repo, 5);
    let notifier = RecordingNotifier::default();

    table.set_request(PageRequest::new(2, 5).unwrap());
    table.load().await.expect("load page");
    assert_eq!(shown_ids(&table), vec![11, 12]);

    let report = companies::delete_company(&repo, &table, &notifier, CompanyId::new(11).unwrap())
        .await
        .expect("first delete");
    assert!(!report.page_clamped);
    assert_eq!(shown_ids(&table), vec![12]);

    let report = companies::delete_company(&repo, &table, &notifier, CompanyId::new(12).unwrap())
        .await
        .expect("second delete");
    assert!(report.page_clamped);
    assert_eq!(table.request().page_index, 1);
    assert_eq!(shown_ids(&table), vec![6, 7, 8, 9, 10]);
}

#[tokio::test(flavor = "current_thread")]
async fn refetch_of_unchanged_data_is_idempotent() {
    let repo = seeded_repo(12);
    let (cache, _source, table) = counting_table(&repo, 5);

    table.load().await.expect("load page");
    let before = table.snapshot().data.expect("first load");

    cache.borrow_mut().invalidate(&table.identity());
    assert_eq!(table.load().await.unwrap(), LoadOutcome::Fetched);
    let after = table.snapshot().data.expect("second load");

    assert_eq!(before, after);
}

#[tokio::test(flavor = "current_thread")]
async fn size_change_starts_over_at_the_first_page() {
    let repo = seeded_repo(12);
    let (_cache, _source, table) = counting_table(&repo, 5);

    // Page 1 of size 5 exists; page 1 of size 25 would not.
    table.set_request(PageRequest::new(1, 5).unwrap());
    table.load().await.expect("load page");

    table.set_request(cariere::table::pager::set_page_size(25).unwrap());
    table.load().await.expect("load page");

    let data = table.snapshot().data.expect("resized page");
    assert_eq!(table.request().page_index, 0);
    assert_eq!(data.page_count, 1);
    assert_eq!(data.results.len(), 12);
}

#[tokio::test(flavor = "current_thread")]
async fn failed_mutation_keeps_rows_and_alerts_once() {
    let repo = seeded_repo(5);
    let (_cache, source, table) = counting_table(&repo, 5);
    let notifier = RecordingNotifier::default();

    table.load().await.expect("load page");
    let before = shown_ids(&table);
    let fetches_before = source.total_fetches();

    let missing = CompanyId::new(99).unwrap();
    let result = companies::delete_company(&repo, &table, &notifier, missing).await;

    assert!(result.is_err());
    assert_eq!(notifier.errors.borrow().len(), 1);
    assert_eq!(shown_ids(&table), before);
    // No invalidation happened, so nothing was refetched either.
    assert_eq!(source.total_fetches(), fetches_before);
}

#[tokio::test(flavor = "current_thread")]
async fn concurrent_identical_loads_coalesce() {
    let repo = seeded_repo(12);
    let cache = Rc::new(RefCell::new(QueryCache::new()));
    let gate = Rc::new(Notify::new());
    let source = Rc::new(CountingSource::new(GatedSource {
        inner: CompanySource::new(repo.clone(), None),
        gate: gate.clone(),
    }));
    let table = PagedQuery::with_request(
        cache.clone(),
        source.clone(),
        PageRequest::new(0, 5).unwrap(),
    );

    let (first, second, ()) = tokio::join!(table.load(), table.load(), async {
        // Let both loads start before releasing the fetch.
        yield_now().await;
        assert!(table.snapshot().is_fetching);
        gate.notify_one();
    });

    assert_eq!(first.unwrap(), LoadOutcome::Fetched);
    assert_eq!(second.unwrap(), LoadOutcome::Coalesced);
    assert_eq!(source.total_fetches(), 1);
}

#[tokio::test(flavor = "current_thread")]
async fn invalidated_in_flight_response_is_superseded() {
    let repo = seeded_repo(12);
    let cache = Rc::new(RefCell::new(QueryCache::new()));
    let gate = Rc::new(Notify::new());
    let source = Rc::new(CountingSource::new(GatedSource {
        inner: CompanySource::new(repo.clone(), None),
        gate: gate.clone(),
    }));
    let table = PagedQuery::with_request(
        cache.clone(),
        source.clone(),
        PageRequest::new(0, 5).unwrap(),
    );

    let (stale, ()) = tokio::join!(table.load(), async {
        yield_now().await;
        // A mutation elsewhere deletes a row and invalidates the page
        // while the original fetch is still in flight.
        repo.delete_company(CompanyId::new(1).unwrap())
            .expect("delete company");
        cache.borrow_mut().invalidate(&table.identity());
        gate.notify_one();
    });
    assert_eq!(stale.unwrap(), LoadOutcome::Superseded);

    gate.notify_one();
    assert_eq!(table.load().await.unwrap(), LoadOutcome::Fetched);
    assert_eq!(shown_ids(&table), vec![2, 3, 4, 5, 6]);
}
