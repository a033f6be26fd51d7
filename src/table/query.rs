//! The paginated query adapter: one instance per mounted table.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::table::cache::QueryCache;
use crate::table::page::{PageRequest, PageResponse, QueryIdentity};
use crate::table::source::{FetchError, FetchResult, PageSource};

/// How a call to [`PagedQuery::load`] was satisfied.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadOutcome {
    /// A fresh cached page was reused without touching the source.
    FromCache,
    /// The source was queried and the response stored.
    Fetched,
    /// An identical fetch was already in flight; no second request was made.
    Coalesced,
    /// The response arrived after the page had been invalidated and was
    /// discarded in favor of a newer fetch.
    Superseded,
}

/// Observable view of the adapter, captured at one instant.
#[derive(Clone, Debug)]
pub struct QueryState<T> {
    pub data: Option<PageResponse<T>>,
    pub error: Option<FetchError>,
    /// True only before any data has ever been shown by this adapter.
    pub is_loading: bool,
    /// True while a request for the current page is in flight, background
    /// refetches included.
    pub is_fetching: bool,
    /// True when the previous page's rows are still on screen while the new
    /// page loads, so the layout does not flicker on page change.
    pub is_previous_data: bool,
}

/// Fetches exactly the page named by its current [`PageRequest`] through a
/// [`PageSource`], reading and populating a shared [`QueryCache`].
///
/// The cache is injected rather than global; two adapters given the same
/// cache and collection observe each other's fetches, which is what
/// coalesces duplicate requests.
pub struct PagedQuery<S: PageSource> {
    cache: Rc<RefCell<QueryCache>>,
    source: Rc<S>,
    request: Cell<PageRequest>,
    shown: RefCell<Option<(QueryIdentity, PageResponse<S::Row>)>>,
    error: RefCell<Option<FetchError>>,
}

impl<S: PageSource> PagedQuery<S> {
    pub fn new(cache: Rc<RefCell<QueryCache>>, source: Rc<S>) -> Self {
        Self::with_request(cache, source, PageRequest::default())
    }

    pub fn with_request(
        cache: Rc<RefCell<QueryCache>>,
        source: Rc<S>,
        request: PageRequest,
    ) -> Self {
        Self {
            cache,
            source,
            request: Cell::new(request),
            shown: RefCell::new(None),
            error: RefCell::new(None),
        }
    }

    pub fn request(&self) -> PageRequest {
        self.request.get()
    }

    /// Identity of the page the adapter currently points at.
    pub fn identity(&self) -> QueryIdentity {
        QueryIdentity::new(self.source.collection(), self.request.get())
    }

    pub fn collection(&self) -> &str {
        self.source.collection()
    }

    /// Points the adapter at a new page. Previously shown rows stay visible
    /// (`is_previous_data`) until the new page loads.
    pub fn set_request(&self, request: PageRequest) {
        self.request.set(request);
    }

    /// Seeds the cache and the adapter with a page produced outside the
    /// fetch path, e.g. rendered on the server with the initial document.
    pub fn seed(&self, response: PageResponse<S::Row>) {
        let identity = self.identity();
        self.cache
            .borrow_mut()
            .insert(identity.clone(), response.clone());
        *self.shown.borrow_mut() = Some((identity, response));
    }

    /// Captures the adapter's observable state.
    pub fn snapshot(&self) -> QueryState<S::Row> {
        let identity = self.identity();
        let shown = self.shown.borrow();
        let cache = self.cache.borrow();
        let is_previous_data = shown
            .as_ref()
            .is_some_and(|(shown_for, _)| *shown_for != identity);
        QueryState {
            data: shown.as_ref().map(|(_, response)| response.clone()),
            error: self.error.borrow().clone(),
            is_loading: shown.is_none() && !cache.contains(&identity),
            is_fetching: cache.is_in_flight(&identity),
            is_previous_data,
        }
    }

    /// Ensures the current page is loaded: serves a fresh cached page,
    /// joins an in-flight identical fetch, or queries the source.
    ///
    /// A response that resolves after its page was invalidated is discarded
    /// (`LoadOutcome::Superseded`); the newer fetch's response wins.
    pub async fn load(&self) -> FetchResult<LoadOutcome> {
        let request = self.request.get();
        let identity = QueryIdentity::new(self.source.collection(), request);

        let ticket = {
            let mut cache = self.cache.borrow_mut();
            if cache.is_fresh(&identity) {
                if let Some(response) = cache.get::<S::Row>(&identity) {
                    *self.shown.borrow_mut() = Some((identity, response));
                    *self.error.borrow_mut() = None;
                    return Ok(LoadOutcome::FromCache);
                }
            }
            match cache.begin_fetch(&identity) {
                Some(ticket) => ticket,
                None => return Ok(LoadOutcome::Coalesced),
            }
        };

        // No cache borrow is held across this await.
        match self.source.fetch_page(request).await {
            Ok(response) => {
                let applied = self
                    .cache
                    .borrow_mut()
                    .complete_fetch(ticket, response.clone());
                if applied {
                    if self.request.get() == request {
                        *self.shown.borrow_mut() = Some((identity, response));
                        *self.error.borrow_mut() = None;
                    }
                    Ok(LoadOutcome::Fetched)
                } else {
                    Ok(LoadOutcome::Superseded)
                }
            }
            Err(err) => {
                self.cache.borrow_mut().abandon_fetch(ticket);
                *self.error.borrow_mut() = Some(err.clone());
                Err(err)
            }
        }
    }

    /// Page count reported by the most recently shown response, if any.
    pub fn page_count(&self) -> Option<usize> {
        self.shown
            .borrow()
            .as_ref()
            .map(|(_, response)| response.page_count)
    }

    pub(crate) fn cache(&self) -> &Rc<RefCell<QueryCache>> {
        &self.cache
    }
}
