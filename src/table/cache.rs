//! Explicit page cache keyed by [`QueryIdentity`].
//!
//! One cache instance is shared by every table on a screen and passed to
//! adapters explicitly. Entries are stored type-erased so pages of different
//! row types live in the same map; the typed accessors downcast on the way
//! out. All access happens on the single UI thread, so interior mutability is
//! provided by the owner (`Rc<RefCell<QueryCache>>`).

use std::any::Any;
use std::collections::HashMap;

use crate::table::page::{PageRequest, PageResponse, QueryIdentity};

struct CacheEntry {
    payload: Box<dyn Any>,
    stale: bool,
    /// Sequence of the fetch that produced this page. Newer always wins.
    seq: u64,
}

/// Ticket handed out when a fetch starts. Completing or abandoning the fetch
/// hands it back so the cache can tell a live response from a superseded one.
#[derive(Clone, Debug)]
pub struct FetchTicket {
    identity: QueryIdentity,
    seq: u64,
}

impl FetchTicket {
    pub fn identity(&self) -> &QueryIdentity {
        &self.identity
    }
}

/// Process-wide page cache with explicit `get`/`insert`/`invalidate`
/// operations and in-flight bookkeeping.
#[derive(Default)]
pub struct QueryCache {
    entries: HashMap<QueryIdentity, CacheEntry>,
    in_flight: HashMap<QueryIdentity, u64>,
    /// Highest sequence at which each identity was invalidated. Responses
    /// issued at or before this mark are discarded on completion.
    stale_marks: HashMap<QueryIdentity, u64>,
    next_seq: u64,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn bump(&mut self) -> u64 {
        self.next_seq += 1;
        self.next_seq
    }

    /// Starts a fetch for `identity`. Returns `None` when an identical fetch
    /// is already in flight: the caller must not issue a second request, the
    /// pending one will settle the shared entry.
    pub fn begin_fetch(&mut self, identity: &QueryIdentity) -> Option<FetchTicket> {
        if self.in_flight.contains_key(identity) {
            return None;
        }
        let seq = self.bump();
        self.in_flight.insert(identity.clone(), seq);
        Some(FetchTicket {
            identity: identity.clone(),
            seq,
        })
    }

    /// Stores a settled response. Returns `false` when the ticket was
    /// superseded by an invalidation or a newer fetch, in which case the
    /// response is discarded.
    pub fn complete_fetch<T: 'static>(
        &mut self,
        ticket: FetchTicket,
        response: PageResponse<T>,
    ) -> bool {
        if self.in_flight.get(&ticket.identity) == Some(&ticket.seq) {
            self.in_flight.remove(&ticket.identity);
        }
        if let Some(mark) = self.stale_marks.get(&ticket.identity)
            && ticket.seq <= *mark
        {
            return false;
        }
        if let Some(existing) = self.entries.get(&ticket.identity)
            && existing.seq > ticket.seq
        {
            return false;
        }
        self.entries.insert(
            ticket.identity,
            CacheEntry {
                payload: Box::new(response),
                stale: false,
                seq: ticket.seq,
            },
        );
        true
    }

    /// Drops in-flight bookkeeping for a fetch that failed.
    pub fn abandon_fetch(&mut self, ticket: FetchTicket) {
        if self.in_flight.get(&ticket.identity) == Some(&ticket.seq) {
            self.in_flight.remove(&ticket.identity);
        }
    }

    /// Inserts a page directly, bypassing the fetch protocol. Used to seed
    /// the first page from data rendered on the server.
    pub fn insert<T: 'static>(&mut self, identity: QueryIdentity, response: PageResponse<T>) {
        let seq = self.bump();
        self.entries.insert(
            identity,
            CacheEntry {
                payload: Box::new(response),
                stale: false,
                seq,
            },
        );
    }

    /// Returns the cached page for `identity`, fresh or stale.
    pub fn get<T: Clone + 'static>(&self, identity: &QueryIdentity) -> Option<PageResponse<T>> {
        self.entries
            .get(identity)
            .and_then(|entry| entry.payload.downcast_ref::<PageResponse<T>>())
            .cloned()
    }

    /// True when a page is cached and has not been invalidated since.
    pub fn is_fresh(&self, identity: &QueryIdentity) -> bool {
        self.entries
            .get(identity)
            .is_some_and(|entry| !entry.stale)
    }

    /// True when any page, fresh or stale, is cached for `identity`.
    pub fn contains(&self, identity: &QueryIdentity) -> bool {
        self.entries.contains_key(identity)
    }

    /// True when a fetch for `identity` is currently in flight.
    pub fn is_in_flight(&self, identity: &QueryIdentity) -> bool {
        self.in_flight.contains_key(identity)
    }

    /// Marks one identity stale. The next access refetches; a response still
    /// in flight for it resolves superseded and is discarded.
    pub fn invalidate(&mut self, identity: &QueryIdentity) {
        let mark = self.bump();
        self.stale_marks.insert(identity.clone(), mark);
        self.in_flight.remove(identity);
        if let Some(entry) = self.entries.get_mut(identity) {
            entry.stale = true;
        }
    }

    /// Invalidates every page of `collection` at `page_size` from
    /// `from_index` (inclusive) through `page_count` (exclusive), plus any
    /// cached page beyond `page_count` left over from before the collection
    /// shrank. Deliberately conservative: a deletion shifts every later
    /// page's rows by one, so everything from the current page on is suspect.
    pub fn invalidate_from(
        &mut self,
        collection: &str,
        page_size: usize,
        from_index: usize,
        page_count: usize,
    ) {
        for page_index in from_index..page_count {
            let identity = QueryIdentity::new(
                collection,
                PageRequest {
                    page_index,
                    page_size,
                },
            );
            self.invalidate(&identity);
        }
        let leftovers: Vec<QueryIdentity> = self
            .entries
            .keys()
            .filter(|identity| {
                identity.collection == collection
                    && identity.request.page_size == page_size
                    && identity.request.page_index >= page_count.max(from_index)
            })
            .cloned()
            .collect();
        for identity in leftovers {
            self.invalidate(&identity);
        }
    }
}
