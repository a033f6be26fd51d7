//! The fetch seam between a table and whatever serves its rows.

use async_trait::async_trait;
use thiserror::Error;

use crate::table::page::{PageRequest, PageResponse};

/// Error returned by a page fetch. `Clone` so snapshots can carry the last
/// error alongside previously shown data.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum FetchError {
    /// The backing store rejected or failed the request.
    #[error("failed to fetch page: {0}")]
    Backend(String),
    /// The transport dropped before a response arrived.
    #[error("connection error: {0}")]
    Connection(String),
}

pub type FetchResult<T> = Result<T, FetchError>;

/// Serves pages of one logical collection. Implementations adapt a
/// repository reader (or a remote endpoint) to the table kit; they own any
/// filter state beyond the page request itself, since filters are part of
/// the fetch function, not of the table.
#[async_trait(?Send)]
pub trait PageSource {
    type Row: Clone + 'static;

    /// Logical collection name, the first half of every [`QueryIdentity`]
    /// this source produces.
    ///
    /// [`QueryIdentity`]: crate::table::page::QueryIdentity
    fn collection(&self) -> &str;

    /// Fetches exactly the requested slice. No retries: a failure surfaces
    /// to the table and the user decides whether to try again.
    async fn fetch_page(&self, request: PageRequest) -> FetchResult<PageResponse<Self::Row>>;
}
