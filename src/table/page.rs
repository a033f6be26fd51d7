//! Page request/response envelopes shared by every admin list.

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Page sizes the size selector offers.
pub const PAGE_SIZE_OPTIONS: [usize; 4] = [5, 10, 25, 50];

/// Page size used when a table mounts without an explicit choice.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Raised when a page request is built with a size outside
/// [`PAGE_SIZE_OPTIONS`].
#[derive(Debug, Error, PartialEq, Eq)]
#[error("page size {0} is not one of the allowed sizes")]
pub struct InvalidPageSize(pub usize);

/// The slice of a collection a table currently shows: zero-based page index
/// plus one of the fixed page sizes.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct PageRequest {
    pub page_index: usize,
    pub page_size: usize,
}

impl PageRequest {
    /// Builds a request, rejecting sizes outside the allowed set.
    pub fn new(page_index: usize, page_size: usize) -> Result<Self, InvalidPageSize> {
        if PAGE_SIZE_OPTIONS.contains(&page_size) {
            Ok(Self {
                page_index,
                page_size,
            })
        } else {
            Err(InvalidPageSize(page_size))
        }
    }

    /// Same page size, different page index.
    pub fn with_index(self, page_index: usize) -> Self {
        Self { page_index, ..self }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page_index: 0,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Display for PageRequest {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.page_index, self.page_size)
    }
}

/// One fetched page: the total page count at fetch time plus the rows of the
/// requested slice, in server order.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PageResponse<T> {
    pub page_count: usize,
    pub results: Vec<T>,
}

impl<T> PageResponse<T> {
    /// Builds a response from one page of rows and the collection total.
    pub fn new(results: Vec<T>, total: usize, page_size: usize) -> Self {
        Self {
            page_count: total.div_ceil(page_size),
            results,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

/// Addresses one cached page without holding a reference to it: the logical
/// collection name plus the page request that produced it.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct QueryIdentity {
    pub collection: String,
    pub request: PageRequest,
}

impl QueryIdentity {
    pub fn new(collection: impl Into<String>, request: PageRequest) -> Self {
        Self {
            collection: collection.into(),
            request,
        }
    }
}

impl Display for QueryIdentity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.collection, self.request)
    }
}
