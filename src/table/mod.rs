//! The paginated table kit every admin list screen is built on: page
//! envelopes, an explicit query cache, the fetch adapter, the generic
//! renderer, pagination controls, and the mutation/invalidation policy.

pub mod cache;
pub mod mutation;
pub mod page;
pub mod pager;
pub mod query;
pub mod render;
pub mod source;

pub use cache::QueryCache;
pub use mutation::{LogNotifier, MutationReport, Notifier, run_mutation};
pub use page::{DEFAULT_PAGE_SIZE, PAGE_SIZE_OPTIONS, PageRequest, PageResponse, QueryIdentity};
pub use pager::PagerView;
pub use query::{LoadOutcome, PagedQuery, QueryState};
pub use render::{CellValue, Column, RenderedTable, TableOutput};
pub use source::{FetchError, FetchResult, PageSource};
