//! Mutation wrapper and cache-invalidation policy.
//!
//! Lifecycle of one wrapped mutation: pending, then on success invalidation
//! of every page from the current one through the last known page, a refetch
//! of the current page, and a page-index walk-back while the refetched page
//! comes up empty. On failure the user is alerted once and nothing cached or
//! shown changes, since no optimistic update was applied.

use std::fmt::Display;

use crate::table::query::PagedQuery;
use crate::table::source::PageSource;

/// Alert primitive for mutation failures. Injected so tests can assert the
/// contract is invoked exactly once.
pub trait Notifier {
    fn notify_error(&self, message: &str);
}

/// Notifier writing through the logging facade.
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify_error(&self, message: &str) {
        log::error!("{message}");
    }
}

/// What the invalidation policy did after a successful mutation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MutationReport {
    /// The current page came back empty and the page index was walked back.
    pub page_clamped: bool,
    /// The refetch after invalidation failed; the adapter carries the error.
    pub refetch_failed: bool,
}

/// Runs `mutation` against the collection shown by `query` and applies the
/// invalidation policy on success.
///
/// Every page identity from the current page index through the last known
/// page count is marked stale: a deletion shifts all later pages' rows by
/// one position, so this over-invalidates rather than guessing which pages
/// actually changed. If the refetched current page is empty and the index is
/// positive, the index is decremented and the new current page fetched, so
/// the user is never stranded past the last page.
///
/// On failure the error is reported through `notifier` exactly once, no
/// invalidation happens, and the error is returned to the caller.
pub async fn run_mutation<S, N, Fut, T, E>(
    query: &PagedQuery<S>,
    notifier: &N,
    mutation: Fut,
) -> Result<(T, MutationReport), E>
where
    S: PageSource,
    N: Notifier + ?Sized,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let value = match mutation.await {
        Ok(value) => value,
        Err(err) => {
            notifier.notify_error(&err.to_string());
            return Err(err);
        }
    };

    let request = query.request();
    // Before anything loaded there is nothing cached to invalidate beyond
    // the current page itself.
    let page_count = query.page_count().unwrap_or(request.page_index + 1);
    query.cache().borrow_mut().invalidate_from(
        query.collection(),
        request.page_size,
        request.page_index,
        page_count,
    );

    let mut report = MutationReport::default();
    loop {
        if let Err(err) = query.load().await {
            // Fetch errors surface through the adapter's error field, not
            // the mutation notifier.
            log::warn!(
                "refetch of {} failed after mutation: {err}",
                query.identity()
            );
            report.refetch_failed = true;
            break;
        }
        let request = query.request();
        let empty = query
            .snapshot()
            .data
            .is_some_and(|data| data.results.is_empty());
        if empty && request.page_index > 0 {
            query.set_request(request.with_index(request.page_index - 1));
            report.page_clamped = true;
        } else {
            break;
        }
    }

    Ok((value, report))
}
