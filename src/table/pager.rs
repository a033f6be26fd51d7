//! Pagination controls: pure translations from navigation intent to a new
//! [`PageRequest`], plus the elided page-link window shown under a table.

use serde::Serialize;

use crate::table::page::{InvalidPageSize, PAGE_SIZE_OPTIONS, PageRequest};
use crate::table::query::QueryState;

/// Computes the 1-based page links to display, eliding runs of pages far
/// from both the edges and the current page with `None` gaps.
fn link_window(
    page_count: usize,
    current_page: usize,
    left_edge: usize,
    left_current: usize,
    right_current: usize,
    right_edge: usize,
) -> Vec<Option<usize>> {
    if page_count == 0 {
        return vec![];
    }

    let mut links = Vec::new();

    let left_end = (1 + left_edge).min(page_count + 1);
    links.extend((1..left_end).map(Some));

    let mid_start = left_end.max(current_page.saturating_sub(left_current));
    let mid_end = (current_page + right_current + 1).min(page_count + 1);
    if mid_start > left_end {
        links.push(None);
    }
    links.extend((mid_start..mid_end).map(Some));

    let right_start = mid_end.max(page_count.saturating_sub(right_edge) + 1);
    if right_start > mid_end {
        links.push(None);
    }
    links.extend((right_start..=page_count).map(Some));

    links
}

/// Everything a pagination bar needs to draw itself. Produced from an
/// adapter snapshot; holds no behavior of its own.
#[derive(Clone, Debug, Serialize)]
pub struct PagerView {
    /// Current page, 1-based for display.
    pub page: usize,
    pub page_count: usize,
    pub page_size: usize,
    pub size_options: Vec<usize>,
    pub has_prev: bool,
    pub has_next: bool,
    /// Controls are disabled while a fetch is in flight.
    pub busy: bool,
    /// 1-based page links with `None` marking an elided gap.
    pub links: Vec<Option<usize>>,
}

impl PagerView {
    /// Derives the control state for the given adapter snapshot.
    pub fn for_state<T>(state: &QueryState<T>, request: PageRequest) -> Self {
        let page_count = state.data.as_ref().map_or(0, |data| data.page_count);
        let page = request.page_index + 1;
        let busy = state.is_fetching;
        Self {
            page,
            page_count,
            page_size: request.page_size,
            size_options: PAGE_SIZE_OPTIONS.to_vec(),
            has_prev: request.page_index > 0 && !busy,
            has_next: page < page_count && !busy,
            busy,
            links: link_window(page_count, page, 2, 2, 4, 2),
        }
    }
}

/// Next-page intent. `None` when no next page exists.
pub fn next(request: PageRequest, page_count: usize) -> Option<PageRequest> {
    if request.page_index + 1 < page_count {
        Some(request.with_index(request.page_index + 1))
    } else {
        None
    }
}

/// Previous-page intent. `None` on the first page.
pub fn prev(request: PageRequest) -> Option<PageRequest> {
    if request.page_index > 0 {
        Some(request.with_index(request.page_index - 1))
    } else {
        None
    }
}

/// Direct page entry, 1-based. Out-of-range input is clamped into
/// `[1, page_count]`, never reported as an error.
pub fn goto(request: PageRequest, page: usize, page_count: usize) -> PageRequest {
    if page_count == 0 {
        return request.with_index(0);
    }
    let clamped = page.clamp(1, page_count);
    request.with_index(clamped - 1)
}

/// Page-size selection. The page index always resets to 0: an index that was
/// valid at the old size has no meaningful position at the new one.
pub fn set_page_size(page_size: usize) -> Result<PageRequest, InvalidPageSize> {
    PageRequest::new(0, page_size)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(page_index: usize) -> PageRequest {
        PageRequest {
            page_index,
            page_size: 5,
        }
    }

    #[test]
    fn next_and_prev_stop_at_the_edges() {
        assert_eq!(next(request(0), 3), Some(request(1)));
        assert_eq!(next(request(2), 3), None);
        assert_eq!(next(request(0), 0), None);
        assert_eq!(prev(request(2)), Some(request(1)));
        assert_eq!(prev(request(0)), None);
    }

    #[test]
    fn goto_clamps_silently() {
        assert_eq!(goto(request(0), 99, 3).page_index, 2);
        assert_eq!(goto(request(2), 0, 3).page_index, 0);
        assert_eq!(goto(request(2), 2, 3).page_index, 1);
        assert_eq!(goto(request(2), 7, 0).page_index, 0);
    }

    #[test]
    fn size_change_resets_the_page_index() {
        let resized = set_page_size(25).unwrap();
        assert_eq!(resized.page_index, 0);
        assert_eq!(resized.page_size, 25);
        assert!(set_page_size(7).is_err());
    }

    #[test]
    fn short_collections_list_every_page() {
        assert_eq!(
            link_window(3, 1, 2, 2, 4, 2),
            vec![Some(1), Some(2), Some(3)]
        );
        assert_eq!(link_window(0, 1, 2, 2, 4, 2), vec![]);
    }

    #[test]
    fn long_collections_elide_the_middle() {
        let links = link_window(20, 10, 2, 2, 4, 2);
        assert_eq!(links[0], Some(1));
        assert_eq!(links[1], Some(2));
        assert_eq!(links[2], None);
        assert!(links.contains(&Some(10)));
        assert_eq!(links[links.len() - 1], Some(20));
        assert_eq!(links.iter().filter(|l| l.is_none()).count(), 2);
    }
}
