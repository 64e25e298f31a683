//! Pagination arithmetic

use std::ops::Range;

use serde::{Deserialize, Serialize};

/// Current page and page size; pages are 1-based
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationState {
    #[serde(rename = "currentPage")]
    pub current_page: usize,
    #[serde(rename = "pageSize")]
    pub page_size: usize,
}

impl PaginationState {
    pub fn new(page_size: usize) -> Self {
        Self {
            current_page: 1,
            page_size: page_size.max(1),
        }
    }
}

/// `ceil(count / page_size)`, never less than 1
pub fn total_pages(count: usize, page_size: usize) -> usize {
    count.div_ceil(page_size.max(1)).max(1)
}

/// Clamp `page` into `[1, total]`
pub fn clamp_page(page: usize, total: usize) -> usize {
    page.clamp(1, total.max(1))
}

/// Index range of `page` within `count` items
pub fn page_bounds(page: usize, page_size: usize, count: usize) -> Range<usize> {
    let page_size = page_size.max(1);
    let start = page.saturating_sub(1).saturating_mul(page_size).min(count);
    let end = start.saturating_add(page_size).min(count);
    start..end
}

/// Page numbers for a pagination control of at most `max_buttons` entries
///
/// The window starts at page 1 near the beginning, ends at the last page near
/// the end, and otherwise keeps the current page centered.
pub fn page_window(current: usize, total: usize, max_buttons: usize) -> Vec<usize> {
    let max_buttons = max_buttons.max(1);
    let total = total.max(1);
    if total <= max_buttons {
        return (1..=total).collect();
    }

    let half = max_buttons / 2;
    let start = if current <= half + 1 {
        1
    } else if current + half >= total {
        total - max_buttons + 1
    } else {
        current - half
    };
    (start..start + max_buttons).collect()
}
