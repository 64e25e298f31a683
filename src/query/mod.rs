//! View computation for the table engine
//!
//! Pure search, sort and pagination helpers over record slices.

pub mod paginate;
pub mod search;
pub mod sort;

pub use paginate::{PaginationState, clamp_page, page_bounds, page_window, total_pages};
pub use search::{filter, filter_indices, matches};
pub use sort::{SortDirection, SortState, compare_values, sort_indices, stable_sort};
