//! TableEngine - search, sort and paginate a record snapshot
//!
//! The engine owns a snapshot of the records plus the view state a data
//! table tracks (search query, sort column and direction, current page).
//! The filtered and sorted ordering is computed lazily and cached until the
//! query, sort or snapshot changes.

use std::cell::OnceCell;

use serde::{Deserialize, Serialize};

use crate::column::{Cell, ColumnDefinition};
use crate::config::GridConfig;
use crate::query::{
    PaginationState, SortState, clamp_page, filter_indices, page_bounds, page_window,
    sort_indices, total_pages,
};
use crate::record::Record;
use crate::store::CrudStore;

/// View state of a data table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableState {
    /// Free-text search query; empty means no filtering
    pub query: String,
    pub sort: SortState,
    pub pagination: PaginationState,
}

impl TableState {
    pub fn new(page_size: usize) -> Self {
        Self {
            query: String::new(),
            sort: SortState::default(),
            pagination: PaginationState::new(page_size),
        }
    }
}

/// One computed page of a table
#[derive(Debug)]
pub struct TableView<'a, R> {
    /// Records on the current page, in display order
    pub rows: Vec<&'a R>,
    /// Number of records passing the search filter
    pub total_filtered: usize,
    /// Number of pages, at least 1
    pub total_pages: usize,
    pub current_page: usize,
    pub page_size: usize,
    pub sort: &'a SortState,
    columns: &'a [ColumnDefinition<R>],
    window: usize,
}

impl<'a, R: Record> TableView<'a, R> {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }

    /// Page buttons to show, centered on the current page
    pub fn page_numbers(&self) -> Vec<usize> {
        page_window(self.current_page, self.total_pages, self.window)
    }

    /// Rendered cells, one row per record and one cell per column
    pub fn cells(&self) -> Vec<Vec<Cell>> {
        self.rows
            .iter()
            .map(|row| self.columns.iter().map(|c| c.render(row)).collect())
            .collect()
    }
}

/// Search/sort/paginate engine over a snapshot of records
#[derive(Debug, Clone)]
pub struct TableEngine<R> {
    records: Vec<R>,
    columns: Vec<ColumnDefinition<R>>,
    state: TableState,
    window: usize,
    synced_version: Option<u64>,
    order: OnceCell<Vec<usize>>,
}

impl<R: Record> TableEngine<R> {
    /// Create an engine over no records
    pub fn new(columns: Vec<ColumnDefinition<R>>, page_size: usize) -> Self {
        Self {
            records: Vec::new(),
            columns,
            state: TableState::new(page_size),
            window: 5,
            synced_version: None,
            order: OnceCell::new(),
        }
    }

    /// Create an engine with page size and page window from configuration
    pub fn from_config(columns: Vec<ColumnDefinition<R>>, config: &GridConfig) -> Self {
        let mut engine = Self::new(columns, config.page_size);
        engine.window = config.page_window;
        engine
    }

    /// Seed the snapshot
    pub fn with_records(mut self, records: Vec<R>) -> Self {
        self.set_records(records);
        self
    }

    pub fn columns(&self) -> &[ColumnDefinition<R>] {
        &self.columns
    }

    pub fn state(&self) -> &TableState {
        &self.state
    }

    pub fn records(&self) -> &[R] {
        &self.records
    }

    // =========================================================================
    // State Operations
    // =========================================================================

    /// Set the search query and return to the first page
    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.state.query = query.into();
        self.state.pagination.current_page = 1;
        self.invalidate();
    }

    /// Sort by `column_key`, flipping direction if it is already selected
    ///
    /// Returns false (and changes nothing) for a column declared non-sortable.
    pub fn set_sort(&mut self, column_key: &str) -> bool {
        let sortable = self
            .columns
            .iter()
            .find(|c| c.key == column_key)
            .is_none_or(|c| c.sortable);
        if !sortable {
            tracing::debug!(column = column_key, "Ignoring sort on non-sortable column");
            return false;
        }

        self.state.sort.select(column_key);
        self.invalidate();
        true
    }

    /// Go to page `page`, clamped into `[1, total_pages]`
    pub fn set_page(&mut self, page: usize) {
        self.state.pagination.current_page = clamp_page(page, self.total_pages());
    }

    /// Change rows per page (at least 1) and return to the first page
    pub fn set_page_size(&mut self, page_size: usize) {
        self.state.pagination.page_size = page_size.max(1);
        self.state.pagination.current_page = 1;
    }

    /// Replace the whole view state, clamping its page
    pub fn restore_state(&mut self, state: TableState) {
        self.state = state;
        self.state.pagination.page_size = self.state.pagination.page_size.max(1);
        self.invalidate();
        self.clamp_current_page();
    }

    // =========================================================================
    // Snapshot Operations
    // =========================================================================

    /// Replace the snapshot and re-clamp the current page
    pub fn set_records(&mut self, records: Vec<R>) {
        self.records = records;
        self.synced_version = None;
        self.invalidate();
        self.clamp_current_page();
    }

    /// Refresh the snapshot from `store` if it changed since the last sync
    ///
    /// Returns whether a refresh happened.
    pub fn sync(&mut self, store: &CrudStore<R>) -> bool {
        if self.synced_version == Some(store.version()) {
            return false;
        }
        self.set_records(store.records().to_vec());
        self.synced_version = Some(store.version());
        true
    }

    // =========================================================================
    // View Computation
    // =========================================================================

    /// Number of records passing the current search query
    pub fn total_filtered(&self) -> usize {
        self.order().len()
    }

    pub fn total_pages(&self) -> usize {
        total_pages(self.total_filtered(), self.state.pagination.page_size)
    }

    /// The full filtered and sorted sequence, across all pages
    pub fn ordered(&self) -> Vec<&R> {
        self.order().iter().map(|&i| &self.records[i]).collect()
    }

    /// Compute the current page
    pub fn view(&self) -> TableView<'_, R> {
        let order = self.order();
        let pagination = self.state.pagination;
        let bounds = page_bounds(pagination.current_page, pagination.page_size, order.len());

        TableView {
            rows: order[bounds].iter().map(|&i| &self.records[i]).collect(),
            total_filtered: order.len(),
            total_pages: total_pages(order.len(), pagination.page_size),
            current_page: pagination.current_page,
            page_size: pagination.page_size,
            sort: &self.state.sort,
            columns: &self.columns,
            window: self.window,
        }
    }

    fn order(&self) -> &[usize] {
        self.order.get_or_init(|| {
            let mut indices = filter_indices(&self.records, &self.state.query);
            sort_indices(&self.records, &mut indices, &self.state.sort);
            tracing::debug!(
                total = self.records.len(),
                filtered = indices.len(),
                query = %self.state.query,
                "Recomputed table ordering"
            );
            indices
        })
    }

    fn invalidate(&mut self) {
        self.order.take();
    }

    fn clamp_current_page(&mut self) {
        let total = self.total_pages();
        let pagination = &mut self.state.pagination;
        pagination.current_page = clamp_page(pagination.current_page, total);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::TableBuilder;
    use crate::query::SortDirection;
    use crate::record::{DynamicRecord, RecordId};
    use serde_json::{Value, json};

    fn numbered(count: i64) -> Vec<DynamicRecord> {
        (1..=count)
            .map(|i| {
                DynamicRecord::from_value(json!({
                    "id": i,
                    "name": format!("user {:02}", i),
                    "group": if i % 2 == 0 { "even" } else { "odd" },
                }))
                .unwrap()
            })
            .collect()
    }

    fn ids(rows: &[&DynamicRecord]) -> Vec<i64> {
        rows.iter().filter_map(|r| r.id.as_int()).collect()
    }

    fn engine(count: i64, page_size: usize) -> TableEngine<DynamicRecord> {
        let columns = TableBuilder::new()
            .text("name", "Name")
            .text("group", "Group")
            .image("avatar", "Avatar")
            .build();
        TableEngine::new(columns, page_size).with_records(numbered(count))
    }

    // =========================================================================
    // Pagination Tests
    // =========================================================================

    #[test]
    fn test_first_page_by_default() {
        let engine = engine(12, 8);
        let view = engine.view();
        assert_eq!(ids(&view.rows), (1..=8).collect::<Vec<_>>());
        assert_eq!(view.total_pages, 2);
        assert_eq!(view.total_filtered, 12);
        assert!(!view.has_previous());
        assert!(view.has_next());
    }

    #[test]
    fn test_second_page_holds_remainder() {
        let mut engine = engine(12, 8);
        engine.set_page(2);
        let view = engine.view();
        assert_eq!(ids(&view.rows), vec![9, 10, 11, 12]);
        assert!(!view.has_next());
    }

    #[test]
    fn test_set_page_clamps() {
        let mut engine = engine(12, 8);
        engine.set_page(99);
        assert_eq!(engine.state().pagination.current_page, 2);
        engine.set_page(0);
        assert_eq!(engine.state().pagination.current_page, 1);
    }

    #[test]
    fn test_empty_collection_has_one_page() {
        let mut engine = engine(0, 8);
        engine.set_page(3);
        let view = engine.view();
        assert!(view.is_empty());
        assert_eq!(view.total_pages, 1);
        assert_eq!(view.current_page, 1);
    }

    #[test]
    fn test_set_page_size_resets_page() {
        let mut engine = engine(12, 4);
        engine.set_page(3);
        engine.set_page_size(0);
        assert_eq!(engine.state().pagination.page_size, 1);
        assert_eq!(engine.state().pagination.current_page, 1);
        assert_eq!(engine.total_pages(), 12);
    }

    #[test]
    fn test_page_numbers_window() {
        let mut engine = engine(100, 10);
        engine.set_page(6);
        assert_eq!(engine.view().page_numbers(), vec![4, 5, 6, 7, 8]);
    }

    // =========================================================================
    // Search Tests
    // =========================================================================

    #[test]
    fn test_search_resets_to_first_page() {
        let mut engine = engine(12, 4);
        engine.set_page(3);
        engine.set_search_query("even");
        assert_eq!(engine.state().pagination.current_page, 1);
        assert_eq!(engine.total_filtered(), 6);
        assert_eq!(ids(&engine.view().rows), vec![2, 4, 6, 8]);
    }

    #[test]
    fn test_clearing_search_restores_all() {
        let mut engine = engine(12, 20);
        engine.set_search_query("user 1");
        assert_eq!(ids(&engine.ordered()), vec![10, 11, 12]);
        engine.set_search_query("");
        assert_eq!(engine.total_filtered(), 12);
    }

    // =========================================================================
    // Sort Tests
    // =========================================================================

    #[test]
    fn test_sort_toggles_direction() {
        let mut engine = engine(5, 10);
        assert!(engine.set_sort("name"));
        assert_eq!(ids(&engine.ordered()), vec![1, 2, 3, 4, 5]);
        assert!(engine.set_sort("name"));
        assert_eq!(engine.state().sort.direction, SortDirection::Desc);
        assert_eq!(ids(&engine.ordered()), vec![5, 4, 3, 2, 1]);
    }

    #[test]
    fn test_sort_ties_are_stable() {
        let mut engine = engine(6, 10);
        engine.set_sort("group");
        assert_eq!(ids(&engine.ordered()), vec![2, 4, 6, 1, 3, 5]);
        engine.set_sort("group");
        assert_eq!(ids(&engine.ordered()), vec![1, 3, 5, 2, 4, 6]);
    }

    #[test]
    fn test_non_sortable_column_ignored() {
        let mut engine = engine(3, 10);
        assert!(!engine.set_sort("avatar"));
        assert!(engine.state().sort.column_key.is_none());
    }

    #[test]
    fn test_sort_by_undeclared_attribute() {
        let mut engine = engine(3, 10);
        assert!(engine.set_sort("id"));
        engine.set_sort("id");
        assert_eq!(ids(&engine.ordered()), vec![3, 2, 1]);
    }

    // =========================================================================
    // Snapshot Tests
    // =========================================================================

    #[test]
    fn test_set_records_clamps_page() {
        let mut engine = engine(12, 4);
        engine.set_page(3);
        engine.set_records(numbered(5));
        assert_eq!(engine.state().pagination.current_page, 2);
    }

    #[test]
    fn test_sync_follows_store_version() {
        let mut store = CrudStore::with_records(numbered(3)).unwrap();
        let mut engine = engine(0, 10);

        assert!(engine.sync(&store));
        assert!(!engine.sync(&store));
        assert_eq!(engine.total_filtered(), 3);

        store.delete(&RecordId::Int(2)).unwrap();
        assert!(engine.sync(&store));
        assert_eq!(ids(&engine.ordered()), vec![1, 3]);
    }

    #[test]
    fn test_view_cells() {
        let engine = engine(1, 10);
        let cells = engine.view().cells();
        assert_eq!(cells.len(), 1);
        assert_eq!(cells[0][0], Cell::text("user 01"));
        assert_eq!(cells[0][1], Cell::text("odd"));
    }

    #[test]
    fn test_restore_state_clamps() {
        let mut engine = engine(12, 4);
        let mut state = engine.state().clone();
        state.pagination.current_page = 40;
        state.query = "odd".to_string();
        engine.restore_state(state);
        assert_eq!(engine.state().pagination.current_page, 2);
    }

    #[test]
    fn test_state_serialization() {
        let engine = engine(1, 8);
        let json: Value = serde_json::to_value(engine.state()).unwrap();
        assert_eq!(json["pagination"]["pageSize"], json!(8));
        assert_eq!(json["sort"]["columnKey"], json!(null));
    }
}
