//! CrudScreen - one admin list page
//!
//! Wires a store, a table engine, the add/edit modal and the submit pipeline
//! together. Every store mutation re-syncs the engine so the table always
//! shows the current collection.

use serde_json::{Map, Value};

use crate::column::ColumnDefinition;
use crate::config::GridConfig;
use crate::context::AdminContext;
use crate::engine::{TableEngine, TableView};
use crate::error::{GridError, Result};
use crate::form::FieldDefinition;
use crate::modal::FormModal;
use crate::record::{Record, RecordId};
use crate::store::{Confirm, CrudStore, DeleteOutcome};
use crate::submit::{SubmitOutcome, SubmitPipeline};

#[derive(Debug, Clone)]
pub struct CrudScreen<R> {
    context: AdminContext,
    config: GridConfig,
    fields: Vec<FieldDefinition>,
    store: CrudStore<R>,
    engine: TableEngine<R>,
    modal: FormModal<R>,
    pipeline: SubmitPipeline<R>,
}

impl<R: Record> CrudScreen<R> {
    /// Create a screen over `records`
    ///
    /// Submits are validated against `fields`. Fails if two records share an
    /// id.
    pub fn new(
        context: AdminContext,
        config: GridConfig,
        columns: Vec<ColumnDefinition<R>>,
        fields: Vec<FieldDefinition>,
        records: Vec<R>,
    ) -> Result<Self> {
        let store = CrudStore::from_config(&config, records)?;
        let mut engine = TableEngine::from_config(columns, &config);
        engine.sync(&store);

        tracing::debug!(
            records = store.len(),
            columns = engine.columns().len(),
            fields = fields.len(),
            "Created crud screen"
        );

        Ok(Self {
            pipeline: SubmitPipeline::new().with_schema(fields.clone()),
            context,
            config,
            fields,
            store,
            engine,
            modal: FormModal::new(None),
        })
    }

    /// Draft used when the add form is opened without one
    pub fn with_default_draft(mut self, draft: Map<String, Value>) -> Self {
        self.modal = FormModal::new(Some(draft));
        self
    }

    /// Use `pipeline` for submits; the screen's fields stay its schema
    pub fn with_pipeline(mut self, pipeline: SubmitPipeline<R>) -> Self {
        self.pipeline = pipeline.with_schema(self.fields.clone());
        self
    }

    pub fn context(&self) -> &AdminContext {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut AdminContext {
        &mut self.context
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    pub fn fields(&self) -> &[FieldDefinition] {
        &self.fields
    }

    pub fn store(&self) -> &CrudStore<R> {
        &self.store
    }

    pub fn engine(&self) -> &TableEngine<R> {
        &self.engine
    }

    pub fn modal(&self) -> &FormModal<R> {
        &self.modal
    }

    // =========================================================================
    // Table
    // =========================================================================

    pub fn view(&self) -> TableView<'_, R> {
        self.engine.view()
    }

    pub fn search(&mut self, query: impl Into<String>) {
        self.engine.set_search_query(query);
    }

    /// Sort by `column_key`; false when the column is not sortable
    pub fn sort_by(&mut self, column_key: &str) -> bool {
        self.engine.set_sort(column_key)
    }

    pub fn go_to_page(&mut self, page: usize) {
        self.engine.set_page(page);
    }

    // =========================================================================
    // Form
    // =========================================================================

    pub fn open_add(&mut self, draft: Option<Map<String, Value>>) {
        self.modal.open_add(draft);
    }

    /// Open the edit form for the stored record with `id`
    pub fn open_edit(&mut self, id: &RecordId) -> Result<()> {
        let record = self
            .store
            .get(id)
            .cloned()
            .ok_or_else(|| GridError::record_not_found(id.clone()))?;
        self.modal.open_edit(record);
        Ok(())
    }

    pub fn close_form(&mut self) {
        self.modal.close();
    }

    /// Submit the open form
    pub fn submit(&mut self, payload: Map<String, Value>) -> Result<SubmitOutcome<R>> {
        let outcome = self
            .pipeline
            .submit(&mut self.modal, &mut self.store, payload)?;
        self.engine.sync(&self.store);
        Ok(outcome)
    }

    // =========================================================================
    // Delete
    // =========================================================================

    /// Delete the record with `id` after `confirm` accepts the configured prompt
    pub fn delete(&mut self, id: &RecordId, confirm: &impl Confirm) -> Result<DeleteOutcome<R>> {
        let outcome = self
            .store
            .delete_confirmed(id, confirm, &self.config.delete_prompt)?;
        self.engine.sync(&self.store);
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::TableBuilder;
    use crate::form::{FieldOptions, FormBuilder};
    use crate::record::DynamicRecord;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("Expected an object"),
        }
    }

    fn screen(count: i64) -> CrudScreen<DynamicRecord> {
        let records = (1..=count)
            .map(|i| DynamicRecord::new(i, object(json!({"name": format!("item {:02}", i)}))))
            .collect();
        let columns = TableBuilder::new().text("name", "Name").build();
        let fields = FormBuilder::new()
            .text("name", "Name", FieldOptions::new().required())
            .build();
        let config = GridConfig::builder().page_size(4).build();
        CrudScreen::new(AdminContext::new("/api"), config, columns, fields, records).unwrap()
    }

    #[test]
    fn test_new_rejects_duplicate_ids() {
        let records = vec![
            DynamicRecord::new(1, Map::new()),
            DynamicRecord::new(1, Map::new()),
        ];
        let result = CrudScreen::new(
            AdminContext::default(),
            GridConfig::default(),
            Vec::new(),
            Vec::new(),
            records,
        );
        assert!(matches!(result, Err(GridError::Conflict(_))));
    }

    #[test]
    fn test_create_shows_in_table() {
        let mut screen = screen(3);
        screen.open_add(None);
        let outcome = screen.submit(object(json!({"name": "new"}))).unwrap();

        assert_eq!(outcome.record().id, RecordId::Int(4));
        assert_eq!(screen.view().total_filtered, 4);
        assert!(!screen.modal().is_open());
    }

    #[test]
    fn test_invalid_submit_keeps_form_open() {
        let mut screen = screen(3);
        screen.open_add(None);
        let err = screen.submit(Map::new()).unwrap_err();
        assert!(err.field_errors().is_some());
        assert!(screen.modal().is_open());
        assert_eq!(screen.view().total_filtered, 3);
    }

    #[test]
    fn test_open_edit_missing_record() {
        let mut screen = screen(3);
        let err = screen.open_edit(&RecordId::Int(42)).unwrap_err();
        assert!(matches!(err, GridError::RecordNotFound(_)));
        assert!(!screen.modal().is_open());
    }

    #[test]
    fn test_edit_updates_row() {
        let mut screen = screen(3);
        screen.open_edit(&RecordId::Int(2)).unwrap();
        screen.submit(object(json!({"name": "renamed"}))).unwrap();

        screen.search("renamed");
        let view = screen.view();
        assert_eq!(view.rows.len(), 1);
        assert_eq!(view.rows[0].id, RecordId::Int(2));
    }

    #[test]
    fn test_delete_uses_configured_prompt_and_clamps_page() {
        let mut screen = screen(5);
        screen.go_to_page(2);
        assert_eq!(screen.view().current_page, 2);

        let confirm = |message: &str| message == "Are you sure you want to delete this item?";
        let outcome = screen.delete(&RecordId::Int(5), &confirm).unwrap();

        assert!(matches!(outcome, DeleteOutcome::Deleted(_)));
        assert_eq!(screen.view().current_page, 1);
        assert_eq!(screen.view().total_pages, 1);
    }

    #[test]
    fn test_delete_cancelled_leaves_table() {
        let mut screen = screen(2);
        let outcome = screen.delete(&RecordId::Int(1), &|_: &str| false).unwrap();
        assert_eq!(outcome, DeleteOutcome::Cancelled);
        assert_eq!(screen.view().total_filtered, 2);
    }

    #[test]
    fn test_default_draft_and_custom_pipeline() {
        let mut screen = screen(1)
            .with_default_draft(object(json!({"name": "preset"})))
            .with_pipeline(SubmitPipeline::new().on_create(|mut draft| {
                draft.insert("status".into(), json!("pending"));
                draft
            }));

        screen.open_add(None);
        let values = screen.modal().form_values();
        let created = screen.submit(values).unwrap().into_record();
        assert_eq!(created.field("name"), Some(json!("preset")));
        assert_eq!(created.field("status"), Some(json!("pending")));
    }
}
