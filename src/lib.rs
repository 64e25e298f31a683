//! # admin-grid
//!
//! Schema-driven in-memory table engine and CRUD state for admin screens.
//!
//! This crate provides the state and computation behind a typical admin list
//! page: a declared set of columns, a searchable, sortable and paginated view
//! of a record collection, an add/edit form with required-field validation,
//! and create/update/delete against an in-memory store. Rendering is left to
//! the caller; every schema and state type serializes with serde.
//!
//! ## Features
//!
//! - **Fluent Schema Builders**: Declare table columns and form fields in order
//! - **Render Variants**: Plain, number, badge, date, image and custom cells
//! - **Table Engine**: Case-insensitive search, stable sort and pagination
//! - **Crud Store**: Insertion-ordered records with sequential, UUID or custom ids
//! - **Form Modal**: Closed, adding and editing states with default drafts
//! - **Submit Pipeline**: Create/update dispatch with payload transforms
//!
//! ## Quick Start
//!
//! ```rust
//! use admin_grid::{
//!     AdminContext, CrudScreen, DynamicRecord, FieldOptions, FormBuilder, GridConfig, RecordId,
//!     TableBuilder,
//! };
//! use serde_json::json;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let columns = TableBuilder::<DynamicRecord>::new()
//!         .text("name", "Name")
//!         .text("email", "Email")
//!         .build();
//!     let fields = FormBuilder::new()
//!         .text("name", "Name", FieldOptions::new().required())
//!         .email("email", "Email", FieldOptions::new().required())
//!         .build();
//!     let records = vec![
//!         DynamicRecord::from_value(json!({"id": 1, "name": "John Doe", "email": "john@example.com"}))?,
//!         DynamicRecord::from_value(json!({"id": 2, "name": "Jane Smith", "email": "jane@example.com"}))?,
//!     ];
//!
//!     let config = GridConfig::builder().page_size(8).build();
//!     let mut screen = CrudScreen::new(AdminContext::new("/api"), config, columns, fields, records)?;
//!
//!     screen.search("jane");
//!     assert_eq!(screen.view().total_filtered, 1);
//!
//!     screen.open_add(None);
//!     let payload = json!({"name": "Bob", "email": "bob@example.com"});
//!     let created = screen.submit(payload.as_object().cloned().unwrap_or_default())?;
//!     assert_eq!(created.record().id, RecordId::Int(3));
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Configuration
//!
//! Screens, stores and engines are configured using `GridConfig`:
//!
//! ```rust
//! use admin_grid::{GridConfig, IdStrategy};
//!
//! let config = GridConfig::builder()
//!     .page_size(8)                 // Rows per page (default 10)
//!     .empty_placeholder("-")       // Shown for empty date cells
//!     .id_strategy(IdStrategy::Uuid) // Text ids for new records
//!     .build();
//! assert_eq!(config.page_size, 8);
//! ```
//!
//! ## Ids
//!
//! The default sequential strategy allocates one more than the largest integer
//! id in the collection. It refuses to run over text ids; collections keyed by
//! text should use `IdStrategy::Uuid` or `IdStrategy::custom`.

pub mod column;
pub mod config;
pub mod context;
pub mod engine;
pub mod error;
pub mod form;
pub mod modal;
pub mod query;
pub mod record;
pub mod screen;
pub mod store;
pub mod submit;

// Re-export main types for convenience
pub use column::{
    BadgeTone, Cell, CellRenderer, ColumnDefinition, ColumnOptions, DateFormat, NumberFormat,
    RenderKind, RenderVariant, TableBuilder,
};
pub use config::{GridConfig, GridConfigBuilder, IdGenerator, IdStrategy};
pub use context::{AdminContext, AdminUser, NavRoute};
pub use engine::{TableEngine, TableState, TableView};
pub use error::{FieldError, FieldErrors, GridError, Result};
pub use form::{
    FieldDefinition, FieldOption, FieldOptions, FieldType, FieldWidth, FormBuilder, FormState,
    validate_required,
};
pub use modal::{FormModal, ModalMode, ModalState};
pub use query::{PaginationState, SortDirection, SortState};
pub use record::{DynamicRecord, Record, RecordId};
pub use screen::CrudScreen;
pub use store::{Confirm, CrudStore, DeleteOutcome};
pub use submit::{SubmitOutcome, SubmitPipeline};
