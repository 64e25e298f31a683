//! Configuration for grid screens
//!
//! Provides a builder pattern for configuring page size, cell formats,
//! id allocation and the delete confirmation prompt.

use std::fmt;
use std::sync::Arc;

use crate::column::{DateFormat, NumberFormat};
use crate::record::RecordId;

/// Generator for caller-supplied ids, receiving the ids currently in use
pub type IdGenerator = Arc<dyn Fn(&[RecordId]) -> RecordId + Send + Sync>;

/// How a CrudStore allocates ids for new records
#[derive(Clone, Default)]
pub enum IdStrategy {
    /// `max(existing integer ids) + 1`, starting at 1; fails on text ids
    #[default]
    Sequential,
    /// Random v4 UUID, stored as a text id
    Uuid,
    /// Caller-supplied generator
    Custom(IdGenerator),
}

impl IdStrategy {
    /// Wrap a closure as a custom generator
    pub fn custom(generator: impl Fn(&[RecordId]) -> RecordId + Send + Sync + 'static) -> Self {
        IdStrategy::Custom(Arc::new(generator))
    }
}

impl fmt::Debug for IdStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdStrategy::Sequential => write!(f, "Sequential"),
            IdStrategy::Uuid => write!(f, "Uuid"),
            IdStrategy::Custom(_) => write!(f, "Custom(..)"),
        }
    }
}

/// Configuration shared by the table, store and screen
#[derive(Debug, Clone)]
pub struct GridConfig {
    /// Rows per page (always at least 1)
    pub page_size: usize,
    /// Default format for number columns
    pub number_format: NumberFormat,
    /// Default format for date columns
    pub date_format: DateFormat,
    /// Text shown for empty date cells (default: "-")
    pub empty_placeholder: String,
    /// Message passed to the confirmation capability before a delete
    pub delete_prompt: String,
    /// Id allocation for new records
    pub id_strategy: IdStrategy,
    /// Maximum number of page buttons in the pagination window
    pub page_window: usize,
}

impl Default for GridConfig {
    fn default() -> Self {
        GridConfigBuilder::new().build()
    }
}

impl GridConfig {
    /// Create a new configuration builder
    pub fn builder() -> GridConfigBuilder {
        GridConfigBuilder::new()
    }
}

/// Builder for GridConfig
#[derive(Debug)]
pub struct GridConfigBuilder {
    page_size: usize,
    number_format: NumberFormat,
    date_format: DateFormat,
    empty_placeholder: String,
    delete_prompt: String,
    id_strategy: IdStrategy,
    page_window: usize,
}

impl Default for GridConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl GridConfigBuilder {
    pub fn new() -> Self {
        Self {
            page_size: 10,
            number_format: NumberFormat::default(),
            date_format: DateFormat::default(),
            empty_placeholder: "-".to_string(),
            delete_prompt: "Are you sure you want to delete this item?".to_string(),
            id_strategy: IdStrategy::Sequential,
            page_window: 5,
        }
    }

    /// Set rows per page (default: 10); zero is raised to 1
    pub fn page_size(mut self, size: usize) -> Self {
        self.page_size = size;
        self
    }

    pub fn number_format(mut self, format: NumberFormat) -> Self {
        self.number_format = format;
        self
    }

    pub fn date_format(mut self, format: DateFormat) -> Self {
        self.date_format = format;
        self
    }

    /// Set the empty-cell placeholder (default: "-")
    pub fn empty_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.empty_placeholder = placeholder.into();
        self
    }

    pub fn delete_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.delete_prompt = prompt.into();
        self
    }

    /// Set the id allocation strategy (default: Sequential)
    pub fn id_strategy(mut self, strategy: IdStrategy) -> Self {
        self.id_strategy = strategy;
        self
    }

    /// Set the page button window (default: 5)
    pub fn page_window(mut self, buttons: usize) -> Self {
        self.page_window = buttons;
        self
    }

    /// Build the configuration
    pub fn build(self) -> GridConfig {
        GridConfig {
            page_size: self.page_size.max(1),
            number_format: self.number_format,
            date_format: self.date_format.with_placeholder(self.empty_placeholder.clone()),
            empty_placeholder: self.empty_placeholder,
            delete_prompt: self.delete_prompt,
            id_strategy: self.id_strategy,
            page_window: self.page_window.max(1),
        }
    }
}
