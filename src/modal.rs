//! Add/edit form modal state

use serde_json::{Map, Value};

use crate::record::{Record, RecordId};

/// What the modal is currently showing
#[derive(Debug, Clone, PartialEq)]
pub enum ModalState<R> {
    Closed,
    /// Creating a record from a draft
    Adding(Map<String, Value>),
    /// Editing an existing record
    Editing(R),
}

/// Whether a submit from the modal creates or updates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalMode {
    Create,
    Update,
}

/// Open/closed state of the add/edit form and the data it was opened with
#[derive(Debug, Clone)]
pub struct FormModal<R> {
    state: ModalState<R>,
    default_data: Option<Map<String, Value>>,
}

impl<R: Record> Default for FormModal<R> {
    fn default() -> Self {
        Self::new(None)
    }
}

impl<R: Record> FormModal<R> {
    /// Closed modal; `default_data` seeds `open_add` when no draft is given
    pub fn new(default_data: Option<Map<String, Value>>) -> Self {
        Self {
            state: ModalState::Closed,
            default_data,
        }
    }

    /// Open for creation with `draft`, falling back to the default data and
    /// then to an empty draft
    pub fn open_add(&mut self, draft: Option<Map<String, Value>>) {
        let draft = draft
            .or_else(|| self.default_data.clone())
            .unwrap_or_default();
        tracing::debug!(fields = draft.len(), "Opening add form");
        self.state = ModalState::Adding(draft);
    }

    /// Open for editing `record`
    pub fn open_edit(&mut self, record: R) {
        tracing::debug!(id = %record.id(), "Opening edit form");
        self.state = ModalState::Editing(record);
    }

    /// Close and discard the editing data
    pub fn close(&mut self) {
        self.state = ModalState::Closed;
    }

    pub fn state(&self) -> &ModalState<R> {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        !matches!(self.state, ModalState::Closed)
    }

    /// Id of the record being edited
    ///
    /// A draft carrying a usable `id` attribute also counts, so a prefilled
    /// draft for an existing record submits as an update.
    pub fn editing_id(&self) -> Option<RecordId> {
        match &self.state {
            ModalState::Closed => None,
            ModalState::Adding(draft) => draft.get("id").and_then(RecordId::from_value),
            ModalState::Editing(record) => Some(record.id()),
        }
    }

    /// Submit mode, or `None` while closed
    pub fn mode(&self) -> Option<ModalMode> {
        if !self.is_open() {
            return None;
        }
        Some(match self.editing_id() {
            Some(_) => ModalMode::Update,
            None => ModalMode::Create,
        })
    }

    /// Initial form values for the open modal
    pub fn form_values(&self) -> Map<String, Value> {
        match &self.state {
            ModalState::Closed => Map::new(),
            ModalState::Adding(draft) => draft.clone(),
            ModalState::Editing(record) => record.properties().unwrap_or_default(),
        }
    }
}
