//! Submit pipeline
//!
//! Maps a submitted form payload onto a store create or update, depending on
//! whether the modal holds an existing record.

use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::error::Result;
use crate::form::{FieldDefinition, validate_required};
use crate::modal::FormModal;
use crate::record::Record;
use crate::store::CrudStore;

/// Payload transform applied before the store call
pub type PayloadTransform = Arc<dyn Fn(Map<String, Value>) -> Map<String, Value> + Send + Sync>;

/// Callback run after a successful submit
pub type SuccessCallback<R> = Arc<dyn Fn(&SubmitOutcome<R>) + Send + Sync>;

/// Store effect of a successful submit
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome<R> {
    Created(R),
    Updated(R),
}

impl<R> SubmitOutcome<R> {
    pub fn record(&self) -> &R {
        match self {
            SubmitOutcome::Created(record) | SubmitOutcome::Updated(record) => record,
        }
    }

    pub fn into_record(self) -> R {
        match self {
            SubmitOutcome::Created(record) | SubmitOutcome::Updated(record) => record,
        }
    }

    pub fn is_created(&self) -> bool {
        matches!(self, SubmitOutcome::Created(_))
    }
}

/// Create/update dispatch for a form modal
pub struct SubmitPipeline<R> {
    on_create: Option<PayloadTransform>,
    on_update: Option<PayloadTransform>,
    schema: Option<Vec<FieldDefinition>>,
    close_on_success: bool,
    on_success: Option<SuccessCallback<R>>,
}

impl<R> Clone for SubmitPipeline<R> {
    fn clone(&self) -> Self {
        Self {
            on_create: self.on_create.clone(),
            on_update: self.on_update.clone(),
            schema: self.schema.clone(),
            close_on_success: self.close_on_success,
            on_success: self.on_success.clone(),
        }
    }
}

impl<R> fmt::Debug for SubmitPipeline<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubmitPipeline")
            .field("on_create", &self.on_create.is_some())
            .field("on_update", &self.on_update.is_some())
            .field("schema", &self.schema.as_ref().map(Vec::len))
            .field("close_on_success", &self.close_on_success)
            .field("on_success", &self.on_success.is_some())
            .finish()
    }
}

impl<R: Record> Default for SubmitPipeline<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Record> SubmitPipeline<R> {
    pub fn new() -> Self {
        Self {
            on_create: None,
            on_update: None,
            schema: None,
            close_on_success: true,
            on_success: None,
        }
    }

    /// Transform applied to create payloads, e.g. to fill derived fields
    pub fn on_create(
        mut self,
        transform: impl Fn(Map<String, Value>) -> Map<String, Value> + Send + Sync + 'static,
    ) -> Self {
        self.on_create = Some(Arc::new(transform));
        self
    }

    /// Transform applied to update patches
    pub fn on_update(
        mut self,
        transform: impl Fn(Map<String, Value>) -> Map<String, Value> + Send + Sync + 'static,
    ) -> Self {
        self.on_update = Some(Arc::new(transform));
        self
    }

    /// Validate required fields of `fields` before dispatching
    pub fn with_schema(mut self, fields: Vec<FieldDefinition>) -> Self {
        self.schema = Some(fields);
        self
    }

    pub fn close_on_success(mut self, close: bool) -> Self {
        self.close_on_success = close;
        self
    }

    pub fn on_success(mut self, callback: impl Fn(&SubmitOutcome<R>) + Send + Sync + 'static) -> Self {
        self.on_success = Some(Arc::new(callback));
        self
    }

    /// Submit `payload` from `modal` into `store`
    ///
    /// On any error the modal stays as it was and the store is unchanged.
    pub fn submit(
        &self,
        modal: &mut FormModal<R>,
        store: &mut CrudStore<R>,
        payload: Map<String, Value>,
    ) -> Result<SubmitOutcome<R>> {
        if let Some(fields) = &self.schema {
            validate_required(fields, &payload).inspect_err(|errors| {
                tracing::debug!(errors = errors.len(), "Submit rejected by validation");
            })?;
        }

        let outcome = match modal.editing_id() {
            None => {
                let draft = match &self.on_create {
                    Some(transform) => transform(payload),
                    None => payload,
                };
                SubmitOutcome::Created(store.create(draft)?)
            }
            Some(id) => {
                let patch = match &self.on_update {
                    Some(transform) => transform(payload),
                    None => payload,
                };
                SubmitOutcome::Updated(store.update(&id, patch)?)
            }
        };

        if self.close_on_success {
            modal.close();
        }
        if let Some(callback) = &self.on_success {
            callback(&outcome);
        }

        Ok(outcome)
    }
}
