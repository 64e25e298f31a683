//! CrudStore - canonical in-memory record collection
//!
//! Holds the ordered collection a screen edits, allocates ids for new
//! records, and bumps a version counter on every mutation so table views
//! know when their snapshot is stale.

use std::collections::HashSet;

use serde_json::{Map, Value};

use crate::config::{GridConfig, IdStrategy};
use crate::error::{GridError, Result};
use crate::record::{Record, RecordId};

/// Synchronous yes/no gate asked before destructive operations
pub trait Confirm {
    fn confirm(&self, message: &str) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool,
{
    fn confirm(&self, message: &str) -> bool {
        self(message)
    }
}

/// Result of a confirmed delete
#[derive(Debug, Clone, PartialEq)]
pub enum DeleteOutcome<R> {
    /// The record was removed
    Deleted(R),
    /// The confirmation gate declined; nothing changed
    Cancelled,
}

/// In-memory, insertion-ordered record collection with unique ids
#[derive(Debug, Clone)]
pub struct CrudStore<R> {
    records: Vec<R>,
    id_strategy: IdStrategy,
    version: u64,
}

impl<R: Record> Default for CrudStore<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Record> CrudStore<R> {
    /// Create an empty store with sequential ids
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            id_strategy: IdStrategy::Sequential,
            version: 0,
        }
    }

    /// Create a store seeded with `records`
    ///
    /// Fails with a conflict if two records share an id.
    pub fn with_records(records: Vec<R>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(records.len());
        for record in &records {
            let id = record.id();
            if !seen.insert(id.clone()) {
                return Err(GridError::conflict(format!("Duplicate record id '{}'", id)));
            }
        }
        Ok(Self {
            records,
            id_strategy: IdStrategy::Sequential,
            version: 0,
        })
    }

    /// Create a seeded store using the configured id strategy
    pub fn from_config(config: &GridConfig, records: Vec<R>) -> Result<Self> {
        Ok(Self::with_records(records)?.with_id_strategy(config.id_strategy.clone()))
    }

    /// Set the id allocation strategy
    pub fn with_id_strategy(mut self, strategy: IdStrategy) -> Self {
        self.id_strategy = strategy;
        self
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Current collection snapshot, in insertion order
    pub fn records(&self) -> &[R] {
        &self.records
    }

    pub fn get(&self, id: &RecordId) -> Option<&R> {
        self.records.iter().find(|r| r.id() == *id)
    }

    pub fn contains(&self, id: &RecordId) -> bool {
        self.position(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Incremented by every successful mutation
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn ids(&self) -> Vec<RecordId> {
        self.records.iter().map(Record::id).collect()
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Create a record from `draft` and append it
    ///
    /// The allocated id replaces any `id` attribute in the draft.
    pub fn create(&mut self, draft: Map<String, Value>) -> Result<R> {
        let id = self.allocate_id()?;
        if self.contains(&id) {
            return Err(GridError::conflict(format!(
                "Generated id '{}' is already in use",
                id
            )));
        }

        let mut properties = draft;
        properties.insert("id".to_string(), id.to_value());
        let record = Self::materialize(properties)?;
        if record.id() != id {
            return Err(GridError::invalid_record(format!(
                "Record type did not keep the allocated id '{}'",
                id
            )));
        }

        self.records.push(record.clone());
        self.version += 1;
        tracing::debug!(id = %id, count = self.records.len(), "Created record");

        Ok(record)
    }

    /// Merge `patch` onto the record with `id`
    ///
    /// Attributes absent from the patch are preserved; an `id` attribute in
    /// the patch is ignored.
    pub fn update(&mut self, id: &RecordId, patch: Map<String, Value>) -> Result<R> {
        let Some(index) = self.position(id) else {
            tracing::warn!(id = %id, "Update target not found");
            return Err(GridError::record_not_found(id.clone()));
        };

        let mut properties = self.records[index].properties()?;
        for (key, value) in patch {
            if key != "id" {
                properties.insert(key, value);
            }
        }
        let updated = Self::materialize(properties)?;

        self.records[index] = updated.clone();
        self.version += 1;
        tracing::debug!(id = %id, "Updated record");

        Ok(updated)
    }

    /// Remove the record with `id`
    pub fn delete(&mut self, id: &RecordId) -> Result<R> {
        let Some(index) = self.position(id) else {
            tracing::warn!(id = %id, "Delete target not found");
            return Err(GridError::record_not_found(id.clone()));
        };

        let removed = self.records.remove(index);
        self.version += 1;
        tracing::debug!(id = %id, count = self.records.len(), "Deleted record");

        Ok(removed)
    }

    /// Ask `confirm` with `message`, then delete on an affirmative answer
    pub fn delete_confirmed(
        &mut self,
        id: &RecordId,
        confirm: &impl Confirm,
        message: &str,
    ) -> Result<DeleteOutcome<R>> {
        if !confirm.confirm(message) {
            tracing::debug!(id = %id, "Delete cancelled");
            return Ok(DeleteOutcome::Cancelled);
        }
        self.delete(id).map(DeleteOutcome::Deleted)
    }

    // =========================================================================
    // Internal Helpers
    // =========================================================================

    fn position(&self, id: &RecordId) -> Option<usize> {
        self.records.iter().position(|r| r.id() == *id)
    }

    fn materialize(properties: Map<String, Value>) -> Result<R> {
        serde_json::from_value(Value::Object(properties))
            .map_err(|e| GridError::invalid_record(format!("Cannot build record: {}", e)))
    }

    fn allocate_id(&self) -> Result<RecordId> {
        match &self.id_strategy {
            IdStrategy::Sequential => {
                let mut max = 0i64;
                for record in &self.records {
                    match record.id() {
                        RecordId::Int(n) => max = max.max(n),
                        RecordId::Text(text) => {
                            tracing::warn!(id = %text, "Sequential allocation over a text id");
                            return Err(GridError::ambiguous_id(format!(
                                "existing id '{}' is not numeric; use IdStrategy::Uuid or IdStrategy::Custom",
                                text
                            )));
                        }
                    }
                }
                max.checked_add(1)
                    .map(RecordId::Int)
                    .ok_or_else(|| GridError::conflict("Integer id space exhausted"))
            }
            IdStrategy::Uuid => Ok(RecordId::Text(uuid::Uuid::new_v4().to_string())),
            IdStrategy::Custom(generator) => Ok(generator(&self.ids())),
        }
    }
}
