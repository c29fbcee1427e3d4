//! Operation batch shapes handed to the persistence collaborator.
//!
//! These are in-process contracts, not wire formats: the collaborator
//! receives typed values and decides how to persist them. Field and
//! attribute maps are `BTreeMap`s so a batch serializes and logs in a
//! stable order.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::entity::EntityKind;
use crate::inherit::InheritedDependent;

/// What a single cell edit targets on its entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "name", rename_all = "lowercase")]
pub enum EditTarget {
    /// A plain entity field (`name`, `status`, ...).
    Field(String),
    /// An inheritable attribute (`attrib.<name>` columns).
    Attrib(String),
}

/// One sparse cell edit as it leaves the grid.
///
/// `entity_kind` is the raw kind string from the event; kinds the
/// engine does not support are filtered out during batching, not erred.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityEdit {
    pub entity_id: String,
    pub entity_kind: String,
    pub target: EditTarget,
    pub value: Value,
}

impl EntityEdit {
    pub fn field(id: &str, kind: &str, field: &str, value: Value) -> Self {
        Self {
            entity_id: id.to_string(),
            entity_kind: kind.to_string(),
            target: EditTarget::Field(field.to_string()),
            value,
        }
    }

    pub fn attrib(id: &str, kind: &str, attrib: &str, value: Value) -> Self {
        Self {
            entity_id: id.to_string(),
            entity_kind: kind.to_string(),
            target: EditTarget::Attrib(attrib.to_string()),
            value,
        }
    }
}

/// Request to drop explicit attribute values and fall back to the
/// parent's, one entity per entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttribRevert {
    pub entity_id: String,
    pub entity_kind: String,
    pub attribs: Vec<String>,
}

/// One merged patch per `(entity, kind)` pair in a batch.
///
/// `own_attrib` is the entity's full updated ownership list — existing
/// owned names plus names newly owned by this patch, minus names being
/// reverted. It is only populated when the patch touches attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingOperation {
    pub entity_id: String,
    pub entity_type: EntityKind,
    /// Plain field values; later edits to the same field overwrite.
    pub fields: BTreeMap<String, Value>,
    /// Attribute values, merged key-wise. `Value::Null` means "revert
    /// to inherited" downstream.
    pub attrib: BTreeMap<String, Value>,
    pub own_attrib: Vec<String>,
}

impl PendingOperation {
    pub(crate) fn new(entity_id: &str, entity_type: EntityKind) -> Self {
        Self {
            entity_id: entity_id.to_string(),
            entity_type,
            fields: BTreeMap::new(),
            attrib: BTreeMap::new(),
            own_attrib: Vec::new(),
        }
    }
}

/// Everything one batch call produces: the operations to persist and
/// the descendants whose inherited values those operations touch.
/// Emitting both is the caller's job.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchOutcome {
    pub operations: Vec<PendingOperation>,
    pub inherited_dependents: Vec<InheritedDependent>,
}

impl BatchOutcome {
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty() && self.inherited_dependents.is_empty()
    }

    /// Concise one-line form for logging.
    pub fn summary(&self) -> String {
        let fields: usize = self.operations.iter().map(|op| op.fields.len()).sum();
        let attribs: usize = self.operations.iter().map(|op| op.attrib.len()).sum();
        format!(
            "{} ops ({} fields, {} attribs), {} inherited dependents",
            self.operations.len(),
            fields,
            attribs,
            self.inherited_dependents.len()
        )
    }
}
