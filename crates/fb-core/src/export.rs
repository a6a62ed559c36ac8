//! Read-only export of a form as `{id, type, attributes}` records.
//!
//! JSON for the host / backend, MessagePack for compact snapshots.

use crate::collection::FieldCollection;
use crate::error::FormError;
use crate::id::{FieldId, FieldKind};
use crate::model::{Attributes, FieldInstance};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldRecord {
    pub id: FieldId,
    #[serde(rename = "type")]
    pub kind: FieldKind,
    pub attributes: Attributes,
}

impl From<&FieldInstance> for FieldRecord {
    fn from(field: &FieldInstance) -> Self {
        Self {
            id: field.id(),
            kind: field.kind(),
            attributes: field.attributes().clone(),
        }
    }
}

/// The ordered sequence as plain records.
pub fn export_records(collection: &FieldCollection) -> Vec<FieldRecord> {
    collection.export()
}

pub fn to_json(collection: &FieldCollection) -> Result<String, FormError> {
    serde_json::to_string(&collection.export()).map_err(|e| FormError::Serialization(e.to_string()))
}

pub fn from_json(json: &str) -> Result<Vec<FieldRecord>, FormError> {
    serde_json::from_str(json).map_err(|e| FormError::Serialization(e.to_string()))
}

pub fn to_msgpack(collection: &FieldCollection) -> Result<Vec<u8>, FormError> {
    rmp_serde::to_vec_named(&collection.export()).map_err(|e| FormError::Serialization(e.to_string()))
}

pub fn from_msgpack(bytes: &[u8]) -> Result<Vec<FieldRecord>, FormError> {
    rmp_serde::from_slice(bytes).map_err(|e| FormError::Serialization(e.to_string()))
}
