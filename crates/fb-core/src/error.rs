use crate::id::{FieldId, FieldKind};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("field not found: {0}")]
    NotFound(FieldId),

    #[error("duplicate field id: {0}")]
    DuplicateId(FieldId),

    /// A drop target referenced a field that is no longer in the collection.
    #[error("stale drop target: {0}")]
    StaleTarget(FieldId),

    /// No registry entry for this type tag. Indicates a programming defect,
    /// never reachable through normal interaction.
    #[error("unregistered field type: {0}")]
    UnknownFieldType(FieldKind),

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl FormError {
    /// Whether this error must halt the interaction loop instead of being
    /// absorbed and surfaced as UI state.
    pub fn is_fatal(&self) -> bool {
        matches!(self, FormError::UnknownFieldType(_))
    }
}
