//! Drag-session descriptors shared by hit testing and drop resolution.
//!
//! A gesture has one `DragSource` for its whole life and a `DropTarget` that
//! changes as the pointer moves. Both are plain sums so every combination can
//! be matched exhaustively.

use crate::id::{FieldId, FieldKind};
use serde::{Deserialize, Serialize};

/// What is being dragged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "camelCase")]
pub enum DragSource {
    /// A palette button: the field does not exist yet.
    Palette { kind: FieldKind },
    /// An already-placed field.
    Canvas { id: FieldId },
}

/// Upper or lower half of a field's hit region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Half {
    Top,
    Bottom,
}

/// Where the dragged item would land.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "target", rename_all = "camelCase")]
pub enum DropTarget {
    /// Empty canvas, or the area below the last field.
    EmptyArea,
    FieldHalf { id: FieldId, half: Half },
}

impl DropTarget {
    pub fn top(id: FieldId) -> Self {
        DropTarget::FieldHalf { id, half: Half::Top }
    }

    pub fn bottom(id: FieldId) -> Self {
        DropTarget::FieldHalf {
            id,
            half: Half::Bottom,
        }
    }

    /// The field this target points at, if any.
    pub fn field(&self) -> Option<FieldId> {
        match self {
            DropTarget::FieldHalf { id, .. } => Some(*id),
            DropTarget::EmptyArea => None,
        }
    }
}
