//! Drag-gesture events delivered by the host's drag backend.
//!
//! The backend owns pointer capture, activation thresholds, and overlays; by
//! the time an event reaches the engine it already carries abstract source
//! and target descriptors.

use fb_core::drag::{DragSource, DropTarget};
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum DragEvent {
    /// Gesture began on a palette button or a placed field.
    Start { source: DragSource },

    /// Pointer moved; `target` is `None` when nothing droppable is under it.
    Move { target: Option<DropTarget> },

    /// Pointer released over `target`.
    End { target: Option<DropTarget> },

    /// Gesture aborted (Escape, pointer lost).
    Cancel,
}

impl DragEvent {
    /// Whether this event ends the gesture.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::End { .. } | Self::Cancel)
    }

    /// The target carried by move/end events.
    pub fn target(&self) -> Option<DropTarget> {
        match self {
            Self::Move { target } | Self::End { target } => *target,
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fb_core::id::FieldId;

    #[test]
    fn reads_host_json() {
        let ev: DragEvent = serde_json::from_str(
            r#"{"event":"end","target":{"target":"fieldHalf","id":"in_a","half":"top"}}"#,
        )
        .unwrap();
        assert_eq!(
            ev,
            DragEvent::End {
                target: Some(DropTarget::top(FieldId::intern("in_a")))
            }
        );
        assert!(ev.is_terminal());
    }

    #[test]
    fn move_without_target() {
        let ev: DragEvent = serde_json::from_str(r#"{"event":"move","target":null}"#).unwrap();
        assert_eq!(ev.target(), None);
        assert!(!ev.is_terminal());
    }
}
