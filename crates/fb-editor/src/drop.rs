//! Drop resolution: (drag source × drop target × current order) → action.
//!
//! Resolution is pure. `apply_drop` is the only step that touches the
//! collection, and it runs once per gesture, on gesture end.

use fb_core::collection::FieldCollection;
use fb_core::drag::{DragSource, DropTarget, Half};
use fb_core::error::FormError;
use fb_core::id::{FieldId, FieldKind};
use fb_core::registry::FieldRegistry;

/// What a finished gesture does to the collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropAction {
    /// Construct a fresh `kind` instance and insert it at `index`.
    Insert { kind: FieldKind, index: usize },
    /// Reposition an existing field. `index` addresses the sequence with the
    /// field already removed.
    Move { id: FieldId, index: usize },
    Noop,
}

/// Decide what a drop does.
///
/// A moved field always lands on the half it was dropped on: the insertion
/// index is taken before the source is removed and shifted down by one when
/// the source sat above it. In `[A, B, C]`, dropping `A` on `C`'s top half
/// gives `[B, A, C]`, and on its bottom half gives `[B, C, A]`.
///
/// # Errors
/// `StaleTarget` when the target field (or the dragged field) is no longer in
/// the collection. Nothing is mutated either way.
pub fn resolve_drop(
    source: DragSource,
    target: Option<DropTarget>,
    fields: &FieldCollection,
) -> Result<DropAction, FormError> {
    let Some(target) = target else {
        return Ok(DropAction::Noop);
    };

    match (source, target) {
        (DragSource::Palette { kind }, DropTarget::EmptyArea) => Ok(DropAction::Insert {
            kind,
            index: fields.len(),
        }),

        (DragSource::Palette { kind }, DropTarget::FieldHalf { id, half }) => {
            let index = insertion_index(fields, id, half)?;
            Ok(DropAction::Insert { kind, index })
        }

        (DragSource::Canvas { id: source }, DropTarget::FieldHalf { id: over, .. }) if source == over => {
            Ok(DropAction::Noop)
        }

        (DragSource::Canvas { id: source }, DropTarget::FieldHalf { id: over, half }) => {
            // Both positions are taken before the source is removed.
            let insert_at = insertion_index(fields, over, half)?;
            let from = fields.position(source).ok_or(FormError::StaleTarget(source))?;
            let index = if from < insert_at { insert_at - 1 } else { insert_at };
            if index == from {
                Ok(DropAction::Noop)
            } else {
                Ok(DropAction::Move { id: source, index })
            }
        }

        (DragSource::Canvas { .. }, DropTarget::EmptyArea) => Ok(DropAction::Noop),
    }
}

/// `overIndex` for the top half, `overIndex + 1` for the bottom half.
fn insertion_index(fields: &FieldCollection, over: FieldId, half: Half) -> Result<usize, FormError> {
    let over_index = fields.position(over).ok_or(FormError::StaleTarget(over))?;
    Ok(match half {
        Half::Top => over_index,
        Half::Bottom => over_index + 1,
    })
}

/// Apply a resolved action. Returns the id of the inserted or moved field.
///
/// New instances get an id generated from `id_prefix`; moves reuse the
/// existing instance untouched.
pub fn apply_drop(
    action: DropAction,
    fields: &mut FieldCollection,
    registry: &FieldRegistry,
    id_prefix: &str,
) -> Result<Option<FieldId>, FormError> {
    match action {
        DropAction::Insert { kind, index } => {
            let field = registry.construct(kind, FieldId::generate(id_prefix))?;
            let id = field.id();
            fields.add(index, field)?;
            Ok(Some(id))
        }
        DropAction::Move { id, index } => {
            fields.move_to(id, index)?;
            Ok(Some(id))
        }
        DropAction::Noop => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fb_core::fields::{DROPDOWN, TEXT};
    use pretty_assertions::assert_eq;

    fn collection(names: &[&str]) -> FieldCollection {
        let registry = FieldRegistry::with_builtins();
        let mut c = FieldCollection::new();
        for name in names {
            let end = c.len();
            c.add(
                end,
                registry
                    .construct(FieldKind::intern(TEXT), FieldId::intern(name))
                    .unwrap(),
            )
            .unwrap();
        }
        c
    }

    fn palette() -> DragSource {
        DragSource::Palette {
            kind: FieldKind::intern(DROPDOWN),
        }
    }

    fn canvas(name: &str) -> DragSource {
        DragSource::Canvas {
            id: FieldId::intern(name),
        }
    }

    #[test]
    fn palette_onto_empty_area_appends() {
        let c = collection(&["dr_a", "dr_b"]);
        assert_eq!(
            resolve_drop(palette(), Some(DropTarget::EmptyArea), &c),
            Ok(DropAction::Insert {
                kind: FieldKind::intern(DROPDOWN),
                index: 2
            })
        );
    }

    #[test]
    fn palette_onto_halves() {
        let c = collection(&["dr_a", "dr_b", "dr_c"]);
        let b = FieldId::intern("dr_b");
        let top = resolve_drop(palette(), Some(DropTarget::top(b)), &c).unwrap();
        let bottom = resolve_drop(palette(), Some(DropTarget::bottom(b)), &c).unwrap();
        assert!(matches!(top, DropAction::Insert { index: 1, .. }));
        assert!(matches!(bottom, DropAction::Insert { index: 2, .. }));
    }

    #[test]
    fn move_up_keeps_target_index() {
        let c = collection(&["dr_a", "dr_b", "dr_c"]);
        let action = resolve_drop(canvas("dr_c"), Some(DropTarget::bottom(FieldId::intern("dr_a"))), &c);
        assert_eq!(
            action,
            Ok(DropAction::Move {
                id: FieldId::intern("dr_c"),
                index: 1
            })
        );
    }

    #[test]
    fn move_down_accounts_for_removal() {
        let c = collection(&["dr_a", "dr_b", "dr_c"]);
        let action = resolve_drop(canvas("dr_a"), Some(DropTarget::bottom(FieldId::intern("dr_c"))), &c);
        assert_eq!(
            action,
            Ok(DropAction::Move {
                id: FieldId::intern("dr_a"),
                index: 2
            })
        );
    }

    #[test]
    fn move_next_to_current_slot_is_noop() {
        let c = collection(&["dr_a", "dr_b", "dr_c"]);
        // a is already directly above b
        let action = resolve_drop(canvas("dr_a"), Some(DropTarget::top(FieldId::intern("dr_b"))), &c);
        assert_eq!(action, Ok(DropAction::Noop));
    }

    #[test]
    fn drop_on_self_is_noop() {
        let c = collection(&["dr_a", "dr_b"]);
        let a = FieldId::intern("dr_a");
        assert_eq!(resolve_drop(canvas("dr_a"), Some(DropTarget::top(a)), &c), Ok(DropAction::Noop));
        assert_eq!(resolve_drop(canvas("dr_a"), Some(DropTarget::bottom(a)), &c), Ok(DropAction::Noop));
    }

    #[test]
    fn canvas_onto_empty_area_is_noop() {
        let c = collection(&["dr_a", "dr_b"]);
        assert_eq!(resolve_drop(canvas("dr_a"), Some(DropTarget::EmptyArea), &c), Ok(DropAction::Noop));
    }

    #[test]
    fn no_target_is_noop() {
        let c = collection(&["dr_a"]);
        assert_eq!(resolve_drop(palette(), None, &c), Ok(DropAction::Noop));
    }

    #[test]
    fn missing_target_is_stale() {
        let c = collection(&["dr_a"]);
        let ghost = FieldId::intern("dr_ghost");
        assert_eq!(
            resolve_drop(palette(), Some(DropTarget::top(ghost)), &c),
            Err(FormError::StaleTarget(ghost))
        );
        assert_eq!(
            resolve_drop(canvas("dr_a"), Some(DropTarget::bottom(ghost)), &c),
            Err(FormError::StaleTarget(ghost))
        );
    }

    #[test]
    fn missing_source_is_stale() {
        let c = collection(&["dr_a"]);
        assert_eq!(
            resolve_drop(canvas("dr_gone"), Some(DropTarget::top(FieldId::intern("dr_a"))), &c),
            Err(FormError::StaleTarget(FieldId::intern("dr_gone")))
        );
    }

    #[test]
    fn apply_insert_constructs_fresh_instance() {
        let registry = FieldRegistry::with_builtins();
        let mut c = collection(&["dr_a"]);
        let action = DropAction::Insert {
            kind: FieldKind::intern(DROPDOWN),
            index: 0,
        };
        let id = apply_drop(action, &mut c, &registry, "dr_new").unwrap().unwrap();
        assert_eq!(c.position(id), Some(0));
        assert_eq!(c.get(id).unwrap().kind(), FieldKind::intern(DROPDOWN));
    }

    #[test]
    fn apply_unknown_kind_is_fatal() {
        let registry = FieldRegistry::with_builtins();
        let mut c = collection(&[]);
        let action = DropAction::Insert {
            kind: FieldKind::intern("dr_signature"),
            index: 0,
        };
        let err = apply_drop(action, &mut c, &registry, "field").unwrap_err();
        assert!(err.is_fatal());
        assert!(c.is_empty());
    }
}
