//! Drag-session lifecycle.
//!
//! Created on gesture start, retargeted on move, consumed once on end,
//! discarded on cancel. Only the target changes mid-gesture; the collection
//! is never touched here.

use fb_core::drag::{DragSource, DropTarget};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ActiveDrag {
    source: DragSource,
    target: Option<DropTarget>,
}

#[derive(Debug, Default)]
pub struct DragSession {
    active: Option<ActiveDrag>,
}

impl DragSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin a gesture. A session left open by a lost gesture is discarded.
    pub fn start(&mut self, source: DragSource) {
        if let Some(stale) = self.active.take() {
            log::debug!("discarding unfinished drag of {:?}", stale.source);
        }
        self.active = Some(ActiveDrag {
            source,
            target: None,
        });
    }

    /// Update the hovered target. Returns whether it changed; always `false`
    /// while idle.
    pub fn hover(&mut self, target: Option<DropTarget>) -> bool {
        let Some(active) = self.active.as_mut() else {
            return false;
        };
        if active.target == target {
            return false;
        }
        log::trace!("drag target {:?} -> {:?}", active.target, target);
        active.target = target;
        true
    }

    /// End the gesture over `target`, consuming the session.
    /// Returns `None` if no gesture was in progress.
    pub fn finish(&mut self, target: Option<DropTarget>) -> Option<(DragSource, Option<DropTarget>)> {
        self.active.take().map(|active| (active.source, target))
    }

    /// Discard the session. Returns whether one was open.
    pub fn cancel(&mut self) -> bool {
        self.active.take().is_some()
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn source(&self) -> Option<DragSource> {
        self.active.map(|a| a.source)
    }

    pub fn target(&self) -> Option<DropTarget> {
        self.active.and_then(|a| a.target)
    }

    /// Whether `region` is the currently highlighted drop target.
    pub fn is_highlighted(&self, region: DropTarget) -> bool {
        self.target() == Some(region)
    }
}
