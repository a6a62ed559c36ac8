//! The designer context.
//!
//! One `Designer` owns everything a mounted form builder needs: the field
//! registry, the ordered collection and its selection, the drag session, the
//! properties editor, the mode, and the preview answers. Every mutation
//! funnels through here, so the collection has a single writer.
//!
//! User-triggered failures (`NotFound`, `StaleTarget`, `DuplicateId`) are
//! logged and reported as outcomes. Only `UnknownFieldType` is returned as an
//! error; it means a field type was never registered and callers should
//! treat it as fatal.

use crate::drop::{DropAction, apply_drop, resolve_drop};
use crate::input::DragEvent;
use crate::mode::Mode;
use crate::preview::PreviewForm;
use crate::properties::{CommitOutcome, PropertiesEditor, ScratchBuffer};
use crate::session::DragSession;
use crate::shortcuts::{ShortcutAction, ShortcutMap};
use fb_core::collection::FieldCollection;
use fb_core::config::DesignerConfig;
use fb_core::drag::{DragSource, DropTarget};
use fb_core::error::FormError;
use fb_core::export::{self, FieldRecord};
use fb_core::id::FieldId;
use fb_core::model::FieldValue;
use fb_core::registry::{FieldRegistry, PaletteEntry};
use fb_core::widget::{RenderContext, Widget};
use serde::Serialize;

/// What a finished gesture did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum DropOutcome {
    Inserted { id: FieldId, index: usize },
    Moved { id: FieldId, index: usize },
    /// Nothing to do (no target, dropped on itself, already in place).
    Unchanged,
    /// The target vanished mid-gesture; the session was discarded.
    Discarded,
}

/// Which sidebar panel is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    Palette,
    Properties(FieldId),
}

/// Absorb user-triggered errors, pass fatal ones through.
fn absorb<T>(result: Result<T, FormError>, context: &str) -> Result<Option<T>, FormError> {
    match result {
        Ok(v) => Ok(Some(v)),
        Err(e) if e.is_fatal() => Err(e),
        Err(e) => {
            log::warn!("{context}: {e}");
            Ok(None)
        }
    }
}

pub struct Designer {
    registry: FieldRegistry,
    config: DesignerConfig,
    fields: FieldCollection,
    drag: DragSession,
    properties: PropertiesEditor,
    preview: PreviewForm,
    mode: Mode,
    revision: u64,
}

impl Default for Designer {
    fn default() -> Self {
        Self::new(DesignerConfig::default())
    }
}

impl Designer {
    /// Designer with the built-in field types.
    pub fn new(config: DesignerConfig) -> Self {
        Self::with_registry(FieldRegistry::with_builtins(), config)
    }

    pub fn with_registry(registry: FieldRegistry, config: DesignerConfig) -> Self {
        Self {
            registry,
            config,
            fields: FieldCollection::new(),
            drag: DragSession::new(),
            properties: PropertiesEditor::new(),
            preview: PreviewForm::new(),
            mode: Mode::Designer,
            revision: 0,
        }
    }

    /// Replace the form with previously exported records.
    ///
    /// # Errors
    /// `UnknownFieldType` or `DuplicateId`; the current form is kept.
    pub fn load(&mut self, records: Vec<FieldRecord>) -> Result<(), FormError> {
        let fields = FieldCollection::from_records(records, &self.registry)?;
        log::info!("loaded form with {} field(s)", fields.len());
        self.fields = fields;
        self.drag.cancel();
        self.properties.cancel();
        self.preview.reset();
        self.bump();
        Ok(())
    }

    // ─── Reads ───────────────────────────────────────────────────────────

    pub fn fields(&self) -> &FieldCollection {
        &self.fields
    }

    pub fn registry(&self) -> &FieldRegistry {
        &self.registry
    }

    pub fn config(&self) -> &DesignerConfig {
        &self.config
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Bumped on every applied mutation.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn selected(&self) -> Option<FieldId> {
        self.fields.selected()
    }

    pub fn drag(&self) -> &DragSession {
        &self.drag
    }

    pub fn properties(&self) -> &PropertiesEditor {
        &self.properties
    }

    pub fn preview(&self) -> &PreviewForm {
        &self.preview
    }

    /// Selecting a field swaps the palette for its properties.
    pub fn panel(&self) -> Panel {
        match self.fields.selected() {
            Some(id) => Panel::Properties(id),
            None => Panel::Palette,
        }
    }

    pub fn palette(&self) -> Vec<PaletteEntry> {
        self.registry.palette()
    }

    fn bump(&mut self) {
        self.revision += 1;
    }

    // ─── Drag gestures ───────────────────────────────────────────────────

    /// Start a gesture. Ignored in preview mode.
    pub fn begin_drag(&mut self, source: DragSource) -> bool {
        if self.mode != Mode::Designer {
            log::debug!("drag ignored in {} mode", self.mode.as_str());
            return false;
        }
        self.drag.start(source);
        true
    }

    /// Retarget the open gesture. Never mutates the collection.
    pub fn drag_over(&mut self, target: Option<DropTarget>) -> bool {
        self.drag.hover(target)
    }

    /// Whether `region` should render as the highlighted drop target.
    pub fn is_highlighted(&self, region: DropTarget) -> bool {
        self.drag.is_highlighted(region)
    }

    /// Finish the gesture over `target`: resolve, then apply at most one mutation.
    pub fn end_drag(&mut self, target: Option<DropTarget>) -> Result<DropOutcome, FormError> {
        let Some((source, target)) = self.drag.finish(target) else {
            return Ok(DropOutcome::Unchanged);
        };

        let Some(action) = absorb(resolve_drop(source, target, &self.fields), "drop discarded")? else {
            return Ok(DropOutcome::Discarded);
        };

        let outcome = match action {
            DropAction::Noop => return Ok(DropOutcome::Unchanged),
            DropAction::Insert { index, .. } => {
                let applied = apply_drop(action, &mut self.fields, &self.registry, &self.config.id_prefix);
                match absorb(applied, "insert failed")?.flatten() {
                    Some(id) => DropOutcome::Inserted {
                        id,
                        index: self.fields.position(id).unwrap_or(index),
                    },
                    None => return Ok(DropOutcome::Discarded),
                }
            }
            DropAction::Move { id, index } => {
                let applied = apply_drop(action, &mut self.fields, &self.registry, &self.config.id_prefix);
                match absorb(applied, "move failed")? {
                    Some(_) => DropOutcome::Moved { id, index },
                    None => return Ok(DropOutcome::Discarded),
                }
            }
        };
        self.bump();
        Ok(outcome)
    }

    /// Discard the open gesture. No effect on the collection.
    pub fn cancel_drag(&mut self) -> bool {
        self.drag.cancel()
    }

    /// Feed one backend event. Returns the outcome of terminal events.
    pub fn handle_drag(&mut self, event: DragEvent) -> Result<Option<DropOutcome>, FormError> {
        if event.is_terminal() && !self.drag.is_active() {
            log::debug!("{event:?} without a gesture in flight");
            return Ok(None);
        }
        match event {
            DragEvent::Start { source } => {
                self.begin_drag(source);
                Ok(None)
            }
            DragEvent::Move { .. } => {
                self.drag_over(event.target());
                Ok(None)
            }
            DragEvent::End { .. } => self.end_drag(event.target()).map(Some),
            DragEvent::Cancel => {
                self.cancel_drag();
                Ok(Some(DropOutcome::Unchanged))
            }
        }
    }

    // ─── Selection and deletion ──────────────────────────────────────────

    /// Select a field and open its properties. Re-selecting the field being
    /// edited keeps the scratch buffer.
    pub fn select(&mut self, id: FieldId) -> bool {
        if let Err(e) = self.fields.select(Some(id)) {
            log::warn!("select: {e}");
            return false;
        }
        if self.properties.editing() != Some(id)
            && let Some(field) = self.fields.get(id)
        {
            self.properties.open(field);
        }
        log::debug!("select {id}");
        self.bump();
        true
    }

    /// Canvas background activated: drop the selection and any open edit.
    pub fn clear_selection(&mut self) -> bool {
        let had_selection = self.fields.selected().is_some();
        self.properties.cancel();
        // Clearing never fails.
        let _ = self.fields.select(None);
        if had_selection {
            self.bump();
        }
        had_selection
    }

    pub fn delete(&mut self, id: FieldId) -> bool {
        if let Err(e) = self.fields.remove(id) {
            log::warn!("delete: {e}");
            return false;
        }
        if self.properties.editing() == Some(id) {
            self.properties.cancel();
        }
        self.preview.prune(&self.fields);
        self.bump();
        true
    }

    pub fn delete_selected(&mut self) -> bool {
        match self.fields.selected() {
            Some(id) => self.delete(id),
            None => false,
        }
    }

    // ─── Properties ──────────────────────────────────────────────────────

    /// Scratch buffer of the open properties edit.
    pub fn scratch_mut(&mut self) -> Option<&mut ScratchBuffer> {
        self.properties.scratch_mut()
    }

    /// Commit the scratch buffer. The field stays selected, so a fresh edit
    /// session reopens on its committed attributes.
    pub fn commit_properties(&mut self) -> Result<CommitOutcome, FormError> {
        let result = self
            .properties
            .commit(&mut self.fields, &self.registry, &self.config.limits);
        let Some(outcome) = absorb(result, "commit")? else {
            return Ok(CommitOutcome::Idle);
        };
        if let CommitOutcome::Committed(id) = outcome {
            self.bump();
            if self.fields.selected() == Some(id)
                && let Some(field) = self.fields.get(id)
            {
                self.properties.open(field);
            }
        }
        Ok(outcome)
    }

    pub fn cancel_properties(&mut self) -> bool {
        let was_open = self.properties.cancel();
        // Reopen clean so the panel shows the live attributes again.
        if let Some(field) = self.fields.selected_field() {
            self.properties.open(field);
        }
        was_open
    }

    pub fn render_properties(&self) -> Result<Option<Widget>, FormError> {
        self.properties.render(&self.registry)
    }

    // ─── Mode and preview ────────────────────────────────────────────────

    /// Switch designer ↔ preview. Entering preview starts a blank form.
    pub fn toggle_mode(&mut self) -> Mode {
        self.drag.cancel();
        self.mode = self.mode.toggled();
        if self.mode == Mode::Preview {
            self.preview.reset();
        }
        log::info!("mode: {}", self.mode.as_str());
        self.bump();
        self.mode
    }

    /// Preview value callback `(fieldId, value)`.
    pub fn submit_value(&mut self, id: FieldId, value: FieldValue) -> Result<bool, FormError> {
        let result = self.preview.submit(&self.fields, &self.registry, id, value);
        let valid = absorb(result, "submit")?.unwrap_or(false);
        self.bump();
        Ok(valid)
    }

    /// Preview form submit. Returns whether every field is valid.
    pub fn submit_form(&mut self) -> Result<bool, FormError> {
        let valid = self.preview.validate_all(&self.fields, &self.registry)?;
        self.bump();
        Ok(valid)
    }

    /// Canvas widgets for the current mode, in form order.
    pub fn render(&self) -> Result<Vec<Widget>, FormError> {
        self.render_in(self.mode.render_context())
    }

    /// Widgets for one render context. `Properties` yields the open
    /// properties form, or nothing when no field is being edited.
    pub fn render_in(&self, context: RenderContext) -> Result<Vec<Widget>, FormError> {
        match context {
            RenderContext::Designer => self
                .fields
                .iter()
                .map(|field| Ok(self.registry.lookup(field.kind())?.render_designer(field)))
                .collect(),
            RenderContext::Preview => self.preview.render(&self.fields, &self.registry),
            RenderContext::Properties => Ok(self.render_properties()?.into_iter().collect()),
        }
    }

    /// `render()` as an HTML fragment.
    pub fn render_html(&self) -> Result<String, FormError> {
        Ok(fb_render::render_html(&self.render()?))
    }

    // ─── Export ──────────────────────────────────────────────────────────

    pub fn export(&self) -> Vec<FieldRecord> {
        export::export_records(&self.fields)
    }

    pub fn to_json(&self) -> Result<String, FormError> {
        export::to_json(&self.fields)
    }

    // ─── Keyboard ────────────────────────────────────────────────────────

    /// Resolve and run a shortcut. Returns the action taken, if any.
    pub fn handle_key(
        &mut self,
        key: &str,
        ctrl: bool,
        shift: bool,
        alt: bool,
        meta: bool,
    ) -> Result<Option<ShortcutAction>, FormError> {
        let Some(action) = ShortcutMap::resolve(key, ctrl, shift, alt, meta) else {
            return Ok(None);
        };
        match action {
            ShortcutAction::DeleteSelected => {
                if self.mode != Mode::Designer || !self.delete_selected() {
                    return Ok(None);
                }
            }
            ShortcutAction::Dismiss => {
                if !self.cancel_drag() && !self.clear_selection() {
                    return Ok(None);
                }
            }
            ShortcutAction::CommitProperties => {
                if self.commit_properties()? == CommitOutcome::Idle {
                    return Ok(None);
                }
            }
            ShortcutAction::TogglePreview => {
                self.toggle_mode();
            }
        }
        Ok(Some(action))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fb_core::fields::{DROPDOWN, TEXT};
    use fb_core::id::FieldKind;
    use fb_core::model::attr;
    use pretty_assertions::assert_eq;

    fn palette(kind: &str) -> DragSource {
        DragSource::Palette {
            kind: FieldKind::intern(kind),
        }
    }

    fn drop_new(d: &mut Designer, kind: &str, target: DropTarget) -> FieldId {
        d.begin_drag(palette(kind));
        match d.end_drag(Some(target)).unwrap() {
            DropOutcome::Inserted { id, .. } => id,
            other => panic!("expected insert, got {other:?}"),
        }
    }

    #[test]
    fn palette_drop_appends_and_bumps_revision() {
        let mut d = Designer::default();
        let rev = d.revision();
        let id = drop_new(&mut d, TEXT, DropTarget::EmptyArea);
        assert_eq!(d.fields().ids(), vec![id]);
        assert!(d.revision() > rev);
        assert!(id.as_str().starts_with("field_"));
    }

    #[test]
    fn drag_move_never_mutates() {
        let mut d = Designer::default();
        let a = drop_new(&mut d, TEXT, DropTarget::EmptyArea);
        let rev = d.revision();
        d.begin_drag(palette(TEXT));
        d.drag_over(Some(DropTarget::top(a)));
        assert!(d.is_highlighted(DropTarget::top(a)));
        d.drag_over(Some(DropTarget::EmptyArea));
        assert_eq!(d.fields().len(), 1);
        assert_eq!(d.revision(), rev);
        assert!(d.cancel_drag());
        assert_eq!(d.fields().len(), 1);
    }

    #[test]
    fn stale_target_is_discarded() {
        let mut d = Designer::default();
        drop_new(&mut d, TEXT, DropTarget::EmptyArea);
        d.begin_drag(palette(TEXT));
        let outcome = d.end_drag(Some(DropTarget::top(FieldId::intern("dz_gone")))).unwrap();
        assert_eq!(outcome, DropOutcome::Discarded);
        assert_eq!(d.fields().len(), 1);
        assert!(!d.drag().is_active());
    }

    #[test]
    fn unknown_palette_kind_is_fatal() {
        let mut d = Designer::default();
        d.begin_drag(palette("dz_signature"));
        let err = d.end_drag(Some(DropTarget::EmptyArea)).unwrap_err();
        assert!(err.is_fatal());
    }

    #[test]
    fn selection_swaps_panels() {
        let mut d = Designer::default();
        let a = drop_new(&mut d, DROPDOWN, DropTarget::EmptyArea);
        assert_eq!(d.panel(), Panel::Palette);
        assert!(d.select(a));
        assert_eq!(d.panel(), Panel::Properties(a));
        assert_eq!(d.properties().editing(), Some(a));
        assert!(d.clear_selection());
        assert_eq!(d.panel(), Panel::Palette);
        assert!(!d.properties().is_open());
    }

    #[test]
    fn commit_keeps_field_selected() {
        let mut d = Designer::default();
        let a = drop_new(&mut d, TEXT, DropTarget::EmptyArea);
        d.select(a);
        d.scratch_mut().unwrap().set(attr::LABEL, "Email");
        assert_eq!(d.commit_properties().unwrap(), CommitOutcome::Committed(a));
        assert_eq!(d.fields().get(a).unwrap().label(), "Email");
        assert_eq!(d.panel(), Panel::Properties(a));
        assert_eq!(d.properties().editing(), Some(a));
    }

    #[test]
    fn deleting_edited_field_closes_properties() {
        let mut d = Designer::default();
        let a = drop_new(&mut d, TEXT, DropTarget::EmptyArea);
        d.select(a);
        assert!(d.delete(a));
        assert!(!d.properties().is_open());
        assert_eq!(d.selected(), None);
        assert!(!d.delete(a));
    }

    #[test]
    fn drag_ignored_in_preview() {
        let mut d = Designer::default();
        assert_eq!(d.toggle_mode(), Mode::Preview);
        assert!(!d.begin_drag(palette(TEXT)));
        assert_eq!(d.end_drag(Some(DropTarget::EmptyArea)).unwrap(), DropOutcome::Unchanged);
        assert!(d.fields().is_empty());
    }

    #[test]
    fn render_follows_mode() {
        let mut d = Designer::default();
        drop_new(&mut d, TEXT, DropTarget::EmptyArea);
        let designer = d.render().unwrap();
        assert!(designer[0].find(&|w| matches!(w, Widget::TextInput { disabled: true, .. })).is_some());
        d.toggle_mode();
        let preview = d.render().unwrap();
        assert!(preview[0].find(&|w| matches!(w, Widget::TextInput { disabled: false, .. })).is_some());
        assert!(d.render_html().unwrap().starts_with("<div class=\"fb-field\""));
    }

    #[test]
    fn escape_cancels_drag_before_deselecting() {
        let mut d = Designer::default();
        let a = drop_new(&mut d, TEXT, DropTarget::EmptyArea);
        d.select(a);
        d.begin_drag(palette(TEXT));
        assert_eq!(
            d.handle_key("Escape", false, false, false, false).unwrap(),
            Some(ShortcutAction::Dismiss)
        );
        assert!(!d.drag().is_active());
        assert_eq!(d.selected(), Some(a));
        d.handle_key("Escape", false, false, false, false).unwrap();
        assert_eq!(d.selected(), None);
        assert_eq!(d.handle_key("Escape", false, false, false, false).unwrap(), None);
    }

    #[test]
    fn delete_key_removes_selected() {
        let mut d = Designer::default();
        let a = drop_new(&mut d, TEXT, DropTarget::EmptyArea);
        d.select(a);
        assert_eq!(
            d.handle_key("Delete", false, false, false, false).unwrap(),
            Some(ShortcutAction::DeleteSelected)
        );
        assert!(d.fields().is_empty());
    }

    #[test]
    fn load_replaces_form() {
        let mut d = Designer::default();
        drop_new(&mut d, TEXT, DropTarget::EmptyArea);
        drop_new(&mut d, DROPDOWN, DropTarget::EmptyArea);
        let records = d.export();

        let mut other = Designer::default();
        other.load(records.clone()).unwrap();
        assert_eq!(other.export(), records);
    }

    #[test]
    fn render_follows_mode_context() {
        let mut d = Designer::default();
        let a = drop_new(&mut d, TEXT, DropTarget::EmptyArea);
        assert_eq!(d.render().unwrap(), d.render_in(RenderContext::Designer).unwrap());
        assert!(d.render_in(RenderContext::Properties).unwrap().is_empty());

        d.select(a);
        assert_eq!(d.render_in(RenderContext::Properties).unwrap().len(), 1);

        d.toggle_mode();
        assert_eq!(d.render().unwrap(), d.render_in(RenderContext::Preview).unwrap());
        assert_ne!(d.render().unwrap(), d.render_in(RenderContext::Designer).unwrap());
    }

    #[test]
    fn stray_terminal_event_reports_nothing() {
        let mut d = Designer::default();
        assert_eq!(d.handle_drag(DragEvent::End { target: Some(DropTarget::EmptyArea) }), Ok(None));
        assert_eq!(d.handle_drag(DragEvent::Cancel), Ok(None));
        assert!(d.fields().is_empty());

        d.handle_drag(DragEvent::Start { source: palette(TEXT) }).unwrap();
        assert!(matches!(
            d.handle_drag(DragEvent::End { target: Some(DropTarget::EmptyArea) }),
            Ok(Some(DropOutcome::Inserted { index: 0, .. }))
        ));
    }

    #[test]
    fn invalid_resubmit_fails_form_submit() {
        let mut d = Designer::default();
        let a = drop_new(&mut d, TEXT, DropTarget::EmptyArea);
        d.select(a);
        d.scratch_mut().unwrap().set(attr::REQUIRED, true);
        d.commit_properties().unwrap();
        d.clear_selection();
        d.toggle_mode();

        assert!(d.submit_value(a, "Ada".into()).unwrap());
        assert!(!d.submit_value(a, "".into()).unwrap());
        assert!(!d.submit_form().unwrap());
        assert_eq!(d.preview().values(d.fields()), Vec::new());
        assert!(!d.render_html().unwrap().contains("value=\"Ada\""));
    }
}
