//! WASM bridge for the form builder: exposes the designer engine to JavaScript.
//!
//! Compiled via `wasm-pack build --target web`. The host owns the DOM, pointer
//! capture, and drag overlays; it forwards gestures, clicks, and keys here and
//! re-renders from the JSON / HTML this bridge returns whenever `revision()`
//! changes.

use fb_core::config::DesignerConfig;
use fb_core::drag::{DragSource, DropTarget, Half};
use fb_core::error::FormError;
use fb_core::export;
use fb_core::id::{FieldId, FieldKind};
use fb_core::model::{CellKind, FieldValue};
use fb_editor::{CommitOutcome, Designer, DragEvent, Panel, ShortcutAction};
use fb_render::hit::{ColumnLayout, FieldRegion, hit_test, layout_column};
use kurbo::{Point, Rect};
use std::collections::HashMap;
use wasm_bindgen::prelude::*;

/// The main WASM-facing form designer.
///
/// Holds the designer context plus the canvas geometry needed to turn
/// pointer positions into drop targets.
#[wasm_bindgen]
pub struct FormCanvas {
    designer: Designer,
    layout: ColumnLayout,
    width: f64,
    height: f64,
    /// Measured field heights reported by the host.
    heights: HashMap<FieldId, f64>,
}

/// Fatal errors surface as thrown JS `Error`s.
fn fatal(err: FormError) -> JsValue {
    js_sys::Error::new(&err.to_string()).into()
}

fn parse_half(half: &str) -> Option<Half> {
    match half {
        "top" => Some(Half::Top),
        "bottom" => Some(Half::Bottom),
        _ => None,
    }
}

fn parse_cell(cell: &str) -> Option<CellKind> {
    match cell {
        "text" => Some(CellKind::Text),
        "dropdown" => Some(CellKind::Dropdown),
        _ => None,
    }
}

fn action_to_name(action: ShortcutAction) -> &'static str {
    match action {
        ShortcutAction::DeleteSelected => "deleteSelected",
        ShortcutAction::Dismiss => "dismiss",
        ShortcutAction::CommitProperties => "commitProperties",
        ShortcutAction::TogglePreview => "togglePreview",
    }
}

#[wasm_bindgen]
impl FormCanvas {
    /// Create a designer for a canvas of the given dimensions.
    #[wasm_bindgen(constructor)]
    pub fn new(width: f64, height: f64) -> Self {
        // Set up panic hook for better error messages in console
        console_error_panic_hook_setup();

        Self {
            designer: Designer::new(DesignerConfig::default()),
            layout: ColumnLayout::default(),
            width,
            height,
            heights: HashMap::new(),
        }
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        log::debug!("canvas resized to {width}x{height}");
        self.width = width;
        self.height = height;
    }

    /// Incremented after every change; re-render when it moves.
    pub fn revision(&self) -> f64 {
        self.designer.revision() as f64
    }

    // ─── Load / export ───────────────────────────────────────────────────

    /// Replace the form with an exported `[{id, type, attributes}]` array.
    pub fn load_json(&mut self, json: &str) -> Result<(), JsValue> {
        let records = export::from_json(json).map_err(fatal)?;
        self.designer.load(records).map_err(fatal)?;
        self.heights.clear();
        Ok(())
    }

    pub fn export_json(&self) -> Result<String, JsValue> {
        self.designer.to_json().map_err(fatal)
    }

    // ─── Palette and layout ──────────────────────────────────────────────

    /// Palette buttons as `[{kind, label, icon}]`.
    pub fn palette_json(&self) -> String {
        let entries: Vec<serde_json::Value> = self
            .designer
            .palette()
            .into_iter()
            .map(|e| serde_json::json!({ "kind": e.kind, "label": e.label, "icon": e.icon }))
            .collect();
        serde_json::to_string(&entries).unwrap_or_else(|_| "[]".to_string())
    }

    /// Field ids in form order.
    pub fn field_ids(&self) -> js_sys::Array {
        self.designer
            .fields()
            .iter()
            .map(|f| JsValue::from_str(f.id().as_str()))
            .collect()
    }

    /// Report a field's rendered height so hit regions match the DOM.
    pub fn set_field_height(&mut self, id: &str, height: f64) {
        self.heights.insert(FieldId::intern(id), height);
    }

    /// Drop target under `(x, y)` as JSON, or `null`.
    pub fn target_json(&self, x: f64, y: f64) -> String {
        serde_json::to_string(&self.target_at(x, y)).unwrap_or_else(|_| "null".to_string())
    }

    // ─── Drag gestures ───────────────────────────────────────────────────

    pub fn drag_start_palette(&mut self, kind: &str) -> bool {
        self.designer.begin_drag(DragSource::Palette {
            kind: FieldKind::intern(kind),
        })
    }

    pub fn drag_start_field(&mut self, id: &str) -> bool {
        self.designer.begin_drag(DragSource::Canvas {
            id: FieldId::intern(id),
        })
    }

    /// Pointer moved during a drag. Returns `true` if the highlight changed.
    pub fn drag_move(&mut self, x: f64, y: f64) -> bool {
        let target = self.target_at(x, y);
        self.designer.drag_over(target)
    }

    /// Pointer released. Returns the outcome as JSON.
    pub fn drag_end(&mut self, x: f64, y: f64) -> Result<String, JsValue> {
        let target = self.target_at(x, y);
        let outcome = self.designer.end_drag(target).map_err(fatal)?;
        Ok(serde_json::to_string(&outcome).unwrap_or_else(|_| "null".to_string()))
    }

    pub fn drag_cancel(&mut self) -> bool {
        self.designer.cancel_drag()
    }

    /// Feed a drag event whose target the host already resolved,
    /// e.g. `{"event":"end","target":{"target":"emptyArea"}}`.
    pub fn handle_drag_event(&mut self, json: &str) -> Result<String, JsValue> {
        let event: DragEvent = serde_json::from_str(json).map_err(|e| JsValue::from_str(&e.to_string()))?;
        let outcome = self.designer.handle_drag(event).map_err(fatal)?;
        Ok(serde_json::to_string(&outcome).unwrap_or_else(|_| "null".to_string()))
    }

    /// Whether the given half of a field is the highlighted drop target.
    /// An empty `id` asks about the append area.
    pub fn is_highlighted(&self, id: &str, half: &str) -> bool {
        let target = if id.is_empty() {
            DropTarget::EmptyArea
        } else {
            match parse_half(half) {
                Some(half) => DropTarget::FieldHalf {
                    id: FieldId::intern(id),
                    half,
                },
                None => return false,
            }
        };
        self.designer.is_highlighted(target)
    }

    // ─── Selection ───────────────────────────────────────────────────────

    pub fn select(&mut self, id: &str) -> bool {
        self.designer.select(FieldId::intern(id))
    }

    /// Canvas background clicked.
    pub fn clear_selection(&mut self) -> bool {
        self.designer.clear_selection()
    }

    pub fn remove(&mut self, id: &str) -> bool {
        let id = FieldId::intern(id);
        let removed = self.designer.delete(id);
        if removed {
            self.heights.remove(&id);
        }
        removed
    }

    pub fn selected_id(&self) -> Option<String> {
        self.designer.selected().map(|id| id.as_str().to_string())
    }

    /// `"palette"` or `"properties"`.
    pub fn panel(&self) -> String {
        match self.designer.panel() {
            Panel::Palette => "palette".to_string(),
            Panel::Properties(_) => "properties".to_string(),
        }
    }

    // ─── Properties scratch buffer ───────────────────────────────────────

    pub fn set_property_text(&mut self, key: &str, value: &str) -> bool {
        self.with_scratch(|s| s.set(key, value))
    }

    pub fn set_property_flag(&mut self, key: &str, value: bool) -> bool {
        self.with_scratch(|s| s.set(key, value))
    }

    /// `NaN` (an emptied number input) clears the attribute.
    pub fn set_property_number(&mut self, key: &str, value: f64) -> bool {
        let value = (!value.is_nan()).then(|| value.trunc() as i64);
        self.with_scratch(|s| s.set_int(key, value))
    }

    pub fn add_option(&mut self, key: &str) -> bool {
        self.with_scratch(|s| {
            s.add_option(key);
        })
    }

    pub fn remove_item(&mut self, key: &str, index: usize) -> bool {
        self.designer
            .scratch_mut()
            .is_some_and(|s| s.remove_item(key, index))
    }

    pub fn rename_item(&mut self, key: &str, index: usize, text: &str) -> bool {
        self.designer
            .scratch_mut()
            .is_some_and(|s| s.rename_item(key, index, text))
    }

    /// Replace a list attribute from comma-separated text.
    pub fn set_list_text(&mut self, key: &str, text: &str) -> bool {
        self.with_scratch(|s| s.set_list_from_text(key, text))
    }

    pub fn add_column(&mut self) -> bool {
        self.with_scratch(|s| {
            s.add_column();
        })
    }

    pub fn remove_column(&mut self, index: usize) -> bool {
        self.designer
            .scratch_mut()
            .is_some_and(|s| s.remove_column(index))
    }

    pub fn rename_column(&mut self, index: usize, name: &str) -> bool {
        self.designer
            .scratch_mut()
            .is_some_and(|s| s.rename_column(index, name))
    }

    /// `cell` is `"text"` or `"dropdown"`.
    pub fn set_column_cell(&mut self, index: usize, cell: &str) -> bool {
        let Some(cell) = parse_cell(cell) else {
            return false;
        };
        self.designer
            .scratch_mut()
            .is_some_and(|s| s.set_column_cell(index, cell))
    }

    pub fn add_column_option(&mut self, index: usize) -> bool {
        self.designer
            .scratch_mut()
            .is_some_and(|s| s.add_column_option(index))
    }

    pub fn set_column_options(&mut self, index: usize, text: &str) -> bool {
        self.designer
            .scratch_mut()
            .is_some_and(|s| s.set_column_options_from_text(index, text))
    }

    /// Commit the scratch buffer. Returns
    /// `{"committed":bool,"errors":[{"attribute","message"}]}`.
    pub fn commit_properties(&mut self) -> Result<String, JsValue> {
        let outcome = self.designer.commit_properties().map_err(fatal)?;
        let json = match outcome {
            CommitOutcome::Committed(_) => serde_json::json!({ "committed": true, "errors": [] }),
            CommitOutcome::Rejected(diags) => {
                let errors: Vec<serde_json::Value> = diags
                    .iter()
                    .map(|d| serde_json::json!({ "attribute": d.attribute, "message": d.message }))
                    .collect();
                serde_json::json!({ "committed": false, "errors": errors })
            }
            CommitOutcome::Idle => serde_json::json!({ "committed": false, "errors": [] }),
        };
        Ok(json.to_string())
    }

    pub fn cancel_properties(&mut self) -> bool {
        self.designer.cancel_properties()
    }

    /// Properties form widget tree as JSON, or `null` when nothing is selected.
    pub fn properties_json(&self) -> Result<String, JsValue> {
        let tree = self.designer.render_properties().map_err(fatal)?;
        Ok(serde_json::to_string(&tree).unwrap_or_else(|_| "null".to_string()))
    }

    // ─── Mode and preview ────────────────────────────────────────────────

    /// Returns the new mode name.
    pub fn toggle_mode(&mut self) -> String {
        self.designer.toggle_mode().as_str().to_string()
    }

    pub fn mode(&self) -> String {
        self.designer.mode().as_str().to_string()
    }

    /// Preview value callback. `value_json` is a string, a grid
    /// (`[["a","b"],…]`), or `null`.
    pub fn submit_value(&mut self, id: &str, value_json: &str) -> Result<bool, JsValue> {
        let value: FieldValue =
            serde_json::from_str(value_json).map_err(|e| JsValue::from_str(&e.to_string()))?;
        self.designer
            .submit_value(FieldId::intern(id), value)
            .map_err(fatal)
    }

    pub fn submit_form(&mut self) -> Result<bool, JsValue> {
        self.designer.submit_form().map_err(fatal)
    }

    /// Collected preview answers as `{id: value}`.
    pub fn answers_json(&self) -> String {
        let answers: serde_json::Map<String, serde_json::Value> = self
            .designer
            .preview()
            .values(self.designer.fields())
            .into_iter()
            .map(|(id, value)| {
                let value = serde_json::to_value(value).unwrap_or(serde_json::Value::Null);
                (id.as_str().to_string(), value)
            })
            .collect();
        serde_json::Value::Object(answers).to_string()
    }

    // ─── Rendering ───────────────────────────────────────────────────────

    /// Canvas widget trees for the current mode.
    pub fn render_json(&self) -> Result<String, JsValue> {
        let widgets = self.designer.render().map_err(fatal)?;
        Ok(serde_json::to_string(&widgets).unwrap_or_else(|_| "[]".to_string()))
    }

    pub fn render_html(&self) -> Result<String, JsValue> {
        self.designer.render_html().map_err(fatal)
    }

    // ─── Keyboard ────────────────────────────────────────────────────────

    /// Handle a keyboard event. Returns `{"changed":bool,"action":name}`.
    pub fn handle_key(&mut self, key: &str, ctrl: bool, shift: bool, alt: bool, meta: bool) -> Result<String, JsValue> {
        let action = self
            .designer
            .handle_key(key, ctrl, shift, alt, meta)
            .map_err(fatal)?;
        Ok(match action {
            Some(a) => format!(r#"{{"changed":true,"action":"{}"}}"#, action_to_name(a)),
            None => r#"{"changed":false,"action":"none"}"#.to_string(),
        })
    }
}

impl FormCanvas {
    fn canvas(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }

    fn regions(&self) -> Vec<FieldRegion> {
        let fields = self
            .designer
            .fields()
            .iter()
            .map(|f| (f.id(), self.heights.get(&f.id()).copied()));
        layout_column(fields, self.canvas(), &self.layout)
    }

    fn target_at(&self, x: f64, y: f64) -> Option<DropTarget> {
        hit_test(&self.regions(), self.canvas(), Point::new(x, y))
    }

    fn with_scratch(&mut self, edit: impl FnOnce(&mut fb_editor::ScratchBuffer)) -> bool {
        match self.designer.scratch_mut() {
            Some(scratch) => {
                edit(scratch);
                true
            }
            None => false,
        }
    }
}

fn console_error_panic_hook_setup() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static SET_HOOK: Once = Once::new();
        SET_HOOK.call_once(|| {
            std::panic::set_hook(Box::new(|info| {
                let msg = format!("form builder WASM panic: {info}");
                web_sys::console::error_1(&msg.into());
            }));
        });
    }
}
