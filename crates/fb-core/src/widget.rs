//! Declarative widget tree produced by field-type render capabilities.
//!
//! The engine never builds concrete UI. Each field type describes what it
//! wants shown as a `Widget` tree, and the host's widget layer (the browser,
//! or the HTML emitter in `fb-render`) turns it into real elements.

use crate::id::FieldId;
use crate::model::{ColumnSpec, FieldValue};
use serde::Serialize;

/// Placeholder entry shown first in every select.
pub const SELECT_PLACEHOLDER: &str = "Select an option";

/// Where a field is being rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderContext {
    /// Non-interactive preview inside the designer canvas.
    Designer,
    /// Interactive end-user form.
    Preview,
    /// Properties-editing form for the selected field.
    Properties,
}

/// Per-field state handed to the preview render capability.
#[derive(Debug, Clone, Copy, Default)]
pub struct PreviewState<'a> {
    /// Last value the user entered, if any.
    pub value: Option<&'a FieldValue>,
    /// Whether the last submitted value failed validation.
    pub is_invalid: bool,
}

/// One row of a rendered table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableRow {
    pub label: String,
    pub cells: Vec<Widget>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "widget", rename_all = "camelCase")]
pub enum Widget {
    /// Vertical container; `field` ties the subtree to a field for value submission.
    Stack {
        field: Option<FieldId>,
        children: Vec<Widget>,
    },
    Label {
        text: String,
        required: bool,
        invalid: bool,
    },
    HelperText {
        text: String,
        invalid: bool,
    },
    TextInput {
        value: String,
        placeholder: String,
        disabled: bool,
        invalid: bool,
        max_length: Option<usize>,
    },
    Select {
        options: Vec<String>,
        selected: Option<String>,
        disabled: bool,
        invalid: bool,
    },
    Table {
        columns: Vec<String>,
        rows: Vec<TableRow>,
    },

    // ── Properties form ──
    PropertyText {
        key: String,
        label: String,
        value: String,
    },
    PropertyNumber {
        key: String,
        label: String,
        value: Option<i64>,
    },
    PropertyToggle {
        key: String,
        label: String,
        value: bool,
    },
    /// Editable item list; `can_remove` is false when only one item remains.
    PropertyList {
        key: String,
        label: String,
        items: Vec<String>,
        can_remove: bool,
    },
    PropertyColumns {
        key: String,
        label: String,
        columns: Vec<ColumnSpec>,
        can_remove: bool,
    },
    ErrorMessage {
        attribute: String,
        text: String,
    },
}

impl Widget {
    pub fn stack(field: Option<FieldId>, children: Vec<Widget>) -> Self {
        Widget::Stack { field, children }
    }

    /// Children of a container, empty for leaves.
    pub fn children(&self) -> &[Widget] {
        match self {
            Widget::Stack { children, .. } => children,
            _ => &[],
        }
    }

    /// Depth-first search for the first widget matching `pred`.
    pub fn find(&self, pred: &dyn Fn(&Widget) -> bool) -> Option<&Widget> {
        if pred(self) {
            return Some(self);
        }
        if let Widget::Table { rows, .. } = self {
            for row in rows {
                for cell in &row.cells {
                    if let Some(hit) = cell.find(pred) {
                        return Some(hit);
                    }
                }
            }
        }
        self.children().iter().find_map(|child| child.find(pred))
    }
}
