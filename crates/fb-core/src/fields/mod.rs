//! Built-in field types.
//!
//! Shared rendering pieces (label header, helper text, common property
//! editors) live here; each submodule owns one type's defaults, value
//! checks, and schema.

mod dropdown;
mod table;
mod text;

pub use dropdown::DropdownField;
pub use table::TableField;
pub use text::TextField;

use crate::model::{Attributes, FieldInstance, attr};
use crate::schema::PropertyDiagnostic;
use crate::widget::Widget;

pub const TEXT: &str = "text";
pub const DROPDOWN: &str = "dropdown";
pub const TABLE: &str = "table";

/// Label with the required `*` marker.
fn header(field: &FieldInstance, invalid: bool) -> Widget {
    Widget::Label {
        text: field.label().to_string(),
        required: field.is_required(),
        invalid,
    }
}

/// Helper text, omitted when blank.
fn helper(field: &FieldInstance, invalid: bool) -> Option<Widget> {
    field
        .attributes()
        .text(attr::HELPER_TEXT)
        .filter(|t| !t.is_empty())
        .map(|text| Widget::HelperText {
            text: text.to_string(),
            invalid,
        })
}

/// `[header, body, helper?]` wrapped in a stack tied to the field.
fn compose(field: &FieldInstance, body: Widget, invalid: bool) -> Widget {
    let mut children = vec![header(field, invalid), body];
    children.extend(helper(field, invalid));
    Widget::stack(Some(field.id()), children)
}

fn property_text(attrs: &Attributes, key: &str, label: &str) -> Widget {
    Widget::PropertyText {
        key: key.to_string(),
        label: label.to_string(),
        value: attrs.text(key).unwrap_or_default().to_string(),
    }
}

/// Label, helper-text, and required editors every type shows.
fn common_properties(attrs: &Attributes) -> Vec<Widget> {
    vec![
        property_text(attrs, attr::LABEL, "Label"),
        property_text(attrs, attr::HELPER_TEXT, "Helper Text"),
        Widget::PropertyToggle {
            key: attr::REQUIRED.to_string(),
            label: "Required Field".to_string(),
            value: attrs.flag(attr::REQUIRED),
        },
    ]
}

/// Properties form: editors followed by one message per diagnostic.
fn properties_form(field: &FieldInstance, mut editors: Vec<Widget>, errors: &[PropertyDiagnostic]) -> Widget {
    editors.extend(errors.iter().map(|d| Widget::ErrorMessage {
        attribute: d.attribute.clone(),
        text: d.message.clone(),
    }));
    Widget::stack(Some(field.id()), editors)
}
