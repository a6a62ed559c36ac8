use super::{DROPDOWN, common_properties, compose, properties_form};
use crate::config::SchemaLimits;
use crate::id::FieldKind;
use crate::model::{Attributes, FieldInstance, FieldValue, attr};
use crate::registry::{FieldType, PaletteEntry};
use crate::schema::{self, PropertyDiagnostic};
use crate::widget::{PreviewState, Widget};

/// Single-select from an ordered option list.
pub struct DropdownField;

impl FieldType for DropdownField {
    fn kind(&self) -> FieldKind {
        FieldKind::intern(DROPDOWN)
    }

    fn palette_entry(&self) -> PaletteEntry {
        PaletteEntry {
            kind: self.kind(),
            label: "Dropdown",
            icon: "▼",
        }
    }

    fn default_attributes(&self) -> Attributes {
        Attributes::new()
            .with(attr::LABEL, "Dropdown")
            .with(attr::HELPER_TEXT, "Helper text")
            .with(attr::REQUIRED, false)
            .with(attr::OPTIONS, vec!["Option 1".to_string()])
    }

    fn check_value(&self, field: &FieldInstance, value: &FieldValue) -> bool {
        match value.as_text() {
            Some("") => true,
            Some(choice) => field
                .attributes()
                .list(attr::OPTIONS)
                .iter()
                .any(|o| o == choice),
            None => false,
        }
    }

    fn check_properties(&self, attrs: &Attributes, limits: &SchemaLimits) -> Vec<PropertyDiagnostic> {
        let mut diags = Vec::new();
        schema::check_label(attrs, limits, &mut diags);
        schema::check_max_chars(attrs, attr::HELPER_TEXT, limits.helper_text_max, &mut diags);
        schema::check_required_flag(attrs, &mut diags);
        schema::check_non_empty_list(attrs, attr::OPTIONS, "option", &mut diags);
        diags
    }

    fn render_designer(&self, field: &FieldInstance) -> Widget {
        let select = Widget::Select {
            options: options(field),
            selected: None,
            disabled: true,
            invalid: false,
        };
        compose(field, select, false)
    }

    fn render_preview(&self, field: &FieldInstance, state: PreviewState<'_>) -> Widget {
        let selected = state
            .value
            .and_then(FieldValue::as_text)
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        let select = Widget::Select {
            options: options(field),
            selected,
            disabled: false,
            invalid: state.is_invalid,
        };
        compose(field, select, state.is_invalid)
    }

    fn render_properties(&self, field: &FieldInstance, errors: &[PropertyDiagnostic]) -> Widget {
        let items = options(field);
        let mut editors = common_properties(field.attributes());
        editors.push(Widget::PropertyList {
            key: attr::OPTIONS.to_string(),
            label: "Options".to_string(),
            can_remove: items.len() > 1,
            items,
        });
        properties_form(field, editors, errors)
    }
}

fn options(field: &FieldInstance) -> Vec<String> {
    field.attributes().list(attr::OPTIONS).to_vec()
}
