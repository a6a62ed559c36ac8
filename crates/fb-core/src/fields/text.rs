use super::{TEXT, common_properties, compose, properties_form, property_text};
use crate::config::SchemaLimits;
use crate::id::FieldKind;
use crate::model::{Attributes, FieldInstance, FieldValue, attr};
use crate::registry::{FieldType, PaletteEntry};
use crate::schema::{self, PropertyDiagnostic};
use crate::widget::{PreviewState, Widget};

/// Single-line text input with optional length bounds.
pub struct TextField;

impl FieldType for TextField {
    fn kind(&self) -> FieldKind {
        FieldKind::intern(TEXT)
    }

    fn palette_entry(&self) -> PaletteEntry {
        PaletteEntry {
            kind: self.kind(),
            label: "Text Field",
            icon: "T",
        }
    }

    fn default_attributes(&self) -> Attributes {
        Attributes::new()
            .with(attr::LABEL, "Text field")
            .with(attr::HELPER_TEXT, "Helper text")
            .with(attr::REQUIRED, false)
            .with(attr::PLACEHOLDER, "Value here...")
    }

    fn check_value(&self, field: &FieldInstance, value: &FieldValue) -> bool {
        let Some(text) = value.as_text() else {
            return false;
        };
        if text.is_empty() {
            return true;
        }
        let len = text.chars().count() as i64;
        let attrs = field.attributes();
        if let Some(min) = attrs.int(attr::MIN_LENGTH)
            && len < min
        {
            return false;
        }
        if let Some(max) = attrs.int(attr::MAX_LENGTH)
            && len > max
        {
            return false;
        }
        true
    }

    fn check_properties(&self, attrs: &Attributes, limits: &SchemaLimits) -> Vec<PropertyDiagnostic> {
        let mut diags = Vec::new();
        schema::check_label(attrs, limits, &mut diags);
        schema::check_max_chars(attrs, attr::HELPER_TEXT, limits.helper_text_max, &mut diags);
        schema::check_max_chars(attrs, attr::PLACEHOLDER, limits.placeholder_max, &mut diags);
        schema::check_required_flag(attrs, &mut diags);
        schema::check_length_bounds(attrs, &mut diags);
        diags
    }

    fn render_designer(&self, field: &FieldInstance) -> Widget {
        let input = Widget::TextInput {
            value: String::new(),
            placeholder: placeholder(field),
            disabled: true,
            invalid: false,
            max_length: None,
        };
        compose(field, input, false)
    }

    fn render_preview(&self, field: &FieldInstance, state: PreviewState<'_>) -> Widget {
        let value = state
            .value
            .and_then(FieldValue::as_text)
            .unwrap_or_default()
            .to_string();
        let input = Widget::TextInput {
            value,
            placeholder: placeholder(field),
            disabled: false,
            invalid: state.is_invalid,
            max_length: field
                .attributes()
                .int(attr::MAX_LENGTH)
                .and_then(|n| usize::try_from(n).ok()),
        };
        compose(field, input, state.is_invalid)
    }

    fn render_properties(&self, field: &FieldInstance, errors: &[PropertyDiagnostic]) -> Widget {
        let attrs = field.attributes();
        let mut editors = common_properties(attrs);
        editors.insert(1, property_text(attrs, attr::PLACEHOLDER, "Placeholder"));
        editors.push(Widget::PropertyNumber {
            key: attr::MIN_LENGTH.to_string(),
            label: "Min Length".to_string(),
            value: attrs.int(attr::MIN_LENGTH),
        });
        editors.push(Widget::PropertyNumber {
            key: attr::MAX_LENGTH.to_string(),
            label: "Max Length".to_string(),
            value: attrs.int(attr::MAX_LENGTH),
        });
        properties_form(field, editors, errors)
    }
}

fn placeholder(field: &FieldInstance) -> String {
    field
        .attributes()
        .text(attr::PLACEHOLDER)
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::FieldId;

    fn required_text() -> FieldInstance {
        let mut field = TextField.construct(FieldId::intern("name"));
        field.attributes_mut().set(attr::REQUIRED, true);
        field
    }

    #[test]
    fn required_law() {
        let field = required_text();
        assert!(!TextField.validate(&field, &FieldValue::from("")));
        assert!(!TextField.validate(&field, &FieldValue::Empty));
        assert!(TextField.validate(&field, &FieldValue::from("x")));
    }

    #[test]
    fn optional_accepts_empty() {
        let field = TextField.construct(FieldId::intern("nickname"));
        assert!(TextField.validate(&field, &FieldValue::from("")));
    }

    #[test]
    fn length_bounds_apply_to_non_empty_values() {
        let mut field = TextField.construct(FieldId::intern("zip"));
        field.attributes_mut().set(attr::MIN_LENGTH, 5_i64);
        field.attributes_mut().set(attr::MAX_LENGTH, 5_i64);
        assert!(!TextField.validate(&field, &FieldValue::from("123")));
        assert!(!TextField.validate(&field, &FieldValue::from("123456")));
        assert!(TextField.validate(&field, &FieldValue::from("12345")));
        assert!(TextField.validate(&field, &FieldValue::from("")));
    }

    #[test]
    fn grid_value_is_rejected() {
        let field = TextField.construct(FieldId::intern("t"));
        assert!(!TextField.validate(&field, &FieldValue::Grid(vec![vec!["a".into()]])));
    }

    #[test]
    fn defaults_pass_schema() {
        let attrs = TextField.default_attributes();
        assert!(TextField.check_properties(&attrs, &SchemaLimits::default()).is_empty());
    }

    #[test]
    fn designer_render_is_disabled() {
        let field = TextField.construct(FieldId::intern("d"));
        let tree = TextField.render_designer(&field);
        let input = tree.find(&|w| matches!(w, Widget::TextInput { .. })).unwrap();
        assert!(matches!(input, Widget::TextInput { disabled: true, .. }));
    }

    #[test]
    fn preview_render_shows_invalid_state() {
        let field = required_text();
        let value = FieldValue::from("");
        let tree = TextField.render_preview(
            &field,
            PreviewState {
                value: Some(&value),
                is_invalid: true,
            },
        );
        assert!(tree.find(&|w| matches!(w, Widget::Label { invalid: true, required: true, .. })).is_some());
        assert!(tree.find(&|w| matches!(w, Widget::TextInput { invalid: true, .. })).is_some());
    }
}
