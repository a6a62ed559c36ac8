//! Field-type registry: type tag → capability bundle.
//!
//! Each field kind plugs in its own construction, validation, schema check,
//! and rendering by implementing `FieldType`. Adding a kind means registering
//! one more entry; the designer engine never matches on concrete kinds.

use crate::config::SchemaLimits;
use crate::error::FormError;
use crate::fields::{DropdownField, TableField, TextField};
use crate::id::{FieldId, FieldKind};
use crate::model::{Attributes, FieldInstance, FieldValue};
use crate::schema::PropertyDiagnostic;
use crate::widget::{PreviewState, Widget};
use std::collections::HashMap;

/// Palette button for a field type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaletteEntry {
    pub kind: FieldKind,
    pub label: &'static str,
    pub icon: &'static str,
}

/// Capabilities every field type supplies.
pub trait FieldType: Send + Sync {
    fn kind(&self) -> FieldKind;

    fn palette_entry(&self) -> PaletteEntry;

    /// The documented default attributes of a fresh instance.
    fn default_attributes(&self) -> Attributes;

    /// Build a new instance. Deterministic given `id`.
    fn construct(&self, id: FieldId) -> FieldInstance {
        FieldInstance::new(id, self.kind(), self.default_attributes())
    }

    /// Type-specific structural check on a candidate value.
    fn check_value(&self, field: &FieldInstance, value: &FieldValue) -> bool;

    /// Required check AND the structural check.
    fn validate(&self, field: &FieldInstance, value: &FieldValue) -> bool {
        let required_ok = !field.is_required() || !value.is_empty();
        required_ok && self.check_value(field, value)
    }

    /// Schema check over a full attribute set (label bounds, non-empty lists, …).
    fn check_properties(&self, attrs: &Attributes, limits: &SchemaLimits) -> Vec<PropertyDiagnostic>;

    fn render_designer(&self, field: &FieldInstance) -> Widget;

    fn render_preview(&self, field: &FieldInstance, state: PreviewState<'_>) -> Widget;

    /// Properties form for `field`, whose attributes are the scratch copy being edited.
    fn render_properties(&self, field: &FieldInstance, errors: &[PropertyDiagnostic]) -> Widget;
}

/// Lookup from type tag to capability bundle, in registration order.
pub struct FieldRegistry {
    entries: Vec<Box<dyn FieldType>>,
    index: HashMap<FieldKind, usize>,
}

impl Default for FieldRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl std::fmt::Debug for FieldRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|e| e.kind()))
            .finish()
    }
}

impl FieldRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Registry with the built-in `text`, `dropdown`, and `table` types.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(TextField));
        registry.register(Box::new(DropdownField));
        registry.register(Box::new(TableField));
        registry
    }

    /// Register a field type. Replaces (and returns) an existing entry with
    /// the same tag, keeping its palette position.
    pub fn register(&mut self, field_type: Box<dyn FieldType>) -> Option<Box<dyn FieldType>> {
        let kind = field_type.kind();
        if let Some(&pos) = self.index.get(&kind) {
            log::debug!("replacing field type {kind}");
            return Some(std::mem::replace(&mut self.entries[pos], field_type));
        }
        self.index.insert(kind, self.entries.len());
        self.entries.push(field_type);
        None
    }

    pub fn contains(&self, kind: FieldKind) -> bool {
        self.index.contains_key(&kind)
    }

    /// Look up a type's capabilities.
    ///
    /// # Errors
    /// `UnknownFieldType` if the tag was never registered. This is a
    /// configuration defect, not a runtime condition.
    pub fn lookup(&self, kind: FieldKind) -> Result<&dyn FieldType, FormError> {
        self.index
            .get(&kind)
            .map(|&pos| self.entries[pos].as_ref())
            .ok_or(FormError::UnknownFieldType(kind))
    }

    pub fn construct(&self, kind: FieldKind, id: FieldId) -> Result<FieldInstance, FormError> {
        Ok(self.lookup(kind)?.construct(id))
    }

    pub fn validate(&self, field: &FieldInstance, value: &FieldValue) -> Result<bool, FormError> {
        Ok(self.lookup(field.kind())?.validate(field, value))
    }

    /// Palette buttons in registration order.
    pub fn palette(&self) -> Vec<PaletteEntry> {
        self.entries.iter().map(|e| e.palette_entry()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::{DROPDOWN, TABLE, TEXT};
    use crate::model::attr;
    use crate::widget::Widget;

    struct SignatureField;

    impl FieldType for SignatureField {
        fn kind(&self) -> FieldKind {
            FieldKind::intern("signature")
        }
        fn palette_entry(&self) -> PaletteEntry {
            PaletteEntry {
                kind: self.kind(),
                label: "Signature",
                icon: "✍",
            }
        }
        fn default_attributes(&self) -> Attributes {
            Attributes::new().with(attr::LABEL, "Sign here")
        }
        fn check_value(&self, _field: &FieldInstance, _value: &FieldValue) -> bool {
            true
        }
        fn check_properties(&self, _attrs: &Attributes, _limits: &SchemaLimits) -> Vec<PropertyDiagnostic> {
            Vec::new()
        }
        fn render_designer(&self, field: &FieldInstance) -> Widget {
            Widget::stack(Some(field.id()), Vec::new())
        }
        fn render_preview(&self, field: &FieldInstance, _state: PreviewState<'_>) -> Widget {
            Widget::stack(Some(field.id()), Vec::new())
        }
        fn render_properties(&self, field: &FieldInstance, _errors: &[PropertyDiagnostic]) -> Widget {
            Widget::stack(Some(field.id()), Vec::new())
        }
    }

    #[test]
    fn builtins_in_palette_order() {
        let registry = FieldRegistry::with_builtins();
        let kinds: Vec<_> = registry.palette().iter().map(|p| p.kind.as_str().to_string()).collect();
        assert_eq!(kinds, vec![TEXT, DROPDOWN, TABLE]);
    }

    #[test]
    fn unknown_kind_is_configuration_error() {
        let registry = FieldRegistry::with_builtins();
        let err = registry
            .construct(FieldKind::intern("hologram"), FieldId::intern("h1"))
            .unwrap_err();
        assert!(err.is_fatal());
        assert_eq!(err, FormError::UnknownFieldType(FieldKind::intern("hologram")));
    }

    #[test]
    fn construct_is_deterministic() {
        let registry = FieldRegistry::with_builtins();
        let kind = FieldKind::intern(TEXT);
        let id = FieldId::intern("det");
        assert_eq!(
            registry.construct(kind, id).unwrap(),
            registry.construct(kind, id).unwrap()
        );
    }

    #[test]
    fn custom_type_plugs_in() {
        let mut registry = FieldRegistry::with_builtins();
        assert!(registry.register(Box::new(SignatureField)).is_none());
        let field = registry
            .construct(FieldKind::intern("signature"), FieldId::intern("sig"))
            .unwrap();
        assert_eq!(field.label(), "Sign here");
        assert_eq!(registry.len(), 4);

        // Re-registering replaces in place.
        assert!(registry.register(Box::new(SignatureField)).is_some());
        assert_eq!(registry.len(), 4);
    }
}
