//! End-user preview form: collected answers and per-field invalid flags.

use fb_core::collection::FieldCollection;
use fb_core::error::FormError;
use fb_core::id::FieldId;
use fb_core::model::FieldValue;
use fb_core::registry::FieldRegistry;
use fb_core::widget::{PreviewState, Widget};
use smallvec::SmallVec;
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct PreviewForm {
    values: HashMap<FieldId, FieldValue>,
    invalid: SmallVec<[FieldId; 8]>,
}

impl PreviewForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value-submission callback for one field. Valid values are stored and
    /// clear the field's invalid flag. An invalid value is flagged and also
    /// drops any earlier answer, so the form never keeps a value the user
    /// has since replaced.
    ///
    /// # Errors
    /// `NotFound` for an id outside `fields`, `UnknownFieldType` for an
    /// unregistered tag.
    pub fn submit(
        &mut self,
        fields: &FieldCollection,
        registry: &FieldRegistry,
        id: FieldId,
        value: FieldValue,
    ) -> Result<bool, FormError> {
        let field = fields.get(id).ok_or(FormError::NotFound(id))?;
        let valid = registry.validate(field, &value)?;
        if valid {
            self.values.insert(id, value);
        } else {
            self.values.remove(&id);
        }
        self.flag(id, !valid);
        Ok(valid)
    }

    /// Form submit: re-validate every field against its current value and
    /// flag the failures. Returns whether the whole form is valid.
    pub fn validate_all(&mut self, fields: &FieldCollection, registry: &FieldRegistry) -> Result<bool, FormError> {
        let mut all_valid = true;
        for field in fields.iter() {
            let value = self.values.get(&field.id()).cloned().unwrap_or_default();
            let valid = registry.validate(field, &value)?;
            self.flag(field.id(), !valid);
            all_valid &= valid;
        }
        Ok(all_valid)
    }

    pub fn value(&self, id: FieldId) -> Option<&FieldValue> {
        self.values.get(&id)
    }

    pub fn is_invalid(&self, id: FieldId) -> bool {
        self.invalid.contains(&id)
    }

    /// Collected answers in form order.
    pub fn values(&self, fields: &FieldCollection) -> Vec<(FieldId, FieldValue)> {
        fields
            .iter()
            .filter_map(|f| self.values.get(&f.id()).map(|v| (f.id(), v.clone())))
            .collect()
    }

    /// Forget answers for fields that are gone.
    pub fn prune(&mut self, fields: &FieldCollection) {
        self.values.retain(|id, _| fields.contains(*id));
        self.invalid.retain(|id| fields.contains(*id));
    }

    pub fn reset(&mut self) {
        self.values.clear();
        self.invalid.clear();
    }

    /// Interactive widgets for every field, in order.
    pub fn render(&self, fields: &FieldCollection, registry: &FieldRegistry) -> Result<Vec<Widget>, FormError> {
        fields
            .iter()
            .map(|field| {
                let state = PreviewState {
                    value: self.values.get(&field.id()),
                    is_invalid: self.is_invalid(field.id()),
                };
                Ok(registry.lookup(field.kind())?.render_preview(field, state))
            })
            .collect()
    }

    fn flag(&mut self, id: FieldId, invalid: bool) {
        let pos = self.invalid.iter().position(|x| *x == id);
        match (invalid, pos) {
            (true, None) => self.invalid.push(id),
            (false, Some(i)) => {
                self.invalid.remove(i);
            }
            _ => {}
        }
    }
}
