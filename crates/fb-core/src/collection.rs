//! Ordered field collection with a single-selection pointer.
//!
//! The collection is the only writer of its sequence: every change goes
//! through `add`/`remove`/`move_to`/`update`/`select`, which keep ids unique
//! and the order gap-free.

use crate::error::FormError;
use crate::export::FieldRecord;
use crate::id::FieldId;
use crate::model::{Attributes, FieldInstance};
use crate::registry::FieldRegistry;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldCollection {
    fields: Vec<FieldInstance>,
    selected: Option<FieldId>,
}

impl FieldCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a collection from exported records, checking every type tag
    /// against `registry`.
    ///
    /// # Errors
    /// `UnknownFieldType` for an unregistered tag, `DuplicateId` if two records share an id.
    pub fn from_records(records: Vec<FieldRecord>, registry: &FieldRegistry) -> Result<Self, FormError> {
        let mut collection = Self::new();
        for record in records {
            registry.lookup(record.kind)?;
            let end = collection.len();
            collection.add(end, FieldInstance::new(record.id, record.kind, record.attributes))?;
        }
        Ok(collection)
    }

    // ─── Reads ───────────────────────────────────────────────────────────

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Drives the "drop here" empty-canvas state.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn fields(&self) -> &[FieldInstance] {
        &self.fields
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldInstance> {
        self.fields.iter()
    }

    pub fn ids(&self) -> Vec<FieldId> {
        self.fields.iter().map(FieldInstance::id).collect()
    }

    pub fn position(&self, id: FieldId) -> Option<usize> {
        self.fields.iter().position(|f| f.id() == id)
    }

    pub fn get(&self, id: FieldId) -> Option<&FieldInstance> {
        self.fields.iter().find(|f| f.id() == id)
    }

    pub fn contains(&self, id: FieldId) -> bool {
        self.position(id).is_some()
    }

    pub fn selected(&self) -> Option<FieldId> {
        self.selected
    }

    pub fn selected_field(&self) -> Option<&FieldInstance> {
        self.selected.and_then(|id| self.get(id))
    }

    // ─── Mutations ───────────────────────────────────────────────────────

    /// Insert `field` at `index`, clamped to `[0, len]`. Returns the index used.
    ///
    /// # Errors
    /// `DuplicateId` if a field with the same id is already present.
    pub fn add(&mut self, index: usize, field: FieldInstance) -> Result<usize, FormError> {
        if self.contains(field.id()) {
            return Err(FormError::DuplicateId(field.id()));
        }
        let index = index.min(self.fields.len());
        log::debug!("add {} ({}) at {index}", field.id(), field.kind());
        self.fields.insert(index, field);
        Ok(index)
    }

    /// Remove the field with `id`, clearing the selection if it pointed there.
    ///
    /// # Errors
    /// `NotFound` if no field has this id.
    pub fn remove(&mut self, id: FieldId) -> Result<FieldInstance, FormError> {
        let index = self.position(id).ok_or(FormError::NotFound(id))?;
        let removed = self.fields.remove(index);
        if self.selected == Some(id) {
            self.selected = None;
        }
        log::debug!("remove {id} from {index}");
        Ok(removed)
    }

    /// Reposition a field: remove it, then insert the same instance at
    /// `new_index` (an index into the sequence *after* removal, clamped).
    /// Identity and attributes are preserved, and so is the selection.
    ///
    /// # Errors
    /// `NotFound` if no field has this id.
    pub fn move_to(&mut self, id: FieldId, new_index: usize) -> Result<usize, FormError> {
        let from = self.position(id).ok_or(FormError::NotFound(id))?;
        let field = self.fields.remove(from);
        let to = new_index.min(self.fields.len());
        self.fields.insert(to, field);
        log::debug!("move {id} {from} -> {to}");
        Ok(to)
    }

    /// Shallow-merge `patch` into the field's attributes.
    ///
    /// # Errors
    /// `NotFound` if no field has this id.
    pub fn update(&mut self, id: FieldId, patch: Attributes) -> Result<(), FormError> {
        let field = self
            .fields
            .iter_mut()
            .find(|f| f.id() == id)
            .ok_or(FormError::NotFound(id))?;
        field.attributes_mut().merge(patch);
        log::debug!("update {id}");
        Ok(())
    }

    /// Set or clear the selection.
    ///
    /// # Errors
    /// `NotFound` when selecting an id that is not in the collection; the
    /// selection is left unchanged.
    pub fn select(&mut self, id: Option<FieldId>) -> Result<(), FormError> {
        if let Some(id) = id
            && !self.contains(id)
        {
            return Err(FormError::NotFound(id));
        }
        self.selected = id;
        Ok(())
    }

    /// Read-only export of the ordered sequence.
    pub fn export(&self) -> Vec<FieldRecord> {
        self.fields.iter().map(FieldRecord::from).collect()
    }
}
