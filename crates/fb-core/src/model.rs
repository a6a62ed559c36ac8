//! Core data model for form documents.
//!
//! A form is an ordered sequence of `FieldInstance` values. Each instance
//! carries an immutable type tag and a bag of type-specific `Attributes`.
//! The engine moves instances around and merges attribute patches, but only
//! the matching field type ever interprets attribute contents.

use crate::id::{FieldId, FieldKind};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::BTreeMap;

// ─── Attribute keys ──────────────────────────────────────────────────────

/// Attribute names shared by the built-in field types.
pub mod attr {
    pub const LABEL: &str = "label";
    pub const HELPER_TEXT: &str = "helperText";
    pub const REQUIRED: &str = "required";
    pub const PLACEHOLDER: &str = "placeholder";
    pub const MIN_LENGTH: &str = "minLength";
    pub const MAX_LENGTH: &str = "maxLength";
    pub const OPTIONS: &str = "options";
    pub const COLUMNS: &str = "columns";
    pub const ROWS: &str = "rows";
}

// ─── Attribute values ────────────────────────────────────────────────────

/// How a table cell accepts input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellKind {
    #[default]
    Text,
    Dropdown,
}

/// One table column: header text, cell kind, and the option list used when
/// the cells are dropdowns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub name: String,
    #[serde(default)]
    pub cell: CellKind,
    #[serde(default)]
    pub options: SmallVec<[String; 4]>,
}

impl ColumnSpec {
    pub fn text(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cell: CellKind::Text,
            options: SmallVec::new(),
        }
    }

    pub fn dropdown<I, S>(name: impl Into<String>, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            cell: CellKind::Dropdown,
            options: options.into_iter().map(Into::into).collect(),
        }
    }
}

/// A single configuration value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    Null,
    Bool(bool),
    Int(i64),
    Text(String),
    List(Vec<String>),
    Columns(Vec<ColumnSpec>),
}

impl AttrValue {
    pub fn is_null(&self) -> bool {
        matches!(self, AttrValue::Null)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            AttrValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AttrValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            AttrValue::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            AttrValue::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_columns(&self) -> Option<&[ColumnSpec]> {
        match self {
            AttrValue::Columns(cols) => Some(cols),
            _ => None,
        }
    }
}

impl From<&str> for AttrValue {
    fn from(s: &str) -> Self {
        AttrValue::Text(s.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(s: String) -> Self {
        AttrValue::Text(s)
    }
}

impl From<bool> for AttrValue {
    fn from(b: bool) -> Self {
        AttrValue::Bool(b)
    }
}

impl From<i64> for AttrValue {
    fn from(n: i64) -> Self {
        AttrValue::Int(n)
    }
}

impl From<Vec<String>> for AttrValue {
    fn from(items: Vec<String>) -> Self {
        AttrValue::List(items)
    }
}

impl From<Vec<ColumnSpec>> for AttrValue {
    fn from(cols: Vec<ColumnSpec>) -> Self {
        AttrValue::Columns(cols)
    }
}

// ─── Attributes ──────────────────────────────────────────────────────────

/// Named configuration values of one field. Key order is deterministic so
/// exports are stable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Attributes(BTreeMap<String, AttrValue>);

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, key: &str, value: impl Into<AttrValue>) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: &str, value: impl Into<AttrValue>) {
        self.0.insert(key.to_string(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<AttrValue> {
        self.0.remove(key)
    }

    pub fn get(&self, key: &str) -> Option<&AttrValue> {
        self.0.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut AttrValue> {
        self.0.get_mut(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn text(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(AttrValue::as_text)
    }

    /// Boolean attribute; absent or non-boolean reads as `false`.
    pub fn flag(&self, key: &str) -> bool {
        self.get(key).and_then(AttrValue::as_bool).unwrap_or(false)
    }

    pub fn int(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(AttrValue::as_int)
    }

    pub fn list(&self, key: &str) -> &[String] {
        self.get(key).and_then(AttrValue::as_list).unwrap_or(&[])
    }

    pub fn columns(&self, key: &str) -> &[ColumnSpec] {
        self.get(key).and_then(AttrValue::as_columns).unwrap_or(&[])
    }

    /// Shallow merge: every key in `patch` replaces the key here.
    pub fn merge(&mut self, patch: Attributes) {
        self.0.extend(patch.0);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttrValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, AttrValue)> for Attributes {
    fn from_iter<T: IntoIterator<Item = (String, AttrValue)>>(iter: T) -> Self {
        Attributes(iter.into_iter().collect())
    }
}

// ─── Field instance ──────────────────────────────────────────────────────

/// One configured form element.
///
/// `id` and `kind` are fixed at construction; only `attributes` change, and
/// only through the owning collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldInstance {
    id: FieldId,
    #[serde(rename = "type")]
    kind: FieldKind,
    attributes: Attributes,
}

impl FieldInstance {
    pub fn new(id: FieldId, kind: FieldKind, attributes: Attributes) -> Self {
        Self {
            id,
            kind,
            attributes,
        }
    }

    pub fn id(&self) -> FieldId {
        self.id
    }

    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub(crate) fn attributes_mut(&mut self) -> &mut Attributes {
        &mut self.attributes
    }

    /// Display label, falling back to the type tag.
    pub fn label(&self) -> &str {
        self.attributes
            .text(attr::LABEL)
            .unwrap_or_else(|| self.kind.as_str())
    }

    pub fn is_required(&self) -> bool {
        self.attributes.flag(attr::REQUIRED)
    }
}

// ─── Submitted values ────────────────────────────────────────────────────

/// A value entered by an end user in the preview form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    #[default]
    Empty,
    Text(String),
    /// Table answers, indexed `[row][column]`.
    Grid(Vec<Vec<String>>),
}

impl FieldValue {
    /// Empty means absent, an empty string, or a grid with no cells.
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Empty => true,
            FieldValue::Text(s) => s.is_empty(),
            FieldValue::Grid(rows) => rows.iter().all(|r| r.is_empty()),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            FieldValue::Empty => Some(""),
            FieldValue::Grid(_) => None,
        }
    }

    pub fn as_grid(&self) -> Option<&[Vec<String>]> {
        match self {
            FieldValue::Grid(rows) => Some(rows),
            _ => None,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}
