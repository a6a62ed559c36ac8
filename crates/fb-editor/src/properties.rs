//! Properties commit protocol.
//!
//! Opening the panel for a field copies its attributes into a scratch
//! buffer. Every edit, scalar or list, lands in the scratch buffer only.
//! `commit` runs the field type's schema check and, if it passes, writes the
//! whole buffer back in one `update`; otherwise the live field stays exactly
//! as it was.
//!
//! ```text
//! Closed ──open──▶ Editing ──commit──▶ Validating ──ok──▶ Closed
//!    ▲                │  ▲                  │
//!    └────cancel──────┘  └──────rejected────┘
//! ```

use fb_core::collection::FieldCollection;
use fb_core::config::SchemaLimits;
use fb_core::error::FormError;
use fb_core::id::{FieldId, FieldKind};
use fb_core::list::parse_list;
use fb_core::model::{AttrValue, Attributes, CellKind, ColumnSpec, FieldInstance, attr};
use fb_core::registry::FieldRegistry;
use fb_core::schema::PropertyDiagnostic;
use fb_core::widget::Widget;

// ─── Scratch buffer ──────────────────────────────────────────────────────

/// Working copy of one field's attributes.
///
/// Keys are never dropped: clearing an attribute stores `Null`, so the
/// shallow merge on commit clears it on the live field too.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScratchBuffer {
    attrs: Attributes,
}

impl ScratchBuffer {
    pub fn new(attrs: Attributes) -> Self {
        Self { attrs }
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attrs
    }

    pub fn into_attributes(self) -> Attributes {
        self.attrs
    }

    pub fn set(&mut self, key: &str, value: impl Into<AttrValue>) {
        self.attrs.set(key, value);
    }

    pub fn clear(&mut self, key: &str) {
        self.attrs.set(key, AttrValue::Null);
    }

    /// Set an optional number (`None` clears it).
    pub fn set_int(&mut self, key: &str, value: Option<i64>) {
        match value {
            Some(n) => self.set(key, n),
            None => self.clear(key),
        }
    }

    // ── List attributes (options, rows) ──

    /// Append `Option N`, where N is the new length.
    pub fn add_option(&mut self, key: &str) -> usize {
        let n = self.attrs.list(key).len() + 1;
        self.push_item(key, format!("Option {n}"))
    }

    /// Append an item, returning its index.
    pub fn push_item(&mut self, key: &str, item: impl Into<String>) -> usize {
        let mut items = self.attrs.list(key).to_vec();
        items.push(item.into());
        let index = items.len() - 1;
        self.attrs.set(key, items);
        index
    }

    /// Remove one item. The last remaining item cannot be removed.
    pub fn remove_item(&mut self, key: &str, index: usize) -> bool {
        let mut items = self.attrs.list(key).to_vec();
        if items.len() <= 1 || index >= items.len() {
            return false;
        }
        items.remove(index);
        self.attrs.set(key, items);
        true
    }

    pub fn rename_item(&mut self, key: &str, index: usize, text: impl Into<String>) -> bool {
        let mut items = self.attrs.list(key).to_vec();
        let Some(slot) = items.get_mut(index) else {
            return false;
        };
        *slot = text.into();
        self.attrs.set(key, items);
        true
    }

    /// Replace a list from comma-separated text (`"Red, Green, Blue"`).
    pub fn set_list_from_text(&mut self, key: &str, text: &str) {
        self.attrs.set(key, parse_list(text));
    }

    // ── Table columns ──

    /// Append a text column named `Column N`.
    pub fn add_column(&mut self) -> usize {
        let mut columns = self.columns();
        columns.push(ColumnSpec::text(format!("Column {}", columns.len() + 1)));
        let index = columns.len() - 1;
        self.attrs.set(attr::COLUMNS, columns);
        index
    }

    /// Remove a column. The last remaining column cannot be removed.
    pub fn remove_column(&mut self, index: usize) -> bool {
        let mut columns = self.columns();
        if columns.len() <= 1 || index >= columns.len() {
            return false;
        }
        columns.remove(index);
        self.attrs.set(attr::COLUMNS, columns);
        true
    }

    pub fn rename_column(&mut self, index: usize, name: impl Into<String>) -> bool {
        self.edit_column(index, |col| col.name = name.into())
    }

    pub fn set_column_cell(&mut self, index: usize, cell: CellKind) -> bool {
        self.edit_column(index, |col| col.cell = cell)
    }

    /// Append `Option N` to a column's cell options.
    pub fn add_column_option(&mut self, index: usize) -> bool {
        self.edit_column(index, |col| {
            let n = col.options.len() + 1;
            col.options.push(format!("Option {n}"));
        })
    }

    pub fn set_column_options_from_text(&mut self, index: usize, text: &str) -> bool {
        self.edit_column(index, |col| col.options = parse_list(text).into_iter().collect())
    }

    fn columns(&self) -> Vec<ColumnSpec> {
        self.attrs.columns(attr::COLUMNS).to_vec()
    }

    fn edit_column(&mut self, index: usize, edit: impl FnOnce(&mut ColumnSpec)) -> bool {
        let mut columns = self.columns();
        let Some(col) = columns.get_mut(index) else {
            return false;
        };
        edit(col);
        self.attrs.set(attr::COLUMNS, columns);
        true
    }
}

// ─── Editor state ────────────────────────────────────────────────────────

/// An open edit of one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSession {
    pub id: FieldId,
    pub kind: FieldKind,
    pub scratch: ScratchBuffer,
    /// Diagnostics from the last rejected commit.
    pub errors: Vec<PropertyDiagnostic>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EditState {
    #[default]
    Closed,
    Editing(EditSession),
    /// Schema check in progress; only observable from inside `commit`.
    Validating,
}

/// Result of a commit attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitOutcome {
    /// Scratch buffer written to the live field; the editor is closed.
    Committed(FieldId),
    /// Schema check failed; still editing, live field untouched.
    Rejected(Vec<PropertyDiagnostic>),
    /// Nothing was open.
    Idle,
}

#[derive(Debug, Default)]
pub struct PropertiesEditor {
    state: EditState,
}

impl PropertiesEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &EditState {
        &self.state
    }

    /// `Closed → Editing`. Any session already open is discarded.
    pub fn open(&mut self, field: &FieldInstance) {
        if let EditState::Editing(stale) = &self.state {
            log::debug!("discarding unsaved edits of {}", stale.id);
        }
        self.state = EditState::Editing(EditSession {
            id: field.id(),
            kind: field.kind(),
            scratch: ScratchBuffer::new(field.attributes().clone()),
            errors: Vec::new(),
        });
    }

    /// Discard the scratch buffer. Returns whether a session was open.
    pub fn cancel(&mut self) -> bool {
        let was_open = self.is_open();
        self.state = EditState::Closed;
        was_open
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, EditState::Editing(_))
    }

    /// The field being edited.
    pub fn editing(&self) -> Option<FieldId> {
        self.session().map(|s| s.id)
    }

    pub fn session(&self) -> Option<&EditSession> {
        match &self.state {
            EditState::Editing(session) => Some(session),
            _ => None,
        }
    }

    pub fn scratch(&self) -> Option<&ScratchBuffer> {
        self.session().map(|s| &s.scratch)
    }

    pub fn scratch_mut(&mut self) -> Option<&mut ScratchBuffer> {
        match &mut self.state {
            EditState::Editing(session) => Some(&mut session.scratch),
            _ => None,
        }
    }

    /// Diagnostics from the last rejected commit.
    pub fn errors(&self) -> &[PropertyDiagnostic] {
        self.session().map(|s| s.errors.as_slice()).unwrap_or(&[])
    }

    /// The edited field as it would look after commit.
    pub fn as_instance(&self) -> Option<FieldInstance> {
        self.session()
            .map(|s| FieldInstance::new(s.id, s.kind, s.scratch.attributes().clone()))
    }

    /// Properties form for the open session.
    pub fn render(&self, registry: &FieldRegistry) -> Result<Option<Widget>, FormError> {
        let (Some(session), Some(preview)) = (self.session(), self.as_instance()) else {
            return Ok(None);
        };
        let field_type = registry.lookup(session.kind)?;
        Ok(Some(field_type.render_properties(&preview, &session.errors)))
    }

    /// Validate the scratch buffer and, if clean, write it to the live field.
    ///
    /// # Errors
    /// `UnknownFieldType` (session stays open) or `NotFound` if the field
    /// left the collection while being edited (session is closed).
    pub fn commit(
        &mut self,
        fields: &mut FieldCollection,
        registry: &FieldRegistry,
        limits: &SchemaLimits,
    ) -> Result<CommitOutcome, FormError> {
        let mut session = match std::mem::replace(&mut self.state, EditState::Validating) {
            EditState::Editing(session) => session,
            other => {
                self.state = other;
                return Ok(CommitOutcome::Idle);
            }
        };

        let field_type = match registry.lookup(session.kind) {
            Ok(t) => t,
            Err(e) => {
                self.state = EditState::Editing(session);
                return Err(e);
            }
        };

        let diagnostics = field_type.check_properties(session.scratch.attributes(), limits);
        if !diagnostics.is_empty() {
            log::debug!("commit of {} rejected: {} problem(s)", session.id, diagnostics.len());
            session.errors = diagnostics.clone();
            self.state = EditState::Editing(session);
            return Ok(CommitOutcome::Rejected(diagnostics));
        }

        self.state = EditState::Closed;
        let id = session.id;
        fields.update(id, session.scratch.into_attributes())?;
        log::info!("committed properties of {id}");
        Ok(CommitOutcome::Committed(id))
    }
}
