use super::{TABLE, common_properties, compose, properties_form};
use crate::config::SchemaLimits;
use crate::id::FieldKind;
use crate::model::{Attributes, CellKind, ColumnSpec, FieldInstance, FieldValue, attr};
use crate::registry::{FieldType, PaletteEntry};
use crate::schema::{self, PropertyDiagnostic};
use crate::widget::{PreviewState, TableRow, Widget};

/// Grid of labelled rows × typed columns. Each column's cells are either free
/// text or a dropdown over that column's options.
pub struct TableField;

impl FieldType for TableField {
    fn kind(&self) -> FieldKind {
        FieldKind::intern(TABLE)
    }

    fn palette_entry(&self) -> PaletteEntry {
        PaletteEntry {
            kind: self.kind(),
            label: "Table",
            icon: "◫",
        }
    }

    fn default_attributes(&self) -> Attributes {
        Attributes::new()
            .with(attr::LABEL, "Table")
            .with(attr::HELPER_TEXT, "Helper text")
            .with(attr::REQUIRED, false)
            .with(
                attr::COLUMNS,
                vec![
                    ColumnSpec::text("Column 1"),
                    ColumnSpec::text("Column 2"),
                    ColumnSpec::text("Column 3"),
                ],
            )
            .with(attr::ROWS, vec!["Row 1".to_string(), "Row 2".to_string()])
    }

    fn check_value(&self, field: &FieldInstance, value: &FieldValue) -> bool {
        let attrs = field.attributes();
        let columns = attrs.columns(attr::COLUMNS);
        let row_count = attrs.list(attr::ROWS).len();

        let grid: &[Vec<String>] = match value {
            FieldValue::Grid(rows) => rows,
            FieldValue::Empty => &[],
            FieldValue::Text(s) if s.is_empty() => &[],
            FieldValue::Text(_) => return false,
        };

        if grid.len() > row_count || grid.iter().any(|row| row.len() > columns.len()) {
            return false;
        }

        // Filled dropdown cells must name one of their column's options.
        for row in grid {
            for (cell, col) in row.iter().zip(columns) {
                if !cell.is_empty()
                    && col.cell == CellKind::Dropdown
                    && !col.options.iter().any(|o| o == cell)
                {
                    return false;
                }
            }
        }

        // Required tables need every cell filled.
        if field.is_required() {
            for r in 0..row_count {
                for c in 0..columns.len() {
                    let filled = grid
                        .get(r)
                        .and_then(|row| row.get(c))
                        .is_some_and(|cell| !cell.is_empty());
                    if !filled {
                        return false;
                    }
                }
            }
        }
        true
    }

    fn check_properties(&self, attrs: &Attributes, limits: &SchemaLimits) -> Vec<PropertyDiagnostic> {
        let mut diags = Vec::new();
        schema::check_label(attrs, limits, &mut diags);
        schema::check_max_chars(attrs, attr::HELPER_TEXT, limits.helper_text_max, &mut diags);
        schema::check_required_flag(attrs, &mut diags);
        schema::check_columns(attrs, &mut diags);
        schema::check_non_empty_list(attrs, attr::ROWS, "row", &mut diags);
        diags
    }

    fn render_designer(&self, field: &FieldInstance) -> Widget {
        compose(field, table(field, None, true, false), false)
    }

    fn render_preview(&self, field: &FieldInstance, state: PreviewState<'_>) -> Widget {
        let grid = state.value.and_then(FieldValue::as_grid);
        compose(
            field,
            table(field, grid, false, state.is_invalid),
            state.is_invalid,
        )
    }

    fn render_properties(&self, field: &FieldInstance, errors: &[PropertyDiagnostic]) -> Widget {
        let attrs = field.attributes();
        let columns = attrs.columns(attr::COLUMNS).to_vec();
        let rows = attrs.list(attr::ROWS).to_vec();
        let mut editors = common_properties(attrs);
        editors.push(Widget::PropertyColumns {
            key: attr::COLUMNS.to_string(),
            label: "Columns".to_string(),
            can_remove: columns.len() > 1,
            columns,
        });
        editors.push(Widget::PropertyList {
            key: attr::ROWS.to_string(),
            label: "Rows".to_string(),
            can_remove: rows.len() > 1,
            items: rows,
        });
        properties_form(field, editors, errors)
    }
}

fn table(field: &FieldInstance, grid: Option<&[Vec<String>]>, disabled: bool, invalid: bool) -> Widget {
    let attrs = field.attributes();
    let columns = attrs.columns(attr::COLUMNS);
    let rows = attrs
        .list(attr::ROWS)
        .iter()
        .enumerate()
        .map(|(r, label)| TableRow {
            label: label.clone(),
            cells: columns
                .iter()
                .enumerate()
                .map(|(c, col)| {
                    let value = grid
                        .and_then(|g| g.get(r))
                        .and_then(|row| row.get(c))
                        .cloned()
                        .unwrap_or_default();
                    cell(col, value, disabled, invalid)
                })
                .collect(),
        })
        .collect();
    Widget::Table {
        columns: columns.iter().map(|c| c.name.clone()).collect(),
        rows,
    }
}

fn cell(col: &ColumnSpec, value: String, disabled: bool, invalid: bool) -> Widget {
    match col.cell {
        CellKind::Text => Widget::TextInput {
            value,
            placeholder: "Answer".to_string(),
            disabled,
            invalid,
            max_length: None,
        },
        CellKind::Dropdown => Widget::Select {
            options: col.options.to_vec(),
            selected: (!value.is_empty()).then_some(value),
            disabled,
            invalid,
        },
    }
}
