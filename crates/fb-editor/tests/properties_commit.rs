//! Integration tests: properties commit protocol, selection, and the
//! preview form's required-field law (fb-editor).

use fb_core::drag::{DragSource, DropTarget};
use fb_core::fields::{DROPDOWN, TABLE, TEXT};
use fb_core::id::{FieldId, FieldKind};
use fb_core::model::{CellKind, FieldValue, attr};
use fb_core::registry::FieldRegistry;
use fb_editor::{CommitOutcome, Designer, DropOutcome, Mode, Panel};
use pretty_assertions::assert_eq;

fn add(d: &mut Designer, kind: &str) -> FieldId {
    d.begin_drag(DragSource::Palette {
        kind: FieldKind::intern(kind),
    });
    match d.end_drag(Some(DropTarget::EmptyArea)).unwrap() {
        DropOutcome::Inserted { id, .. } => id,
        other => panic!("expected insert, got {other:?}"),
    }
}

// ─── Commit atomicity ───────────────────────────────────────────────────

#[test]
fn invalid_commit_leaves_live_field_untouched() {
    let mut d = Designer::default();
    let id = add(&mut d, DROPDOWN);
    let before = serde_json::to_vec(d.fields().get(id).unwrap()).unwrap();

    d.select(id);
    let scratch = d.scratch_mut().unwrap();
    scratch.set(attr::LABEL, "Favourite colour");
    scratch.set_list_from_text(attr::OPTIONS, " , ");

    let CommitOutcome::Rejected(diags) = d.commit_properties().unwrap() else {
        panic!("expected rejection");
    };
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].attribute, attr::OPTIONS);
    assert_eq!(serde_json::to_vec(d.fields().get(id).unwrap()).unwrap(), before);
    assert_eq!(d.properties().errors(), diags.as_slice());

    // fix it and commit again
    d.scratch_mut().unwrap().set_list_from_text(attr::OPTIONS, "Red, Green");
    assert_eq!(d.commit_properties().unwrap(), CommitOutcome::Committed(id));
    let attrs = d.fields().get(id).unwrap().attributes();
    assert_eq!(attrs.text(attr::LABEL), Some("Favourite colour"));
    assert_eq!(attrs.list(attr::OPTIONS), ["Red".to_string(), "Green".to_string()]);
    assert!(d.properties().errors().is_empty());
}

#[test]
fn list_edits_are_invisible_until_commit() {
    let mut d = Designer::default();
    let id = add(&mut d, TABLE);
    d.select(id);
    let scratch = d.scratch_mut().unwrap();
    scratch.add_column();
    scratch.set_column_cell(3, CellKind::Dropdown);
    scratch.set_column_options_from_text(3, "Yes, No");
    scratch.push_item(attr::ROWS, "Row 3");

    let rendered = d.render().unwrap();
    let live_columns = d.fields().get(id).unwrap().attributes().columns(attr::COLUMNS).len();
    assert_eq!(live_columns, 3);
    assert_eq!(rendered.len(), 1);

    d.commit_properties().unwrap();
    let attrs = d.fields().get(id).unwrap().attributes();
    assert_eq!(attrs.columns(attr::COLUMNS).len(), 4);
    assert_eq!(attrs.list(attr::ROWS).len(), 3);
}

#[test]
fn cancel_restores_live_attributes_in_panel() {
    let mut d = Designer::default();
    let id = add(&mut d, TEXT);
    d.select(id);
    d.scratch_mut().unwrap().set(attr::PLACEHOLDER, "e.g. Ada");
    assert!(d.cancel_properties());
    let scratch = d.properties().scratch().unwrap();
    assert_eq!(scratch.attributes().text(attr::PLACEHOLDER), Some("Value here..."));
    assert_eq!(d.fields().get(id).unwrap().attributes().text(attr::PLACEHOLDER), Some("Value here..."));
}

#[test]
fn selecting_another_field_discards_open_edit() {
    let mut d = Designer::default();
    let a = add(&mut d, TEXT);
    let b = add(&mut d, TEXT);
    d.select(a);
    d.scratch_mut().unwrap().set(attr::LABEL, "Unsaved");
    d.select(b);
    assert_eq!(d.properties().editing(), Some(b));
    assert_eq!(d.fields().get(a).unwrap().label(), "Text field");
}

// ─── Selection ──────────────────────────────────────────────────────────

#[test]
fn removing_selected_field_clears_selection() {
    let mut d = Designer::default();
    let x = add(&mut d, TEXT);
    d.select(x);
    assert_eq!(d.panel(), Panel::Properties(x));
    assert!(d.delete(x));
    assert_eq!(d.selected(), None);
    assert_eq!(d.panel(), Panel::Palette);
    assert!(!d.properties().is_open());
}

#[test]
fn selecting_unknown_field_is_absorbed() {
    let mut d = Designer::default();
    assert!(!d.select(FieldId::intern("pc_nowhere")));
    assert_eq!(d.panel(), Panel::Palette);
}

// ─── Required-field law ─────────────────────────────────────────────────

#[test]
fn required_text_law() {
    let registry = FieldRegistry::with_builtins();
    let mut field = registry
        .construct(FieldKind::intern(TEXT), FieldId::intern("pc_req_text"))
        .unwrap();
    let mut d = Designer::default();
    d.load(vec![(&field).into()]).unwrap();
    d.select(field.id());
    d.scratch_mut().unwrap().set(attr::REQUIRED, true);
    d.commit_properties().unwrap();
    field = d.fields().get(field.id()).unwrap().clone();

    assert!(!registry.validate(&field, &FieldValue::from("")).unwrap());
    assert!(registry.validate(&field, &FieldValue::from("x")).unwrap());
}

#[test]
fn required_dropdown_law() {
    let mut d = Designer::default();
    let id = add(&mut d, DROPDOWN);
    d.select(id);
    let scratch = d.scratch_mut().unwrap();
    scratch.set(attr::REQUIRED, true);
    scratch.set_list_from_text(attr::OPTIONS, "Red, Green");
    d.commit_properties().unwrap();

    d.toggle_mode();
    assert_eq!(d.mode(), Mode::Preview);
    assert!(!d.submit_value(id, FieldValue::from("")).unwrap());
    assert!(d.preview().is_invalid(id));
    assert!(d.submit_value(id, FieldValue::from("Green")).unwrap());
    assert!(!d.preview().is_invalid(id));
    assert!(d.submit_form().unwrap());
}

#[test]
fn preview_submit_flags_every_missing_answer() {
    let mut d = Designer::default();
    let a = add(&mut d, TEXT);
    let b = add(&mut d, TABLE);
    for id in [a, b] {
        d.select(id);
        d.scratch_mut().unwrap().set(attr::REQUIRED, true);
        d.commit_properties().unwrap();
    }
    d.clear_selection();
    d.toggle_mode();
    assert!(!d.submit_form().unwrap());
    assert!(d.preview().is_invalid(a));
    assert!(d.preview().is_invalid(b));

    let html = d.render_html().unwrap();
    assert!(html.contains("fb-invalid"));
}
