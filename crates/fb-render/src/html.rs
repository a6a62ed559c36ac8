//! Widget tree → HTML fragment, for the preview dialog and static export.

use fb_core::list::emit_list;
use fb_core::model::CellKind;
use fb_core::widget::{SELECT_PLACEHOLDER, Widget};
use std::fmt::{self, Formatter};

/// Display adapter that writes a widget list as HTML.
#[derive(Debug, Clone, Copy)]
pub struct Html<'a>(pub &'a [Widget]);

impl fmt::Display for Html<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for widget in self.0 {
            render_widget(f, widget, 0)?;
        }
        Ok(())
    }
}

pub fn render_html(widgets: &[Widget]) -> String {
    Html(widgets).to_string()
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn indent(out: &mut Formatter<'_>, depth: usize) -> fmt::Result {
    for _ in 0..depth {
        out.write_str("  ")?;
    }
    Ok(())
}

fn class(base: &str, invalid: bool) -> String {
    if invalid {
        format!("{base} fb-invalid")
    } else {
        base.to_string()
    }
}

fn flag(name: &str, on: bool) -> &str {
    if on { name } else { "" }
}

fn render_widget(out: &mut Formatter<'_>, widget: &Widget, depth: usize) -> fmt::Result {
    indent(out, depth)?;
    match widget {
        Widget::Stack { field, children } => {
            match field {
                Some(id) => writeln!(out, "<div class=\"fb-field\" data-field=\"{}\">", escape(id.as_str()))?,
                None => out.write_str("<div class=\"fb-stack\">\n")?,
            }
            for child in children {
                render_widget(out, child, depth + 1)?;
            }
            indent(out, depth)?;
            writeln!(out, "</div>")
        }
        Widget::Label {
            text,
            required,
            invalid,
        } => {
            let marker = if *required {
                "<span class=\"fb-required\">*</span>"
            } else {
                ""
            };
            writeln!(
                out,
                "<label class=\"{}\">{}{marker}</label>",
                class("fb-label", *invalid),
                escape(text)
            )
        }
        Widget::HelperText { text, invalid } => writeln!(
            out,
            "<p class=\"{}\">{}</p>",
            class("fb-helper", *invalid),
            escape(text)
        ),
        Widget::TextInput {
            value,
            placeholder,
            disabled,
            invalid,
            max_length,
        } => {
            let max = max_length
                .map(|n| format!(" maxlength=\"{n}\""))
                .unwrap_or_default();
            writeln!(
                out,
                "<input type=\"text\" value=\"{}\" placeholder=\"{}\"{max}{}{} />",
                escape(value),
                escape(placeholder),
                flag(" disabled", *disabled),
                flag(" aria-invalid=\"true\"", *invalid),
            )
        }
        Widget::Select {
            options,
            selected,
            disabled,
            invalid,
        } => render_select(out, options, selected.as_deref(), *disabled, *invalid, depth),
        Widget::Table { columns, rows } => {
            out.write_str("<table class=\"fb-table\">\n")?;
            indent(out, depth + 1)?;
            out.write_str("<thead><tr><th></th>")?;
            for col in columns {
                write!(out, "<th>{}</th>", escape(col))?;
            }
            out.write_str("</tr></thead>\n")?;
            indent(out, depth + 1)?;
            out.write_str("<tbody>\n")?;
            for row in rows {
                indent(out, depth + 2)?;
                writeln!(out, "<tr><th>{}</th>", escape(&row.label))?;
                for cell in &row.cells {
                    indent(out, depth + 3)?;
                    out.write_str("<td>\n")?;
                    render_widget(out, cell, depth + 4)?;
                    indent(out, depth + 3)?;
                    out.write_str("</td>\n")?;
                }
                indent(out, depth + 2)?;
                out.write_str("</tr>\n")?;
            }
            indent(out, depth + 1)?;
            out.write_str("</tbody>\n")?;
            indent(out, depth)?;
            writeln!(out, "</table>")
        }
        Widget::PropertyText { key, label, value } => writeln!(
            out,
            "<label class=\"fb-prop\">{}<input type=\"text\" name=\"{}\" value=\"{}\" /></label>",
            escape(label),
            escape(key),
            escape(value)
        ),
        Widget::PropertyNumber { key, label, value } => {
            let value = value.map(|n| n.to_string()).unwrap_or_default();
            writeln!(
                out,
                "<label class=\"fb-prop\">{}<input type=\"number\" name=\"{}\" value=\"{value}\" /></label>",
                escape(label),
                escape(key)
            )
        }
        Widget::PropertyToggle { key, label, value } => writeln!(
            out,
            "<label class=\"fb-prop\"><input type=\"checkbox\" name=\"{}\"{} />{}</label>",
            escape(key),
            flag(" checked", *value),
            escape(label)
        ),
        Widget::PropertyList {
            key,
            label,
            items,
            can_remove,
        } => {
            let items: Vec<String> = items.iter().map(|i| escape(i)).collect();
            render_list_editor(out, key, label, &items, *can_remove, depth)
        }
        Widget::PropertyColumns {
            key,
            label,
            columns,
            can_remove,
        } => {
            let items: Vec<String> = columns
                .iter()
                .map(|col| match col.cell {
                    CellKind::Text => format!("{} <em>text</em>", escape(&col.name)),
                    CellKind::Dropdown => format!(
                        "{} <em>dropdown: {}</em>",
                        escape(&col.name),
                        escape(&emit_list(col.options.as_slice()))
                    ),
                })
                .collect();
            render_list_editor(out, key, label, &items, *can_remove, depth)
        }
        Widget::ErrorMessage { attribute, text } => writeln!(
            out,
            "<p class=\"fb-error\" data-attribute=\"{}\">{}</p>",
            escape(attribute),
            escape(text)
        ),
    }
}

fn render_select(
    out: &mut Formatter<'_>,
    options: &[String],
    selected: Option<&str>,
    disabled: bool,
    invalid: bool,
    depth: usize,
) -> fmt::Result {
    writeln!(
        out,
        "<select{}{}>",
        flag(" disabled", disabled),
        flag(" aria-invalid=\"true\"", invalid)
    )?;
    indent(out, depth + 1)?;
    writeln!(
        out,
        "<option value=\"\" disabled{}>{SELECT_PLACEHOLDER}</option>",
        flag(" selected", selected.is_none())
    )?;
    for option in options {
        indent(out, depth + 1)?;
        writeln!(
            out,
            "<option value=\"{0}\"{1}>{0}</option>",
            escape(option),
            flag(" selected", selected == Some(option.as_str()))
        )?;
    }
    indent(out, depth)?;
    out.write_str("</select>\n")
}

/// `items` are already escaped.
fn render_list_editor(
    out: &mut Formatter<'_>,
    key: &str,
    label: &str,
    items: &[String],
    can_remove: bool,
    depth: usize,
) -> fmt::Result {
    writeln!(out, "<fieldset class=\"fb-prop-list\" data-key=\"{}\">", escape(key))?;
    indent(out, depth + 1)?;
    writeln!(out, "<legend>{}</legend>", escape(label))?;
    for item in items {
        indent(out, depth + 1)?;
        let remove = if can_remove {
            "<button data-action=\"remove\">×</button>"
        } else {
            "<button data-action=\"remove\" disabled>×</button>"
        };
        writeln!(out, "<div class=\"fb-prop-item\">{item}{remove}</div>")?;
    }
    indent(out, depth + 1)?;
    out.write_str("<button data-action=\"add\">Add</button>\n")?;
    indent(out, depth)?;
    out.write_str("</fieldset>\n")
}
