//! Structural schema checks for field properties.
//!
//! Field types compose these rules in their `check_properties` capability.
//! Checks only report; they never modify the attributes they inspect.

use crate::config::SchemaLimits;
use crate::model::{Attributes, CellKind, attr};
use std::fmt;

// ─── Diagnostic types ────────────────────────────────────────────────────

/// A single failed property check, addressed to one attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyDiagnostic {
    /// Attribute the message belongs to (e.g. `label`, `options`).
    pub attribute: String,
    /// Human-readable message.
    pub message: String,
    /// Short rule identifier (e.g. "label-length", "empty-options").
    pub rule: &'static str,
}

impl PropertyDiagnostic {
    pub fn new(attribute: &str, message: impl Into<String>, rule: &'static str) -> Self {
        Self {
            attribute: attribute.to_string(),
            message: message.into(),
            rule,
        }
    }
}

impl fmt::Display for PropertyDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.attribute, self.message)
    }
}

// ─── Rules ────────────────────────────────────────────────────────────────

/// Label must be a string within `[label_min, label_max]` characters.
pub fn check_label(attrs: &Attributes, limits: &SchemaLimits, diags: &mut Vec<PropertyDiagnostic>) {
    let len = attrs.text(attr::LABEL).map_or(0, |s| s.chars().count());
    if len < limits.label_min {
        diags.push(PropertyDiagnostic::new(
            attr::LABEL,
            format!("Label must be at least {} characters.", limits.label_min),
            "label-length",
        ));
    } else if len > limits.label_max {
        diags.push(PropertyDiagnostic::new(
            attr::LABEL,
            format!("Label must be at most {} characters.", limits.label_max),
            "label-length",
        ));
    }
}

/// Optional text attribute capped at `max` characters.
pub fn check_max_chars(
    attrs: &Attributes,
    key: &str,
    max: usize,
    diags: &mut Vec<PropertyDiagnostic>,
) {
    if let Some(text) = attrs.text(key)
        && text.chars().count() > max
    {
        diags.push(PropertyDiagnostic::new(
            key,
            format!("Must be at most {max} characters."),
            "text-too-long",
        ));
    }
}

/// `required` must be a boolean when present.
pub fn check_required_flag(attrs: &Attributes, diags: &mut Vec<PropertyDiagnostic>) {
    if let Some(value) = attrs.get(attr::REQUIRED)
        && value.as_bool().is_none()
    {
        diags.push(PropertyDiagnostic::new(
            attr::REQUIRED,
            "Required must be on or off.",
            "required-flag",
        ));
    }
}

/// `minLength`/`maxLength` must be non-negative, and min ≤ max when both are set.
pub fn check_length_bounds(attrs: &Attributes, diags: &mut Vec<PropertyDiagnostic>) {
    let min = attrs.get(attr::MIN_LENGTH).filter(|v| !v.is_null());
    let max = attrs.get(attr::MAX_LENGTH).filter(|v| !v.is_null());

    let min = match min.map(|v| v.as_int()) {
        Some(Some(n)) if n < 0 => {
            diags.push(PropertyDiagnostic::new(
                attr::MIN_LENGTH,
                "Min length cannot be negative.",
                "length-bounds",
            ));
            None
        }
        Some(None) => {
            diags.push(PropertyDiagnostic::new(
                attr::MIN_LENGTH,
                "Min length must be a whole number.",
                "length-bounds",
            ));
            None
        }
        Some(n) => n,
        None => None,
    };
    let max = match max.map(|v| v.as_int()) {
        Some(Some(n)) if n < 1 => {
            diags.push(PropertyDiagnostic::new(
                attr::MAX_LENGTH,
                "Max length must be at least 1.",
                "length-bounds",
            ));
            None
        }
        Some(None) => {
            diags.push(PropertyDiagnostic::new(
                attr::MAX_LENGTH,
                "Max length must be a whole number.",
                "length-bounds",
            ));
            None
        }
        Some(n) => n,
        None => None,
    };

    if let (Some(min), Some(max)) = (min, max)
        && min > max
    {
        diags.push(PropertyDiagnostic::new(
            attr::MIN_LENGTH,
            "Min length cannot exceed max length.",
            "length-bounds",
        ));
    }
}

/// A list attribute must hold at least one item, and no item may be blank.
pub fn check_non_empty_list(
    attrs: &Attributes,
    key: &str,
    what: &str,
    diags: &mut Vec<PropertyDiagnostic>,
) {
    let items = attrs.list(key);
    if items.is_empty() {
        diags.push(PropertyDiagnostic::new(
            key,
            format!("At least one {what} is required."),
            "empty-list",
        ));
    } else if items.iter().any(|item| item.trim().is_empty()) {
        diags.push(PropertyDiagnostic::new(
            key,
            format!("Every {what} needs a name."),
            "blank-item",
        ));
    }
}

/// Table columns: at least one, each named, and dropdown cells need options.
pub fn check_columns(attrs: &Attributes, diags: &mut Vec<PropertyDiagnostic>) {
    let columns = attrs.columns(attr::COLUMNS);
    if columns.is_empty() {
        diags.push(PropertyDiagnostic::new(
            attr::COLUMNS,
            "At least one column is required.",
            "empty-list",
        ));
        return;
    }
    for (i, col) in columns.iter().enumerate() {
        if col.name.trim().is_empty() {
            diags.push(PropertyDiagnostic::new(
                attr::COLUMNS,
                format!("Column {} needs a name.", i + 1),
                "blank-item",
            ));
        }
        if col.cell == CellKind::Dropdown && col.options.is_empty() {
            diags.push(PropertyDiagnostic::new(
                attr::COLUMNS,
                format!("Column `{}` needs at least one option.", col.name),
                "empty-cell-options",
            ));
        }
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ColumnSpec;

    fn run(attrs: &Attributes, rule: fn(&Attributes, &mut Vec<PropertyDiagnostic>)) -> Vec<PropertyDiagnostic> {
        let mut diags = Vec::new();
        rule(attrs, &mut diags);
        diags
    }

    #[test]
    fn label_bounds() {
        let limits = SchemaLimits::default();
        let mut diags = Vec::new();
        check_label(&Attributes::new().with(attr::LABEL, "A"), &limits, &mut diags);
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].rule, "label-length");

        diags.clear();
        check_label(&Attributes::new().with(attr::LABEL, "x".repeat(51)), &limits, &mut diags);
        assert_eq!(diags.len(), 1);

        diags.clear();
        check_label(&Attributes::new().with(attr::LABEL, "Email"), &limits, &mut diags);
        assert!(diags.is_empty());
    }

    #[test]
    fn min_above_max_is_reported() {
        let attrs = Attributes::new()
            .with(attr::MIN_LENGTH, 10_i64)
            .with(attr::MAX_LENGTH, 5_i64);
        let diags = run(&attrs, check_length_bounds);
        assert!(diags.iter().any(|d| d.message.contains("cannot exceed")));
    }

    #[test]
    fn absent_length_bounds_pass() {
        assert!(run(&Attributes::new(), check_length_bounds).is_empty());
        let attrs = Attributes::new().with(attr::MIN_LENGTH, 3_i64);
        assert!(run(&attrs, check_length_bounds).is_empty());
    }

    #[test]
    fn empty_option_list_is_reported() {
        let attrs = Attributes::new().with(attr::OPTIONS, Vec::<String>::new());
        let mut diags = Vec::new();
        check_non_empty_list(&attrs, attr::OPTIONS, "option", &mut diags);
        assert_eq!(diags[0].rule, "empty-list");
    }

    #[test]
    fn dropdown_column_without_options_is_reported() {
        let attrs = Attributes::new().with(
            attr::COLUMNS,
            vec![
                ColumnSpec::text("Name"),
                ColumnSpec::dropdown("Grade", Vec::<String>::new()),
            ],
        );
        let diags = run(&attrs, check_columns);
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].rule, "empty-cell-options");
    }

    #[test]
    fn non_boolean_required_is_reported() {
        let attrs = Attributes::new().with(attr::REQUIRED, "yes");
        assert_eq!(run(&attrs, check_required_flag).len(), 1);
    }
}
