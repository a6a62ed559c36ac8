//! Comma-separated list syntax used by the properties panel
//! (`Column 1, Column 2, Column 3`).
//!
//! Built on `winnow` 0.7. Items are trimmed and blank items dropped, so
//! `"a,, b ,"` reads as `["a", "b"]`.

use winnow::combinator::separated;
use winnow::prelude::*;
use winnow::token::take_till;

fn parse_item<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    take_till(0.., ',').parse_next(input)
}

/// Split comma-separated text into trimmed, non-empty items.
#[must_use]
pub fn parse_list(text: &str) -> Vec<String> {
    let mut rest = text;
    let parsed: ModalResult<Vec<&str>> = separated(0.., parse_item, ',').parse_next(&mut rest);
    parsed
        .unwrap_or_default()
        .into_iter()
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Join items back into the editable text form.
#[must_use]
pub fn emit_list<S: AsRef<str>>(items: &[S]) -> String {
    items
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(", ")
}
