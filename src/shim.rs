//! Marker-preserving adapters for host text normalization.
//!
//! Host components normalize some of their text (docstring-style dedenting of
//! Markdown bodies, for instance). Those normalizers work on `&str` and return
//! a fresh `String`, which would drop the translatable marker. Components run
//! their normalizers through [`preserve_marker`] instead of calling them
//! directly.

use crate::marker::Text;

/// Tab stop used by [`cleandoc`].
const TAB_SIZE: usize = 8;

/// Wraps a `&str -> String` normalizer so that marked input yields marked
/// output.
///
/// ```
/// use ui_i18n::marker::Text;
/// use ui_i18n::shim::{cleandoc, preserve_marker};
///
/// let clean = preserve_marker(cleandoc);
/// let out = clean(&Text::i18n("  Title\n    body"));
/// assert!(out.is_i18n());
/// assert_eq!(out.as_str(), "Title\nbody");
/// ```
pub fn preserve_marker<F>(normalize: F) -> impl Fn(&Text) -> Text
where
    F: Fn(&str) -> String,
{
    move |text| {
        let normalized = normalize(text.as_str());
        if text.is_i18n() { Text::i18n(normalized) } else { Text::plain(normalized) }
    }
}

/// Cleans up indentation of a docstring-like block of text.
///
/// Tabs are expanded, leading whitespace of the first line is removed, the
/// common indentation of the remaining lines is removed, and blank lines at
/// the start and end are dropped.
#[must_use]
pub fn cleandoc(doc: &str) -> String {
    let expanded = expand_tabs(doc);
    let mut lines: Vec<&str> = expanded.lines().collect();
    if lines.is_empty() {
        return String::new();
    }

    // Without any indented content every later line is blank and strips to "".
    let margin = lines
        .iter()
        .skip(1)
        .filter(|line| !line.trim_start().is_empty())
        .map(|line| line.len() - line.trim_start().len())
        .min();

    let mut cleaned: Vec<String> = Vec::with_capacity(lines.len());
    let first = lines.remove(0);
    cleaned.push(first.trim_start().to_string());
    for line in lines {
        let dedented = margin.map_or("", |margin| line.get(margin..).unwrap_or_else(|| line.trim_start()));
        cleaned.push(dedented.to_string());
    }

    while cleaned.last().is_some_and(String::is_empty) {
        cleaned.pop();
    }
    let start = cleaned.iter().take_while(|line| line.is_empty()).count();

    cleaned.split_off(start).join("\n")
}

/// Expands tabs to [`TAB_SIZE`] columns, line by line.
fn expand_tabs(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut column = 0;
    for ch in text.chars() {
        match ch {
            '\t' => {
                let pad = TAB_SIZE - column % TAB_SIZE;
                out.extend(std::iter::repeat_n(' ', pad));
                column += pad;
            }
            '\n' | '\r' => {
                out.push(ch);
                column = 0;
            }
            _ => {
                out.push(ch);
                column += 1;
            }
        }
    }
    out
}
