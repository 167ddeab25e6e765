//! Building translation tables from the strings found in a tree.

use crate::discovery::i18n_texts;
use crate::host::Block;
use crate::input::translation::TranslationTable;

/// Builds a table covering exactly `langs` for every translatable string of
/// the subtree.
///
/// Known translations are carried over from `existing`; anything else maps to
/// itself, leaving a placeholder for a translator to fill in.
#[must_use]
pub fn dump_blocks<S: AsRef<str>>(
    root: &Block,
    langs: &[S],
    existing: Option<&TranslationTable>,
) -> TranslationTable {
    let texts = i18n_texts(root);
    let mut table = TranslationTable::new();

    for lang in langs.iter().map(AsRef::as_ref) {
        let strings = table.add_language(lang);
        for text in &texts {
            let key = text.as_str();
            let value = existing.and_then(|existing| existing.get(lang, key)).unwrap_or(key);
            strings.insert(key.to_string(), value.to_string());
        }
    }

    tracing::debug!("Dumped {} strings for {} languages", texts.len(), langs.len());
    table
}
