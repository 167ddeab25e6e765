//! Detection of discovered strings missing from a translation table.

use crate::discovery::i18n_texts;
use crate::host::Block;
use crate::input::translation::TranslationTable;

/// Whether any translatable string of the subtree is missing from `table`
/// for any of `langs`.
///
/// Only keys are checked: an entry whose translation equals its key counts
/// as present.
#[must_use]
pub fn has_new_i18n_fields<S: AsRef<str>>(
    root: &Block,
    langs: &[S],
    table: &TranslationTable,
) -> bool {
    let texts = i18n_texts(root);
    let missing = langs.iter().map(AsRef::as_ref).find_map(|lang| {
        texts.iter().find(|text| !table.contains(lang, text.as_str())).map(|text| (lang, text))
    });

    if let Some((lang, text)) = missing {
        tracing::debug!("Untranslated string for '{lang}': {:?}", text.as_str());
        return true;
    }
    false
}
