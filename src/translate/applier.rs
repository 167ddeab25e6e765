//! Wiring of translation tables into a block tree.

use crate::discovery::{
    I18nBlock,
    I18nField,
    snapshot,
};
use crate::host::{
    BlockId,
    Blocks,
    Choice,
    HostError,
    PropValue,
    Update,
};
use crate::input::TranslationTable;
use crate::marker::Text;

use super::TranslateError;

/// Language used when nothing else is known.
pub const DEFAULT_LANGUAGE: &str = "en";

/// Picks the language of a page from its `Accept-Language` header.
///
/// Only the first preference counts. Its quality parameter and region are
/// dropped, so `"fr-CA,fr;q=0.9"` gives `"fr"`.
#[must_use]
pub fn preferred_language(header: Option<&str>, default: &str) -> String {
    header
        .and_then(|value| value.split(',').next())
        .and_then(|preference| preference.split(';').next())
        .and_then(|tag| tag.trim().split(['-', '_']).next())
        .filter(|lang| !lang.is_empty() && *lang != "*")
        .map_or_else(|| default.to_string(), str::to_lowercase)
}

/// Translates the choices of one component.
///
/// A marked bare entry becomes a pair so that the selected value stays the
/// original key.
fn translate_choices(choices: &[Choice], table: &TranslationTable, lang: &str) -> Vec<Choice> {
    choices
        .iter()
        .map(|choice| match choice {
            Choice::Single(text) if text.is_i18n() => {
                Choice::pair(table.translate(lang, text.as_str()), text.as_str())
            }
            Choice::Pair(text, value) if text.is_i18n() => {
                Choice::Pair(Text::plain(table.translate(lang, text.as_str())), value.clone())
            }
            other => other.clone(),
        })
        .collect()
}

/// One update per component, in order, translating every captured field
/// into `lang`.
#[must_use]
pub fn rebuild_updates(
    components: &[I18nBlock],
    table: &TranslationTable,
    lang: &str,
) -> Vec<Update> {
    components
        .iter()
        .map(|component| {
            let mut update = Update::new();
            for field in component.fields() {
                match field {
                    I18nField::Prop { name, text } => {
                        update.set_prop(name.clone(), table.translate(lang, text.as_str()));
                    }
                    I18nField::Choices(choices) => {
                        update.set_choices(translate_choices(choices, table, lang));
                    }
                }
            }
            update
        })
        .collect()
}

/// Whether the selector `lang` itself holds a marked value.
///
/// Works for state slots and for blocks anywhere in the tree. The `value` of a
/// block with `choices` is a selection, never translated.
fn has_i18n_value(blocks: &Blocks, lang: BlockId) -> bool {
    if blocks.find(lang).is_some_and(|block| block.get_choices().is_some()) {
        return false;
    }
    blocks.value(lang).is_some_and(PropValue::is_i18n)
}

/// [`translate_blocks_with_default`] falling back to [`DEFAULT_LANGUAGE`].
///
/// # Errors
/// See [`translate_blocks_with_default`].
pub fn translate_blocks(
    blocks: &mut Blocks,
    container: Option<BlockId>,
    table: TranslationTable,
    lang: Option<BlockId>,
) -> Result<BlockId, TranslateError> {
    translate_blocks_with_default(blocks, container, table, lang, DEFAULT_LANGUAGE)
}

/// Makes every translatable component under `container` follow the value of
/// the language selector `lang`.
///
/// `container` defaults to the root and `lang` to a new state slot. On page
/// load the selector is set from the request's `Accept-Language` header, or
/// to `default_language`. Returns the selector.
///
/// # Errors
/// - `container` is unknown or not a container
/// - `lang` is unknown, or is itself a component with a translatable value
pub fn translate_blocks_with_default(
    blocks: &mut Blocks,
    container: Option<BlockId>,
    table: TranslationTable,
    lang: Option<BlockId>,
    default_language: &str,
) -> Result<BlockId, TranslateError> {
    let container = container.unwrap_or_else(|| blocks.root().id());
    let root = blocks.find(container).ok_or(HostError::UnknownBlock(container))?;
    if !root.is_container() {
        return Err(HostError::NotAContainer(container).into());
    }

    let components = snapshot(root);
    if let Some(lang) = lang
        && has_i18n_value(blocks, lang)
    {
        return Err(TranslateError::SelfReferentialSelector(lang));
    }

    let lang = match lang {
        Some(lang) if blocks.contains(lang) => lang,
        Some(lang) => return Err(HostError::UnknownBlock(lang).into()),
        None => blocks.state(PropValue::null()),
    };
    tracing::debug!(
        "Translating {} components under {} with selector {}",
        components.len(),
        container,
        lang
    );

    let default_language = default_language.to_string();
    blocks.on_load(lang, move |request| {
        PropValue::from(preferred_language(request.accept_language(), &default_language))
    })?;

    let outputs = components.iter().map(I18nBlock::id).collect();
    blocks.on_change(lang, outputs, move |value| {
        let code = value.as_str().unwrap_or_default();
        if code.is_empty() {
            tracing::warn!("Language selector has no value, keeping original strings");
        }
        rebuild_updates(&components, &table, code)
    })?;

    Ok(lang)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use googletest::prelude::*;
    use rstest::rstest;
    use serde_json::json;

    use super::*;
    use crate::host::{
        Block,
        Request,
    };
    use crate::marker::gettext;
    use crate::test_utils::{
        create_form,
        create_table,
    };

    fn label_of(blocks: &Blocks, id: BlockId) -> Option<String> {
        blocks.find(id)?.get_prop("label")?.as_str().map(str::to_string)
    }

    fn french() -> TranslationTable {
        let mut table = TranslationTable::new();
        table.insert("fr", "Name", "Nom");
        table.insert("fr", "Red", "Rouge");
        table.insert("fr", "Yes", "Oui");
        table
    }

    #[rstest]
    #[case::region_and_quality(Some("fr-CA,fr;q=0.9,en;q=0.8"), "fr")]
    #[case::upper_case(Some("DE"), "de")]
    #[case::quality_only(Some("ja;q=0.7"), "ja")]
    #[case::underscore(Some("pt_BR"), "pt")]
    #[case::wildcard(Some("*"), "en")]
    #[case::empty(Some(""), "en")]
    #[case::missing(None, "en")]
    fn accept_language(#[case] header: Option<&str>, #[case] expected: &str) {
        assert_that!(preferred_language(header, DEFAULT_LANGUAGE), eq(expected));
    }

    #[googletest::test]
    fn rebuild_translates_props() {
        let block = Block::textbox(gettext("Name")).text_prop("info", gettext("Missing"));
        let components = snapshot(&Block::column().child(block));

        let updates = rebuild_updates(&components, &french(), "fr");

        expect_that!(updates.len(), eq(1));
        expect_that!(updates.first().and_then(|u| u.prop("label")), some(eq(&PropValue::from("Nom"))));
        expect_that!(
            updates.first().and_then(|u| u.prop("info")),
            some(eq(&PropValue::from("Missing")))
        );
    }

    #[googletest::test]
    fn rebuild_preserves_choice_values() {
        let block = Block::dropdown("Color", [
            Choice::from(gettext("Red")),
            Choice::pair(gettext("Yes"), json!(1)),
            Choice::pair("Blue", "blue"),
            Choice::from("Green"),
        ]);
        let components = snapshot(&Block::column().child(block));

        let updates = rebuild_updates(&components, &french(), "fr");

        expect_that!(
            updates.first().and_then(Update::choices),
            some(elements_are![
                eq(&Choice::pair("Rouge", "Red")),
                eq(&Choice::pair("Oui", json!(1))),
                eq(&Choice::pair("Blue", "blue")),
                eq(&Choice::from("Green"))
            ])
        );
    }

    #[googletest::test]
    fn opaque_choices_pass_through() {
        let block = Block::radio(gettext("Answer"), [
            Choice::Opaque(json!(1)),
            Choice::pair(gettext("Yes"), json!(2)),
            Choice::Opaque(json!([3, "three"])),
        ]);
        let components = snapshot(&Block::column().child(block));

        let updates = rebuild_updates(&components, &french(), "fr");

        expect_that!(
            updates.first().and_then(Update::choices),
            some(elements_are![
                eq(&Choice::Opaque(json!(1))),
                eq(&Choice::pair("Oui", json!(2))),
                eq(&Choice::Opaque(json!([3, "three"])))
            ])
        );
    }

    #[googletest::test]
    fn unknown_language_is_identity() {
        let root = Block::column()
            .child(Block::textbox(gettext("Name")))
            .child(Block::radio(gettext("Answer"), [gettext("Yes")]));
        let components = snapshot(&root);

        let updates = rebuild_updates(&components, &french(), "xx");

        expect_that!(
            updates.first().and_then(|u| u.prop("label")),
            some(eq(&PropValue::from("Name")))
        );
        expect_that!(
            updates.get(1).and_then(Update::choices),
            some(elements_are![eq(&Choice::pair("Yes", "Yes"))])
        );
    }

    #[googletest::test]
    fn selector_change_relabels_tree() {
        let mut blocks = Blocks::new();
        let root = blocks.root().id();
        let name = blocks.add(root, Block::textbox(gettext("Name"))).unwrap();

        let lang = translate_blocks(&mut blocks, None, french(), None).unwrap();
        blocks.set_value(lang, "fr").unwrap();
        expect_that!(label_of(&blocks, name), some(eq("Nom")));

        blocks.set_value(lang, "en").unwrap();
        expect_that!(label_of(&blocks, name), some(eq("Name")));
    }

    #[googletest::test]
    fn page_load_uses_accept_language() {
        let mut blocks = Blocks::new();
        let root = blocks.root().id();
        let name = blocks.add(root, Block::textbox(gettext("Name"))).unwrap();
        let lang = translate_blocks(&mut blocks, None, french(), None).unwrap();

        blocks.load(&Request::new().with_header("Accept-Language", "fr-FR,en;q=0.5")).unwrap();

        expect_that!(blocks.value(lang).and_then(PropValue::as_str), some(eq("fr")));
        expect_that!(label_of(&blocks, name), some(eq("Nom")));
    }

    #[googletest::test]
    fn page_load_without_header_uses_default() {
        let mut blocks = Blocks::new();
        let root = blocks.root().id();
        blocks.add(root, Block::textbox(gettext("Name"))).unwrap();
        let lang =
            translate_blocks_with_default(&mut blocks, None, french(), None, "fr").unwrap();

        blocks.load(&Request::new()).unwrap();

        expect_that!(blocks.value(lang).and_then(PropValue::as_str), some(eq("fr")));
    }

    #[googletest::test]
    fn selector_with_translatable_value_is_rejected() {
        let mut blocks = Blocks::new();
        let root = blocks.root().id();
        let selector = blocks.add(root, Block::textbox("Language").prop("value", gettext("en"))).unwrap();

        let result = translate_blocks(&mut blocks, None, french(), Some(selector));

        assert!(matches!(result, Err(TranslateError::SelfReferentialSelector(id)) if id == selector));
    }

    #[googletest::test]
    fn state_selector_with_translatable_value_is_rejected() {
        let mut blocks = Blocks::new();
        let root = blocks.root().id();
        blocks.add(root, Block::textbox(gettext("Name"))).unwrap();
        let selector = blocks.state(gettext("en"));

        let result = translate_blocks(&mut blocks, None, french(), Some(selector));

        assert!(matches!(result, Err(TranslateError::SelfReferentialSelector(id)) if id == selector));
    }

    #[googletest::test]
    fn selector_outside_container_with_translatable_value_is_rejected() {
        let mut blocks = Blocks::new();
        let root = blocks.root().id();
        let selector = blocks.add(root, Block::textbox("Language").prop("value", gettext("en"))).unwrap();
        let column = blocks.add(root, Block::column()).unwrap();
        blocks.add(column, Block::textbox(gettext("Name"))).unwrap();

        let result = translate_blocks(&mut blocks, Some(column), french(), Some(selector));

        assert!(matches!(result, Err(TranslateError::SelfReferentialSelector(id)) if id == selector));
        // Nothing was wired: changing the selector leaves the tree alone.
        blocks.set_value(selector, "fr").unwrap();
        expect_that!(label_of(&blocks, selector), some(eq("Language")));
    }

    #[googletest::test]
    fn dropdown_selector_inside_tree_is_allowed() {
        let mut blocks = Blocks::new();
        let root = blocks.root().id();
        let selector = blocks
            .add(root, Block::dropdown(gettext("Language"), ["en", "fr"]).prop("value", "en"))
            .unwrap();

        let lang = translate_blocks(&mut blocks, None, french(), Some(selector)).unwrap();
        blocks.set_value(lang, "fr").unwrap();

        expect_that!(lang, eq(selector));
        expect_that!(blocks.value(selector).and_then(PropValue::as_str), some(eq("fr")));
    }

    #[googletest::test]
    fn leaf_target_is_rejected() {
        let mut blocks = Blocks::new();
        let root = blocks.root().id();
        let leaf = blocks.add(root, Block::textbox(gettext("Name"))).unwrap();

        let result = translate_blocks(&mut blocks, Some(leaf), french(), None);

        assert!(matches!(result, Err(TranslateError::Host(HostError::NotAContainer(id))) if id == leaf));
    }

    #[googletest::test]
    fn unknown_selector_is_rejected() {
        let mut blocks = Blocks::new();
        let stray = BlockId::next();

        let result = translate_blocks(&mut blocks, None, french(), Some(stray));

        assert!(matches!(result, Err(TranslateError::Host(HostError::UnknownBlock(id))) if id == stray));
    }

    #[googletest::test]
    fn switching_back_restores_the_original_form() {
        let form = create_form();
        let original = form.clone();
        let mut blocks = Blocks::from_root(form).unwrap();
        let table = create_table(&[
            ("fr", "Welcome", "Bienvenue"),
            ("fr", "Answer", "Réponse"),
            ("fr", "Yes", "Oui"),
        ]);
        let lang = translate_blocks(&mut blocks, None, table, None).unwrap();

        blocks.set_value(lang, "fr").unwrap();
        blocks.set_value(lang, "en").unwrap();

        let ids: Vec<BlockId> =
            crate::discovery::i18n_blocks(&original).into_iter().map(Block::id).collect();
        let texts = |root: &Block| -> Vec<String> {
            ids.iter()
                .filter_map(|id| root.find(*id))
                .flat_map(|block| {
                    let props = block.props().values().filter_map(PropValue::as_str);
                    let choices = block.get_choices().unwrap_or_default().iter().filter_map(|c| c.display()).map(Text::as_str);
                    props.chain(choices).map(str::to_string).collect::<Vec<_>>()
                })
                .collect()
        };
        expect_that!(texts(blocks.root()), eq(&texts(&original)));
        expect_that!(
            blocks.root().children().and_then(|c| c.get(1)).and_then(|b| b.get_prop("value")),
            some(eq(&PropValue::from("Ada")))
        );
    }

    #[googletest::test]
    fn rebuild_starts_from_original_keys() {
        let mut blocks = Blocks::new();
        let root = blocks.root().id();
        let color = blocks.add(root, Block::dropdown(gettext("Color"), [gettext("Red")])).unwrap();
        let lang = translate_blocks(&mut blocks, None, french(), None).unwrap();

        blocks.set_value(lang, "fr").unwrap();
        blocks.set_value(lang, "de").unwrap();

        expect_that!(
            blocks.find(color).and_then(Block::get_choices),
            some(elements_are![eq(&Choice::pair("Red", "Red"))])
        );
    }
}
