//! Discovery of translatable content in a block tree.
//!
//! Discovery order is deterministic: children are visited before their parent,
//! props in insertion order, and `choices` last. Consumers rely on this to
//! match outputs positionally and to index into `choices`.

use crate::host::{
    Block,
    BlockId,
    Choice,
    PropValue,
};
use crate::marker::Text;

/// Field name of the choice list.
pub const CHOICES: &str = "choices";

/// Field name of a component's current value.
pub const VALUE: &str = "value";

/// Positions of translatable entries in a choice list.
///
/// A bare entry counts when it is marked; a pair counts when its display half
/// is marked.
pub fn i18n_choice_indices(choices: &[Choice]) -> impl Iterator<Item = usize> + '_ {
    choices.iter().enumerate().filter(|(_, choice)| choice.is_i18n()).map(|(index, _)| index)
}

/// Names of the translatable fields of `block`.
///
/// A block with `choices` keeps its `value` as an opaque selection, so `value`
/// is never reported for it.
#[must_use]
pub fn i18n_fields(block: &Block) -> Vec<&str> {
    let has_choices = block.get_choices().is_some();
    let mut fields: Vec<&str> = block
        .props()
        .iter()
        .filter(|(name, _)| !(has_choices && name.as_str() == VALUE))
        .filter(|(_, value)| value.is_i18n())
        .map(|(name, _)| name.as_str())
        .collect();

    if block.get_choices().is_some_and(|choices| i18n_choice_indices(choices).next().is_some()) {
        fields.push(CHOICES);
    }
    fields
}

/// Blocks of the subtree rooted at `root` that carry translatable fields.
///
/// Descendants come before the block that contains them.
#[must_use]
pub fn i18n_blocks(root: &Block) -> Vec<&Block> {
    let mut found = Vec::new();
    collect_i18n_blocks(root, &mut found);
    found
}

/// Post-order walk behind [`i18n_blocks`].
fn collect_i18n_blocks<'a>(block: &'a Block, found: &mut Vec<&'a Block>) {
    for child in block.children().unwrap_or_default() {
        collect_i18n_blocks(child, found);
    }
    if !i18n_fields(block).is_empty() {
        found.push(block);
    }
}

/// Translatable texts of one block, in field order.
///
/// Choice pairs contribute their display half.
#[must_use]
pub fn block_texts(block: &Block) -> Vec<&Text> {
    let mut texts = Vec::new();
    for field in i18n_fields(block) {
        if field == CHOICES {
            if let Some(choices) = block.get_choices() {
                texts.extend(
                    i18n_choice_indices(choices)
                        .filter_map(|index| choices.get(index))
                        .filter_map(Choice::display),
                );
            }
        } else if let Some(text) = block.get_prop(field).and_then(PropValue::as_text) {
            texts.push(text);
        }
    }
    texts
}

/// Every translatable text of the subtree, in discovery order.
#[must_use]
pub fn i18n_texts(root: &Block) -> Vec<&Text> {
    i18n_blocks(root).into_iter().flat_map(block_texts).collect()
}

/// A translatable field captured at setup time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum I18nField {
    /// A marked prop.
    Prop {
        /// Prop name.
        name: String,
        /// Original marked text.
        text: Text,
    },
    /// The full original choice list.
    Choices(Vec<Choice>),
}

/// The translatable fields of one block, captured once so that later
/// translations always start from the original marked keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct I18nBlock {
    /// Block the fields belong to.
    id: BlockId,
    /// Fields in discovery order.
    fields: Vec<I18nField>,
}

impl I18nBlock {
    /// Captures the translatable fields of `block`.
    #[must_use]
    pub fn capture(block: &Block) -> Self {
        let fields = i18n_fields(block)
            .into_iter()
            .filter_map(|name| {
                if name == CHOICES {
                    return block.get_choices().map(|choices| I18nField::Choices(choices.to_vec()));
                }
                let text = block.get_prop(name)?.as_text()?.clone();
                Some(I18nField::Prop { name: name.to_string(), text })
            })
            .collect();
        Self { id: block.id(), fields }
    }

    #[must_use]
    pub const fn id(&self) -> BlockId {
        self.id
    }

    #[must_use]
    pub fn fields(&self) -> &[I18nField] {
        &self.fields
    }
}

/// Captures every translatable block of the subtree, in discovery order.
#[must_use]
pub fn snapshot(root: &Block) -> Vec<I18nBlock> {
    i18n_blocks(root).into_iter().map(I18nBlock::capture).collect()
}
