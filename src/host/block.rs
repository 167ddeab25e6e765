//! Component tree nodes.

use indexmap::IndexMap;
use serde::{
    Deserialize,
    Serialize,
};

use super::types::{
    BlockId,
    Choice,
    HostError,
    PropValue,
    Update,
};
use crate::marker::Text;
use crate::shim::{
    cleandoc,
    preserve_marker,
};

/// A node of the UI tree.
///
/// A block is a container when it owns a (possibly empty) list of children,
/// and a leaf otherwise. Both kinds can carry props and `choices`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    /// Process-unique id, reassigned on deserialization.
    #[serde(skip, default = "BlockId::next")]
    id: BlockId,

    /// Component type name, e.g. `Textbox` or `Column`.
    #[serde(rename = "type")]
    kind: String,

    /// Named props in insertion order.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    props: IndexMap<String, PropValue>,

    /// Options of a selection component.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    choices: Option<Vec<Choice>>,

    /// Children, for containers only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    children: Option<Vec<Block>>,
}

impl Block {
    /// Creates a leaf block of the given component type.
    #[must_use]
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            id: BlockId::next(),
            kind: kind.into(),
            props: IndexMap::new(),
            choices: None,
            children: None,
        }
    }

    /// Creates an empty container block.
    #[must_use]
    pub fn container(kind: impl Into<String>) -> Self {
        Self { children: Some(Vec::new()), ..Self::new(kind) }
    }

    #[must_use]
    pub fn column() -> Self {
        Self::container("Column")
    }

    #[must_use]
    pub fn row() -> Self {
        Self::container("Row")
    }

    #[must_use]
    pub fn tab(label: impl Into<Text>) -> Self {
        Self::container("Tab").text_prop("label", label)
    }

    #[must_use]
    pub fn textbox(label: impl Into<Text>) -> Self {
        Self::new("Textbox").text_prop("label", label)
    }

    #[must_use]
    pub fn button(value: impl Into<Text>) -> Self {
        Self::new("Button").text_prop("value", value)
    }

    /// A Markdown block. Its body is dedented like a docstring.
    #[must_use]
    pub fn markdown(value: impl Into<Text>) -> Self {
        Self::new("Markdown").doc_prop("value", value)
    }

    #[must_use]
    pub fn dropdown<I, C>(label: impl Into<Text>, choices: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Choice>,
    {
        Self::new("Dropdown").text_prop("label", label).choices(choices)
    }

    #[must_use]
    pub fn radio<I, C>(label: impl Into<Text>, choices: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Choice>,
    {
        Self::new("Radio").text_prop("label", label).choices(choices)
    }

    /// Sets a property.
    #[must_use]
    pub fn prop(mut self, name: impl Into<String>, value: impl Into<PropValue>) -> Self {
        self.set_prop(name, value);
        self
    }

    /// Sets a text property.
    #[must_use]
    pub fn text_prop(self, name: impl Into<String>, value: impl Into<Text>) -> Self {
        let value: Text = value.into();
        self.prop(name, value)
    }

    /// Sets a property after dedenting it, keeping the translatable marker.
    #[must_use]
    pub fn doc_prop(self, name: impl Into<String>, value: impl Into<Text>) -> Self {
        let clean = preserve_marker(cleandoc);
        let value: Text = value.into();
        let value = clean(&value);
        self.prop(name, value)
    }

    /// Sets the `choices` list.
    #[must_use]
    pub fn choices<I, C>(mut self, choices: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Choice>,
    {
        self.choices = Some(choices.into_iter().map(Into::into).collect());
        self
    }

    /// Appends a child. Turns a leaf into a container.
    #[must_use]
    pub fn child(mut self, child: Self) -> Self {
        self.children.get_or_insert_with(Vec::new).push(child);
        self
    }

    #[must_use]
    pub const fn id(&self) -> BlockId {
        self.id
    }

    #[must_use]
    pub fn kind(&self) -> &str {
        &self.kind
    }

    #[must_use]
    pub const fn props(&self) -> &IndexMap<String, PropValue> {
        &self.props
    }

    #[must_use]
    pub fn get_prop(&self, name: &str) -> Option<&PropValue> {
        self.props.get(name)
    }

    pub fn set_prop(&mut self, name: impl Into<String>, value: impl Into<PropValue>) {
        self.props.insert(name.into(), value.into());
    }

    #[must_use]
    pub fn get_choices(&self) -> Option<&[Choice]> {
        self.choices.as_deref()
    }

    pub fn set_choices(&mut self, choices: Vec<Choice>) {
        self.choices = Some(choices);
    }

    /// Children of a container, `None` for a leaf.
    #[must_use]
    pub fn children(&self) -> Option<&[Self]> {
        self.children.as_deref()
    }

    #[must_use]
    pub const fn is_container(&self) -> bool {
        self.children.is_some()
    }

    /// Appends a child to this container.
    ///
    /// # Errors
    /// Fails if this block is a leaf.
    pub fn push_child(&mut self, child: Self) -> Result<BlockId, HostError> {
        let children = self.children.as_mut().ok_or(HostError::NotAContainer(self.id))?;
        let id = child.id;
        children.push(child);
        Ok(id)
    }

    /// Finds a block by id in this subtree.
    #[must_use]
    pub fn find(&self, id: BlockId) -> Option<&Self> {
        if self.id == id {
            return Some(self);
        }
        self.children.as_ref()?.iter().find_map(|child| child.find(id))
    }

    /// Finds a block by id in this subtree.
    pub fn find_mut(&mut self, id: BlockId) -> Option<&mut Self> {
        if self.id == id {
            return Some(self);
        }
        self.children.as_mut()?.iter_mut().find_map(|child| child.find_mut(id))
    }

    /// Writes an update into this block.
    pub fn apply(&mut self, update: &Update) {
        for (name, value) in update.props() {
            self.props.insert(name.clone(), value.clone());
        }
        if let Some(choices) = update.choices() {
            self.choices = Some(choices.to_vec());
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use googletest::prelude::*;
    use serde_json::json;

    use super::*;
    use crate::marker::gettext;

    #[googletest::test]
    fn builds_nested_tree() {
        let name = Block::textbox(gettext("Name"));
        let name_id = name.id();
        let tree = Block::column().child(Block::row().child(name)).child(Block::button("Go"));

        expect_that!(tree.is_container(), eq(true));
        expect_that!(tree.children().map(<[Block]>::len), some(eq(2)));
        expect_that!(tree.find(name_id).map(Block::kind), some(eq("Textbox")));
        expect_that!(tree.find(BlockId::next()), none());
    }

    #[googletest::test]
    fn push_child_rejects_leaf() {
        let mut leaf = Block::textbox("Name");
        let leaf_id = leaf.id();

        let result = leaf.push_child(Block::button("Go"));

        expect_that!(result, err(eq(&HostError::NotAContainer(leaf_id))));
    }

    #[googletest::test]
    fn markdown_keeps_marker_through_dedent() {
        let block = Block::markdown(gettext("\n    # Title\n    body\n"));

        let value = block.get_prop("value").unwrap();
        expect_that!(value.is_i18n(), eq(true));
        expect_that!(value.as_str(), some(eq("# Title\nbody")));
    }

    #[googletest::test]
    fn apply_overwrites_only_updated_fields() {
        let mut block = Block::dropdown(gettext("Color"), [gettext("Red")]).prop("info", "keep");
        let mut update = Update::new();
        update.set_prop("label", "Couleur");
        update.set_choices(vec![Choice::pair("Rouge", "Red")]);

        block.apply(&update);

        expect_that!(block.get_prop("label").and_then(PropValue::as_str), some(eq("Couleur")));
        expect_that!(block.get_prop("info").and_then(PropValue::as_str), some(eq("keep")));
        expect_that!(block.get_choices(), some(elements_are![eq(&Choice::pair("Rouge", "Red"))]));
    }

    #[googletest::test]
    fn deserializes_tree_with_fresh_ids() {
        let tree: Block = serde_json::from_value(json!({
            "type": "Column",
            "children": [
                {"type": "Textbox", "props": {"label": {"$i18n": "Name"}}},
                {"type": "Radio", "choices": [[{"$i18n": "Yes"}, "y"], "Maybe"]}
            ]
        }))
        .unwrap();

        let children = tree.children().unwrap();
        expect_that!(children.len(), eq(2));
        expect_that!(children[0].id(), not(eq(children[1].id())));
        expect_that!(children[0].get_prop("label").map(PropValue::is_i18n), some(eq(true)));
        expect_that!(children[1].get_choices().map(<[Choice]>::len), some(eq(2)));
    }
}
