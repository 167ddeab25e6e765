//! Value types shared by the block tree and its event listeners.

use std::fmt;
use std::sync::atomic::{
    AtomicU64,
    Ordering,
};

use indexmap::IndexMap;
use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;

use crate::marker::{
    I18nString,
    Text,
};

/// Source of process-unique block ids.
static NEXT_BLOCK_ID: AtomicU64 = AtomicU64::new(1);

/// Identifies a block (or a hidden state slot) within the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(u64);

impl BlockId {
    /// Allocates a fresh id.
    #[must_use]
    pub fn next() -> Self {
        Self(NEXT_BLOCK_ID.fetch_add(1, Ordering::Relaxed))
    }

}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Value of a named block property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropValue {
    /// Text, possibly marked as translatable.
    Text(Text),
    /// Anything else; never translated.
    Json(serde_json::Value),
}

impl PropValue {
    /// Returns the text if this is a string-like value.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text.as_str()),
            Self::Json(serde_json::Value::String(s)) => Some(s),
            Self::Json(_) => None,
        }
    }

    /// Returns the text if this is a [`PropValue::Text`].
    #[must_use]
    pub const fn as_text(&self) -> Option<&Text> {
        match self {
            Self::Text(text) => Some(text),
            Self::Json(_) => None,
        }
    }

    /// Whether this value holds marked text.
    #[must_use]
    pub const fn is_i18n(&self) -> bool {
        matches!(self, Self::Text(text) if text.is_i18n())
    }

    /// A null value.
    #[must_use]
    pub const fn null() -> Self {
        Self::Json(serde_json::Value::Null)
    }
}

impl From<Text> for PropValue {
    fn from(text: Text) -> Self {
        Self::Text(text)
    }
}

impl From<I18nString> for PropValue {
    fn from(text: I18nString) -> Self {
        Self::Text(text.into())
    }
}

impl From<&str> for PropValue {
    fn from(text: &str) -> Self {
        Self::Text(Text::plain(text))
    }
}

impl From<String> for PropValue {
    fn from(text: String) -> Self {
        Self::Text(Text::Plain(text))
    }
}

impl From<bool> for PropValue {
    fn from(value: bool) -> Self {
        Self::Json(value.into())
    }
}

impl From<i64> for PropValue {
    fn from(value: i64) -> Self {
        Self::Json(value.into())
    }
}

impl From<serde_json::Value> for PropValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::String(s) => Self::Text(Text::Plain(s)),
            other => Self::Json(other),
        }
    }
}

/// One entry of a `choices` list.
///
/// Only the display half is ever translated. The value half of a pair, and
/// any entry that is not text at all, is handed back to the application
/// untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Choice {
    /// A bare entry, displayed and selected as-is.
    Single(Text),
    /// A `(display, value)` pair.
    Pair(Text, serde_json::Value),
    /// A non-text entry such as a number.
    Opaque(serde_json::Value),
}

impl Choice {
    /// Creates a `(display, value)` pair.
    #[must_use]
    pub fn pair(display: impl Into<Text>, value: impl Into<serde_json::Value>) -> Self {
        Self::Pair(display.into(), value.into())
    }

    /// The displayed text, unless the entry is opaque.
    #[must_use]
    pub const fn display(&self) -> Option<&Text> {
        match self {
            Self::Single(text) | Self::Pair(text, _) => Some(text),
            Self::Opaque(_) => None,
        }
    }

    /// Whether the displayed text is marked as translatable.
    #[must_use]
    pub fn is_i18n(&self) -> bool {
        self.display().is_some_and(Text::is_i18n)
    }
}

impl From<Text> for Choice {
    fn from(text: Text) -> Self {
        Self::Single(text)
    }
}

impl From<I18nString> for Choice {
    fn from(text: I18nString) -> Self {
        Self::Single(text.into())
    }
}

impl From<&str> for Choice {
    fn from(text: &str) -> Self {
        Self::Single(Text::plain(text))
    }
}

/// New property values for a single output block.
///
/// Only the properties present in the update are overwritten.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Update {
    /// Properties to overwrite.
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    props: IndexMap<String, PropValue>,
    /// Replacement `choices`, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    choices: Option<Vec<Choice>>,
}

impl Update {
    /// Creates an empty update.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a property.
    pub fn set_prop(&mut self, name: impl Into<String>, value: impl Into<PropValue>) {
        self.props.insert(name.into(), value.into());
    }

    /// Replaces the `choices` list.
    pub fn set_choices(&mut self, choices: Vec<Choice>) {
        self.choices = Some(choices);
    }

    /// Builder form of [`Update::set_prop`].
    #[must_use]
    pub fn with_prop(mut self, name: impl Into<String>, value: impl Into<PropValue>) -> Self {
        self.set_prop(name, value);
        self
    }

    /// Properties carried by this update.
    #[must_use]
    pub const fn props(&self) -> &IndexMap<String, PropValue> {
        &self.props
    }

    /// A single property carried by this update.
    #[must_use]
    pub fn prop(&self, name: &str) -> Option<&PropValue> {
        self.props.get(name)
    }

    /// Replacement `choices` carried by this update.
    #[must_use]
    pub fn choices(&self) -> Option<&[Choice]> {
        self.choices.as_deref()
    }

    /// Whether the update changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.props.is_empty() && self.choices.is_none()
    }
}

/// Errors raised by the block tree.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HostError {
    /// No block or state slot has this id.
    #[error("Unknown block {0}")]
    UnknownBlock(BlockId),

    /// Children can only be added to container blocks.
    #[error("Block {0} is not a container")]
    NotAContainer(BlockId),

    /// A batch update did not provide exactly one entry per output.
    #[error("Expected {expected} updates for the registered outputs, got {actual}")]
    OutputMismatch {
        /// Number of outputs registered with the listener.
        expected: usize,
        /// Number of updates returned.
        actual: usize,
    },
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use googletest::prelude::*;
    use rstest::rstest;
    use serde_json::json;

    use super::*;
    use crate::marker::gettext;

    #[googletest::test]
    fn block_ids_are_unique() {
        let a = BlockId::next();
        let b = BlockId::next();

        expect_that!(a, not(eq(b)));
        expect_that!(b, gt(a));
    }

    #[rstest]
    #[case::plain_string(json!("Hi"), PropValue::Text(Text::plain("Hi")), false)]
    #[case::marked_string(json!({"$i18n": "Hi"}), PropValue::Text(Text::i18n("Hi")), true)]
    #[case::number(json!(3), PropValue::Json(json!(3)), false)]
    #[case::object(json!({"a": 1}), PropValue::Json(json!({"a": 1})), false)]
    fn prop_value_from_json(
        #[case] input: serde_json::Value,
        #[case] expected: PropValue,
        #[case] marked: bool,
    ) {
        let value: PropValue = serde_json::from_value(input).unwrap();

        assert_that!(value, eq(&expected));
        assert_that!(value.is_i18n(), eq(marked));
    }

    #[googletest::test]
    fn choices_from_json() {
        let choices: Vec<Choice> =
            serde_json::from_value(json!(["Plain", {"$i18n": "Marked"}, [{"$i18n": "Yes"}, 1]]))
                .unwrap();

        expect_that!(
            choices,
            elements_are![
                eq(&Choice::Single(Text::plain("Plain"))),
                eq(&Choice::Single(Text::i18n("Marked"))),
                eq(&Choice::pair(gettext("Yes"), 1))
            ]
        );
        expect_that!(choices.iter().filter(|c| c.is_i18n()).count(), eq(2));
    }

    #[rstest]
    #[case::number(json!(1), Choice::Opaque(json!(1)))]
    #[case::float(json!(0.5), Choice::Opaque(json!(0.5)))]
    #[case::null(json!(null), Choice::Opaque(json!(null)))]
    #[case::non_text_pair(json!([1, "one"]), Choice::Opaque(json!([1, "one"])))]
    #[case::text_pair(json!([{"$i18n": "One"}, 1]), Choice::pair(gettext("One"), 1))]
    fn non_text_choices_are_opaque(#[case] input: serde_json::Value, #[case] expected: Choice) {
        let choice: Choice = serde_json::from_value(input.clone()).unwrap();

        assert_that!(choice, eq(&expected));
        assert_that!(serde_json::to_value(&choice).unwrap(), eq(&input));
    }

    #[googletest::test]
    fn opaque_choice_is_never_translatable() {
        let choice = Choice::Opaque(json!(2));

        expect_that!(choice.display(), none());
        expect_that!(choice.is_i18n(), eq(false));
    }

    #[googletest::test]
    fn update_serializes_only_what_it_changes() {
        let update = Update::new().with_prop("label", "Nom");

        expect_that!(serde_json::to_value(&update).unwrap(), eq(&json!({"props": {"label": "Nom"}})));
        expect_that!(Update::new().is_empty(), eq(true));
    }
}
