//! Translatable string marker.
//!
//! A marked string behaves like ordinary text everywhere: it compares, hashes,
//! formats and concatenates exactly like its plain counterpart. The only way
//! to tell the two apart is [`Text::is_i18n`].

use std::borrow::Borrow;
use std::fmt;
use std::hash::{
    Hash,
    Hasher,
};
use std::ops::{
    Add,
    Deref,
};

use serde::{
    Deserialize,
    Serialize,
};

/// A string tagged as translatable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct I18nString(String);

impl I18nString {
    /// Wraps `text` as translatable.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// Returns the underlying text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the marker and returns the plain text.
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

/// Marks `key` as translatable.
///
/// ```
/// use ui_i18n::marker::{gettext, Text};
///
/// let greeting = Text::from(gettext("Hello"));
/// assert!(greeting.is_i18n());
/// assert_eq!(greeting, Text::plain("Hello"));
/// ```
#[must_use]
pub fn gettext(key: impl Into<String>) -> I18nString {
    I18nString::new(key)
}

impl Deref for I18nString {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for I18nString {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for I18nString {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for I18nString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<str> for I18nString {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for I18nString {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Concatenation drops the marker, like any other string operation that
/// builds new text.
impl Add<&str> for I18nString {
    type Output = String;

    fn add(self, rhs: &str) -> String {
        self.0 + rhs
    }
}

impl From<&str> for I18nString {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for I18nString {
    fn from(text: String) -> Self {
        Self(text)
    }
}

/// A text value that is either plain or marked as translatable.
///
/// Equality and hashing only look at the text, so a marked value can be used
/// as a lookup key wherever its plain counterpart can.
#[derive(Debug, Clone, Eq, Serialize, Deserialize)]
#[serde(from = "TextRepr", into = "TextRepr")]
pub enum Text {
    /// Ordinary text, never translated.
    Plain(String),
    /// Text marked with [`gettext`].
    I18n(I18nString),
}

impl Text {
    /// Creates plain text.
    #[must_use]
    pub fn plain(text: impl Into<String>) -> Self {
        Self::Plain(text.into())
    }

    /// Creates marked text.
    #[must_use]
    pub fn i18n(text: impl Into<String>) -> Self {
        Self::I18n(I18nString::new(text))
    }

    /// Returns the text regardless of marking.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Plain(s) => s,
            Self::I18n(s) => s.as_str(),
        }
    }

    /// Whether this value was marked as translatable.
    #[must_use]
    pub const fn is_i18n(&self) -> bool {
        matches!(self, Self::I18n(_))
    }

    /// Drops any marking.
    #[must_use]
    pub fn into_string(self) -> String {
        match self {
            Self::Plain(s) => s,
            Self::I18n(s) => s.into_string(),
        }
    }
}

impl PartialEq for Text {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl PartialEq<str> for Text {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for Text {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

impl Hash for Text {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_str().hash(state);
    }
}

impl Borrow<str> for Text {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

impl AsRef<str> for Text {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl Deref for Text {
    type Target = str;

    fn deref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for Text {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<I18nString> for Text {
    fn from(text: I18nString) -> Self {
        Self::I18n(text)
    }
}

impl From<&str> for Text {
    fn from(text: &str) -> Self {
        Self::plain(text)
    }
}

impl From<String> for Text {
    fn from(text: String) -> Self {
        Self::Plain(text)
    }
}

/// Wire form of [`Text`]: plain text is a bare string, marked text is
/// `{"$i18n": "..."}`.
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum TextRepr {
    /// Bare string.
    Plain(String),
    /// Marked string.
    I18n {
        /// The marked text.
        #[serde(rename = "$i18n")]
        i18n: String,
    },
}

impl From<TextRepr> for Text {
    fn from(repr: TextRepr) -> Self {
        match repr {
            TextRepr::Plain(s) => Self::Plain(s),
            TextRepr::I18n { i18n } => Self::i18n(i18n),
        }
    }
}

impl From<Text> for TextRepr {
    fn from(text: Text) -> Self {
        match text {
            Text::Plain(s) => Self::Plain(s),
            Text::I18n(s) => Self::I18n { i18n: s.into_string() },
        }
    }
}
