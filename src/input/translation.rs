//! Translation tables and the files they are persisted in.

use std::fs;
use std::io;
use std::path::{
    Path,
    PathBuf,
};

use indexmap::IndexMap;
use serde::{
    Deserialize,
    Deserializer,
    Serialize,
};
use thiserror::Error;

/// Strings of one language: original text -> translated text.
pub type LanguageStrings = IndexMap<String, String>;

/// Errors raised while resolving or persisting a translation table.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Unsupported translation type: expected a mapping or a file path, got {0}")]
    UnsupportedSource(String),

    #[error("Unsupported file format: {}", .0.display())]
    UnsupportedFormat(PathBuf),

    #[error("Failed to access translation file: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to parse JSON translations: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to parse YAML translations: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Per-language string tables.
///
/// Lookups fall back to the original text when the language or the key is
/// missing.
///
/// ```
/// use ui_i18n::input::translation::TranslationTable;
///
/// let mut table = TranslationTable::new();
/// table.insert("fr", "Welcome", "Bienvenue");
///
/// assert_eq!(table.translate("fr", "Welcome"), "Bienvenue");
/// assert_eq!(table.translate("de", "Welcome"), "Welcome");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TranslationTable(
    #[serde(deserialize_with = "deserialize_languages")] IndexMap<String, LanguageStrings>,
);

impl TranslationTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the translation of `key` for `lang`.
    pub fn insert(
        &mut self,
        lang: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<String>,
    ) {
        self.0.entry(lang.into()).or_default().insert(key.into(), value.into());
    }

    /// Ensures `lang` is present, even without strings.
    pub fn add_language(&mut self, lang: impl Into<String>) -> &mut LanguageStrings {
        self.0.entry(lang.into()).or_default()
    }

    /// Returns the stored translation, if any.
    #[must_use]
    pub fn get(&self, lang: &str, key: &str) -> Option<&str> {
        self.0.get(lang)?.get(key).map(String::as_str)
    }

    /// Whether `key` has an entry for `lang`.
    #[must_use]
    pub fn contains(&self, lang: &str, key: &str) -> bool {
        self.0.get(lang).is_some_and(|strings| strings.contains_key(key))
    }

    /// Translates `key` into `lang`, or returns `key` unchanged.
    #[must_use]
    pub fn translate<'a>(&'a self, lang: &str, key: &'a str) -> &'a str {
        self.get(lang, key).unwrap_or(key)
    }

    /// Strings of one language.
    #[must_use]
    pub fn language(&self, lang: &str) -> Option<&LanguageStrings> {
        self.0.get(lang)
    }

    /// Languages in insertion order.
    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Accepts `lang: null` (a language with no strings yet) as an empty table.
fn deserialize_languages<'de, D>(
    deserializer: D,
) -> Result<IndexMap<String, LanguageStrings>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = IndexMap::<String, Option<LanguageStrings>>::deserialize(deserializer)?;
    Ok(raw.into_iter().map(|(lang, strings)| (lang, strings.unwrap_or_default())).collect())
}

/// On-disk format of a translation file, chosen by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    Json,
    Yaml,
}

impl TableFormat {
    /// Picks the format from the file extension.
    ///
    /// # Errors
    /// Fails for anything but `.json`, `.yaml` and `.yml`.
    pub fn from_path(path: &Path) -> Result<Self, StoreError> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(Self::Json),
            Some("yaml" | "yml") => Ok(Self::Yaml),
            _ => Err(StoreError::UnsupportedFormat(path.to_path_buf())),
        }
    }

    /// Parses a table. Blank content is an empty table.
    ///
    /// # Errors
    /// Fails if the content is not a mapping of languages to string mappings.
    pub fn parse(self, content: &str) -> Result<TranslationTable, StoreError> {
        if content.trim().is_empty() {
            return Ok(TranslationTable::new());
        }
        Ok(match self {
            Self::Json => serde_json::from_str(content)?,
            Self::Yaml => serde_yaml::from_str(content)?,
        })
    }

    /// Renders a table.
    ///
    /// JSON is indented by two spaces; both formats keep insertion order and
    /// write non-ASCII text as-is.
    ///
    /// # Errors
    /// Fails only if serialization fails.
    pub fn render(self, table: &TranslationTable) -> Result<String, StoreError> {
        Ok(match self {
            Self::Json => {
                let mut out = serde_json::to_string_pretty(table)?;
                out.push('\n');
                out
            }
            Self::Yaml => render_yaml(table)?,
        })
    }
}

/// Words YAML 1.1 readers load as booleans when left unquoted.
const YAML_1_1_BOOLEANS: [&str; 8] = ["y", "n", "yes", "no", "on", "off", "true", "false"];

/// A string as a single-line YAML scalar that every YAML reader loads back as
/// the same string.
fn yaml_scalar(text: &str) -> Result<String, StoreError> {
    if YAML_1_1_BOOLEANS.iter().any(|word| text.eq_ignore_ascii_case(word)) {
        return Ok(format!("'{text}'"));
    }
    let rendered = serde_yaml::to_string(text)?;
    let rendered = rendered.trim_end_matches('\n');
    if rendered.contains('\n') {
        // Block scalars cannot sit after a mapping key; double quotes can.
        return Ok(serde_json::to_string(text)?);
    }
    Ok(rendered.to_string())
}

/// Block-style YAML, one language per top-level key.
///
/// `serde_yaml` follows YAML 1.2 and leaves `no` or `on` unquoted, which
/// YAML 1.1 readers load as booleans. Every scalar goes through
/// [`yaml_scalar`] instead.
fn render_yaml(table: &TranslationTable) -> Result<String, StoreError> {
    if table.is_empty() {
        return Ok("{}\n".to_string());
    }
    let mut out = String::new();
    for (lang, strings) in &table.0 {
        out.push_str(&yaml_scalar(lang)?);
        if strings.is_empty() {
            out.push_str(": {}\n");
            continue;
        }
        out.push_str(":\n");
        for (key, value) in strings {
            out.push_str("  ");
            out.push_str(&yaml_scalar(key)?);
            out.push_str(": ");
            out.push_str(&yaml_scalar(value)?);
            out.push('\n');
        }
    }
    Ok(out)
}

/// Loads a translation file. A missing file is an empty table.
///
/// # Errors
/// Fails on unsupported extensions, I/O errors, and malformed content.
pub fn load_translation_file(path: &Path) -> Result<TranslationTable, StoreError> {
    let format = TableFormat::from_path(path)?;
    if !path.exists() {
        tracing::debug!("Translation file not found, starting empty: {}", path.display());
        return Ok(TranslationTable::new());
    }

    tracing::debug!("Loading translations from: {}", path.display());
    let content = fs::read_to_string(path)?;
    format.parse(&content)
}

/// Writes a translation file, replacing its content.
///
/// # Errors
/// Fails on unsupported extensions and I/O errors.
pub fn save_translation_file(path: &Path, table: &TranslationTable) -> Result<(), StoreError> {
    let content = TableFormat::from_path(path)?.render(table)?;
    fs::write(path, content)?;
    tracing::info!("Wrote translations to: {}", path.display());
    Ok(())
}

/// Where a scope gets its translations from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranslationSource {
    /// A table given in code.
    Inline(TranslationTable),
    /// A JSON or YAML file, which may not exist yet.
    File(PathBuf),
}

impl TranslationSource {
    /// Resolves the table, reading the file if needed.
    ///
    /// # Errors
    /// See [`load_translation_file`].
    pub fn load(&self) -> Result<TranslationTable, StoreError> {
        match self {
            Self::Inline(table) => Ok(table.clone()),
            Self::File(path) => load_translation_file(path),
        }
    }

    /// The backing file, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Inline(_) => None,
            Self::File(path) => Some(path),
        }
    }
}

impl From<TranslationTable> for TranslationSource {
    fn from(table: TranslationTable) -> Self {
        Self::Inline(table)
    }
}

impl From<PathBuf> for TranslationSource {
    fn from(path: PathBuf) -> Self {
        Self::File(path)
    }
}

impl From<&Path> for TranslationSource {
    fn from(path: &Path) -> Self {
        Self::File(path.to_path_buf())
    }
}

/// Objects are inline tables, strings are file paths.
impl TryFrom<serde_json::Value> for TranslationSource {
    type Error = StoreError;

    fn try_from(value: serde_json::Value) -> Result<Self, Self::Error> {
        match value {
            serde_json::Value::Object(_) => Ok(Self::Inline(serde_json::from_value(value)?)),
            serde_json::Value::String(path) => Ok(Self::File(PathBuf::from(path))),
            other => Err(StoreError::UnsupportedSource(kind_of(&other).to_string())),
        }
    }
}

/// Human-readable JSON type name.
const fn kind_of(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
