use std::collections::HashSet;
use std::path::PathBuf;

use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;

use crate::input::translation::TableFormat;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Configuration error in '{field_path}': {message}")]
pub struct ValidationError {
    /// JSON path to the field (e.g., "placeholderLanguages[0]")
    pub field_path: String,
    pub message: String,
}

impl ValidationError {
    #[must_use]
    pub fn new(field_path: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field_path: field_path.into(), message: message.into() }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration validation failed:\n{}", format_validation_errors(.0))]
    ValidationErrors(Vec<ValidationError>),

    #[error("Failed to load configuration file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),
}

fn format_validation_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .enumerate()
        .map(|(i, err)| format!("  {}. {} - {}", i + 1, err.field_path, err.message))
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct I18nSettings {
    /// Language used when the request carries no `Accept-Language` header.
    pub default_language: String,

    /// Languages to keep in the translation file.
    ///
    /// When non-empty and the translations come from a file, new strings are
    /// appended to the file for each of these languages.
    pub placeholder_languages: Vec<String>,

    /// Default translation file (JSON or YAML).
    pub translation_file: Option<PathBuf>,
}

impl Default for I18nSettings {
    fn default() -> Self {
        Self {
            default_language: "en".to_string(),
            placeholder_languages: Vec::new(),
            translation_file: None,
        }
    }
}

/// Language codes look like `en`, `pt-BR` or `zh_Hant`.
fn is_language_code(code: &str) -> bool {
    !code.is_empty()
        && code.split(['-', '_']).all(|part| {
            !part.is_empty() && part.chars().all(|c| c.is_ascii_alphanumeric())
        })
}

impl I18nSettings {
    /// # Errors
    /// - Malformed language code
    /// - Duplicate placeholder language
    /// - Unsupported translation file extension
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if !is_language_code(&self.default_language) {
            errors.push(ValidationError::new(
                "defaultLanguage",
                format!(
                    "Invalid language code '{}'. Example: \"en\" or \"pt-BR\"",
                    self.default_language
                ),
            ));
        }

        let mut seen = HashSet::new();
        for (index, lang) in self.placeholder_languages.iter().enumerate() {
            if !is_language_code(lang) {
                errors.push(ValidationError::new(
                    format!("placeholderLanguages[{index}]"),
                    format!("Invalid language code '{lang}'. Example: \"en\" or \"pt-BR\""),
                ));
            } else if !seen.insert(lang.as_str()) {
                errors.push(ValidationError::new(
                    format!("placeholderLanguages[{index}]"),
                    format!("Duplicate language '{lang}'. Each language may only be listed once"),
                ));
            }
        }

        if let Some(path) = &self.translation_file
            && TableFormat::from_path(path).is_err()
        {
            errors.push(ValidationError::new(
                "translationFile",
                format!(
                    "Unsupported file extension for '{}'. Use .json, .yaml or .yml",
                    path.display()
                ),
            ));
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}
