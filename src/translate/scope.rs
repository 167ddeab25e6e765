//! The `Translate` entry point: build part of a UI, then translate it.

use std::path::Path;

use crate::analysis::{
    dump_blocks,
    has_new_i18n_fields,
};
use crate::config::{
    ConfigError,
    I18nSettings,
};
use crate::host::{
    BlockId,
    Blocks,
    HostError,
    PropValue,
};
use crate::input::{
    TranslationSource,
    TranslationTable,
    save_translation_file,
};

use super::TranslateError;
use super::applier::translate_blocks_with_default;

/// Translates the blocks created inside a scope.
///
/// ```
/// use ui_i18n::host::{Block, Blocks};
/// use ui_i18n::input::TranslationTable;
/// use ui_i18n::marker::gettext;
/// use ui_i18n::translate::Translate;
///
/// let mut table = TranslationTable::new();
/// table.insert("fr", "Name", "Nom");
///
/// let mut blocks = Blocks::new();
/// let lang = Translate::new(table)
///     .scope(&mut blocks, |blocks, _lang| {
///         let root = blocks.root().id();
///         blocks.add(root, Block::textbox(gettext("Name")))?;
///         Ok(())
///     })
///     .unwrap();
///
/// blocks.set_value(lang, "fr").unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct Translate {
    /// Where the table comes from.
    source: TranslationSource,
    /// Selector supplied by the caller.
    lang: Option<BlockId>,
    /// Default language and placeholder languages.
    settings: I18nSettings,
}

impl Translate {
    #[must_use]
    pub fn new(source: impl Into<TranslationSource>) -> Self {
        Self { source: source.into(), lang: None, settings: I18nSettings::default() }
    }

    /// Uses an existing block or state slot as the language selector.
    #[must_use]
    pub const fn lang(mut self, lang: BlockId) -> Self {
        self.lang = Some(lang);
        self
    }

    /// Languages to keep in the translation file.
    #[must_use]
    pub fn placeholder_langs<I, S>(mut self, langs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.settings.placeholder_languages = langs.into_iter().map(Into::into).collect();
        self
    }

    /// Takes the default and placeholder languages from `settings`.
    #[must_use]
    pub fn settings(mut self, settings: I18nSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Runs `build` against the root container, then translates everything
    /// in it. Returns the language selector.
    ///
    /// # Errors
    /// See [`Translate::scope_in`].
    pub fn scope<F>(self, blocks: &mut Blocks, build: F) -> Result<BlockId, TranslateError>
    where
        F: FnOnce(&mut Blocks, BlockId) -> Result<(), HostError>,
    {
        let root = blocks.root().id();
        self.scope_in(blocks, root, build)
    }

    /// Runs `build`, then translates every component under `container`.
    ///
    /// `build` receives the language selector. When the translations come
    /// from a file and placeholder languages are set, strings missing from
    /// the file are appended to it.
    ///
    /// # Errors
    /// - Invalid settings
    /// - `build` fails
    /// - The translation file can't be read or written
    /// - See [`translate_blocks_with_default`]
    pub fn scope_in<F>(
        self,
        blocks: &mut Blocks,
        container: BlockId,
        build: F,
    ) -> Result<BlockId, TranslateError>
    where
        F: FnOnce(&mut Blocks, BlockId) -> Result<(), HostError>,
    {
        self.settings.validate().map_err(ConfigError::ValidationErrors)?;

        let lang = self.lang.unwrap_or_else(|| blocks.state(PropValue::null()));
        build(blocks, lang)?;

        let table = self.source.load()?;
        let lang = translate_blocks_with_default(
            blocks,
            Some(container),
            table.clone(),
            Some(lang),
            &self.settings.default_language,
        )?;

        if let Some(path) = self.source.path() {
            self.sync_file(blocks, container, path, &table)?;
        }
        Ok(lang)
    }

    /// Appends strings missing from the translation file.
    fn sync_file(
        &self,
        blocks: &Blocks,
        container: BlockId,
        path: &Path,
        table: &TranslationTable,
    ) -> Result<(), TranslateError> {
        let langs = &self.settings.placeholder_languages;
        if langs.is_empty() {
            return Ok(());
        }

        let root = blocks.find(container).ok_or(HostError::UnknownBlock(container))?;
        if !has_new_i18n_fields(root, langs, table) {
            tracing::debug!("Translation file is up to date: {}", path.display());
            return Ok(());
        }

        let merged = dump_blocks(root, langs, Some(table));
        save_translation_file(path, &merged)?;
        Ok(())
    }
}
