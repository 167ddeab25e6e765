//! Command line front end: checks, syncs and renders translations for a block
//! tree stored as JSON.

use std::fs;
use std::io::{
    self,
    Write,
};
use std::path::{
    Path,
    PathBuf,
};
use std::process::ExitCode;

use anyhow::{
    Context,
    Result,
    bail,
};
use clap::{
    Args,
    Parser,
    Subcommand,
};
use indexmap::IndexSet;
use tracing_subscriber::EnvFilter;
use ui_i18n::analysis::{
    dump_blocks,
    has_new_i18n_fields,
};
use ui_i18n::config::{
    ConfigManager,
    I18nSettings,
};
use ui_i18n::discovery::i18n_texts;
use ui_i18n::host::{
    Block,
    Blocks,
};
use ui_i18n::input::{
    TranslationTable,
    load_translation_file,
    save_translation_file,
};
use ui_i18n::marker::Text;
use ui_i18n::translate::translate_blocks_with_default;

/// Command line arguments.
#[derive(Parser, Debug)]
#[command(name = "ui-i18n", version, about = "Translate marked strings of UI block trees")]
struct Cli {
    /// Directory containing `.ui-i18n.json` (defaults to the current directory)
    #[arg(long, global = true, value_name = "DIR")]
    config: Option<PathBuf>,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Command,
}

/// Subcommands.
#[derive(Subcommand, Debug)]
enum Command {
    /// List strings missing from the translation file; fails if any
    Check(TreeArgs),
    /// Add missing strings to the translation file
    Sync(TreeArgs),
    /// Print the tree translated into one language
    Render(TreeArgs),
}

/// Arguments shared by every subcommand.
#[derive(Args, Debug)]
struct TreeArgs {
    /// Block tree as JSON
    #[arg(value_name = "TREE")]
    tree: PathBuf,

    /// Translation file (JSON or YAML)
    #[arg(short = 't', long = "translations", value_name = "FILE")]
    translations: Option<PathBuf>,

    /// Target language, may be repeated
    #[arg(short = 'l', long = "lang", value_name = "LANG")]
    langs: Vec<String>,
}

fn main() -> Result<ExitCode> {
    init_tracing();

    let cli = Cli::parse();
    let settings = load_settings(cli.config)?;

    match cli.command {
        Command::Check(args) => check(&args, &settings),
        Command::Sync(args) => sync(&args, &settings).map(|()| ExitCode::SUCCESS),
        Command::Render(args) => render(&args, &settings).map(|()| ExitCode::SUCCESS),
    }
}

/// Logs go to stderr so stdout stays machine readable.
fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(env_filter).with_writer(io::stderr).init();
}

/// Reads `.ui-i18n.json` from `dir` or the current directory.
fn load_settings(dir: Option<PathBuf>) -> Result<I18nSettings> {
    let workspace = match dir {
        Some(dir) => dir,
        None => std::env::current_dir().context("failed to resolve current directory")?,
    };

    let mut manager = ConfigManager::new();
    manager
        .load_settings(Some(&workspace))
        .with_context(|| format!("invalid configuration in {}", workspace.display()))?;
    Ok(manager.get_settings().clone())
}

/// Reads a block tree from JSON.
fn read_tree(path: &Path) -> Result<Block> {
    let content =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("invalid block tree in {}", path.display()))
}

/// `--translations`, falling back to the configured file.
fn translation_path(args: &TreeArgs, settings: &I18nSettings) -> Option<PathBuf> {
    args.translations.clone().or_else(|| settings.translation_file.clone())
}

/// Loads the translation table, or an empty one when no file is given.
fn read_table(path: Option<&Path>) -> Result<TranslationTable> {
    path.map_or_else(
        || Ok(TranslationTable::new()),
        |path| {
            load_translation_file(path)
                .with_context(|| format!("failed to load translations from {}", path.display()))
        },
    )
}

/// `--lang`, then the placeholder languages, then the default language.
fn target_languages(args: &TreeArgs, settings: &I18nSettings) -> Vec<String> {
    if !args.langs.is_empty() {
        return args.langs.clone();
    }
    if !settings.placeholder_languages.is_empty() {
        return settings.placeholder_languages.clone();
    }
    vec![settings.default_language.clone()]
}

fn check(args: &TreeArgs, settings: &I18nSettings) -> Result<ExitCode> {
    let tree = read_tree(&args.tree)?;
    let table = read_table(translation_path(args, settings).as_deref())?;
    let langs = target_languages(args, settings);

    if !has_new_i18n_fields(&tree, &langs, &table) {
        return Ok(ExitCode::SUCCESS);
    }

    let mut out = io::stdout().lock();
    let texts: IndexSet<&str> = i18n_texts(&tree).into_iter().map(Text::as_str).collect();
    for lang in &langs {
        for text in texts.iter().filter(|text| !table.contains(lang, text)) {
            writeln!(out, "{lang}\t{text}")?;
        }
    }
    Ok(ExitCode::FAILURE)
}

fn sync(args: &TreeArgs, settings: &I18nSettings) -> Result<()> {
    let Some(path) = translation_path(args, settings) else {
        bail!("no translation file given; pass --translations or set translationFile");
    };
    let tree = read_tree(&args.tree)?;
    let table = read_table(Some(&path))?;
    let langs = target_languages(args, settings);

    if !has_new_i18n_fields(&tree, &langs, &table) {
        tracing::info!("Translation file is up to date: {}", path.display());
        return Ok(());
    }

    let merged = dump_blocks(&tree, &langs, Some(&table));
    save_translation_file(&path, &merged)
        .with_context(|| format!("failed to write translations to {}", path.display()))
}

fn render(args: &TreeArgs, settings: &I18nSettings) -> Result<()> {
    let langs = target_languages(args, settings);
    let [lang] = langs.as_slice() else {
        bail!("render needs exactly one language, got {}", langs.len());
    };
    let tree = read_tree(&args.tree)?;
    let table = read_table(translation_path(args, settings).as_deref())?;

    let mut blocks = Blocks::from_root(tree)?;
    let selector = translate_blocks_with_default(
        &mut blocks,
        None,
        table,
        None,
        &settings.default_language,
    )?;
    blocks.set_value(selector, lang.as_str())?;

    let mut out = io::stdout().lock();
    serde_json::to_writer_pretty(&mut out, blocks.root())?;
    writeln!(out)?;
    Ok(())
}
