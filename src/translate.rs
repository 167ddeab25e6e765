//! Translating block trees at runtime.
/// Wiring translations into a tree
pub mod applier;
/// Translation errors
mod error;
/// Scoped translation
pub mod scope;

pub use applier::{
    DEFAULT_LANGUAGE,
    preferred_language,
    rebuild_updates,
    translate_blocks,
    translate_blocks_with_default,
};
pub use error::TranslateError;
pub use scope::Translate;
