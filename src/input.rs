//! Translation inputs.
/// Translation tables and files
pub mod translation;

pub use translation::{
    StoreError,
    TableFormat,
    TranslationSource,
    TranslationTable,
    load_translation_file,
    save_translation_file,
};
