//! ui-i18n
//!
//! Runtime internationalization for declarative UI block trees: mark strings
//! with [`marker::gettext`], build the tree inside a [`translate::Translate`]
//! scope, and every marked string follows the selected language.

pub mod analysis;
pub mod config;
pub mod discovery;
pub mod host;
pub mod input;
pub mod marker;
pub mod shim;
pub mod translate;

#[cfg(test)]
mod test_utils;

pub use marker::{
    I18nString,
    Text,
    gettext,
};
pub use translate::{
    Translate,
    TranslateError,
};
