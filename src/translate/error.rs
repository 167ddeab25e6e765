use thiserror::Error;

use crate::config::ConfigError;
use crate::host::{
    BlockId,
    HostError,
};
use crate::input::StoreError;

/// Errors raised while wiring translations into a tree.
#[derive(Error, Debug)]
pub enum TranslateError {
    /// The language selector is itself a translatable component.
    #[error("Language selector {0} can't have a translatable value")]
    SelfReferentialSelector(BlockId),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Host(#[from] HostError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
