//! Minimal UI host: a block tree, hidden state, and load/change listeners.
/// Tree nodes
mod block;
/// Root of the tree and event wiring
mod blocks;
/// Page requests
mod request;
/// Shared value types
mod types;

pub use block::Block;
pub use blocks::{
    Blocks,
    ChangeHandler,
    LoadHandler,
};
pub use request::{
    ACCEPT_LANGUAGE,
    Request,
};
pub use types::{
    BlockId,
    Choice,
    HostError,
    PropValue,
    Update,
};
