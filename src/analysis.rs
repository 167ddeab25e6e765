//! Comparison of discovered strings against translation tables.
/// Table building from discovered strings
pub mod dump;
/// Detection of untranslated strings
pub mod gaps;

pub use dump::dump_blocks;
pub use gaps::has_new_i18n_fields;
