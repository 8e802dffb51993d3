//! Override document loading and coercion for scenepool.
//!
//! An override document is a flat JSON object. Keys follow two families:
//! `<SCENE>_TOTAL_MEMORY` for a scenario's budget and
//! `<PREFIX>_<TIER>_BLOCK_{SIZE,COUNT}` for individual tiers. Values under
//! keys that name a quantity are coerced to non-negative integers on load;
//! everything else is kept verbatim and ignored by the initializer.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod loader;
pub mod overrides;
pub mod sample;

pub use error::ConfigError;
pub use loader::load;
pub use overrides::{block_count_key, block_size_key, is_quantity_key, ConfigOverrides, ConfigValue};
pub use sample::{sample_overrides, write_sample};
