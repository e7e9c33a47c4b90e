//! Configuration types and parsing
//!
//! The firmware embeds `clock.toml` and parses it at boot with the
//! minimal parser in [`toml`].

pub mod toml;
pub mod types;

pub use self::toml::{parse_config, ParseError};
pub use types::*;
