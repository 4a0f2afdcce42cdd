//! Configuration types
//!
//! Board-agnostic rig configuration, embedded in the firmware as TOML and
//! parsed with a small `no_std` line parser.

pub mod parse;
pub mod types;

pub use parse::{parse_config, ParseError};
pub use types::*;
