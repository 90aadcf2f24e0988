//! Configuration module
//!
//! Loads and validates the TOML configuration file describing a mirror
//! run. Validation happens before any network or workspace activity.

mod parser;
mod types;
mod validation;

pub use parser::{load_config, parse_config};
pub use types::{Config, MirrorConfig, OutputConfig};
pub use validation::parse_base_origin;
