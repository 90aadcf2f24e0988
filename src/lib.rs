//! Sitefold: mirrors a website into a local, statically-servable copy
//!
//! This crate crawls every same-origin resource reachable from a set of root
//! pages by scanning HTML, CSS, and JavaScript for references, and writes the
//! fetched bytes into a git-tracked output directory.

pub mod config;
pub mod crawler;
pub mod output;
pub mod scan;

use thiserror::Error;

/// Main error type for sitefold operations
#[derive(Debug, Error)]
pub enum MirrorError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Root \"{root}\" does not lie under base URL \"{base}\"")]
    RootOutsideOrigin { root: String, base: String },

    #[error("Git error: {0}")]
    Git(#[from] GitError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),
}

/// Errors from the version-control collaborator
#[derive(Debug, Error)]
pub enum GitError {
    #[error("Target git repository is not clean")]
    DirtyWorkspace,

    #[error("Failed to {action}: {detail}")]
    Command { action: String, detail: String },

    #[error("Failed to run git: {0}")]
    Spawn(#[from] std::io::Error),
}

/// Result type alias for sitefold operations
pub type Result<T> = std::result::Result<T, MirrorError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{mirror, Engine, Frontier, PendingLink};
