//! Core error types for PriceScout.
//!
//! This module defines the error type for the domain values and the one for
//! the configuration layer.

use thiserror::Error;

/// Central error type for PriceScout domain values.
#[derive(Error, Debug)]
pub enum PriceScoutError {
    /// Query rejected before any search work starts
    #[error("query must contain at least {min_chars} characters, got {actual_chars}")]
    InvalidQuery {
        /// Minimum accepted length in characters
        min_chars: usize,
        /// Length of the trimmed query in characters
        actual_chars: usize,
    },

    /// A listing violated one of its construction invariants
    #[error("invalid listing: {0}")]
    InvalidListing(String),

    /// Unknown marketplace label
    #[error("unknown marketplace: {0}")]
    UnknownMarketplace(String),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to determine config directory path
    #[error("could not determine config directory (XDG base directories not available)")]
    NoConfigDir,

    /// Required credential absent from the environment
    #[error("environment variable {var} is not set")]
    MissingCredential {
        /// Name of the environment variable
        var: String,
    },

    /// Failed to parse TOML
    #[error("failed to parse config TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    /// I/O error reading config
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid configuration value
    #[error("invalid config value for {field}: {reason}")]
    InvalidValue {
        /// Field name
        field: String,
        /// Reason for invalidity
        reason: String,
    },
}

/// Result type alias using `PriceScoutError`.
pub type Result<T> = std::result::Result<T, PriceScoutError>;

/// Result type alias for configuration operations.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
