//! Error types for the source definition subsystem.

use pricescout_core::Marketplace;
use thiserror::Error;

/// Errors that can occur loading or validating source definitions.
#[derive(Error, Debug)]
pub enum SourceError {
    /// No definition registered for the marketplace
    #[error("no source definition for marketplace: {marketplace}")]
    NotFound {
        /// The marketplace that was looked up
        marketplace: Marketplace,
    },

    /// Failed to read a source definition file
    #[error("failed to load source definition from {path}: {source}")]
    LoadError {
        /// Path to the definition file
        path: String,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse source definition TOML
    #[error("failed to parse source definition TOML in {path}: {source}")]
    ParseError {
        /// Path to the definition file
        path: String,
        /// TOML parse error
        #[source]
        source: toml::de::Error,
    },

    /// Invalid source definition (validation failed)
    #[error("invalid source definition for {marketplace}: {reason}")]
    ValidationError {
        /// Marketplace being validated
        marketplace: Marketplace,
        /// Reason for validation failure
        reason: String,
    },

    /// Source definition directory not found
    #[error("source definitions directory not found at {path}")]
    DirectoryNotFound {
        /// Expected directory path
        path: String,
    },

    /// I/O error while accessing source definitions
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for source definition operations.
pub type Result<T> = std::result::Result<T, SourceError>;
