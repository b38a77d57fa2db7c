//! PriceScout Core - Foundation crate for the PriceScout marketplace search bot.
//!
//! This crate provides shared types, error handling and configuration management
//! that all other PriceScout crates depend on.
//!
//! # Modules
//!
//! - [`error`] - Central error types using thiserror
//! - [`config`] - TOML-based configuration with XDG paths and env overrides
//! - [`types`] - Shared domain types (`Marketplace`, `ProductListing`, `SearchQuery`)
//!
//! # Example
//!
//! ```rust
//! use pricescout_core::{AppConfig, SearchQuery};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::default();
//! let query = SearchQuery::parse("  наушники ", config.search.min_query_chars)?;
//! assert_eq!(query.as_str(), "наушники");
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod config;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use config::{AppConfig, BrowserConfig, SearchConfig, TelegramConfig, BOT_TOKEN_ENV};
pub use error::{ConfigError, ConfigResult, PriceScoutError, Result};
pub use types::{Marketplace, ProductListing, SearchQuery, MIN_QUERY_CHARS};
