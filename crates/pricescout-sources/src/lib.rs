//! PriceScout Sources - per-marketplace search definitions.
//!
//! Instead of one hand-written scraper per marketplace, every source is a
//! [`SourceDefinition`] record driving a single generic extractor.
//!
//! # Architecture
//!
//! - **Definition Types** ([`definition`]): selectors, timeouts, price strategy, cap
//! - **Loader** ([`loader`]): TOML overrides from a `source-definitions/` directory
//! - **Registry** ([`registry`]): ordered set of enabled sources
//! - **Errors** ([`error`]): source-specific error types
//!
//! # Example
//!
//! ```rust
//! use pricescout_core::Marketplace;
//! use pricescout_sources::SourceRegistry;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut registry = SourceRegistry::builtin();
//! registry.disable(&[Marketplace::YandexMarket]);
//!
//! let ozon = registry.get(Marketplace::Ozon)?;
//! println!("Ozon waits for {}", ozon.selectors.result_item);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod definition;
pub mod error;
pub mod loader;
pub mod registry;

// Re-export commonly used types
pub use definition::{PriceStrategy, ResultSelectors, SourceDefinition, QUERY_PLACEHOLDER};
pub use error::{Result, SourceError};
pub use loader::SourceLoader;
pub use registry::SourceRegistry;
