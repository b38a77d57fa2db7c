//! PriceScout Scanner - concurrent marketplace search.
//!
//! This crate turns a user query into product listings. It opens one browser
//! session per search, runs a generic extractor for every configured source in
//! parallel on its own page, normalizes titles and prices, and merges the
//! results in source order.
//!
//! # Features
//!
//! - One generic extractor driven by per-source definitions
//! - Independent navigation and result-wait timeouts per source
//! - Failure containment: timeouts, bad items and panics shrink results instead
//!   of failing the search
//! - Locale-tolerant price parsing
//! - Percent-encoded search URLs
//!
//! # Example
//!
//! ```rust,ignore
//! use pricescout_browser::ChromiumLauncher;
//! use pricescout_scanner::{ProductSearch, SearchCoordinator, SearchOutcome};
//! use pricescout_sources::SourceRegistry;
//!
//! let coordinator = SearchCoordinator::new(
//!     ChromiumLauncher::new(config.browser.clone()),
//!     SourceRegistry::builtin(),
//! );
//!
//! match coordinator.search("наушники").await? {
//!     SearchOutcome::Found(listings) => println!("{} listings", listings.len()),
//!     SearchOutcome::NothingFound => println!("nothing found"),
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

#[allow(missing_docs)]
pub mod error;
pub mod extractor;
#[allow(missing_docs)]
pub mod normalize;
pub mod orchestrator;
#[allow(missing_docs)]
pub mod url_builder;

// Re-export commonly used types
pub use error::{Result, ScanError};
pub use extractor::{SourceExtractor, SourceReport};
pub use normalize::{normalize_price, normalize_title, NormalizeError};
pub use orchestrator::{
    ProductSearch, SearchCoordinator, SearchOutcome, DEFAULT_MAX_CONCURRENT_SEARCHES,
};
pub use url_builder::{build_search_url, resolve_url};
