//! Browser automation for marketplace search pages.
//!
//! Exposes the browsing capability as traits (`SessionProvider`,
//! `BrowsingSession`, `PageHandle`) so extraction logic never depends on a
//! particular engine, plus a headless Chrome implementation.

pub mod actions;
pub mod engine;
pub mod error;

pub use actions::{
    BrowsingSession, ElementHandle, ElementProperty, PageHandle, SessionProvider,
};
pub use engine::{ChromiumLauncher, ChromiumPage, ChromiumSession};
pub use error::{BrowserError, Result};
