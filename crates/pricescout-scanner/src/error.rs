use crate::normalize::NormalizeError;
use pricescout_core::{Marketplace, PriceScoutError};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("query must contain at least {min_chars} characters, got {actual_chars}")]
    InvalidQuery {
        min_chars: usize,
        actual_chars: usize,
    },

    #[error("search unavailable: could not open a browsing session: {0}")]
    SessionUnavailable(#[source] pricescout_browser::BrowserError),

    #[error("{marketplace}: navigation did not finish within {timeout:?}")]
    NavigationTimeout {
        marketplace: Marketplace,
        timeout: Duration,
    },

    #[error("{marketplace}: results did not appear within {timeout:?}")]
    ResultWaitTimeout {
        marketplace: Marketplace,
        timeout: Duration,
    },

    #[error("{marketplace}: item {index} skipped: {source}")]
    ItemExtraction {
        marketplace: Marketplace,
        index: usize,
        #[source]
        source: Box<ScanError>,
    },

    #[error("{field}: {source}")]
    ItemField {
        field: &'static str,
        #[source]
        source: pricescout_browser::BrowserError,
    },

    #[error("link '{0}' is not an http(s) URL")]
    InvalidLink(String),

    #[error(transparent)]
    Listing(#[from] PriceScoutError),

    #[error("{marketplace}: extraction failed: {reason}")]
    SourceExtraction {
        marketplace: Marketplace,
        reason: String,
    },

    #[error("Normalize error: {0}")]
    Normalize(#[from] NormalizeError),

    #[error("Browser error: {0}")]
    Browser(#[from] pricescout_browser::BrowserError),
}

impl ScanError {
    /// Timeouts are the usual "no results" signal and are logged as warnings.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            Self::NavigationTimeout { .. } | Self::ResultWaitTimeout { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, ScanError>;
