//! Search coordinator fanning a query out to every source.
//!
//! Each search opens one browsing session, gives every source its own page in
//! that session, runs all extractors concurrently, waits for all of them, then
//! closes the session. Sources never share a page, so concurrent navigations
//! cannot overwrite each other's document.
//!
//! Every session is a browser process, so concurrent searches are capped by a
//! semaphore; searches over the cap queue for a permit.

use crate::error::{Result, ScanError};
use crate::extractor::{SourceExtractor, SourceReport};
use async_trait::async_trait;
use futures::future::join_all;
use futures::FutureExt;
use pricescout_browser::{BrowsingSession, SessionProvider};
use pricescout_core::{ProductListing, SearchQuery, MIN_QUERY_CHARS};
use pricescout_sources::{SourceDefinition, SourceRegistry};
use std::panic::AssertUnwindSafe;
use std::time::Duration;
use tokio::sync::Semaphore;
use tracing::{debug, error, info, warn};

/// Default number of searches allowed to hold a browser at once.
pub const DEFAULT_MAX_CONCURRENT_SEARCHES: usize = 2;

/// Successful search result.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// Listings in source order, then in page order within each source
    Found(Vec<ProductListing>),
    /// Every source came back empty
    NothingFound,
}

impl SearchOutcome {
    /// Listings found, empty for [`SearchOutcome::NothingFound`].
    #[must_use]
    pub fn listings(&self) -> &[ProductListing] {
        match self {
            Self::Found(listings) => listings,
            Self::NothingFound => &[],
        }
    }
}

/// Product search as seen by the chat boundary.
#[async_trait]
pub trait ProductSearch: Send + Sync {
    /// Search every marketplace for `raw_query`.
    ///
    /// Fails only with [`ScanError::InvalidQuery`] or [`ScanError::SessionUnavailable`].
    async fn search(&self, raw_query: &str) -> Result<SearchOutcome>;
}

/// Orchestrates one search across all registered sources.
pub struct SearchCoordinator<P> {
    /// Starts the per-search browsing session
    provider: P,
    /// Sources in result order
    sources: SourceRegistry,
    /// Minimum query length in characters
    min_query_chars: usize,
    /// Optional bound on each extractor, on top of its own timeouts
    deadline: Option<Duration>,
    /// One permit per browser session allowed to run
    session_permits: Semaphore,
}

impl<P: SessionProvider> SearchCoordinator<P> {
    /// Create a coordinator over the given sources.
    #[must_use]
    pub fn new(provider: P, sources: SourceRegistry) -> Self {
        Self {
            provider,
            sources,
            min_query_chars: MIN_QUERY_CHARS,
            deadline: None,
            session_permits: Semaphore::new(DEFAULT_MAX_CONCURRENT_SEARCHES),
        }
    }

    /// Set the minimum query length.
    #[must_use]
    pub fn with_min_query_chars(mut self, min_query_chars: usize) -> Self {
        self.min_query_chars = min_query_chars;
        self
    }

    /// Bound every extractor's total run time.
    #[must_use]
    pub fn with_deadline(mut self, deadline: Option<Duration>) -> Self {
        self.deadline = deadline;
        self
    }

    /// Cap the number of searches running a browser at the same time.
    #[must_use]
    pub fn with_max_concurrent_searches(mut self, max: usize) -> Self {
        self.session_permits = Semaphore::new(max.max(1));
        self
    }

    /// Run every source and return one report per source, in source order.
    ///
    /// Waits for a free session slot first. The session is closed before
    /// returning on every path.
    pub async fn run_sources(&self, query: &SearchQuery) -> Result<Vec<SourceReport>> {
        if self.session_permits.available_permits() == 0 {
            debug!(query = %query, "all browser slots busy, search queued");
        }
        // The semaphore is never closed, so this only waits
        let _permit = self.session_permits.acquire().await.ok();

        let mut session = self
            .provider
            .open()
            .await
            .map_err(ScanError::SessionUnavailable)?;

        let reports = join_all(
            self.sources
                .iter()
                .map(|definition| self.run_source(session.as_ref(), definition, query)),
        )
        .await;

        if let Err(e) = session.close().await {
            warn!(error = %e, "failed to close browsing session");
        }

        Ok(reports)
    }

    /// One source on its own page. Panics and deadline overruns become empty reports.
    async fn run_source(
        &self,
        session: &dyn BrowsingSession,
        definition: &SourceDefinition,
        query: &SearchQuery,
    ) -> SourceReport {
        let marketplace = definition.marketplace;

        let page = match session.new_page().await {
            Ok(page) => page,
            Err(e) => {
                error!(%marketplace, error = %e, "could not open a page for source");
                return SourceReport::failed(marketplace, format!("no page: {e}"));
            }
        };

        let extractor = SourceExtractor::new(definition);
        let extraction = AssertUnwindSafe(extractor.extract(page.as_ref(), query)).catch_unwind();

        let report = match self.deadline {
            Some(limit) => match tokio::time::timeout(limit, extraction).await {
                Ok(result) => result,
                Err(_) => {
                    warn!(%marketplace, deadline = ?limit, "source exceeded search deadline");
                    Ok(SourceReport::failed(marketplace, "search deadline exceeded"))
                }
            },
            None => extraction.await,
        };

        let report = report.unwrap_or_else(|_| {
            error!(%marketplace, "source extractor panicked");
            SourceReport::failed(marketplace, "extractor panicked")
        });

        if let Err(e) = page.close().await {
            debug!(%marketplace, error = %e, "failed to close page");
        }

        report
    }
}

#[async_trait]
impl<P: SessionProvider> ProductSearch for SearchCoordinator<P> {
    async fn search(&self, raw_query: &str) -> Result<SearchOutcome> {
        let query = SearchQuery::parse(raw_query, self.min_query_chars).map_err(|e| {
            debug!(error = %e, "rejected query");
            ScanError::InvalidQuery {
                min_chars: self.min_query_chars,
                actual_chars: raw_query.trim().chars().count(),
            }
        })?;

        info!(query = %query, sources = self.sources.len(), "starting search");

        let reports = self.run_sources(&query).await?;

        for report in &reports {
            info!(
                marketplace = %report.marketplace,
                listings = report.listings.len(),
                skipped = report.skipped_items,
                failure = report.failure.as_deref().unwrap_or("none"),
                "source finished"
            );
        }

        let listings: Vec<ProductListing> = reports
            .into_iter()
            .flat_map(|report| report.listings)
            .collect();

        if listings.is_empty() {
            info!(query = %query, "nothing found");
            Ok(SearchOutcome::NothingFound)
        } else {
            info!(query = %query, total = listings.len(), "search finished");
            Ok(SearchOutcome::Found(listings))
        }
    }
}
