//! Generic per-marketplace extraction.
//!
//! One [`SourceExtractor`] runs the navigate, wait, query and per-item read
//! sequence for a single [`SourceDefinition`]. Every failure is absorbed here:
//! callers get a (possibly empty) list of listings and a report of what went
//! wrong, never an error.

use crate::error::{Result, ScanError};
use crate::normalize::{normalize_price, normalize_title};
use crate::url_builder::{build_search_url, resolve_url};
use pricescout_browser::{ElementHandle, ElementProperty, PageHandle};
use pricescout_core::{Marketplace, ProductListing, SearchQuery};
use pricescout_sources::SourceDefinition;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, error, warn};

/// Outcome of one source's extraction.
#[derive(Debug)]
pub struct SourceReport {
    /// Source the listings came from
    pub marketplace: Marketplace,
    /// Valid listings, in the order the site presented them
    pub listings: Vec<ProductListing>,
    /// Items dropped because a required field could not be read
    pub skipped_items: usize,
    /// Why the source contributed nothing, if it failed as a whole
    pub failure: Option<String>,
}

impl SourceReport {
    /// Report for a source that produced nothing.
    #[must_use]
    pub fn failed(marketplace: Marketplace, failure: impl Into<String>) -> Self {
        Self {
            marketplace,
            listings: Vec::new(),
            skipped_items: 0,
            failure: Some(failure.into()),
        }
    }
}

/// Extracts listings for one marketplace.
pub struct SourceExtractor<'a> {
    definition: &'a SourceDefinition,
}

impl<'a> SourceExtractor<'a> {
    /// Extractor for `definition`.
    #[must_use]
    pub fn new(definition: &'a SourceDefinition) -> Self {
        Self { definition }
    }

    /// Run the extraction on `page`. Never fails; see [`SourceReport::failure`].
    pub async fn extract(&self, page: &dyn PageHandle, query: &SearchQuery) -> SourceReport {
        let marketplace = self.definition.marketplace;

        match self.try_extract(page, query).await {
            Ok((listings, skipped_items)) => {
                debug!(
                    %marketplace,
                    found = listings.len(),
                    skipped = skipped_items,
                    "source extraction finished"
                );
                SourceReport {
                    marketplace,
                    listings,
                    skipped_items,
                    failure: None,
                }
            }
            Err(e) if e.is_timeout() => {
                warn!(%marketplace, error = %e, "timeout or no results found");
                SourceReport::failed(marketplace, e.to_string())
            }
            Err(e) => {
                error!(%marketplace, error = %e, "source extraction failed");
                SourceReport::failed(marketplace, e.to_string())
            }
        }
    }

    async fn try_extract(
        &self,
        page: &dyn PageHandle,
        query: &SearchQuery,
    ) -> Result<(Vec<ProductListing>, usize)> {
        let definition = self.definition;
        let marketplace = definition.marketplace;
        let search_url = build_search_url(definition, query);

        let navigation_timeout = definition.navigation_timeout();
        bounded(navigation_timeout, page.navigate(&search_url))
            .await
            .map_err(|e| match e {
                BoundedError::Elapsed => ScanError::NavigationTimeout {
                    marketplace,
                    timeout: navigation_timeout,
                },
                BoundedError::Inner(e) if e.is_timeout() => ScanError::NavigationTimeout {
                    marketplace,
                    timeout: navigation_timeout,
                },
                BoundedError::Inner(e) => ScanError::SourceExtraction {
                    marketplace,
                    reason: e.to_string(),
                },
            })?;

        let wait_timeout = definition.result_wait_timeout();
        let item_selector = definition.selectors.result_item.as_str();
        bounded(wait_timeout, page.wait_for(item_selector, wait_timeout))
            .await
            .map_err(|e| match e {
                BoundedError::Elapsed => ScanError::ResultWaitTimeout {
                    marketplace,
                    timeout: wait_timeout,
                },
                BoundedError::Inner(e) if e.is_timeout() => ScanError::ResultWaitTimeout {
                    marketplace,
                    timeout: wait_timeout,
                },
                BoundedError::Inner(e) => ScanError::SourceExtraction {
                    marketplace,
                    reason: e.to_string(),
                },
            })?;

        let mut elements = page.query_all(item_selector).await?;
        elements.truncate(definition.max_items);

        let mut listings = Vec::with_capacity(elements.len());
        let mut skipped = 0;
        for (index, element) in elements.iter().enumerate() {
            match self.extract_item(page, element, &search_url).await {
                Ok(listing) => listings.push(listing),
                Err(cause) => {
                    skipped += 1;
                    let e = ScanError::ItemExtraction {
                        marketplace,
                        index,
                        source: Box::new(cause),
                    };
                    warn!(%marketplace, error = %e, "parse error on item");
                }
            }
        }

        Ok((listings, skipped))
    }

    /// Read and normalize one result element. Title, price and link are required.
    async fn extract_item(
        &self,
        page: &dyn PageHandle,
        element: &ElementHandle,
        search_url: &str,
    ) -> Result<ProductListing> {
        let definition = self.definition;
        let selectors = &definition.selectors;
        let read = |field, selector: &'a String, property| {
            read_field(page, element, field, selector, property)
        };

        let raw_title = read("title", &selectors.title, ElementProperty::TextContent).await?;
        let title = normalize_title(&raw_title)?;

        let raw_price = read("price", &selectors.price, ElementProperty::TextContent).await?;
        let price = normalize_price(&raw_price, definition.price_strategy)?;

        let raw_link = read("link", &selectors.link, ElementProperty::Href).await?;
        let link = resolve_url(search_url, &raw_link).ok_or(ScanError::InvalidLink(raw_link))?;

        let image = match read("image", &selectors.image, ElementProperty::Src).await {
            Ok(raw_image) => resolve_url(search_url, &raw_image).unwrap_or_default(),
            Err(e) => {
                debug!(marketplace = %definition.marketplace, error = %e, "no image");
                String::new()
            }
        };

        ProductListing::new(title, definition.marketplace, price, link, image)
            .map_err(ScanError::Listing)
    }
}

async fn read_field(
    page: &dyn PageHandle,
    element: &ElementHandle,
    field: &'static str,
    selector: &str,
    property: ElementProperty,
) -> Result<String> {
    page.eval_on_element(element, selector, property)
        .await
        .map_err(|source| ScanError::ItemField { field, source })
}

enum BoundedError {
    Elapsed,
    Inner(pricescout_browser::BrowserError),
}

/// Run a browser call under a hard deadline, whatever the engine does with its own.
async fn bounded<T>(
    limit: Duration,
    call: impl Future<Output = pricescout_browser::Result<T>>,
) -> std::result::Result<T, BoundedError> {
    match tokio::time::timeout(limit, call).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(BoundedError::Inner(e)),
        Err(_) => Err(BoundedError::Elapsed),
    }
}
