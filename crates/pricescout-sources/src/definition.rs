//! Source definition types.
//!
//! A [`SourceDefinition`] is everything the generic extractor needs to search
//! one marketplace: where to go, what to wait for, which selectors hold each
//! field, how to read the price, and how long to wait.

use crate::error::{Result, SourceError};
use pricescout_core::Marketplace;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Placeholder replaced by the encoded query in `search_url_template`.
pub const QUERY_PLACEHOLDER: &str = "{query}";

/// Default navigation timeout in milliseconds.
pub const DEFAULT_NAVIGATION_TIMEOUT_MS: u64 = 15_000;

/// Default wait for the result list, in milliseconds.
pub const DEFAULT_RESULT_WAIT_TIMEOUT_MS: u64 = 10_000;

/// Default cap on listings taken per source per query.
pub const DEFAULT_MAX_ITEMS: usize = 5;

/// How a marketplace renders prices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PriceStrategy {
    /// Locale number with an optional decimal part, e.g. `1 234,56 ₽`
    Decimal,
    /// Digit groups only, no reliable separator, e.g. `12 990 ₽`
    DigitsOnly,
}

/// CSS selectors for one marketplace's result page.
///
/// Every selector except `result_item` is scoped to a single result element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultSelectors {
    /// One element per product card
    pub result_item: String,
    /// Product name
    pub title: String,
    /// Price text
    pub price: String,
    /// Anchor pointing at the product page
    pub link: String,
    /// Thumbnail image
    pub image: String,
}

/// Complete search configuration for one marketplace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceDefinition {
    /// Marketplace the listings are tagged with
    pub marketplace: Marketplace,

    /// Search URL containing a `{query}` placeholder
    pub search_url_template: String,

    /// Result page selectors
    pub selectors: ResultSelectors,

    /// Price parsing strategy
    pub price_strategy: PriceStrategy,

    /// Maximum time for the search page to load
    #[serde(default = "default_navigation_timeout_ms")]
    pub navigation_timeout_ms: u64,

    /// Maximum time for `selectors.result_item` to appear
    #[serde(default = "default_result_wait_timeout_ms")]
    pub result_wait_timeout_ms: u64,

    /// Maximum listings taken from this source
    #[serde(default = "default_max_items")]
    pub max_items: usize,
}

fn default_navigation_timeout_ms() -> u64 {
    DEFAULT_NAVIGATION_TIMEOUT_MS
}

fn default_result_wait_timeout_ms() -> u64 {
    DEFAULT_RESULT_WAIT_TIMEOUT_MS
}

fn default_max_items() -> usize {
    DEFAULT_MAX_ITEMS
}

impl SourceDefinition {
    /// Navigation timeout as a `Duration`.
    #[must_use]
    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_millis(self.navigation_timeout_ms)
    }

    /// Result wait timeout as a `Duration`.
    #[must_use]
    pub fn result_wait_timeout(&self) -> Duration {
        Duration::from_millis(self.result_wait_timeout_ms)
    }

    /// Validate the definition for completeness and correctness.
    pub fn validate(&self) -> Result<()> {
        if !self.search_url_template.contains(QUERY_PLACEHOLDER) {
            return Err(self.invalid(format!(
                "search_url_template must contain {QUERY_PLACEHOLDER}"
            )));
        }

        let sample = self.search_url_template.replace(QUERY_PLACEHOLDER, "query");
        match url::Url::parse(&sample) {
            Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => {}
            Ok(parsed) => {
                return Err(self.invalid(format!(
                    "search_url_template must be http(s), got scheme '{}'",
                    parsed.scheme()
                )));
            }
            Err(e) => {
                return Err(self.invalid(format!("search_url_template is not a URL: {e}")));
            }
        }

        let selectors = [
            ("result_item", &self.selectors.result_item),
            ("title", &self.selectors.title),
            ("price", &self.selectors.price),
            ("link", &self.selectors.link),
            ("image", &self.selectors.image),
        ];
        for (name, selector) in selectors {
            if selector.trim().is_empty() {
                return Err(self.invalid(format!("selector '{name}' cannot be empty")));
            }
        }

        if self.navigation_timeout_ms == 0 || self.result_wait_timeout_ms == 0 {
            return Err(self.invalid("timeouts must be positive".to_string()));
        }

        if self.max_items == 0 {
            return Err(self.invalid("max_items must be at least 1".to_string()));
        }

        Ok(())
    }

    fn invalid(&self, reason: String) -> SourceError {
        SourceError::ValidationError {
            marketplace: self.marketplace,
            reason,
        }
    }

    /// Built-in definition for a marketplace.
    #[must_use]
    pub fn builtin(marketplace: Marketplace) -> Self {
        let (template, selectors, price_strategy) = match marketplace {
            Marketplace::Wildberries => (
                "https://www.wildberries.ru/catalog/0/search.aspx?search={query}",
                ResultSelectors {
                    result_item: ".product-card".to_string(),
                    title: ".goods-name".to_string(),
                    price: ".lower-price".to_string(),
                    link: "a".to_string(),
                    image: "img".to_string(),
                },
                PriceStrategy::Decimal,
            ),
            Marketplace::Ozon => (
                "https://www.ozon.ru/search/?text={query}",
                ResultSelectors {
                    result_item: r#"div[data-widget="searchResultsV2"] div[role="listitem"]"#
                        .to_string(),
                    title: "a span".to_string(),
                    price: r#"span[data-widget="price"]"#.to_string(),
                    link: "a".to_string(),
                    image: "img".to_string(),
                },
                PriceStrategy::Decimal,
            ),
            Marketplace::YandexMarket => (
                "https://market.yandex.ru/search?text={query}",
                ResultSelectors {
                    result_item: r#"div[data-zone-name="search-result"]"#.to_string(),
                    title: "h3 a".to_string(),
                    price: r#"[data-auto="mainPrice"]"#.to_string(),
                    link: "h3 a".to_string(),
                    image: "img".to_string(),
                },
                PriceStrategy::DigitsOnly,
            ),
        };

        Self {
            marketplace,
            search_url_template: template.to_string(),
            selectors,
            price_strategy,
            navigation_timeout_ms: DEFAULT_NAVIGATION_TIMEOUT_MS,
            result_wait_timeout_ms: DEFAULT_RESULT_WAIT_TIMEOUT_MS,
            max_items: DEFAULT_MAX_ITEMS,
        }
    }
}
