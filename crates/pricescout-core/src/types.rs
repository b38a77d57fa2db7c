//! Shared types used across PriceScout.
//!
//! These types carry the invariants every search result must satisfy, so the
//! scanner and the chat boundary never have to re-check them.

use crate::error::{PriceScoutError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Minimum number of characters (after trimming) a search query must have.
pub const MIN_QUERY_CHARS: usize = 2;

/// The marketplaces PriceScout knows how to search.
///
/// The derived ordering is the order sources appear in aggregated results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Marketplace {
    /// wildberries.ru
    Wildberries,
    /// ozon.ru
    Ozon,
    /// market.yandex.ru
    YandexMarket,
}

impl Marketplace {
    /// All marketplaces, in result order.
    pub const ALL: [Self; 3] = [Self::Wildberries, Self::Ozon, Self::YandexMarket];

    /// Label shown to users.
    #[must_use]
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Wildberries => "Wildberries",
            Self::Ozon => "Ozon",
            Self::YandexMarket => "Yandex.Market",
        }
    }

    /// Stable identifier used in configuration and logs.
    #[must_use]
    pub fn id(&self) -> &'static str {
        match self {
            Self::Wildberries => "wildberries",
            Self::Ozon => "ozon",
            Self::YandexMarket => "yandex-market",
        }
    }
}

impl fmt::Display for Marketplace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Marketplace {
    type Err = PriceScoutError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|m| m.id().eq_ignore_ascii_case(s) || m.display_name().eq_ignore_ascii_case(s))
            .ok_or_else(|| PriceScoutError::UnknownMarketplace(s.to_string()))
    }
}

/// A validated user search query.
///
/// Trimmed, and at least the configured number of characters long. Length is
/// counted in characters, not bytes, so Cyrillic queries are measured correctly.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SearchQuery(String);

impl SearchQuery {
    /// Parse raw user input into a query.
    ///
    /// # Errors
    /// Returns `PriceScoutError::InvalidQuery` if the trimmed input has fewer
    /// than `min_chars` characters.
    pub fn parse(raw: &str, min_chars: usize) -> Result<Self> {
        let trimmed = raw.trim();
        let actual_chars = trimmed.chars().count();
        if actual_chars < min_chars.max(1) {
            return Err(PriceScoutError::InvalidQuery {
                min_chars,
                actual_chars,
            });
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Get the inner string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SearchQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One normalized product record scraped from a marketplace.
///
/// Immutable once constructed; [`ProductListing::new`] is the only way in.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductListing {
    title: String,
    marketplace: Marketplace,
    price: f64,
    url: String,
    image: String,
}

impl ProductListing {
    /// Build a listing, enforcing the output invariants.
    ///
    /// # Errors
    /// Returns `PriceScoutError::InvalidListing` when the title is blank, the
    /// price is negative or not finite, or the URL is not an absolute http(s) URL.
    pub fn new(
        title: impl Into<String>,
        marketplace: Marketplace,
        price: f64,
        url: impl Into<String>,
        image: impl Into<String>,
    ) -> Result<Self> {
        let title = title.into().trim().to_string();
        if title.is_empty() {
            return Err(PriceScoutError::InvalidListing("empty title".to_string()));
        }

        if !price.is_finite() || price < 0.0 {
            return Err(PriceScoutError::InvalidListing(format!(
                "price must be a non-negative number, got {price}"
            )));
        }

        let url = url.into().trim().to_string();
        if !is_absolute_http(&url) {
            return Err(PriceScoutError::InvalidListing(format!(
                "product URL must be absolute http(s), got '{url}'"
            )));
        }

        Ok(Self {
            title,
            marketplace,
            price,
            url,
            image: image.into().trim().to_string(),
        })
    }

    /// Display name of the product.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Marketplace the listing came from.
    #[must_use]
    pub fn marketplace(&self) -> Marketplace {
        self.marketplace
    }

    /// Price in roubles.
    #[must_use]
    pub fn price(&self) -> f64 {
        self.price
    }

    /// Absolute URL of the product page.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Thumbnail URL, empty when the page had none.
    #[must_use]
    pub fn image(&self) -> &str {
        &self.image
    }
}

fn is_absolute_http(candidate: &str) -> bool {
    url::Url::parse(candidate)
        .map(|u| matches!(u.scheme(), "http" | "https") && u.host_str().is_some())
        .unwrap_or(false)
}
