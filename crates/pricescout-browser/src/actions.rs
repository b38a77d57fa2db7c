use crate::error::{BrowserError, Result};
use async_trait::async_trait;
use std::time::Duration;

/// Reference to one element matched by [`PageHandle::query_all`].
///
/// A handle names the node the page matched when it was queried, not a
/// position: reads keep hitting that node even if the list re-renders.
/// `id` is assigned by the page and only meaningful to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementHandle {
    /// Selector the element was matched by, for error messages
    pub selector: String,
    pub id: usize,
}

impl ElementHandle {
    pub fn new(selector: impl Into<String>, id: usize) -> Self {
        Self {
            selector: selector.into(),
            id,
        }
    }
}

/// Value read from an element by [`PageHandle::eval_on_element`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementProperty {
    /// `el.textContent`
    TextContent,
    /// `el.href`, resolved by the browser
    Href,
    /// `el.src`, resolved by the browser
    Src,
}

impl ElementProperty {
    /// JavaScript expression reading this property from `el`.
    #[must_use]
    pub fn js_accessor(&self) -> &'static str {
        match self {
            Self::TextContent => "el.textContent",
            Self::Href => "el.href",
            Self::Src => "el.src",
        }
    }
}

/// One navigation context. Each concurrently running extractor owns its own page.
#[async_trait]
pub trait PageHandle: Send + Sync {
    /// Navigate to a URL and wait for the load to finish
    async fn navigate(&self, url: &str) -> Result<()>;

    /// Wait for a selector to appear
    async fn wait_for(&self, selector: &str, timeout: Duration) -> Result<()>;

    /// All elements matching `selector`, in document order
    async fn query_all(&self, selector: &str) -> Result<Vec<ElementHandle>>;

    /// Read `property` from the first descendant of `element` matching `selector`
    async fn eval_on_element(
        &self,
        element: &ElementHandle,
        selector: &str,
        property: ElementProperty,
    ) -> Result<String>;

    /// Release the page
    async fn close(&self) -> Result<()>;
}

/// A live browser shared by the pages of one search.
#[async_trait]
pub trait BrowsingSession: Send + Sync {
    /// Open a fresh, independent page
    async fn new_page(&self) -> Result<Box<dyn PageHandle>>;

    /// Shut the browser down. Called exactly once per session.
    async fn close(&mut self) -> Result<()>;
}

/// Starts browsing sessions, one per incoming query.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    async fn open(&self) -> Result<Box<dyn BrowsingSession>>;
}

/// Helper to extract domain from URL
pub fn extract_domain(url: &str) -> Result<String> {
    let url = url::Url::parse(url)
        .map_err(|e| BrowserError::NavigationError(format!("Invalid URL: {}", e)))?;

    url.host_str()
        .ok_or_else(|| BrowserError::NavigationError("No host in URL".to_string()))
        .map(|s| s.to_string())
}
