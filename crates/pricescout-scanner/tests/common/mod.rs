//! In-memory browsing capability for scanner tests.
//!
//! Sites are keyed by host. Every page tracks the URL it is showing and logs
//! which URL was active whenever an element was read, so tests can check that
//! concurrent sources never read each other's documents.

#![allow(dead_code)]

use async_trait::async_trait;
use pricescout_browser::{
    BrowserError, BrowsingSession, ElementHandle, ElementProperty, PageHandle, Result,
    SessionProvider,
};
use pricescout_core::Marketplace;
use pricescout_sources::{PriceStrategy, ResultSelectors, SourceDefinition};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug, Clone, Default)]
pub struct FakeItem {
    pub title: Option<String>,
    pub price: Option<String>,
    pub link: Option<String>,
    pub image: Option<String>,
}

impl FakeItem {
    pub fn new(title: &str, price: &str, link: &str, image: &str) -> Self {
        Self {
            title: Some(title.to_string()),
            price: Some(price.to_string()),
            link: Some(link.to_string()),
            image: Some(image.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Behavior {
    Normal,
    /// `navigate` never resolves
    HangOnNavigate,
    /// The result list never appears
    NeverShowResults,
    /// `navigate` returns an error
    FailNavigate,
    /// Reading an element panics
    PanicOnRead,
}

#[derive(Debug, Clone)]
pub struct FakeSite {
    pub items: Vec<FakeItem>,
    pub behavior: Behavior,
    pub load_delay: Duration,
}

impl FakeSite {
    pub fn with_items(items: Vec<FakeItem>) -> Self {
        Self {
            items,
            behavior: Behavior::Normal,
            load_delay: Duration::ZERO,
        }
    }

    pub fn behaving(mut self, behavior: Behavior) -> Self {
        self.behavior = behavior;
        self
    }

    pub fn delayed(mut self, load_delay: Duration) -> Self {
        self.load_delay = load_delay;
        self
    }
}

#[derive(Debug, Clone)]
pub struct ReadRecord {
    pub page_id: usize,
    /// URL the page showed when the element was read
    pub active_url: String,
}

#[derive(Debug, Default)]
pub struct FakeStats {
    pub sessions_opened: AtomicUsize,
    pub sessions_closed: AtomicUsize,
    /// Sessions open right now
    pub sessions_live: AtomicUsize,
    /// Highest value `sessions_live` reached
    pub sessions_peak: AtomicUsize,
    pub pages_opened: AtomicUsize,
    pub pages_closed: AtomicUsize,
    pub navigations: AtomicUsize,
    pub reads: Mutex<Vec<ReadRecord>>,
}

impl FakeStats {
    pub fn count(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }
}

#[derive(Clone)]
pub struct FakeProvider {
    sites: Arc<HashMap<String, FakeSite>>,
    pub stats: Arc<FakeStats>,
    fail_open: bool,
}

impl FakeProvider {
    pub fn new(sites: Vec<(&str, FakeSite)>) -> Self {
        Self {
            sites: Arc::new(
                sites
                    .into_iter()
                    .map(|(host, site)| (host.to_string(), site))
                    .collect(),
            ),
            stats: Arc::new(FakeStats::default()),
            fail_open: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            fail_open: true,
            ..Self::new(Vec::new())
        }
    }
}

#[async_trait]
impl SessionProvider for FakeProvider {
    async fn open(&self) -> Result<Box<dyn BrowsingSession>> {
        if self.fail_open {
            return Err(BrowserError::ChromiumError("no chrome here".to_string()));
        }
        self.stats.sessions_opened.fetch_add(1, Ordering::SeqCst);
        let live = self.stats.sessions_live.fetch_add(1, Ordering::SeqCst) + 1;
        self.stats.sessions_peak.fetch_max(live, Ordering::SeqCst);
        Ok(Box::new(FakeSession {
            sites: Arc::clone(&self.sites),
            stats: Arc::clone(&self.stats),
            next_page_id: AtomicUsize::new(0),
        }))
    }
}

struct FakeSession {
    sites: Arc<HashMap<String, FakeSite>>,
    stats: Arc<FakeStats>,
    next_page_id: AtomicUsize,
}

#[async_trait]
impl BrowsingSession for FakeSession {
    async fn new_page(&self) -> Result<Box<dyn PageHandle>> {
        self.stats.pages_opened.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(FakePage {
            id: self.next_page_id.fetch_add(1, Ordering::SeqCst),
            sites: Arc::clone(&self.sites),
            stats: Arc::clone(&self.stats),
            current_url: Mutex::new(None),
        }))
    }

    async fn close(&mut self) -> Result<()> {
        self.stats.sessions_closed.fetch_add(1, Ordering::SeqCst);
        self.stats.sessions_live.fetch_sub(1, Ordering::SeqCst);
        Ok(())
    }
}

struct FakePage {
    id: usize,
    sites: Arc<HashMap<String, FakeSite>>,
    stats: Arc<FakeStats>,
    current_url: Mutex<Option<String>>,
}

impl FakePage {
    fn current_url(&self) -> Option<String> {
        self.current_url.lock().unwrap().clone()
    }

    fn current_site(&self) -> Result<FakeSite> {
        let url = self
            .current_url()
            .ok_or_else(|| BrowserError::NavigationError("blank page".to_string()))?;
        let host = url::Url::parse(&url)
            .ok()
            .and_then(|u| u.host_str().map(str::to_string))
            .unwrap_or_default();
        self.sites
            .get(&host)
            .cloned()
            .ok_or_else(|| BrowserError::NavigationError(format!("unknown host {host}")))
    }
}

#[async_trait]
impl PageHandle for FakePage {
    async fn navigate(&self, url: &str) -> Result<()> {
        self.stats.navigations.fetch_add(1, Ordering::SeqCst);
        *self.current_url.lock().unwrap() = Some(url.to_string());
        let site = self.current_site()?;

        match site.behavior {
            Behavior::HangOnNavigate => std::future::pending::<()>().await,
            Behavior::FailNavigate => {
                return Err(BrowserError::NavigationError("connection reset".to_string()))
            }
            _ => {}
        }
        tokio::time::sleep(site.load_delay).await;
        Ok(())
    }

    async fn wait_for(&self, _selector: &str, _timeout: Duration) -> Result<()> {
        let site = self.current_site()?;
        if site.behavior == Behavior::NeverShowResults {
            std::future::pending::<()>().await;
        }
        Ok(())
    }

    async fn query_all(&self, selector: &str) -> Result<Vec<ElementHandle>> {
        let site = self.current_site()?;
        Ok((0..site.items.len())
            .map(|id| ElementHandle::new(selector, id))
            .collect())
    }

    async fn eval_on_element(
        &self,
        element: &ElementHandle,
        selector: &str,
        property: ElementProperty,
    ) -> Result<String> {
        // Let other pages run between reads
        tokio::task::yield_now().await;

        let site = self.current_site()?;
        self.stats.reads.lock().unwrap().push(ReadRecord {
            page_id: self.id,
            active_url: self.current_url().unwrap_or_default(),
        });

        if site.behavior == Behavior::PanicOnRead {
            panic!("renderer crashed");
        }

        let item = site
            .items
            .get(element.id)
            .ok_or_else(|| BrowserError::SelectorNotFound(element.selector.clone()))?;
        let value = match (selector, property) {
            (".title", ElementProperty::TextContent) => item.title.clone(),
            (".price", ElementProperty::TextContent) => item.price.clone(),
            ("a", ElementProperty::Href) => item.link.clone(),
            ("img", ElementProperty::Src) => item.image.clone(),
            _ => None,
        };
        value.ok_or_else(|| BrowserError::SelectorNotFound(selector.to_string()))
    }

    async fn close(&self) -> Result<()> {
        self.stats.pages_closed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Definition whose selectors match the fake DOM.
pub fn definition(
    marketplace: Marketplace,
    host: &str,
    strategy: PriceStrategy,
) -> SourceDefinition {
    SourceDefinition {
        marketplace,
        search_url_template: format!("https://{host}/search?q={{query}}"),
        selectors: ResultSelectors {
            result_item: ".card".to_string(),
            title: ".title".to_string(),
            price: ".price".to_string(),
            link: "a".to_string(),
            image: "img".to_string(),
        },
        price_strategy: strategy,
        navigation_timeout_ms: 1_000,
        result_wait_timeout_ms: 500,
        max_items: 5,
    }
}

/// `count` well-formed items linking back to `host`.
pub fn items(host: &str, prefix: &str, count: usize) -> Vec<FakeItem> {
    (0..count)
        .map(|i| {
            FakeItem::new(
                &format!("  {prefix} {i}  "),
                &format!("{} 990 ₽", i + 1),
                &format!("https://{host}/product/{i}"),
                &format!("https://img.{host}/{i}.jpg"),
            )
        })
        .collect()
}
