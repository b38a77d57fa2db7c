use crate::actions::{
    BrowsingSession, ElementHandle, ElementProperty, PageHandle, SessionProvider,
};
use crate::error::{BrowserError, Result};
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig as ChromeConfig};
use chromiumoxide::{Element, Page};
use futures_util::stream::StreamExt;
use pricescout_core::BrowserConfig;
use serde_json::Value;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Interval between selector checks in [`PageHandle::wait_for`].
const WAIT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Launches one headless Chrome per search.
#[derive(Debug, Clone)]
pub struct ChromiumLauncher {
    settings: BrowserConfig,
}

impl ChromiumLauncher {
    #[must_use]
    pub fn new(settings: BrowserConfig) -> Self {
        Self { settings }
    }

    fn chrome_config(&self) -> Result<ChromeConfig> {
        let mut builder = ChromeConfig::builder()
            .no_sandbox()
            .window_size(self.settings.window_width, self.settings.window_height);

        if !self.settings.headless {
            builder = builder.with_head();
        }
        if let Some(user_agent) = &self.settings.user_agent {
            builder = builder.arg(format!("--user-agent={user_agent}"));
        }
        if let Some(executable) = &self.settings.chrome_executable {
            builder = builder.chrome_executable(executable);
        }

        builder.build().map_err(BrowserError::ChromiumError)
    }
}

#[async_trait]
impl SessionProvider for ChromiumLauncher {
    async fn open(&self) -> Result<Box<dyn BrowsingSession>> {
        let config = self.chrome_config()?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| BrowserError::ChromiumError(e.to_string()))?;

        // Spawn browser handler
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!(error = %e, "browser handler event error");
                }
            }
        });

        debug!("launched chromium session");

        Ok(Box::new(ChromiumSession {
            browser,
            handler_task: Some(handler_task),
        }))
    }
}

/// A running Chrome process.
pub struct ChromiumSession {
    browser: Browser,
    handler_task: Option<JoinHandle<()>>,
}

#[async_trait]
impl BrowsingSession for ChromiumSession {
    async fn new_page(&self) -> Result<Box<dyn PageHandle>> {
        let page = self
            .browser
            .new_page("about:blank")
            .await
            .map_err(|e| BrowserError::ChromiumError(e.to_string()))?;
        Ok(Box::new(ChromiumPage::new(page)))
    }

    async fn close(&mut self) -> Result<()> {
        let Some(handler_task) = self.handler_task.take() else {
            return Ok(());
        };

        let closed = self
            .browser
            .close()
            .await
            .map_err(|e| BrowserError::ChromiumError(e.to_string()));
        if let Err(e) = self.browser.wait().await {
            warn!(error = %e, "failed waiting for chromium to exit");
        }
        handler_task.abort();

        debug!("closed chromium session");
        closed.map(|_| ())
    }
}

impl Drop for ChromiumSession {
    /// A search cancelled before `close` still stops the handler; dropping
    /// `Browser` kills the child process.
    fn drop(&mut self) {
        if let Some(handler_task) = self.handler_task.take() {
            warn!("chromium session dropped without close");
            handler_task.abort();
        }
    }
}

/// One Chrome tab.
///
/// Elements returned by `query_all` are kept here as remote object references;
/// an [`ElementHandle`] id is an index into this list.
pub struct ChromiumPage {
    page: Page,
    elements: Mutex<Vec<Arc<Element>>>,
}

impl ChromiumPage {
    fn new(page: Page) -> Self {
        Self {
            page,
            elements: Mutex::new(Vec::new()),
        }
    }

    fn element(&self, handle: &ElementHandle) -> Result<Arc<Element>> {
        self.elements
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(handle.id)
            .cloned()
            .ok_or_else(|| {
                BrowserError::EvaluationError(format!(
                    "unknown element {} for '{}'",
                    handle.id, handle.selector
                ))
            })
    }
}

#[async_trait]
impl PageHandle for ChromiumPage {
    async fn navigate(&self, url: &str) -> Result<()> {
        let domain = crate::actions::extract_domain(url)?;
        debug!(%domain, "navigating");

        self.page
            .goto(url)
            .await
            .map_err(|e| BrowserError::NavigationError(format!("{url}: {e}")))?;
        Ok(())
    }

    async fn wait_for(&self, selector: &str, timeout: Duration) -> Result<()> {
        let started = Instant::now();
        loop {
            if self.page.find_element(selector).await.is_ok() {
                return Ok(());
            }
            if started.elapsed() >= timeout {
                return Err(BrowserError::Timeout(format!(
                    "'{selector}' did not appear within {timeout:?}"
                )));
            }
            tokio::time::sleep(WAIT_POLL_INTERVAL).await;
        }
    }

    async fn query_all(&self, selector: &str) -> Result<Vec<ElementHandle>> {
        let found = self
            .page
            .find_elements(selector)
            .await
            .map_err(|e| BrowserError::EvaluationError(format!("{selector}: {e}")))?;

        let mut elements = self
            .elements
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let first_id = elements.len();
        elements.extend(found.into_iter().map(Arc::new));

        Ok((first_id..elements.len())
            .map(|id| ElementHandle::new(selector, id))
            .collect())
    }

    async fn eval_on_element(
        &self,
        element: &ElementHandle,
        selector: &str,
        property: ElementProperty,
    ) -> Result<String> {
        let node = self.element(element)?;
        let returned = node
            .call_js_fn(read_function(selector, property)?, false)
            .await
            .map_err(|e| BrowserError::EvaluationError(e.to_string()))?;

        match returned.result.value {
            Some(Value::String(value)) => Ok(value),
            _ => Err(BrowserError::SelectorNotFound(selector.to_string())),
        }
    }

    async fn close(&self) -> Result<()> {
        self.page
            .clone()
            .close()
            .await
            .map_err(|e| BrowserError::ChromiumError(e.to_string()))
    }
}

/// Selectors are embedded as JSON string literals, which are valid JavaScript.
fn js_string(value: &str) -> Result<String> {
    serde_json::to_string(value).map_err(|e| BrowserError::EvaluationError(e.to_string()))
}

/// Function called with `this` bound to a matched element.
fn read_function(selector: &str, property: ElementProperty) -> Result<String> {
    Ok(format!(
        "function() {{ \
            const el = this.querySelector({sub}); \
            if (!el) return null; \
            const value = {accessor}; \
            return value == null ? null : String(value); \
        }}",
        sub = js_string(selector)?,
        accessor = property.js_accessor(),
    ))
}
