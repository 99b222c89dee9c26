//! Browser session lifecycle and the evaluation channel into the page.

pub mod fake;

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::page::Page;
use futures_util::StreamExt;
use serde_json::Value;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::error::{AuditError, Result};

/// One open page in a live browser.
///
/// `evaluate` is the sole channel between orchestrator-side logic and
/// page-side state. Implementations own their underlying automation
/// resources until `close`, which releases them.
#[async_trait]
pub trait PageBackend: Send + Sync {
    /// Loads `url` in the page. Fails with [`AuditError::Navigation`] if
    /// the load does not succeed.
    async fn navigate(&self, url: &str) -> Result<()>;

    /// Runs `expression` inside the page's JavaScript context and marshals
    /// the serializable result back.
    async fn evaluate(&self, expression: &str) -> Result<Value>;

    /// Releases the browser resources. Called exactly once per session.
    async fn close(&mut self) -> Result<()>;
}

/// Real backend over a headless Chromium speaking CDP.
pub struct ChromiumSession {
    browser: Browser,
    page: Page,
    handler: JoinHandle<()>,
}

impl ChromiumSession {
    /// Spawns a headless browser and opens one blank page.
    pub async fn launch() -> Result<Self> {
        debug!(target = "a11y", "launching headless browser");
        let config = BrowserConfig::builder()
            .build()
            .map_err(AuditError::Browser)?;
        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|err| AuditError::Browser(err.to_string()))?;

        // The CDP event loop must be polled for the browser to function.
        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|err| AuditError::Browser(err.to_string()))?;

        Ok(Self {
            browser,
            page,
            handler,
        })
    }
}

#[async_trait]
impl PageBackend for ChromiumSession {
    async fn navigate(&self, url: &str) -> Result<()> {
        self.page.goto(url).await.map(drop).map_err(|err| {
            debug!(target = "a11y", %url, error = %err, "navigation failed");
            AuditError::Navigation {
                url: url.to_string(),
            }
        })
    }

    async fn evaluate(&self, expression: &str) -> Result<Value> {
        let evaluation = self
            .page
            .evaluate(expression)
            .await
            .map_err(|err| AuditError::Eval(err.to_string()))?;
        Ok(evaluation.into_value().unwrap_or(Value::Null))
    }

    async fn close(&mut self) -> Result<()> {
        let closed = self.browser.close().await;
        if closed.is_ok() {
            let _ = self.browser.wait().await;
        }
        self.handler.abort();
        closed
            .map(drop)
            .map_err(|err| AuditError::Browser(err.to_string()))
    }
}
