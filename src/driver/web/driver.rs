//! Playwright-backed browser session.
//!
//! One `WebDriver` owns one isolated browser context and page for the
//! duration of one scenario; sessions are never reused across scenarios.

use async_trait::async_trait;
use log::{debug, warn};
use playwright::api::{Browser, BrowserContext, ElementHandle, Page, Viewport};
use playwright::Playwright;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::Mutex;

use crate::driver::traits::{BrowserDriver, SelectorSpec, SessionFactory};
use crate::error::HarnessError;

/// Browser-level configuration for one session.
#[derive(Debug, Clone)]
pub struct BrowserConfig {
    pub headless: bool,
    pub viewport_width: u32,
    pub viewport_height: u32,
    /// Budget for `goto` before it fails with a navigation error.
    pub navigation_timeout_ms: u64,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            viewport_width: 1280,
            viewport_height: 720,
            navigation_timeout_ms: 10000,
        }
    }
}

/// Live handle to one browser page, scoped to a single scenario.
pub struct WebDriver {
    #[allow(dead_code)]
    playwright: Playwright,
    browser: Browser,
    context: BrowserContext,
    page: Mutex<Page>,
    navigation_timeout: Duration,
    closed: AtomicBool,
}

impl WebDriver {
    /// Provision an isolated browser context and page.
    pub async fn open(config: &BrowserConfig) -> Result<Self, HarnessError> {
        let playwright = Playwright::initialize()
            .await
            .map_err(|e| HarnessError::Session(format!("playwright init failed: {}", e)))?;

        let chromium = playwright.chromium();
        let mut launcher = chromium.launcher().headless(config.headless);

        let env_path = std::env::var("PLAYWRIGHT_CHROMIUM_EXECUTABLE_PATH")
            .ok()
            .map(std::path::PathBuf::from);
        let system_path = find_system_browser();
        if let Some(ref path) = env_path {
            debug!("Using browser from env: {}", path.display());
            launcher = launcher.executable(path);
        } else if let Some(ref path) = system_path {
            debug!("Using discovered browser: {}", path.display());
            launcher = launcher.executable(path);
        }

        let args: Vec<String> = [
            "--no-sandbox",
            "--disable-setuid-sandbox",
            "--disable-dev-shm-usage",
            "--disable-gpu",
            "--ignore-certificate-errors",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();
        launcher = launcher.args(&args);

        let browser = launcher
            .launch()
            .await
            .map_err(|e| HarnessError::Session(format!("browser launch failed: {}", e)))?;

        let context = browser
            .context_builder()
            .build()
            .await
            .map_err(|e| HarnessError::Session(format!("context creation failed: {}", e)))?;

        let page = context
            .new_page()
            .await
            .map_err(|e| HarnessError::Session(format!("page creation failed: {}", e)))?;

        page.set_viewport_size(Viewport {
            width: config.viewport_width as i32,
            height: config.viewport_height as i32,
        })
        .await
        .map_err(HarnessError::backend)?;

        Ok(Self {
            playwright,
            browser,
            context,
            page: Mutex::new(page),
            navigation_timeout: Duration::from_millis(config.navigation_timeout_ms),
            closed: AtomicBool::new(false),
        })
    }

    /// Resolve a selector to exactly one element.
    ///
    /// Zero matches is a hard failure; so is more than one match unless the
    /// selector carries an ordinal, which selects by document order.
    async fn resolve(
        &self,
        page: &Page,
        selector: &SelectorSpec,
    ) -> Result<ElementHandle, HarnessError> {
        let sel = selector.to_playwright();
        let matches = page
            .query_selector_all(&sel)
            .await
            .map_err(HarnessError::backend)?;

        match selector.nth {
            Some(n) => matches
                .into_iter()
                .nth(n)
                .ok_or_else(|| HarnessError::ElementNotFound {
                    selector: selector.to_string(),
                }),
            None => {
                let count = matches.len();
                let mut matches = matches;
                match count {
                    0 => Err(HarnessError::ElementNotFound {
                        selector: selector.to_string(),
                    }),
                    1 => Ok(matches.remove(0)),
                    _ => Err(HarnessError::AmbiguousElement {
                        selector: selector.to_string(),
                        count,
                    }),
                }
            }
        }
    }
}

#[async_trait]
impl BrowserDriver for WebDriver {
    async fn goto(&self, url: &str) -> Result<(), HarnessError> {
        let page = self.page.lock().await;
        debug!("goto {}", url);

        let navigation = page.goto_builder(url).goto();
        match tokio::time::timeout(self.navigation_timeout, navigation).await {
            Ok(Ok(_)) => Ok(()),
            Ok(Err(e)) => Err(HarnessError::Navigation {
                url: url.to_string(),
                reason: e.to_string(),
            }),
            Err(_) => Err(HarnessError::Navigation {
                url: url.to_string(),
                reason: format!("timed out after {}ms", self.navigation_timeout.as_millis()),
            }),
        }
    }

    async fn click(&self, selector: &SelectorSpec) -> Result<(), HarnessError> {
        let page = self.page.lock().await;
        let element = self.resolve(&page, selector).await?;
        debug!("click {}", selector);

        element
            .click_builder()
            .click()
            .await
            .map_err(HarnessError::backend)
    }

    async fn fill(&self, selector: &SelectorSpec, value: &str) -> Result<(), HarnessError> {
        let page = self.page.lock().await;
        let element = self.resolve(&page, selector).await?;
        debug!("fill {} <- {:?}", selector, value);

        // Playwright's fill clears existing content first and rejects
        // elements that cannot accept text input.
        element
            .fill_builder(value)
            .fill()
            .await
            .map_err(|e| HarnessError::ElementNotEditable {
                selector: selector.to_string(),
                reason: e.to_string(),
            })
    }

    async fn is_visible(&self, selector: &SelectorSpec) -> Result<bool, HarnessError> {
        let page = self.page.lock().await;
        let sel = selector.to_playwright();
        let matches = page
            .query_selector_all(&sel)
            .await
            .map_err(HarnessError::backend)?;

        match selector.nth {
            Some(n) => match matches.into_iter().nth(n) {
                Some(element) => element.is_visible().await.map_err(HarnessError::backend),
                None => Ok(false),
            },
            None => {
                for element in matches {
                    if element.is_visible().await.map_err(HarnessError::backend)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
        }
    }

    async fn current_url(&self) -> Result<String, HarnessError> {
        let page = self.page.lock().await;
        page.url().map_err(HarnessError::backend)
    }

    async fn visible_text(&self) -> Result<String, HarnessError> {
        let page = self.page.lock().await;
        let text: String = page
            .evaluate(
                "() => document.body ? document.body.innerText : ''",
                (),
            )
            .await
            .map_err(HarnessError::backend)?;
        Ok(text)
    }

    async fn close(&self) -> Result<(), HarnessError> {
        // Idempotent: the first caller tears down, later callers are no-ops.
        if self.closed.swap(true, Ordering::SeqCst) {
            return Ok(());
        }

        if let Err(e) = self.context.close().await {
            warn!("browser context close failed: {}", e);
        }
        if let Err(e) = self.browser.close().await {
            warn!("browser close failed: {}", e);
        }
        Ok(())
    }
}

/// Opens one fresh Playwright session per scenario.
pub struct WebSessionFactory {
    config: BrowserConfig,
}

impl WebSessionFactory {
    pub fn new(config: BrowserConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl SessionFactory for WebSessionFactory {
    async fn open(&self) -> Result<Box<dyn BrowserDriver>, HarnessError> {
        let driver = WebDriver::open(&self.config).await?;
        Ok(Box::new(driver))
    }
}

fn find_system_browser() -> Option<std::path::PathBuf> {
    let common_paths = [
        // macOS
        "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
        "/Applications/Chromium.app/Contents/MacOS/Chromium",
        // Linux
        "/usr/bin/google-chrome",
        "/usr/bin/google-chrome-stable",
        "/usr/bin/chromium",
        "/usr/bin/chromium-browser",
    ];

    common_paths
        .iter()
        .map(std::path::Path::new)
        .find(|p| p.exists())
        .map(|p| p.to_path_buf())
}
