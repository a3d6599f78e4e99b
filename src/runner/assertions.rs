//! Eventually-consistent assertions.
//!
//! Every check polls page state at a fixed interval until the predicate
//! holds or the budget elapses. Assertions run against a moving target —
//! the UI may still be reacting to the previous action — so a single
//! point-in-time snapshot is not enough. A predicate that already holds
//! returns on the first check with no artificial wait.

use regex::Regex;
use std::time::{Duration, Instant};

use crate::driver::{BrowserDriver, SelectorSpec};
use crate::error::HarnessError;
use crate::suite::Predicate;

/// Fixed retry interval between predicate checks.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 200;

pub struct AssertionEngine<'a> {
    driver: &'a dyn BrowserDriver,
    poll_interval: Duration,
}

impl<'a> AssertionEngine<'a> {
    pub fn new(driver: &'a dyn BrowserDriver, poll_interval_ms: u64) -> Self {
        Self {
            driver,
            poll_interval: Duration::from_millis(poll_interval_ms.max(1)),
        }
    }

    /// Evaluate a predicate within the given budget.
    pub async fn check(&self, predicate: &Predicate, timeout: Duration) -> Result<(), HarnessError> {
        match predicate {
            Predicate::Visible(selector) => self.assert_visible(selector, timeout).await,
            Predicate::UrlMatches(pattern) => self.assert_url(pattern, timeout).await,
            Predicate::TextPresent(text) => self.assert_text(text, timeout).await,
        }
    }

    pub async fn assert_visible(
        &self,
        selector: &SelectorSpec,
        timeout: Duration,
    ) -> Result<(), HarnessError> {
        let deadline = Instant::now() + timeout;
        loop {
            if self.driver.is_visible(selector).await? {
                return Ok(());
            }
            if Instant::now() >= deadline {
                let url = self
                    .driver
                    .current_url()
                    .await
                    .unwrap_or_else(|_| "<unavailable>".to_string());
                return Err(HarnessError::AssertionTimeout {
                    assertion: format!("visible {}", selector),
                    timeout_ms: timeout.as_millis() as u64,
                    last_observed: format!("element not visible at {}", url),
                });
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }

    pub async fn assert_url(&self, pattern: &str, timeout: Duration) -> Result<(), HarnessError> {
        let regex = Regex::new(pattern)
            .map_err(|e| HarnessError::Backend(format!("invalid URL pattern /{}/: {}", pattern, e)))?;

        let deadline = Instant::now() + timeout;
        loop {
            let url = self.driver.current_url().await?;
            if regex.is_match(&url) {
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(HarnessError::AssertionTimeout {
                    assertion: format!("url matches /{}/", pattern),
                    timeout_ms: timeout.as_millis() as u64,
                    last_observed: url,
                });
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }

    pub async fn assert_text(&self, text: &str, timeout: Duration) -> Result<(), HarnessError> {
        let deadline = Instant::now() + timeout;
        loop {
            let page_text = self.driver.visible_text().await?;
            if page_text.contains(text) {
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(HarnessError::AssertionTimeout {
                    assertion: format!("text present \"{}\"", text),
                    timeout_ms: timeout.as_millis() as u64,
                    last_observed: snippet(&page_text),
                });
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }
}

/// Collapse whitespace and truncate page text for a readable diagnostic.
fn snippet(text: &str) -> String {
    let collapsed: String = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.len() > 160 {
        let mut end = 160;
        while !collapsed.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}…", &collapsed[..end])
    } else if collapsed.is_empty() {
        "<empty page>".to_string()
    } else {
        collapsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snippet_collapses_and_truncates() {
        assert_eq!(snippet("a\n  b\tc"), "a b c");
        assert_eq!(snippet(""), "<empty page>");
        let long = "x".repeat(500);
        let s = snippet(&long);
        assert!(s.len() <= 164);
        assert!(s.ends_with('…'));
    }

    #[test]
    fn url_pattern_semantics() {
        let re = Regex::new(".*login").unwrap();
        assert!(re.is_match("https://host/login"));
        assert!(re.is_match("https://host/login?x=1"));
        assert!(!re.is_match("https://host/register"));
    }
}
