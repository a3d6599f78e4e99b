use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::suite::Role;

/// Username/password pair for a seeded application account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Suite configuration.
///
/// Everything the scenarios previously carried as literals (target root,
/// wait budgets, seeded accounts) lives here, resolved once at suite start.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SuiteConfig {
    /// Root URL of the application under test. Relative scenario paths are
    /// joined against it.
    pub base_url: String,

    /// Default budget for navigation waits and polled assertions (ms).
    pub default_timeout_ms: u64,

    /// Fixed retry interval for polled assertions (ms).
    pub poll_interval_ms: u64,

    /// Run the browser headless.
    pub headless: bool,

    /// Seeded accounts, keyed by role name.
    pub credentials: HashMap<Role, Credentials>,
}

impl Default for SuiteConfig {
    fn default() -> Self {
        let mut credentials = HashMap::new();
        credentials.insert(
            Role::Volunteer,
            Credentials {
                username: "Vivek".to_string(),
                password: "Vivek123".to_string(),
            },
        );
        credentials.insert(
            Role::Admin,
            Credentials {
                username: "admin".to_string(),
                password: "password".to_string(),
            },
        );

        Self {
            base_url: "https://master--tech-impact.netlify.app".to_string(),
            default_timeout_ms: 10000,
            poll_interval_ms: 200,
            headless: true,
            credentials,
        }
    }
}

impl SuiteConfig {
    /// Load configuration from a YAML file, then apply env overrides.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let mut config: SuiteConfig =
            serde_yaml::from_str(&content).context("Failed to parse config YAML")?;
        config.apply_env();
        Ok(config)
    }

    /// Defaults plus env overrides, for runs without a config file.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env();
        config
    }

    fn apply_env(&mut self) {
        if let Ok(url) = std::env::var("IMPACT_BASE_URL") {
            if !url.is_empty() {
                self.base_url = url;
            }
        }
        if let Ok(v) = std::env::var("IMPACT_HEADLESS") {
            self.headless = v == "true" || v == "1";
        }
        if let Ok(v) = std::env::var("IMPACT_TIMEOUT_MS") {
            if let Ok(ms) = v.parse() {
                self.default_timeout_ms = ms;
            }
        }
    }

    /// Credentials for a role, failing loudly when the fixture is missing.
    pub fn credentials_for(&self, role: Role) -> Result<&Credentials, crate::error::HarnessError> {
        self.credentials.get(&role).ok_or_else(|| {
            crate::error::HarnessError::Session(format!(
                "no credentials configured for role `{}`",
                role
            ))
        })
    }

    /// Join a scenario path against the base URL. Absolute URLs pass through.
    pub fn resolve_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else if path.is_empty() || path == "/" {
            self.base_url.clone()
        } else {
            format!(
                "{}/{}",
                self.base_url.trim_end_matches('/'),
                path.trim_start_matches('/')
            )
        }
    }
}
