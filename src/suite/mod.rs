//! The scenario DSL: declarative definitions of end-to-end test cases.
//!
//! A [`Scenario`] is an identifier, a human-readable title and an ordered
//! sequence of [`Step`]s, built at suite-load time and immutable afterwards.

pub mod scenarios;

pub use scenarios::builtin_suite;

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::driver::SelectorSpec;

/// Seeded application role a scenario can authenticate as. Credentials are
/// resolved from configuration at execution time, never embedded in
/// scenario bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Volunteer,
    Admin,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Volunteer => write!(f, "volunteer"),
            Role::Admin => write!(f, "admin"),
        }
    }
}

/// Expected-state predicate, evaluated by polling until it holds or the
/// wait budget elapses.
#[derive(Debug, Clone)]
pub enum Predicate {
    /// An element matching the selector is visible.
    Visible(SelectorSpec),
    /// The current URL matches the regex pattern.
    UrlMatches(String),
    /// The given text is present in the page's rendered text.
    TextPresent(String),
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::Visible(selector) => write!(f, "visible {}", selector),
            Predicate::UrlMatches(pattern) => write!(f, "url matches /{}/", pattern),
            Predicate::TextPresent(text) => write!(f, "text present \"{}\"", text),
        }
    }
}

/// One unit of scenario execution. Owned exclusively by its scenario.
#[derive(Debug, Clone)]
pub enum Step {
    /// Load a URL (relative paths are joined against the configured base).
    Navigate(String),
    Click(SelectorSpec),
    Fill(SelectorSpec, String),
    Assert(Predicate),
    /// Log in as a configured role: the reusable combinator replacing the
    /// login preamble that every dashboard scenario starts with.
    Authenticate(Role),
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Navigate(path) => write!(f, "navigate {}", path),
            Step::Click(selector) => write!(f, "click {}", selector),
            Step::Fill(selector, value) => write!(f, "fill {} = \"{}\"", selector, value),
            Step::Assert(predicate) => write!(f, "assert {}", predicate),
            Step::Authenticate(role) => write!(f, "authenticate as {}", role),
        }
    }
}

/// One end-to-end test case with a single pass/fail outcome.
#[derive(Debug, Clone)]
pub struct Scenario {
    pub id: String,
    pub title: String,
    pub steps: Vec<Step>,
}

impl Scenario {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            steps: Vec::new(),
        }
    }

    pub fn navigate(mut self, path: impl Into<String>) -> Self {
        self.steps.push(Step::Navigate(path.into()));
        self
    }

    pub fn click(mut self, selector: SelectorSpec) -> Self {
        self.steps.push(Step::Click(selector));
        self
    }

    pub fn fill(mut self, selector: SelectorSpec, value: impl Into<String>) -> Self {
        self.steps.push(Step::Fill(selector, value.into()));
        self
    }

    pub fn assert_visible(mut self, selector: SelectorSpec) -> Self {
        self.steps.push(Step::Assert(Predicate::Visible(selector)));
        self
    }

    pub fn assert_url(mut self, pattern: impl Into<String>) -> Self {
        self.steps
            .push(Step::Assert(Predicate::UrlMatches(pattern.into())));
        self
    }

    pub fn assert_text(mut self, text: impl Into<String>) -> Self {
        self.steps
            .push(Step::Assert(Predicate::TextPresent(text.into())));
        self
    }

    pub fn authenticate(mut self, role: Role) -> Self {
        self.steps.push(Step::Authenticate(role));
        self
    }
}
