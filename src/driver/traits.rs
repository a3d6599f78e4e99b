use async_trait::async_trait;
use std::fmt;

use crate::error::HarnessError;

/// Matching strategy for locating one UI element.
#[derive(Debug, Clone, PartialEq)]
pub enum Strategy {
    /// Substring match against rendered text content.
    Text(String),
    /// ARIA role plus accessible name. `exact` controls whether the name
    /// must match whole or as a substring.
    Role {
        role: String,
        name: String,
        exact: bool,
    },
    /// Exact match against an input's placeholder attribute.
    Placeholder(String),
    /// Raw CSS selector.
    Css(String),
    /// Exact match against an arbitrary attribute.
    Attribute { name: String, value: String },
}

/// Declarative locator for exactly one interactive element.
///
/// Resolution is strict: zero matches fail a step, and more than one match
/// is a hard failure unless `nth` names one by document order. There is no
/// silent first-match pick.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectorSpec {
    pub strategy: Strategy,
    /// Ordinal tie-breaker over the document-order match list.
    pub nth: Option<usize>,
}

impl SelectorSpec {
    pub fn by_text(text: impl Into<String>) -> Self {
        Self {
            strategy: Strategy::Text(text.into()),
            nth: None,
        }
    }

    pub fn by_role(role: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            strategy: Strategy::Role {
                role: role.into(),
                name: name.into(),
                exact: false,
            },
            nth: None,
        }
    }

    pub fn by_role_exact(role: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            strategy: Strategy::Role {
                role: role.into(),
                name: name.into(),
                exact: true,
            },
            nth: None,
        }
    }

    pub fn by_placeholder(placeholder: impl Into<String>) -> Self {
        Self {
            strategy: Strategy::Placeholder(placeholder.into()),
            nth: None,
        }
    }

    pub fn by_css(css: impl Into<String>) -> Self {
        Self {
            strategy: Strategy::Css(css.into()),
            nth: None,
        }
    }

    pub fn by_attribute(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            strategy: Strategy::Attribute {
                name: name.into(),
                value: value.into(),
            },
            nth: None,
        }
    }

    /// Select the first match in document order.
    pub fn first(self) -> Self {
        self.nth(0)
    }

    pub fn nth(mut self, index: usize) -> Self {
        self.nth = Some(index);
        self
    }

    /// Render as a Playwright selector string.
    pub fn to_playwright(&self) -> String {
        match &self.strategy {
            // Unquoted `text=` is a substring match in Playwright.
            Strategy::Text(text) => format!("text={}", text),
            Strategy::Role { role, name, exact } => {
                format!(
                    "xpath=//*[{} and {}]",
                    role_predicate(role),
                    name_predicate(name, *exact)
                )
            }
            Strategy::Placeholder(placeholder) => format!("[placeholder=\"{}\"]", placeholder),
            Strategy::Css(css) => css.clone(),
            Strategy::Attribute { name, value } => format!("[{}=\"{}\"]", name, value),
        }
    }
}

impl fmt::Display for SelectorSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.strategy {
            Strategy::Text(text) => write!(f, "text~\"{}\"", text)?,
            Strategy::Role { role, name, exact } => {
                let op = if *exact { "=" } else { "~" };
                write!(f, "role={}[name{}\"{}\"]", role, op, name)?;
            }
            Strategy::Placeholder(placeholder) => write!(f, "placeholder=\"{}\"", placeholder)?,
            Strategy::Css(css) => write!(f, "css={}", css)?,
            Strategy::Attribute { name, value } => write!(f, "[{}=\"{}\"]", name, value)?,
        }
        if let Some(n) = self.nth {
            write!(f, " @nth={}", n)?;
        }
        Ok(())
    }
}

/// XPath predicate restricting element kind for a role.
///
/// Covers the roles the built-in suite uses; unknown roles fall back to an
/// explicit role attribute match.
fn role_predicate(role: &str) -> String {
    match role {
        "button" => format!(
            "(self::button or (self::input and (@type={} or @type={})) or @role={})",
            xpath_literal("button"),
            xpath_literal("submit"),
            xpath_literal("button")
        ),
        "link" => format!("(self::a or @role={})", xpath_literal("link")),
        "heading" => format!(
            "(self::h1 or self::h2 or self::h3 or self::h4 or self::h5 or self::h6 or @role={})",
            xpath_literal("heading")
        ),
        "img" => format!("(self::img or @role={})", xpath_literal("img")),
        other => format!("@role={}", xpath_literal(other)),
    }
}

/// XPath predicate matching the accessible name: rendered text, aria-label,
/// alt text, or an input's value attribute.
fn name_predicate(name: &str, exact: bool) -> String {
    let literal = xpath_literal(name);
    if exact {
        format!(
            "(normalize-space(.)={lit} or @aria-label={lit} or @alt={lit} or @value={lit})",
            lit = literal
        )
    } else {
        format!(
            "(contains(normalize-space(.), {lit}) or contains(@aria-label, {lit}) or contains(@alt, {lit}) or contains(@value, {lit}))",
            lit = literal
        )
    }
}

/// Quote a string as an XPath literal, picking whichever quote style the
/// value does not contain.
fn xpath_literal(value: &str) -> String {
    if !value.contains('"') {
        format!("\"{}\"", value)
    } else if !value.contains('\'') {
        format!("'{}'", value)
    } else {
        let parts: Vec<String> = value
            .split('"')
            .map(|part| format!("\"{}\"", part))
            .collect();
        format!("concat({})", parts.join(", '\"', "))
    }
}

/// The abstract browser-automation capability the harness consumes.
///
/// Any concrete browser-driving library that can satisfy these operations
/// is substitutable; the runner and assertion engine only ever see this
/// trait plus [`SelectorSpec`].
#[async_trait]
pub trait BrowserDriver: Send + Sync {
    /// Load a URL and suspend until the page reports a stable loaded state.
    async fn goto(&self, url: &str) -> Result<(), HarnessError>;

    /// Resolve the selector to exactly one element and click it. Returns
    /// once the click is acknowledged, not once any resulting navigation
    /// completes.
    async fn click(&self, selector: &SelectorSpec) -> Result<(), HarnessError>;

    /// Resolve the selector to exactly one element, clear its current
    /// content and write `value`.
    async fn fill(&self, selector: &SelectorSpec, value: &str) -> Result<(), HarnessError>;

    /// Whether any element matching the selector is currently visible.
    /// Honors `nth` when given; visibility checks do not require a unique
    /// match.
    async fn is_visible(&self, selector: &SelectorSpec) -> Result<bool, HarnessError>;

    /// The page's current URL.
    async fn current_url(&self) -> Result<String, HarnessError>;

    /// All text currently rendered on the page.
    async fn visible_text(&self) -> Result<String, HarnessError>;

    /// Release the session. Idempotent; the executor calls this exactly
    /// once per opened session, on every exit path.
    async fn close(&self) -> Result<(), HarnessError>;
}

/// Provisions one isolated session per scenario.
#[async_trait]
pub trait SessionFactory: Send + Sync {
    async fn open(&self) -> Result<Box<dyn BrowserDriver>, HarnessError>;
}
