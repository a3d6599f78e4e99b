use thiserror::Error;

/// Failures the harness can surface for a single step.
///
/// There is deliberately no retry or fallback at this level: every variant
/// immediately fails the enclosing scenario so that failures stay
/// attributable to one precise step.
#[derive(Debug, Error)]
pub enum HarnessError {
    /// The browser session could not be provisioned. Fatal to the scenario
    /// that requested it, never to sibling scenarios.
    #[error("failed to provision browser session: {0}")]
    Session(String),

    /// The page did not reach a stable loaded state within the budget.
    #[error("navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },

    /// Selector resolved to zero elements.
    #[error("no element matched {selector}")]
    ElementNotFound { selector: String },

    /// Selector resolved to more than one element and no ordinal was given.
    #[error("{count} elements matched {selector}; supply an ordinal (e.g. .first()) to disambiguate")]
    AmbiguousElement { selector: String, count: usize },

    /// The resolved element cannot accept text input.
    #[error("element {selector} is not editable: {reason}")]
    ElementNotEditable { selector: String, reason: String },

    /// A polled predicate never held within its timeout. Carries the last
    /// state observed before giving up, for diagnosis.
    #[error("assertion `{assertion}` did not hold within {timeout_ms}ms (last observed: {last_observed})")]
    AssertionTimeout {
        assertion: String,
        timeout_ms: u64,
        last_observed: String,
    },

    /// Uncategorized failure from the underlying automation library.
    #[error("browser backend error: {0}")]
    Backend(String),
}

impl HarnessError {
    pub fn backend<E: std::fmt::Display>(err: E) -> Self {
        HarnessError::Backend(err.to_string())
    }
}
