pub mod assertions;
pub mod executor;
pub mod state;

pub use state::*;

use futures::StreamExt;
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

use crate::config::SuiteConfig;
use crate::driver::SessionFactory;
use crate::report::types::SuiteResults;
use crate::suite::Scenario;
use executor::ScenarioExecutor;

/// Suite-level run options.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Substring filter over scenario id and title.
    pub filter: Option<String>,
    /// Number of scenarios in flight at once. Scenarios share no state, so
    /// each concurrent slot gets its own session; 0 or 1 means sequential.
    pub parallel: usize,
}

/// Execute the selected scenarios and aggregate their results.
///
/// One scenario's failure never blocks the others; every selected scenario
/// runs to a terminal state and appears in the results in declaration
/// order.
pub async fn run_suite(
    config: Arc<SuiteConfig>,
    factory: Arc<dyn SessionFactory>,
    scenarios: Vec<Scenario>,
    options: &RunOptions,
) -> SuiteResults {
    let run_id = Uuid::new_v4().to_string();
    let started = Instant::now();

    let selected: Vec<Scenario> = scenarios
        .into_iter()
        .filter(|s| matches_filter(s, options.filter.as_deref()))
        .collect();

    let executor = Arc::new(ScenarioExecutor::new(config));
    let concurrency = options.parallel.max(1);

    let reports: Vec<ScenarioStateReport> = futures::stream::iter(selected)
        .map(|scenario| {
            let executor = executor.clone();
            let factory = factory.clone();
            async move { executor.run(factory.as_ref(), &scenario).await }
        })
        .buffered(concurrency)
        .collect()
        .await;

    let summary = SuiteSummary::from_reports(
        &run_id,
        &reports,
        started.elapsed().as_millis() as u64,
    );

    SuiteResults {
        run_id,
        scenarios: reports,
        summary,
        generated_at: chrono::Utc::now().to_rfc3339(),
    }
}

fn matches_filter(scenario: &Scenario, filter: Option<&str>) -> bool {
    match filter {
        None => true,
        Some(f) => scenario.id.contains(f) || scenario.title.contains(f),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_selects_by_id_or_title() {
        let scenario = Scenario::new("TC010", "Shifts link opens the shift calendar");
        assert!(matches_filter(&scenario, None));
        assert!(matches_filter(&scenario, Some("TC01")));
        assert!(matches_filter(&scenario, Some("calendar")));
        assert!(!matches_filter(&scenario, Some("TC02")));
    }
}
