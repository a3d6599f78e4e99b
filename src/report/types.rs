use crate::runner::state::{ScenarioStateReport, SuiteSummary};
use serde::{Deserialize, Serialize};

/// The persisted output of one suite run, consumed by report generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuiteResults {
    pub run_id: String,
    pub scenarios: Vec<ScenarioStateReport>,
    pub summary: SuiteSummary,
    pub generated_at: String,
}
