use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Execution status of a single step.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StepStatus {
    Pending,
    Running,
    Passed,
    Failed { error: String },
    Skipped { reason: String },
}

/// State for one step of a scenario.
#[derive(Debug, Clone)]
pub struct StepState {
    pub index: usize,
    pub display: String,
    pub status: StepStatus,
    pub started_at: Option<Instant>,
    pub duration_ms: Option<u64>,
}

impl StepState {
    pub fn new(index: usize, display: &str) -> Self {
        Self {
            index,
            display: display.to_string(),
            status: StepStatus::Pending,
            started_at: None,
            duration_ms: None,
        }
    }

    pub fn start(&mut self) {
        self.status = StepStatus::Running;
        self.started_at = Some(Instant::now());
    }

    pub fn pass(&mut self) {
        self.finish(StepStatus::Passed);
    }

    pub fn fail(&mut self, error: String) {
        self.finish(StepStatus::Failed { error });
    }

    pub fn skip(&mut self, reason: String) {
        self.status = StepStatus::Skipped { reason };
    }

    fn finish(&mut self, status: StepStatus) {
        self.status = status;
        if let Some(start) = self.started_at {
            self.duration_ms = Some(start.elapsed().as_millis() as u64);
        }
    }

    pub fn to_report(&self) -> StepStateReport {
        StepStateReport {
            index: self.index,
            display: self.display.clone(),
            status: self.status.clone(),
            duration_ms: self.duration_ms,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepStateReport {
    pub index: usize,
    pub display: String,
    pub status: StepStatus,
    pub duration_ms: Option<u64>,
}

/// Scenario outcome. `Failed` cites the first failing step; nothing after
/// it executes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ScenarioStatus {
    Pending,
    Running,
    Passed,
    Failed { error: String, failed_step: usize },
    Skipped { reason: String },
}

/// State machine for one scenario: Pending -> Running -> terminal.
#[derive(Debug, Clone)]
pub struct ScenarioState {
    pub id: String,
    pub title: String,
    pub status: ScenarioStatus,
    pub steps: Vec<StepState>,
    pub current_index: usize,
    pub started_at: Option<Instant>,
    pub total_duration_ms: Option<u64>,
}

impl ScenarioState {
    pub fn new(id: &str, title: &str, steps: Vec<StepState>) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            status: ScenarioStatus::Pending,
            steps,
            current_index: 0,
            started_at: None,
            total_duration_ms: None,
        }
    }

    pub fn start(&mut self) {
        self.status = ScenarioStatus::Running;
        self.started_at = Some(Instant::now());
    }

    pub fn current_step(&mut self) -> Option<&mut StepState> {
        self.steps.get_mut(self.current_index)
    }

    /// Move to the next step; false once the sequence is exhausted.
    pub fn advance(&mut self) -> bool {
        self.current_index += 1;
        self.current_index < self.steps.len()
    }

    /// Terminal transition after a failing step: record the failure, skip
    /// everything after it.
    pub fn fail(&mut self, error: String) {
        let failed_step = self.current_index;
        if let Some(step) = self.current_step() {
            step.fail(error.clone());
        }
        for step in self.steps.iter_mut().skip(failed_step + 1) {
            if matches!(step.status, StepStatus::Pending) {
                step.skip("previous step failed".to_string());
            }
        }
        self.status = ScenarioStatus::Failed { error, failed_step };
        self.record_duration();
    }

    pub fn pass(&mut self) {
        self.status = ScenarioStatus::Passed;
        self.record_duration();
    }

    pub fn skip(&mut self, reason: &str) {
        for step in &mut self.steps {
            step.skip(reason.to_string());
        }
        self.status = ScenarioStatus::Skipped {
            reason: reason.to_string(),
        };
    }

    fn record_duration(&mut self) {
        if let Some(start) = self.started_at {
            self.total_duration_ms = Some(start.elapsed().as_millis() as u64);
        }
    }

    pub fn to_report(&self) -> ScenarioStateReport {
        ScenarioStateReport {
            id: self.id.clone(),
            title: self.title.clone(),
            status: self.status.clone(),
            steps: self.steps.iter().map(|s| s.to_report()).collect(),
            total_duration_ms: self.total_duration_ms,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioStateReport {
    pub id: String,
    pub title: String,
    pub status: ScenarioStatus,
    pub steps: Vec<StepStateReport>,
    pub total_duration_ms: Option<u64>,
}

impl ScenarioStateReport {
    pub fn passed(&self) -> bool {
        matches!(self.status, ScenarioStatus::Passed)
    }
}

/// Aggregate counters for a whole run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuiteSummary {
    pub run_id: String,
    pub total: u32,
    pub passed: u32,
    pub failed: u32,
    pub skipped: u32,
    pub total_duration_ms: u64,
}

impl SuiteSummary {
    pub fn from_reports(run_id: &str, reports: &[ScenarioStateReport], duration_ms: u64) -> Self {
        let mut passed = 0;
        let mut failed = 0;
        let mut skipped = 0;
        for report in reports {
            match report.status {
                ScenarioStatus::Passed => passed += 1,
                ScenarioStatus::Failed { .. } => failed += 1,
                ScenarioStatus::Skipped { .. } => skipped += 1,
                _ => {}
            }
        }
        Self {
            run_id: run_id.to_string(),
            total: reports.len() as u32,
            passed,
            failed,
            skipped,
            total_duration_ms: duration_ms,
        }
    }

    pub fn all_passed(&self) -> bool {
        self.failed == 0 && self.skipped == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three_steps() -> Vec<StepState> {
        (0..3).map(|i| StepState::new(i, &format!("step {}", i))).collect()
    }

    #[test]
    fn failure_cites_the_failing_index_and_skips_the_rest() {
        let mut state = ScenarioState::new("TC900", "failure path", three_steps());
        state.start();
        state.current_step().unwrap().start();
        state.current_step().unwrap().pass();
        state.advance();

        state.current_step().unwrap().start();
        state.fail("element not found".to_string());

        match &state.status {
            ScenarioStatus::Failed { failed_step, error } => {
                assert_eq!(*failed_step, 1);
                assert_eq!(error, "element not found");
            }
            other => panic!("unexpected status {:?}", other),
        }
        assert_eq!(state.steps[0].status, StepStatus::Passed);
        assert!(matches!(state.steps[1].status, StepStatus::Failed { .. }));
        assert!(matches!(state.steps[2].status, StepStatus::Skipped { .. }));
    }

    #[test]
    fn clean_run_passes() {
        let mut state = ScenarioState::new("TC901", "happy path", three_steps());
        state.start();
        loop {
            state.current_step().unwrap().start();
            state.current_step().unwrap().pass();
            if !state.advance() {
                break;
            }
        }
        state.pass();
        assert_eq!(state.status, ScenarioStatus::Passed);
        assert!(state.to_report().passed());
    }

    #[test]
    fn summary_counts_outcomes() {
        let mut passed = ScenarioState::new("a", "a", vec![]);
        passed.start();
        passed.pass();
        let mut failed = ScenarioState::new("b", "b", three_steps());
        failed.start();
        failed.current_step().unwrap().start();
        failed.fail("boom".to_string());

        let reports = vec![passed.to_report(), failed.to_report()];
        let summary = SuiteSummary::from_reports("run-1", &reports, 1234);
        assert_eq!(summary.total, 2);
        assert_eq!(summary.passed, 1);
        assert_eq!(summary.failed, 1);
        assert!(!summary.all_passed());
    }
}
