use super::types::SuiteResults;
use crate::runner::state::{ScenarioStateReport, ScenarioStatus};
use anyhow::Result;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::Writer;
use std::io::Cursor;
use std::path::Path;

/// Generate JUnit XML report string from SuiteResults
pub fn generate_junit_xml(results: &SuiteResults) -> Result<String> {
    let mut writer = Writer::new(Cursor::new(Vec::new()));

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let total_tests = results.scenarios.len();
    let failures = results
        .scenarios
        .iter()
        .filter(|s| matches!(s.status, ScenarioStatus::Failed { .. }))
        .count();
    let skipped = results
        .scenarios
        .iter()
        .filter(|s| matches!(s.status, ScenarioStatus::Skipped { .. }))
        .count();
    let total_duration: u64 = results
        .scenarios
        .iter()
        .map(|s| s.total_duration_ms.unwrap_or(0))
        .sum();

    // <testsuites>
    let mut suites_start = BytesStart::new("testsuites");
    suites_start.push_attribute(("name", "impact-tester-run"));
    suites_start.push_attribute(("tests", total_tests.to_string().as_str()));
    suites_start.push_attribute(("failures", failures.to_string().as_str()));
    suites_start.push_attribute(("skipped", skipped.to_string().as_str()));
    suites_start.push_attribute((
        "time",
        (total_duration as f64 / 1000.0).to_string().as_str(),
    ));
    writer.write_event(Event::Start(suites_start))?;

    // Single <testsuite> for this run
    let mut suite_start = BytesStart::new("testsuite");
    suite_start.push_attribute(("name", "default"));
    suite_start.push_attribute(("tests", total_tests.to_string().as_str()));
    suite_start.push_attribute(("failures", failures.to_string().as_str()));
    suite_start.push_attribute(("skipped", skipped.to_string().as_str()));
    suite_start.push_attribute(("id", results.run_id.as_str()));
    suite_start.push_attribute((
        "time",
        (total_duration as f64 / 1000.0).to_string().as_str(),
    ));
    suite_start.push_attribute(("timestamp", results.generated_at.as_str()));
    writer.write_event(Event::Start(suite_start))?;

    for scenario in &results.scenarios {
        write_test_case(&mut writer, scenario)?;
    }

    writer.write_event(Event::End(BytesEnd::new("testsuite")))?;
    writer.write_event(Event::End(BytesEnd::new("testsuites")))?;

    let result = writer.into_inner().into_inner();
    let xml = String::from_utf8(result)?;
    Ok(xml)
}

fn write_test_case<W: std::io::Write>(
    writer: &mut Writer<W>,
    scenario: &ScenarioStateReport,
) -> Result<()> {
    let mut case_start = BytesStart::new("testcase");

    case_start.push_attribute(("name", scenario.title.as_str()));
    case_start.push_attribute(("classname", scenario.id.as_str()));
    case_start.push_attribute((
        "time",
        (scenario.total_duration_ms.unwrap_or(0) as f64 / 1000.0)
            .to_string()
            .as_str(),
    ));

    writer.write_event(Event::Start(case_start))?;

    match &scenario.status {
        ScenarioStatus::Failed { error, failed_step } => {
            let mut fail_start = BytesStart::new("failure");
            fail_start.push_attribute(("message", error.as_str()));
            fail_start.push_attribute(("type", "AssertionError"));
            writer.write_event(Event::Start(fail_start))?;

            let detail = match scenario.steps.get(*failed_step) {
                Some(step) => format!("step {} ({}): {}", failed_step, step.display, error),
                None => error.clone(),
            };
            writer.write_event(Event::Text(quick_xml::events::BytesText::new(&detail)))?;

            writer.write_event(Event::End(BytesEnd::new("failure")))?;
        }
        ScenarioStatus::Skipped { reason } => {
            let mut skip_start = BytesStart::new("skipped");
            skip_start.push_attribute(("message", reason.as_str()));
            writer.write_event(Event::Start(skip_start))?;
            writer.write_event(Event::End(BytesEnd::new("skipped")))?;
        }
        _ => {}
    }

    writer.write_event(Event::End(BytesEnd::new("testcase")))?;
    Ok(())
}

/// Write report to file
pub fn write_report(results: &SuiteResults, output_dir: &Path) -> Result<()> {
    let xml = generate_junit_xml(results)?;
    let path = output_dir.join("junit.xml");
    std::fs::write(&path, xml)?;
    println!("    Generated JUnit report: {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::state::{StepStateReport, StepStatus, SuiteSummary};

    fn step(index: usize, display: &str, status: StepStatus) -> StepStateReport {
        StepStateReport {
            index,
            display: display.to_string(),
            status,
            duration_ms: Some(10),
        }
    }

    #[test]
    fn test_generate_junit_xml() {
        let results = SuiteResults {
            run_id: "run-1".to_string(),
            scenarios: vec![
                ScenarioStateReport {
                    id: "TC001".to_string(),
                    title: "Landing page loads".to_string(),
                    status: ScenarioStatus::Passed,
                    steps: vec![step(0, "navigate /", StepStatus::Passed)],
                    total_duration_ms: Some(1500),
                },
                ScenarioStateReport {
                    id: "TC002".to_string(),
                    title: "Login link works".to_string(),
                    status: ScenarioStatus::Failed {
                        error: "element not found: text=Login".to_string(),
                        failed_step: 1,
                    },
                    steps: vec![
                        step(0, "navigate /", StepStatus::Passed),
                        step(
                            1,
                            "click text=Login",
                            StepStatus::Failed {
                                error: "element not found: text=Login".to_string(),
                            },
                        ),
                    ],
                    total_duration_ms: Some(2000),
                },
            ],
            summary: SuiteSummary {
                run_id: "run-1".to_string(),
                total: 2,
                passed: 1,
                failed: 1,
                skipped: 0,
                total_duration_ms: 3500,
            },
            generated_at: "2023-01-01 12:00:00".to_string(),
        };

        let xml = generate_junit_xml(&results).expect("Failed to generate XML");

        assert!(xml.contains(r#"<testsuites name="impact-tester-run""#));
        assert!(xml.contains(r#"tests="2""#));
        assert!(xml.contains(r#"failures="1""#));
        assert!(xml.contains(r#"<testcase name="Landing page loads""#));
        assert!(xml.contains(r#"classname="TC002""#));
        assert!(xml.contains("element not found: text=Login"));
    }
}
