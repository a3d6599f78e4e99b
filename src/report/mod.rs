pub mod json;
pub mod junit;
pub mod types;

use anyhow::Result;
use colored::Colorize;
use std::path::Path;

use crate::runner::state::ScenarioStatus;
use types::SuiteResults;

/// Generate report from saved run results
pub async fn generate_report(
    results_path: &Path,
    format: &str,
    output: Option<&Path>,
) -> Result<()> {
    let results = std::fs::read_to_string(results_path)?;
    let suite_results: SuiteResults = serde_json::from_str(&results)?;

    match format {
        "json" => json::generate(&suite_results, output).await,
        "junit" => {
            let xml = junit::generate_junit_xml(&suite_results)?;
            if let Some(path) = output {
                std::fs::write(path, xml)?;
                println!("JUnit report saved to: {}", path.display());
            } else {
                println!("{}", xml);
            }
            Ok(())
        }
        _ => anyhow::bail!("Unknown format: {}", format),
    }
}

/// Print the per-scenario outcomes and the run summary to the console.
pub fn print_summary(results: &SuiteResults) {
    println!();
    println!("{}", "Results".bold());
    for scenario in &results.scenarios {
        let duration = scenario
            .total_duration_ms
            .map(|ms| format!(" ({:.1}s)", ms as f64 / 1000.0))
            .unwrap_or_default();
        match &scenario.status {
            ScenarioStatus::Passed => {
                println!(
                    "  {} {} {}{}",
                    "PASS".green().bold(),
                    scenario.id,
                    scenario.title,
                    duration
                );
            }
            ScenarioStatus::Failed { error, failed_step } => {
                println!(
                    "  {} {} {}{}",
                    "FAIL".red().bold(),
                    scenario.id,
                    scenario.title,
                    duration
                );
                println!("       step {}: {}", failed_step, error.red());
            }
            ScenarioStatus::Skipped { reason } => {
                println!(
                    "  {} {} {} ({})",
                    "SKIP".yellow().bold(),
                    scenario.id,
                    scenario.title,
                    reason
                );
            }
            other => {
                println!("  {:?} {} {}", other, scenario.id, scenario.title);
            }
        }
    }

    let summary = &results.summary;
    println!();
    println!(
        "{} {} passed, {} failed, {} skipped of {} in {:.1}s",
        if summary.failed == 0 {
            "✓".green().bold()
        } else {
            "✗".red().bold()
        },
        summary.passed.to_string().green(),
        summary.failed.to_string().red(),
        summary.skipped,
        summary.total,
        summary.total_duration_ms as f64 / 1000.0
    );
}

/// Persist run results as JSON for later report generation.
pub fn save_results(results: &SuiteResults, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, serde_json::to_string_pretty(results)?)?;
    println!("Results saved to: {}", path.display());
    Ok(())
}
