use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use std::sync::Arc;

use impact_tester::config::SuiteConfig;
use impact_tester::driver::{BrowserConfig, WebSessionFactory};
use impact_tester::runner::{run_suite, RunOptions};
use impact_tester::suite::builtin_suite;
use impact_tester::report;

#[derive(Parser)]
#[command(name = "impact-tester")]
#[command(version = "0.1.0")]
#[command(about = "Browser end-to-end test runner for the Tech Impact volunteer portal", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the scenario suite
    Run {
        /// Path to a YAML suite configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Only run scenarios whose id or title contains this substring
        #[arg(short, long)]
        filter: Option<String>,

        /// Run the browser headless
        #[arg(long)]
        headless: bool,

        /// Number of scenarios to run concurrently
        #[arg(long, default_value = "1")]
        parallel: usize,

        /// Output directory for results and reports
        #[arg(short, long, default_value = "./output")]
        output: PathBuf,

        /// Generate a JUnit report alongside the JSON results
        #[arg(long, default_value = "false")]
        report: bool,
    },

    /// List the scenarios in the suite
    List {
        /// Only list scenarios whose id or title contains this substring
        #[arg(short, long)]
        filter: Option<String>,
    },

    /// Generate report from saved run results
    Report {
        /// Path to run results JSON
        results: PathBuf,

        /// Output format (json, junit)
        #[arg(short, long, default_value = "junit")]
        format: String,

        /// Output file path
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            filter,
            headless,
            parallel,
            output,
            report: with_report,
        } => {
            let mut suite_config = match config {
                Some(path) => SuiteConfig::load(&path)?,
                None => SuiteConfig::from_env(),
            };
            if headless {
                suite_config.headless = true;
            }

            println!(
                "{} Running suite against: {}",
                "▶".green().bold(),
                suite_config.base_url.cyan()
            );
            if let Some(ref f) = filter {
                println!("  Filter: {}", f.yellow());
            }
            if parallel > 1 {
                println!("  Parallel: {}", parallel.to_string().yellow());
            }
            println!("  Output: {}", output.display().to_string().cyan());

            let suite_config = Arc::new(suite_config);
            let factory = Arc::new(WebSessionFactory::new(BrowserConfig {
                headless: suite_config.headless,
                navigation_timeout_ms: suite_config.default_timeout_ms,
                ..BrowserConfig::default()
            }));

            let options = RunOptions { filter, parallel };
            let results =
                run_suite(suite_config, factory, builtin_suite(), &options).await;

            report::print_summary(&results);

            std::fs::create_dir_all(&output)?;
            report::save_results(&results, &output.join("results.json"))?;
            if with_report {
                report::junit::write_report(&results, &output)?;
            }

            if !results.summary.all_passed() {
                std::process::exit(1);
            }
        }

        Commands::List { filter } => {
            for scenario in builtin_suite() {
                let matches = match filter.as_deref() {
                    None => true,
                    Some(f) => scenario.id.contains(f) || scenario.title.contains(f),
                };
                if matches {
                    println!(
                        "{}  {} ({} steps)",
                        scenario.id.bold(),
                        scenario.title,
                        scenario.steps.len()
                    );
                }
            }
        }

        Commands::Report {
            results,
            format,
            output,
        } => {
            println!(
                "{} Generating {} report from: {}",
                "▶".blue(),
                format.cyan(),
                results.display()
            );
            report::generate_report(&results, &format, output.as_deref()).await?;
        }
    }

    Ok(())
}
