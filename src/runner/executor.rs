use colored::Colorize;
use log::warn;
use std::sync::Arc;
use std::time::Duration;

use super::assertions::AssertionEngine;
use super::state::{ScenarioState, ScenarioStateReport, StepState};
use crate::config::SuiteConfig;
use crate::driver::{BrowserDriver, SelectorSpec, SessionFactory};
use crate::error::HarnessError;
use crate::suite::{Role, Scenario, Step};

/// Executes one scenario at a time against a fresh session.
///
/// Steps run strictly in declared order; the first failure transitions the
/// scenario to failed and halts everything after it. The session is closed
/// on every exit path, including session-open failure of later steps and
/// assertion timeouts.
pub struct ScenarioExecutor {
    config: Arc<SuiteConfig>,
}

impl ScenarioExecutor {
    pub fn new(config: Arc<SuiteConfig>) -> Self {
        Self { config }
    }

    /// Run a scenario to its terminal state and return the report.
    pub async fn run(
        &self,
        factory: &dyn SessionFactory,
        scenario: &Scenario,
    ) -> ScenarioStateReport {
        let steps = scenario
            .steps
            .iter()
            .enumerate()
            .map(|(i, step)| StepState::new(i, &step.to_string()))
            .collect();
        let mut state = ScenarioState::new(&scenario.id, &scenario.title, steps);
        state.start();

        println!(
            "{} {} {}",
            "▶".cyan().bold(),
            scenario.id.bold(),
            scenario.title
        );

        let driver = match factory.open().await {
            Ok(driver) => driver,
            Err(e) => {
                if let Some(step) = state.current_step() {
                    step.start();
                }
                println!("  {} {}", "✗".red(), e);
                state.fail(e.to_string());
                return state.to_report();
            }
        };

        let outcome = self.run_steps(driver.as_ref(), scenario, &mut state).await;

        // Scoped-acquisition discipline: the session is released here no
        // matter how the step loop exited.
        if let Err(e) = driver.close().await {
            warn!("{}: session close failed: {}", scenario.id, e);
        }

        match outcome {
            Ok(()) => state.pass(),
            Err(e) => state.fail(e.to_string()),
        }
        state.to_report()
    }

    async fn run_steps(
        &self,
        driver: &dyn BrowserDriver,
        scenario: &Scenario,
        state: &mut ScenarioState,
    ) -> Result<(), HarnessError> {
        for step in &scenario.steps {
            if let Some(step_state) = state.current_step() {
                step_state.start();
            }

            match self.run_step(driver, step).await {
                Ok(()) => {
                    println!("  {} {}", "✓".green(), step);
                    if let Some(step_state) = state.current_step() {
                        step_state.pass();
                    }
                    state.advance();
                }
                Err(e) => {
                    println!("  {} {}", "✗".red(), step);
                    println!("    {}", e.to_string().red());
                    return Err(e);
                }
            }
        }
        Ok(())
    }

    async fn run_step(&self, driver: &dyn BrowserDriver, step: &Step) -> Result<(), HarnessError> {
        match step {
            Step::Navigate(path) => driver.goto(&self.config.resolve_url(path)).await,
            Step::Click(selector) => driver.click(selector).await,
            Step::Fill(selector, value) => driver.fill(selector, value).await,
            Step::Assert(predicate) => {
                AssertionEngine::new(driver, self.config.poll_interval_ms)
                    .check(predicate, self.default_timeout())
                    .await
            }
            Step::Authenticate(role) => self.authenticate(driver, *role).await,
        }
    }

    /// The login sequence every dashboard scenario starts with, resolved
    /// from configured credentials for the given role.
    async fn authenticate(
        &self,
        driver: &dyn BrowserDriver,
        role: Role,
    ) -> Result<(), HarnessError> {
        let credentials = self.config.credentials_for(role)?;

        driver.goto(&self.config.resolve_url("/")).await?;
        driver
            .click(&SelectorSpec::by_text("Login").first())
            .await?;
        driver
            .fill(
                &SelectorSpec::by_css("input[name=\"username\"]"),
                &credentials.username,
            )
            .await?;
        driver
            .fill(
                &SelectorSpec::by_css("input[name=\"password\"]"),
                &credentials.password,
            )
            .await?;
        driver
            .click(&SelectorSpec::by_role("button", "Login"))
            .await?;

        // The dashboard greeting is the observable signal that login
        // completed and the session is authenticated.
        AssertionEngine::new(driver, self.config.poll_interval_ms)
            .assert_visible(
                &SelectorSpec::by_role("heading", "Welcome to Tech Impact"),
                self.default_timeout(),
            )
            .await
    }

    fn default_timeout(&self) -> Duration {
        Duration::from_millis(self.config.default_timeout_ms)
    }
}
