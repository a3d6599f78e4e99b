//! Runner integration tests against a scripted in-memory driver.
//!
//! The mock models just enough of a page to exercise the scenario state
//! machine, session lifecycle and polling assertions without a browser.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use impact_tester::config::SuiteConfig;
use impact_tester::driver::{BrowserDriver, SelectorSpec, SessionFactory};
use impact_tester::error::HarnessError;
use impact_tester::runner::executor::ScenarioExecutor;
use impact_tester::runner::state::{ScenarioStatus, StepStatus};
use impact_tester::runner::{run_suite, RunOptions};
use impact_tester::suite::{Role, Scenario};

/// Scripted page state. Selectors are keyed by their display rendering.
#[derive(Default)]
struct PageModel {
    url: String,
    /// Selectors that resolve and are visible.
    visible: HashSet<String>,
    /// Selectors that become visible after this many failed checks.
    visible_after: HashMap<String, usize>,
    /// Selectors that fail resolution for click/fill.
    missing: HashSet<String>,
    /// Number of elements a strategy resolves to, when not exactly one.
    match_counts: HashMap<String, usize>,
    /// Click target -> URL the mock app navigates to.
    click_routes: HashMap<String, String>,
    page_text: String,
    clicks: Vec<String>,
    fills: Vec<(String, String)>,
    visibility_checks: usize,
}

impl PageModel {
    fn show(&mut self, selector: &SelectorSpec) {
        self.visible.insert(selector.to_string());
    }

    fn show_after(&mut self, selector: &SelectorSpec, failed_checks: usize) {
        self.visible_after
            .insert(selector.to_string(), failed_checks);
    }

    fn remove(&mut self, selector: &SelectorSpec) {
        self.missing.insert(selector.to_string());
    }

    /// Make a strategy resolve to `count` elements in document order.
    fn matches(&mut self, selector: &SelectorSpec, count: usize) {
        self.match_counts.insert(selector.to_playwright(), count);
    }

    /// Strict resolution, mirroring the real driver: zero matches and
    /// un-ordinaled multi-matches are hard failures.
    fn resolve(&self, selector: &SelectorSpec) -> Result<(), HarnessError> {
        if self.missing.contains(&selector.to_string()) {
            return Err(HarnessError::ElementNotFound {
                selector: selector.to_string(),
            });
        }
        let count = *self
            .match_counts
            .get(&selector.to_playwright())
            .unwrap_or(&1);
        match selector.nth {
            Some(n) if n < count => Ok(()),
            Some(_) => Err(HarnessError::ElementNotFound {
                selector: selector.to_string(),
            }),
            None => match count {
                0 => Err(HarnessError::ElementNotFound {
                    selector: selector.to_string(),
                }),
                1 => Ok(()),
                _ => Err(HarnessError::AmbiguousElement {
                    selector: selector.to_string(),
                    count,
                }),
            },
        }
    }

    fn route_click(&mut self, selector: &SelectorSpec, url: &str) {
        self.click_routes
            .insert(selector.to_string(), url.to_string());
    }
}

struct MockDriver {
    page: Arc<Mutex<PageModel>>,
    closes: Arc<AtomicUsize>,
    closed: AtomicBool,
}

#[async_trait]
impl BrowserDriver for MockDriver {
    async fn goto(&self, url: &str) -> Result<(), HarnessError> {
        self.page.lock().unwrap().url = url.to_string();
        Ok(())
    }

    async fn click(&self, selector: &SelectorSpec) -> Result<(), HarnessError> {
        let key = selector.to_string();
        let mut page = self.page.lock().unwrap();
        page.resolve(selector)?;
        page.clicks.push(key.clone());
        if let Some(url) = page.click_routes.get(&key).cloned() {
            page.url = url;
        }
        Ok(())
    }

    async fn fill(&self, selector: &SelectorSpec, value: &str) -> Result<(), HarnessError> {
        let key = selector.to_string();
        let mut page = self.page.lock().unwrap();
        page.resolve(selector)?;
        page.fills.push((key, value.to_string()));
        Ok(())
    }

    async fn is_visible(&self, selector: &SelectorSpec) -> Result<bool, HarnessError> {
        let key = selector.to_string();
        let mut page = self.page.lock().unwrap();
        page.visibility_checks += 1;
        if let Some(remaining) = page.visible_after.get_mut(&key) {
            if *remaining > 0 {
                *remaining -= 1;
                return Ok(false);
            }
            return Ok(true);
        }
        Ok(page.visible.contains(&key))
    }

    async fn current_url(&self) -> Result<String, HarnessError> {
        Ok(self.page.lock().unwrap().url.clone())
    }

    async fn visible_text(&self) -> Result<String, HarnessError> {
        Ok(self.page.lock().unwrap().page_text.clone())
    }

    async fn close(&self) -> Result<(), HarnessError> {
        if !self.closed.swap(true, Ordering::SeqCst) {
            self.closes.fetch_add(1, Ordering::SeqCst);
        }
        Ok(())
    }
}

/// Hands out one scripted session per scenario and counts the lifecycle.
struct MockFactory {
    build_page: Box<dyn Fn(&mut PageModel) + Send + Sync>,
    opens: AtomicUsize,
    closes: Arc<AtomicUsize>,
    sessions: Mutex<Vec<Arc<Mutex<PageModel>>>>,
    fail_open: bool,
}

impl MockFactory {
    fn new(build_page: impl Fn(&mut PageModel) + Send + Sync + 'static) -> Self {
        Self {
            build_page: Box::new(build_page),
            opens: AtomicUsize::new(0),
            closes: Arc::new(AtomicUsize::new(0)),
            sessions: Mutex::new(Vec::new()),
            fail_open: false,
        }
    }

    fn failing_open() -> Self {
        let mut factory = Self::new(|_| {});
        factory.fail_open = true;
        factory
    }

    fn opens(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }

    fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }

    fn session(&self, index: usize) -> Arc<Mutex<PageModel>> {
        self.sessions.lock().unwrap()[index].clone()
    }
}

#[async_trait]
impl SessionFactory for MockFactory {
    async fn open(&self) -> Result<Box<dyn BrowserDriver>, HarnessError> {
        if self.fail_open {
            return Err(HarnessError::Session("no browser available".to_string()));
        }
        self.opens.fetch_add(1, Ordering::SeqCst);
        let mut model = PageModel::default();
        (self.build_page)(&mut model);
        let page = Arc::new(Mutex::new(model));
        self.sessions.lock().unwrap().push(page.clone());
        Ok(Box::new(MockDriver {
            page,
            closes: self.closes.clone(),
            closed: AtomicBool::new(false),
        }))
    }
}

fn fast_config() -> Arc<SuiteConfig> {
    let mut config = SuiteConfig::default();
    config.base_url = "https://portal.test".to_string();
    config.default_timeout_ms = 300;
    config.poll_interval_ms = 10;
    Arc::new(config)
}

fn login_button() -> SelectorSpec {
    SelectorSpec::by_role("button", "Login")
}

fn welcome_heading() -> SelectorSpec {
    SelectorSpec::by_role("heading", "Welcome to Tech Impact")
}

#[tokio::test]
async fn session_opened_and_closed_once_per_scenario() {
    let factory = MockFactory::new(|page| {
        page.remove(&SelectorSpec::by_text("Broken"));
    });
    let executor = ScenarioExecutor::new(fast_config());

    let passing = Scenario::new("TC900", "passes").navigate("/");
    let failing = Scenario::new("TC901", "fails")
        .navigate("/")
        .click(SelectorSpec::by_text("Broken"));

    let first = executor.run(&factory, &passing).await;
    let second = executor.run(&factory, &failing).await;

    assert!(first.passed());
    assert!(!second.passed());
    assert_eq!(factory.opens(), 2);
    assert_eq!(factory.closes(), 2);
}

#[tokio::test]
async fn open_failure_fails_the_scenario_at_step_zero() {
    let factory = MockFactory::failing_open();
    let executor = ScenarioExecutor::new(fast_config());

    let scenario = Scenario::new("TC902", "never starts")
        .navigate("/")
        .assert_url(".*portal");
    let report = executor.run(&factory, &scenario).await;

    match report.status {
        ScenarioStatus::Failed { failed_step, ref error } => {
            assert_eq!(failed_step, 0);
            assert!(error.contains("no browser available"));
        }
        ref other => panic!("unexpected status {:?}", other),
    }
    assert_eq!(factory.closes(), 0);
}

#[tokio::test]
async fn failure_halts_the_scenario_and_skips_the_rest() {
    let factory = MockFactory::new(|page| {
        page.remove(&SelectorSpec::by_text("Missing"));
    });
    let executor = ScenarioExecutor::new(fast_config());

    let scenario = Scenario::new("TC903", "halts on failure")
        .navigate("/")
        .click(SelectorSpec::by_text("Missing"))
        .fill(SelectorSpec::by_css("input[name=\"q\"]"), "never typed")
        .assert_text("never checked");
    let report = executor.run(&factory, &scenario).await;

    match report.status {
        ScenarioStatus::Failed { failed_step, .. } => assert_eq!(failed_step, 1),
        ref other => panic!("unexpected status {:?}", other),
    }
    assert_eq!(report.steps[0].status, StepStatus::Passed);
    assert!(matches!(report.steps[1].status, StepStatus::Failed { .. }));
    assert!(matches!(report.steps[2].status, StepStatus::Skipped { .. }));
    assert!(matches!(report.steps[3].status, StepStatus::Skipped { .. }));

    // Nothing after the failing click reached the page.
    let page = factory.session(0);
    assert!(page.lock().unwrap().fills.is_empty());
}

#[tokio::test]
async fn visibility_assertion_retries_until_the_element_appears() {
    let factory = MockFactory::new(|page| {
        // Invisible for the first two checks, visible from the third.
        page.show_after(&welcome_heading(), 2);
    });
    let executor = ScenarioExecutor::new(fast_config());

    let scenario = Scenario::new("TC904", "late element").assert_visible(welcome_heading());
    let report = executor.run(&factory, &scenario).await;

    assert!(report.passed(), "status: {:?}", report.status);
}

#[tokio::test]
async fn visibility_assertion_already_true_returns_on_the_first_check() {
    let factory = MockFactory::new(|page| {
        page.show(&welcome_heading());
    });
    let executor = ScenarioExecutor::new(fast_config());

    let scenario = Scenario::new("TC911", "already there").assert_visible(welcome_heading());
    let report = executor.run(&factory, &scenario).await;

    assert!(report.passed(), "status: {:?}", report.status);
    // No polling happened: one check, no retries.
    assert_eq!(factory.session(0).lock().unwrap().visibility_checks, 1);
}

#[tokio::test]
async fn ambiguous_matches_require_an_ordinal() {
    let factory = MockFactory::new(|page| {
        // The page renders two Login buttons.
        page.matches(&SelectorSpec::by_role("button", "Login"), 2);
    });
    let executor = ScenarioExecutor::new(fast_config());

    let ambiguous = Scenario::new("TC912", "no ordinal")
        .click(SelectorSpec::by_role("button", "Login"));
    let report = executor.run(&factory, &ambiguous).await;
    match report.status {
        ScenarioStatus::Failed { ref error, .. } => {
            assert!(error.contains("2 elements matched"), "error: {}", error);
        }
        ref other => panic!("unexpected status {:?}", other),
    }

    let pinned = Scenario::new("TC913", "ordinal picks by document order")
        .click(SelectorSpec::by_role("button", "Login").nth(1));
    let report = executor.run(&factory, &pinned).await;
    assert!(report.passed(), "status: {:?}", report.status);

    let out_of_range = Scenario::new("TC914", "ordinal past the match list")
        .click(SelectorSpec::by_role("button", "Login").nth(5));
    let report = executor.run(&factory, &out_of_range).await;
    assert!(!report.passed());
}

#[tokio::test]
async fn visibility_assertion_times_out_with_diagnostics() {
    let factory = MockFactory::new(|_| {});
    let executor = ScenarioExecutor::new(fast_config());

    let scenario = Scenario::new("TC905", "never appears").assert_visible(welcome_heading());
    let report = executor.run(&factory, &scenario).await;

    match report.status {
        ScenarioStatus::Failed { ref error, failed_step } => {
            assert_eq!(failed_step, 0);
            assert!(error.contains("did not hold within"), "error: {}", error);
            assert!(error.contains("Welcome to Tech Impact"), "error: {}", error);
        }
        ref other => panic!("unexpected status {:?}", other),
    }
}

#[tokio::test]
async fn url_assertion_observes_click_navigation() {
    let factory = MockFactory::new(|page| {
        page.route_click(
            &SelectorSpec::by_text("Login").first(),
            "https://portal.test/login",
        );
    });
    let executor = ScenarioExecutor::new(fast_config());

    let scenario = Scenario::new("TC906", "login link")
        .navigate("/")
        .click(SelectorSpec::by_text("Login").first())
        .assert_url(".*login");
    let report = executor.run(&factory, &scenario).await;

    assert!(report.passed(), "status: {:?}", report.status);
}

#[tokio::test]
async fn authenticate_resolves_credentials_from_config() {
    let factory = MockFactory::new(|page| {
        page.route_click(
            &SelectorSpec::by_text("Login").first(),
            "https://portal.test/login",
        );
        page.route_click(&login_button(), "https://portal.test/volunteerDashboard");
        page.show(&welcome_heading());
    });
    let executor = ScenarioExecutor::new(fast_config());

    let scenario = Scenario::new("TC907", "volunteer login").authenticate(Role::Volunteer);
    let report = executor.run(&factory, &scenario).await;

    assert!(report.passed(), "status: {:?}", report.status);

    let page = factory.session(0);
    let page = page.lock().unwrap();
    let values: Vec<&str> = page.fills.iter().map(|(_, v)| v.as_str()).collect();
    assert_eq!(values, vec!["Vivek", "Vivek123"]);
    assert!(page
        .fills
        .iter()
        .any(|(sel, _)| sel.contains("input[name=\"username\"]")));
}

#[tokio::test]
async fn missing_credentials_fail_the_authenticate_step() {
    let factory = MockFactory::new(|_| {});
    let mut config = SuiteConfig::default();
    config.credentials.clear();
    config.default_timeout_ms = 300;
    config.poll_interval_ms = 10;
    let executor = ScenarioExecutor::new(Arc::new(config));

    let scenario = Scenario::new("TC908", "no seeded account").authenticate(Role::Admin);
    let report = executor.run(&factory, &scenario).await;

    match report.status {
        ScenarioStatus::Failed { ref error, .. } => {
            assert!(error.contains("admin"), "error: {}", error);
        }
        ref other => panic!("unexpected status {:?}", other),
    }
    // The session still gets released.
    assert_eq!(factory.closes(), 1);
}

#[tokio::test]
async fn suite_run_filters_and_aggregates() {
    let factory = Arc::new(MockFactory::new(|page| {
        page.remove(&SelectorSpec::by_text("Missing"));
    }));

    let scenarios = vec![
        Scenario::new("TC001", "landing page loads").navigate("/"),
        Scenario::new("TC002", "broken widget")
            .navigate("/")
            .click(SelectorSpec::by_text("Missing")),
        Scenario::new("TC003", "another page").navigate("/about"),
    ];

    let options = RunOptions {
        filter: Some("TC00".to_string()),
        parallel: 1,
    };
    let results = run_suite(fast_config(), factory.clone(), scenarios, &options).await;

    assert_eq!(results.summary.total, 3);
    assert_eq!(results.summary.passed, 2);
    assert_eq!(results.summary.failed, 1);
    assert!(!results.summary.all_passed());
    // Declaration order survives aggregation.
    let ids: Vec<&str> = results.scenarios.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["TC001", "TC002", "TC003"]);

    let filtered = RunOptions {
        filter: Some("broken".to_string()),
        parallel: 1,
    };
    let scenarios = vec![
        Scenario::new("TC001", "landing page loads").navigate("/"),
        Scenario::new("TC002", "broken widget").navigate("/"),
    ];
    let results = run_suite(fast_config(), factory, scenarios, &filtered).await;
    assert_eq!(results.summary.total, 1);
    assert_eq!(results.scenarios[0].id, "TC002");
}

#[tokio::test]
async fn parallel_runs_keep_declaration_order() {
    let factory = Arc::new(MockFactory::new(|_| {}));
    let scenarios = vec![
        Scenario::new("TC001", "one").navigate("/"),
        Scenario::new("TC002", "two").navigate("/"),
        Scenario::new("TC003", "three").navigate("/"),
        Scenario::new("TC004", "four").navigate("/"),
    ];

    let options = RunOptions {
        filter: None,
        parallel: 3,
    };
    let results = run_suite(fast_config(), factory.clone(), scenarios, &options).await;

    assert_eq!(results.summary.passed, 4);
    let ids: Vec<&str> = results.scenarios.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["TC001", "TC002", "TC003", "TC004"]);
    assert_eq!(factory.opens(), 4);
    assert_eq!(factory.closes(), 4);
}

#[tokio::test]
async fn registration_scenario_fills_every_field() {
    let factory = Arc::new(MockFactory::new(|page| {
        page.route_click(
            &SelectorSpec::by_text("Sign Up").first(),
            "https://portal.test/register",
        );
    }));
    let executor = ScenarioExecutor::new(fast_config());

    let scenario = Scenario::new("TC910", "registration form")
        .navigate("/")
        .click(SelectorSpec::by_text("Sign Up").first())
        .assert_url(".*register")
        .fill(SelectorSpec::by_placeholder("Full Name"), "Vivek Modi")
        .fill(SelectorSpec::by_placeholder("Email"), "vivek1@gmail.com")
        .fill(SelectorSpec::by_placeholder("Username"), "Vivek1")
        .fill(SelectorSpec::by_placeholder("Password"), "Vivek123")
        .fill(SelectorSpec::by_placeholder("Confirm Password"), "Vivek123")
        .click(SelectorSpec::by_role("button", "Sign Up"));
    let report = executor.run(factory.as_ref(), &scenario).await;

    assert!(report.passed(), "status: {:?}", report.status);
    let page = factory.session(0);
    assert_eq!(page.lock().unwrap().fills.len(), 5);
}
