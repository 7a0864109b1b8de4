//! Scenario runner
//!
//! Each scenario gets its own session and its own [`PageObject`]; nothing is
//! shared between scenarios. A scenario that overruns its timeout is dropped
//! mid-flight and its session is still closed.

use super::report::{ScenarioResult, ScenarioStatus, SuiteReport};
use crate::config::{Env, PageConfig};
use crate::driver::{ChromeBrowser, Driver};
use crate::error::{Result, UiError};
use crate::page::PageObject;
use async_trait::async_trait;
use futures::future::BoxFuture;
use futures::{Future, StreamExt};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

type ScenarioFn = dyn for<'a> Fn(&'a PageObject) -> BoxFuture<'a, Result<()>> + Send + Sync;

/// A named test body run against a fresh page
pub struct Scenario {
    name: String,
    body: Box<ScenarioFn>,
}

impl Scenario {
    pub fn new<F>(name: impl Into<String>, body: F) -> Self
    where
        F: for<'a> Fn(&'a PageObject) -> BoxFuture<'a, Result<()>> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            body: Box::new(body),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Ordered set of scenarios
pub struct Suite {
    pub name: String,
    pub description: String,
    pub scenarios: Vec<Scenario>,
}

impl Suite {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            scenarios: Vec::new(),
        }
    }

    pub fn add(&mut self, scenario: Scenario) {
        self.scenarios.push(scenario);
    }

    /// Keep only scenarios whose name contains `pattern`
    pub fn retain_matching(&mut self, pattern: &str) {
        self.scenarios.retain(|s| s.name.contains(pattern));
    }

    pub fn scenario_names(&self) -> Vec<&str> {
        self.scenarios.iter().map(Scenario::name).collect()
    }
}

/// Hands out one fresh session per scenario
#[async_trait]
pub trait SessionFactory: Send + Sync {
    async fn new_session(&self) -> Result<Box<dyn Driver>>;
}

#[async_trait]
impl SessionFactory for ChromeBrowser {
    async fn new_session(&self) -> Result<Box<dyn Driver>> {
        let session = self.open_session().await?;
        Ok(Box::new(session))
    }
}

/// Run a named step, logging it and tagging any failure with its name
pub async fn step<T, F>(name: &str, fut: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    log::info!("Step: {}", name);
    fut.await.map_err(|e| UiError::Step {
        step: name.to_string(),
        source: Box::new(e),
    })
}

#[derive(Debug, Clone)]
pub struct RunnerConfig {
    pub page: PageConfig,
    pub scenario_timeout: Duration,
    /// Scenarios in flight at once; 1 runs them serially
    pub workers: usize,
    /// Where failure screenshots go; `None` disables them
    pub screenshot_dir: Option<PathBuf>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            page: PageConfig::default(),
            scenario_timeout: Duration::from_millis(crate::config::DEFAULT_SCENARIO_TIMEOUT_MS),
            workers: 1,
            screenshot_dir: None,
        }
    }
}

impl RunnerConfig {
    pub fn from_env(env: &Env) -> Self {
        Self {
            page: env.page_config(),
            scenario_timeout: env.scenario_timeout,
            workers: 1,
            screenshot_dir: Some(env.report_dir.join("screenshots")),
        }
    }
}

pub struct SuiteRunner {
    config: RunnerConfig,
}

impl SuiteRunner {
    pub fn new(config: RunnerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// Run every scenario of `suite`; results keep registration order.
    pub async fn run(&self, suite: &Suite, sessions: &dyn SessionFactory) -> SuiteReport {
        log::info!(
            "=== Starting suite {} - {} ({} scenarios) ===",
            suite.name,
            suite.description,
            suite.scenarios.len()
        );

        let results: Vec<ScenarioResult> = futures::stream::iter(suite.scenarios.iter())
            .map(|scenario| self.run_scenario(scenario, sessions))
            .buffered(self.config.workers.max(1))
            .collect()
            .await;

        let mut report = SuiteReport::new(&suite.name, &suite.description);
        for result in results {
            report.add_result(result);
        }

        log::info!(
            "=== Suite {} completed: {} passed, {} failed ===",
            suite.name,
            report.passed,
            report.failed
        );
        report
    }

    async fn run_scenario(
        &self,
        scenario: &Scenario,
        sessions: &dyn SessionFactory,
    ) -> ScenarioResult {
        let started = Instant::now();
        log::info!("Scenario: {}", scenario.name);

        let driver = match sessions.new_session().await {
            Ok(driver) => driver,
            Err(e) => {
                log::error!("Could not open a session for {}: {}", scenario.name, e);
                return ScenarioResult::failed(
                    &scenario.name,
                    started.elapsed(),
                    format!("Failed to open session: {}", e),
                );
            }
        };
        let page = PageObject::new(driver, self.config.page);

        let outcome =
            tokio::time::timeout(self.config.scenario_timeout, (scenario.body)(&page)).await;
        let mut result = match outcome {
            Ok(Ok(())) => ScenarioResult::passed(&scenario.name, started.elapsed()),
            Ok(Err(e)) => {
                log::error!("Scenario {} failed: {}", scenario.name, e);
                ScenarioResult::failed(&scenario.name, started.elapsed(), e.to_string())
            }
            Err(_) => {
                let e = UiError::Timeout(format!(
                    "scenario exceeded {:?}",
                    self.config.scenario_timeout
                ));
                log::error!("Scenario {} aborted: {}", scenario.name, e);
                ScenarioResult {
                    status: ScenarioStatus::TimedOut,
                    ..ScenarioResult::failed(&scenario.name, started.elapsed(), e.to_string())
                }
            }
        };

        if !result.is_passed() {
            if let Some(dir) = &self.config.screenshot_dir {
                result.screenshot = capture_screenshot(page.driver(), dir, &scenario.name).await;
            }
        }

        if let Err(e) = page.close().await {
            log::warn!("Failed to close session for {}: {}", scenario.name, e);
        }
        result
    }
}

async fn capture_screenshot(driver: &dyn Driver, dir: &Path, scenario: &str) -> Option<PathBuf> {
    let bytes = match driver.screenshot().await {
        Ok(bytes) => bytes,
        Err(e) => {
            log::warn!("Could not capture screenshot for {}: {}", scenario, e);
            return None;
        }
    };

    let path = dir.join(format!("{}.png", file_stem(scenario)));
    let written = async {
        tokio::fs::create_dir_all(dir).await?;
        tokio::fs::write(&path, bytes).await
    }
    .await;

    match written {
        Ok(()) => Some(path),
        Err(e) => {
            log::warn!("Could not save screenshot {}: {}", path.display(), e);
            None
        }
    }
}

/// Scenario name reduced to a safe file name
pub fn file_stem(name: &str) -> String {
    let stem: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
        .collect();
    let stem = stem.trim_matches('_').to_string();
    if stem.is_empty() {
        "scenario".to_string()
    } else {
        stem
    }
}
