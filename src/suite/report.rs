//! Suite results

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Outcome of one scenario
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScenarioStatus {
    Passed,
    Failed,
    /// Aborted by the per-scenario timeout
    TimedOut,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScenarioResult {
    pub name: String,

    pub status: ScenarioStatus,

    pub duration: Duration,

    /// Failure message (assertion or navigation error)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Screenshot captured on failure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub screenshot: Option<PathBuf>,
}

impl ScenarioResult {
    pub fn passed(name: impl Into<String>, duration: Duration) -> Self {
        Self {
            name: name.into(),
            status: ScenarioStatus::Passed,
            duration,
            error: None,
            screenshot: None,
        }
    }

    pub fn failed(name: impl Into<String>, duration: Duration, error: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: ScenarioStatus::Failed,
            duration,
            error: Some(error.into()),
            screenshot: None,
        }
    }

    pub fn is_passed(&self) -> bool {
        self.status == ScenarioStatus::Passed
    }
}

/// Aggregated results of a suite run
#[derive(Debug, Clone, Serialize)]
pub struct SuiteReport {
    pub suite: String,
    pub description: String,
    pub started_at: DateTime<Utc>,
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub total_duration: Duration,
    pub results: Vec<ScenarioResult>,
}

impl SuiteReport {
    pub fn new(suite: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            suite: suite.into(),
            description: description.into(),
            started_at: Utc::now(),
            total: 0,
            passed: 0,
            failed: 0,
            total_duration: Duration::from_secs(0),
            results: Vec::new(),
        }
    }

    /// Add a scenario result and update counters
    pub fn add_result(&mut self, result: ScenarioResult) {
        self.total += 1;
        self.total_duration += result.duration;
        if result.is_passed() {
            self.passed += 1;
        } else {
            self.failed += 1;
        }
        self.results.push(result);
    }

    pub fn is_success(&self) -> bool {
        self.failed == 0
    }

    /// Write the report as pretty JSON into `dir`, returning the file path
    pub async fn write_to(&self, dir: &Path) -> crate::error::Result<PathBuf> {
        tokio::fs::create_dir_all(dir).await?;
        let path = dir.join(format!("{}-report.json", self.suite));
        let json = serde_json::to_string_pretty(self)?;
        tokio::fs::write(&path, json).await?;
        Ok(path)
    }

    /// One line per scenario, then a summary line
    pub fn summary(&self) -> String {
        let mut out = String::new();
        for result in &self.results {
            let mark = match result.status {
                ScenarioStatus::Passed => "ok",
                ScenarioStatus::Failed => "FAILED",
                ScenarioStatus::TimedOut => "TIMED OUT",
            };
            out.push_str(&format!("  [{}] {} ({:?})", mark, result.name, result.duration));
            if let Some(error) = &result.error {
                out.push_str(&format!("\n        {}", error));
            }
            out.push('\n');
        }
        out.push_str(&format!(
            "Test Suite: {} - {}: {} passed, {} failed, {} total",
            self.suite, self.description, self.passed, self.failed, self.total
        ));
        out
    }
}
