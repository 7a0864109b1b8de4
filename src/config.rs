//! Environment-driven settings
//!
//! Everything is read once at process start. The page helpers never look at
//! the environment themselves; they receive a [`PageConfig`] value instead.

use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://www.saucedemo.com/";
pub const DEFAULT_TIMEOUT_MS: u64 = 5000;
pub const DEFAULT_SCENARIO_TIMEOUT_MS: u64 = 30_000;
pub const DEFAULT_NAVIGATION_TIMEOUT_MS: u64 = 15_000;
pub const DEFAULT_SUITE: &str = "test_01";
pub const DEFAULT_REPORT_DIR: &str = "reports";

/// Process-wide settings for a suite run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Env {
    pub base_url: String,
    /// Default wait/assertion timeout
    pub timeout: Duration,
    pub headless: bool,
    pub debug_highlight: bool,
    pub test_suite: String,
    pub chrome_path: Option<String>,
    pub no_sandbox: bool,
    /// Hard limit for a whole scenario
    pub scenario_timeout: Duration,
    /// Limit for one page load; always shorter than `scenario_timeout`
    pub navigation_timeout: Duration,
    pub report_dir: PathBuf,
}

impl Default for Env {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            headless: true,
            debug_highlight: false,
            test_suite: DEFAULT_SUITE.to_string(),
            chrome_path: None,
            no_sandbox: false,
            scenario_timeout: Duration::from_millis(DEFAULT_SCENARIO_TIMEOUT_MS),
            navigation_timeout: Duration::from_millis(DEFAULT_NAVIGATION_TIMEOUT_MS),
            report_dir: PathBuf::from(DEFAULT_REPORT_DIR),
        }
    }
}

impl Env {
    /// Read settings from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary key lookup (used by tests)
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        // CI environments typically need --no-sandbox
        let is_ci = ["CI", "GITHUB_ACTIONS", "GITLAB_CI", "JENKINS_HOME", "CIRCLECI"]
            .iter()
            .any(|key| lookup(key).is_some());

        let scenario_timeout =
            parse_millis(lookup("SCENARIO_TIMEOUT")).unwrap_or(defaults.scenario_timeout);
        let navigation_timeout = parse_millis(lookup("NAVIGATION_TIMEOUT"))
            .unwrap_or(defaults.navigation_timeout);

        Self {
            base_url: lookup("BASE_URL")
                .filter(|v| !v.is_empty())
                .unwrap_or(defaults.base_url),
            timeout: parse_millis(lookup("TIMEOUT")).unwrap_or(defaults.timeout),
            headless: lookup("HEADLESS").map_or(true, |v| v != "false"),
            debug_highlight: lookup("DEBUG_HIGHLIGHT").is_some_and(|v| v == "true"),
            test_suite: lookup("TEST_SUITE")
                .filter(|v| !v.is_empty())
                .unwrap_or(defaults.test_suite),
            chrome_path: lookup("CHROME_PATH").filter(|v| !v.is_empty()),
            no_sandbox: is_ci || lookup("NO_SANDBOX").is_some_and(|v| v == "true"),
            scenario_timeout,
            // a hung page load must surface as a navigation error, not a scenario timeout
            navigation_timeout: navigation_timeout.min(scenario_timeout / 2),
            report_dir: lookup("REPORT_DIR")
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
                .unwrap_or(defaults.report_dir),
        }
    }

    /// Helper configuration derived from these settings
    pub fn page_config(&self) -> PageConfig {
        PageConfig {
            debug_highlight: self.debug_highlight,
            timeout: self.timeout,
        }
    }
}

fn parse_millis(raw: Option<String>) -> Option<Duration> {
    raw.and_then(|v| v.trim().parse::<u64>().ok())
        .map(Duration::from_millis)
}

/// Configuration handed to a [`crate::page::PageObject`] at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageConfig {
    /// Paint every touched element (diagnostic only)
    pub debug_highlight: bool,
    pub timeout: Duration,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            debug_highlight: false,
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
        }
    }
}
