//! Suites, scenario data and the runner that executes them

pub mod auth;
pub mod data;
pub mod report;
pub mod runner;

use crate::config::Env;
use crate::error::{Result, UiError};

pub use report::{ScenarioResult, ScenarioStatus, SuiteReport};
pub use runner::{step, RunnerConfig, Scenario, SessionFactory, Suite, SuiteRunner};

/// Registered suites as (name, description)
pub const SUITES: &[(&str, &str)] = &[(auth::NAME, auth::DESCRIPTION)];

/// Build the suite registered under `name`
pub fn build_suite(name: &str, env: &Env) -> Result<Suite> {
    match name {
        auth::NAME => auth::build(env),
        other => Err(UiError::Config(format!(
            "Unknown test suite '{}' (available: {})",
            other,
            SUITES
                .iter()
                .map(|(name, _)| *name)
                .collect::<Vec<_>>()
                .join(", ")
        ))),
    }
}
