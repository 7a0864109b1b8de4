pub mod config;
pub mod driver;
pub mod error;
pub mod logging;
pub mod page;
pub mod suite;

//  Re-export commonly used items
pub use config::{Env, PageConfig};
pub use driver::{
    ChromeBrowser, ChromeSession, ConnectionMode, Driver, Locator, StyleOverride, TextFilter,
    WaitState,
};
pub use error::{Result, UiError};
pub use page::{AuthPage, BasePage, Click, PageObject, ProbeOutcome};
pub use suite::{
    build_suite, RunnerConfig, Scenario, ScenarioResult, ScenarioStatus, SessionFactory, Suite,
    SuiteReport, SuiteRunner,
};
