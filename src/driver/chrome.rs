//! Chrome DevTools backend for [`Driver`]
//!
//! Locators are resolved in the page by `locator.js`, so text filters and
//! strictness behave the same for every operation. Actions that must produce
//! trusted input events (click, key presses, text insertion) tag the resolved
//! node and go through CDP instead of synthetic DOM events.

use super::{Driver, Locator, StyleOverride, WaitState};
use crate::config::Env;
use crate::error::{Result, UiError};
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::input::InsertTextParams;
use chromiumoxide::cdp::browser_protocol::page::NavigateParams;
use chromiumoxide::cdp::js_protocol::runtime::EvaluateParams;
use chromiumoxide::element::Element;
use chromiumoxide::page::{Page, ScreenshotParams};
use futures::StreamExt;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;

/// In-page locator engine, embedded at compile time
const LOCATOR_SCRIPT: &str = include_str!("locator.js");

const POLL_INTERVAL: Duration = Duration::from_millis(100);
const DEFAULT_NAVIGATION_TIMEOUT: Duration =
    Duration::from_millis(crate::config::DEFAULT_NAVIGATION_TIMEOUT_MS);

/// How to obtain a Chrome instance
pub enum ConnectionMode {
    /// Launch a local Chrome (system install or explicit path)
    Sandboxed {
        chrome_path: Option<String>,
        no_sandbox: bool,
        headless: bool,
    },
    /// Connect to a Chrome already running with a remote debugging port
    DebugPort(u16),
}

/// A running browser that hands out one tab per scenario
pub struct ChromeBrowser {
    browser: Browser,
    handler_task: JoinHandle<()>,
    temp_dir: Option<PathBuf>,
    navigation_timeout: Duration,
}

impl ChromeBrowser {
    /// Launch (or connect) according to the process settings
    pub async fn from_env(env: &Env) -> Result<Self> {
        let browser = Self::new(ConnectionMode::Sandboxed {
            chrome_path: env.chrome_path.clone(),
            no_sandbox: env.no_sandbox,
            headless: env.headless,
        })
        .await?;
        Ok(browser.with_navigation_timeout(env.navigation_timeout))
    }

    /// Connect to existing Chrome on debug port
    pub async fn connect_debug_port(port: u16) -> Result<Self> {
        Self::new(ConnectionMode::DebugPort(port)).await
    }

    pub async fn new(mode: ConnectionMode) -> Result<Self> {
        let (browser, mut handler, temp_dir) = match mode {
            ConnectionMode::Sandboxed {
                chrome_path,
                no_sandbox,
                headless,
            } => {
                // Unique profile directory so parallel runs never share state
                let unique_id = std::time::SystemTime::now()
                    .duration_since(std::time::UNIX_EPOCH)
                    .map(|d| d.as_nanos())
                    .unwrap_or_default();
                let temp_dir =
                    std::env::temp_dir().join(format!("swaglabs-e2e-{}", unique_id));
                std::fs::create_dir_all(&temp_dir).map_err(|e| {
                    UiError::LaunchFailed(format!("Failed to create temp directory: {}", e))
                })?;

                let mut config = if headless {
                    BrowserConfig::builder()
                } else {
                    BrowserConfig::builder().with_head()
                };
                config = config.user_data_dir(&temp_dir);

                // Linux AppArmor / container workaround
                if no_sandbox {
                    config = config.arg("--no-sandbox");
                }
                if let Some(path) = chrome_path {
                    config = config.chrome_executable(path);
                }

                let config = config.build().map_err(|e| {
                    UiError::LaunchFailed(format!(
                        "{}. Install Chrome/Chromium or set CHROME_PATH \
                         (try NO_SANDBOX=true in containers)",
                        e
                    ))
                })?;

                let (browser, handler) = Browser::launch(config)
                    .await
                    .map_err(|e| UiError::LaunchFailed(e.to_string()))?;

                (browser, handler, Some(temp_dir))
            }
            ConnectionMode::DebugPort(port) => {
                let url = format!("http://localhost:{}", port);
                let (browser, handler) = Browser::connect(&url).await.map_err(|e| {
                    UiError::ConnectionFailed(format!(
                        "Failed to connect to Chrome on port {}. \
                         Make sure Chrome is running with --remote-debugging-port={}: {}",
                        port, port, e
                    ))
                })?;
                (browser, handler, None)
            }
        };

        let handler_task = tokio::spawn(async move {
            while handler.next().await.is_some() {
                // drive the CDP connection
            }
        });

        log::info!("Chrome ready");

        Ok(Self {
            browser,
            handler_task,
            temp_dir,
            navigation_timeout: DEFAULT_NAVIGATION_TIMEOUT,
        })
    }

    pub fn with_navigation_timeout(mut self, timeout: Duration) -> Self {
        self.navigation_timeout = timeout;
        self
    }

    /// Open a fresh tab wrapped as a [`Driver`]
    pub async fn open_session(&self) -> Result<ChromeSession> {
        let page = self
            .browser
            .new_page("about:blank")
            .await
            .map_err(|e| UiError::Driver(format!("Failed to create page: {}", e)))?;
        Ok(ChromeSession::new(page, self.navigation_timeout))
    }

    /// Close the browser connection
    pub async fn close(mut self) -> Result<()> {
        self.browser
            .close()
            .await
            .map_err(|e| UiError::Driver(e.to_string()))?;
        let _ = self.browser.wait().await;
        self.handler_task.abort();
        Ok(())
    }
}

impl Drop for ChromeBrowser {
    fn drop(&mut self) {
        if let Some(temp_dir) = &self.temp_dir {
            if temp_dir.exists() {
                let _ = std::fs::remove_dir_all(temp_dir);
            }
        }
    }
}

/// One browser tab; the session handle owned by a page object
pub struct ChromeSession {
    page: Page,
    navigation_timeout: Duration,
    next_token: AtomicU64,
}

impl ChromeSession {
    pub fn new(page: Page, navigation_timeout: Duration) -> Self {
        Self {
            page,
            navigation_timeout,
            next_token: AtomicU64::new(1),
        }
    }

    /// Run one op of the locator script against `locator`
    async fn run<T: DeserializeOwned>(
        &self,
        op: &str,
        locator: &Locator,
        extra: Value,
    ) -> Result<T> {
        let mut args = json!({ "op": op, "locator": locator.to_json() });
        if let (Some(obj), Value::Object(extra)) = (args.as_object_mut(), extra) {
            obj.extend(extra);
        }
        let expression = format!("({})({})", LOCATOR_SCRIPT.trim(), args);

        let params = EvaluateParams::builder()
            .expression(expression)
            .return_by_value(true)
            .await_promise(true)
            .build()
            .map_err(UiError::Driver)?;

        let reply: ScriptReply = self
            .page
            .evaluate_expression(params)
            .await
            .map_err(|e| {
                UiError::Driver(format!("Script for '{}' on {} failed: {}", op, locator, e))
            })?
            .into_value()?;

        if let Some(message) = reply.error {
            return Err(script_error(locator, message));
        }

        serde_json::from_value(reply.ok.unwrap_or(Value::Null)).map_err(|e| {
            UiError::Driver(format!("Unexpected result for '{}' on {}: {}", op, locator, e))
        })
    }

    /// Resolve `locator` to exactly one node and return a CDP handle to it
    async fn element(&self, locator: &Locator) -> Result<(Element, String)> {
        let token = format!("po-{}", self.next_token.fetch_add(1, Ordering::Relaxed));
        let _: String = self.run("tag", locator, json!({ "token": token })).await?;
        match self
            .page
            .find_element(format!("[data-pageobj-id=\"{}\"]", token))
            .await
        {
            Ok(element) => Ok((element, token)),
            Err(_) => {
                self.untag(locator, &token).await;
                Err(UiError::ElementNotFound {
                    selector: locator.to_string(),
                    state: WaitState::Attached.to_string(),
                })
            }
        }
    }

    async fn untag(&self, locator: &Locator, token: &str) {
        // the node may be gone after a click navigated away
        let _ = self
            .run::<bool>("untag", locator, json!({ "token": token }))
            .await;
    }
}

fn script_error(locator: &Locator, message: String) -> UiError {
    if message.starts_with("no element matches") {
        UiError::ElementNotFound {
            selector: locator.to_string(),
            state: WaitState::Attached.to_string(),
        }
    } else {
        UiError::Driver(format!("{} ({})", message, locator))
    }
}

/// `{ ok }` or `{ error }` as produced by the locator script
#[derive(Deserialize)]
struct ScriptReply {
    ok: Option<Value>,
    error: Option<String>,
}

#[derive(Deserialize)]
struct LocatorState {
    count: usize,
    visible: bool,
}

#[async_trait]
impl Driver for ChromeSession {
    async fn navigate(&self, url: &str) -> Result<()> {
        log::debug!("Navigating to {}", url);

        let params = NavigateParams::builder()
            .url(url)
            .build()
            .map_err(|e| UiError::Navigation(format!("Invalid URL {}: {}", url, e)))?;

        let response = self
            .page
            .execute(params)
            .await
            .map_err(|e| UiError::Navigation(format!("Failed to navigate to {}: {}", url, e)))?;

        if let Some(error_text) = &response.result.error_text {
            return Err(UiError::Navigation(format!(
                "Navigation to {} failed: {}",
                url, error_text
            )));
        }

        match tokio::time::timeout(self.navigation_timeout, self.page.wait_for_navigation()).await
        {
            Ok(Ok(_)) => Ok(()),
            Ok(Err(e)) => Err(UiError::Navigation(format!(
                "Navigation to {} did not complete: {}",
                url, e
            ))),
            Err(_) => Err(UiError::Navigation(format!(
                "Navigation to {} timed out after {:?}",
                url, self.navigation_timeout
            ))),
        }
    }

    async fn current_url(&self) -> Result<String> {
        self.page
            .url()
            .await?
            .ok_or_else(|| UiError::Driver("Page has no URL".to_string()))
    }

    async fn wait_for(&self, locator: &Locator, state: WaitState, timeout: Duration) -> Result<()> {
        let started = Instant::now();
        loop {
            let current: LocatorState = self.run("state", locator, json!({})).await?;
            let reached = match state {
                WaitState::Attached => current.count > 0,
                WaitState::Visible => current.visible,
            };
            if reached {
                return Ok(());
            }
            if started.elapsed() >= timeout {
                return Err(UiError::ElementNotFound {
                    selector: locator.to_string(),
                    state: state.to_string(),
                });
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    async fn click(&self, locator: &Locator) -> Result<()> {
        let (element, token) = self.element(locator).await?;
        let clicked = element.click().await.map(|_| ());
        self.untag(locator, &token).await;
        clicked.map_err(|e| UiError::Driver(format!("Click on {} failed: {}", locator, e)))
    }

    async fn fill(&self, locator: &Locator, value: &str) -> Result<()> {
        let existing: usize = self.run("focusSelect", locator, json!({})).await?;

        if value.is_empty() {
            if existing > 0 {
                self.press(locator, "Backspace").await?;
            }
            return Ok(());
        }

        // replaces the current selection, like typing over it
        self.page
            .execute(InsertTextParams::new(value))
            .await
            .map_err(|e| UiError::Driver(format!("Typing into {} failed: {}", locator, e)))?;
        Ok(())
    }

    async fn input_value(&self, locator: &Locator) -> Result<String> {
        self.run("value", locator, json!({})).await
    }

    async fn press(&self, locator: &Locator, key: &str) -> Result<()> {
        let (element, token) = self.element(locator).await?;
        let pressed = async {
            element.focus().await?;
            element.press_key(key).await?;
            Ok::<_, chromiumoxide::error::CdpError>(())
        }
        .await;
        self.untag(locator, &token).await;
        pressed.map_err(|e| {
            UiError::Driver(format!("Pressing {} on {} failed: {}", key, locator, e))
        })
    }

    async fn text_contents(&self, locator: &Locator) -> Result<Vec<String>> {
        self.run("texts", locator, json!({})).await
    }

    async fn inner_text(&self, locator: &Locator) -> Result<String> {
        self.run("innerText", locator, json!({})).await
    }

    async fn apply_style(&self, locator: &Locator, style: &StyleOverride) -> Result<usize> {
        self.run("style", locator, json!({ "style": style.to_json() }))
            .await
            .map_err(|e| UiError::Highlight(e.to_string()))
    }

    async fn scroll_into_view_if_needed(&self, locator: &Locator) -> Result<bool> {
        self.run("scroll", locator, json!({})).await
    }

    async fn screenshot(&self) -> Result<Vec<u8>> {
        self.page
            .screenshot(ScreenshotParams::default())
            .await
            .map_err(|e| UiError::Driver(format!("Failed to take screenshot: {}", e)))
    }

    async fn close(&self) -> Result<()> {
        self.page
            .clone()
            .close()
            .await
            .map_err(|e| UiError::Driver(e.to_string()))
    }
}
