//! In-memory DOM implementing `Driver`
//!
//! Elements match a locator when one of their selectors equals the locator's
//! selector string exactly; text filters and `nth` are applied on top the same
//! way the Chrome backend applies them. Selectors starting with `!!` are
//! treated as malformed and fail every call.

#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};
use swaglabs_e2e::{Driver, Locator, Result, StyleOverride, UiError, WaitState};

const POLL_INTERVAL: Duration = Duration::from_millis(5);

#[derive(Debug, Clone, Default)]
pub struct FakeElement {
    pub selectors: Vec<String>,
    pub text: String,
    pub value: String,
    pub visible: bool,
    pub in_viewport: bool,
    /// Strip surrounding whitespace on fill, like a field with input masking
    pub trims_value: bool,
    /// What happens when this element is clicked
    pub on_click: Option<ClickEffect>,
    /// Last style applied, if any
    pub style: Option<StyleOverride>,
}

impl FakeElement {
    pub fn new(selectors: &[&str], text: &str) -> Self {
        Self {
            selectors: selectors.iter().map(|s| s.to_string()).collect(),
            text: text.to_string(),
            visible: true,
            in_viewport: true,
            ..Default::default()
        }
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    pub fn below_fold(mut self) -> Self {
        self.in_viewport = false;
        self
    }

    pub fn trimming(mut self) -> Self {
        self.trims_value = true;
        self
    }

    pub fn navigates_to(mut self, url: &str) -> Self {
        self.on_click = Some(ClickEffect::Navigate(url.to_string()));
        self
    }

    /// Submit the `#user-name` / `#password` form the way the storefront does
    pub fn submits_login(mut self, inventory_url: &str) -> Self {
        self.on_click = Some(ClickEffect::SubmitLogin {
            inventory_url: inventory_url.to_string(),
        });
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickEffect {
    Navigate(String),
    /// Land on `inventory_url` for valid credentials, otherwise show the
    /// `[data-test="error"]` banner
    SubmitLogin { inventory_url: String },
}

pub const ERROR_SELECTOR: &str = r#"[data-test="error"]"#;
const ACCEPTED_USERS: &[&str] = &[
    "standard_user",
    "locked_out_user",
    "problem_user",
    "performance_glitch_user",
    "error_user",
    "visual_user",
];

fn login_error(username: &str, password: &str) -> Option<&'static str> {
    if username.is_empty() {
        Some("Epic sadface: Username is required")
    } else if password.is_empty() {
        Some("Epic sadface: Password is required")
    } else if !ACCEPTED_USERS.contains(&username) || password != "secret_sauce" {
        Some("Epic sadface: Username and password do not match any user in this service")
    } else if username == "locked_out_user" {
        Some("Epic sadface: Sorry, this user has been locked out.")
    } else {
        None
    }
}

/// Side effects observed by the fake, in call order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Navigate(String),
    Click(String),
    Fill(String, String),
    Press(String, String),
    Style(String, usize),
    Scroll(String),
    Screenshot,
    Close,
}

#[derive(Debug, Default)]
struct DomState {
    url: String,
    elements: Vec<FakeElement>,
    actions: Vec<Action>,
    fail_navigation: bool,
    fail_styles: bool,
    closed: bool,
}

/// Cheap to clone; every clone sees the same DOM
#[derive(Debug, Clone, Default)]
pub struct FakeDom {
    state: Arc<Mutex<DomState>>,
}

impl FakeDom {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(self, element: FakeElement) -> Self {
        self.add(element);
        self
    }

    pub fn add(&self, element: FakeElement) {
        self.lock().elements.push(element);
    }

    pub fn failing_navigation(self) -> Self {
        self.lock().fail_navigation = true;
        self
    }

    pub fn failing_styles(self) -> Self {
        self.lock().fail_styles = true;
        self
    }

    /// Copy of the current elements as a fresh, unshared DOM
    pub fn snapshot(&self) -> FakeDom {
        let state = self.lock();
        let copy = FakeDom::new();
        {
            let mut inner = copy.lock();
            inner.url = state.url.clone();
            inner.elements = state.elements.clone();
            inner.fail_navigation = state.fail_navigation;
            inner.fail_styles = state.fail_styles;
        }
        copy
    }

    pub fn boxed(&self) -> Box<dyn Driver> {
        Box::new(self.clone())
    }

    pub fn actions(&self) -> Vec<Action> {
        self.lock().actions.clone()
    }

    pub fn clicks(&self) -> usize {
        self.actions()
            .iter()
            .filter(|a| matches!(a, Action::Click(_)))
            .count()
    }

    pub fn url(&self) -> String {
        self.lock().url.clone()
    }

    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    pub fn styled_count(&self) -> usize {
        self.lock()
            .elements
            .iter()
            .filter(|e| e.style.is_some())
            .count()
    }

    pub fn value_of(&self, selector: &str) -> Option<String> {
        self.lock()
            .elements
            .iter()
            .find(|e| e.selectors.iter().any(|s| s == selector))
            .map(|e| e.value.clone())
    }

    fn lock(&self) -> MutexGuard<'_, DomState> {
        self.state.lock().unwrap()
    }

    fn record(&self, action: Action) {
        self.lock().actions.push(action);
    }

    /// Indices of the elements `locator` resolves to
    fn resolve(&self, locator: &Locator) -> Result<Vec<usize>> {
        if locator.selector().starts_with("!!") {
            return Err(UiError::Driver(format!(
                "'{}' is not a valid selector",
                locator.selector()
            )));
        }
        let state = self.lock();
        let mut matched: Vec<usize> = state
            .elements
            .iter()
            .enumerate()
            .filter(|(_, e)| e.selectors.iter().any(|s| s == locator.selector()))
            .filter(|(_, e)| locator.filter().map_or(true, |f| f.is_match(&e.text)))
            .map(|(i, _)| i)
            .collect();
        if let Some(index) = locator.index() {
            matched = matched.get(index).copied().into_iter().collect();
        }
        Ok(matched)
    }

    fn one(&self, locator: &Locator) -> Result<usize> {
        let matched = self.resolve(locator)?;
        match matched.as_slice() {
            [index] => Ok(*index),
            [] => Err(UiError::ElementNotFound {
                selector: locator.to_string(),
                state: WaitState::Attached.to_string(),
            }),
            many => Err(UiError::Driver(format!(
                "strict mode violation: {} resolved to {} elements",
                locator,
                many.len()
            ))),
        }
    }

    fn submit_login(&self, inventory_url: String) {
        let username = self.value_of("#user-name").unwrap_or_default();
        let password = self.value_of("#password").unwrap_or_default();
        let mut state = self.lock();
        state
            .elements
            .retain(|e| !e.selectors.iter().any(|s| s == ERROR_SELECTOR));
        match login_error(&username, &password) {
            Some(message) => state
                .elements
                .push(FakeElement::new(&[ERROR_SELECTOR], message)),
            None => state.url = inventory_url,
        }
    }

    fn element(&self, index: usize) -> FakeElement {
        self.lock().elements[index].clone()
    }
}

#[async_trait]
impl Driver for FakeDom {
    async fn navigate(&self, url: &str) -> Result<()> {
        self.record(Action::Navigate(url.to_string()));
        let mut state = self.lock();
        if state.fail_navigation {
            return Err(UiError::Driver("net::ERR_CONNECTION_REFUSED".to_string()));
        }
        state.url = url.to_string();
        Ok(())
    }

    async fn current_url(&self) -> Result<String> {
        Ok(self.url())
    }

    async fn wait_for(&self, locator: &Locator, state: WaitState, timeout: Duration) -> Result<()> {
        let started = Instant::now();
        loop {
            let matched = self.resolve(locator)?;
            let reached = match state {
                WaitState::Attached => !matched.is_empty(),
                WaitState::Visible => matched.iter().any(|&i| self.element(i).visible),
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
        let index = self.one(locator)?;
        let element = self.element(index);
        if !element.visible {
            return Err(UiError::Driver(format!("{} is not visible", locator)));
        }
        self.record(Action::Click(locator.to_string()));
        match element.on_click {
            Some(ClickEffect::Navigate(url)) => self.lock().url = url,
            Some(ClickEffect::SubmitLogin { inventory_url }) => self.submit_login(inventory_url),
            None => {}
        }
        Ok(())
    }

    async fn fill(&self, locator: &Locator, value: &str) -> Result<()> {
        let index = self.one(locator)?;
        let mut state = self.lock();
        let element = &mut state.elements[index];
        element.value = if element.trims_value {
            value.trim().to_string()
        } else {
            value.to_string()
        };
        state
            .actions
            .push(Action::Fill(locator.to_string(), value.to_string()));
        Ok(())
    }

    async fn input_value(&self, locator: &Locator) -> Result<String> {
        let index = self.one(locator)?;
        Ok(self.element(index).value)
    }

    async fn press(&self, locator: &Locator, key: &str) -> Result<()> {
        self.one(locator)?;
        self.record(Action::Press(locator.to_string(), key.to_string()));
        Ok(())
    }

    async fn text_contents(&self, locator: &Locator) -> Result<Vec<String>> {
        let matched = self.resolve(locator)?;
        Ok(matched.into_iter().map(|i| self.element(i).text).collect())
    }

    async fn inner_text(&self, locator: &Locator) -> Result<String> {
        let index = self.one(locator)?;
        Ok(self.element(index).text)
    }

    async fn apply_style(&self, locator: &Locator, style: &StyleOverride) -> Result<usize> {
        if self.lock().fail_styles {
            return Err(UiError::Highlight("style attribute is read-only".to_string()));
        }
        let matched = self.resolve(locator)?;
        {
            let mut state = self.lock();
            for &i in &matched {
                state.elements[i].style = Some(style.clone());
            }
        }
        self.record(Action::Style(locator.to_string(), matched.len()));
        Ok(matched.len())
    }

    async fn scroll_into_view_if_needed(&self, locator: &Locator) -> Result<bool> {
        let index = self.one(locator)?;
        let mut state = self.lock();
        if state.elements[index].in_viewport {
            return Ok(false);
        }
        state.elements[index].in_viewport = true;
        state.actions.push(Action::Scroll(locator.to_string()));
        Ok(true)
    }

    async fn screenshot(&self) -> Result<Vec<u8>> {
        self.record(Action::Screenshot);
        Ok(b"\x89PNG\r\n\x1a\n".to_vec())
    }

    async fn close(&self) -> Result<()> {
        let mut state = self.lock();
        state.closed = true;
        state.actions.push(Action::Close);
        Ok(())
    }
}
