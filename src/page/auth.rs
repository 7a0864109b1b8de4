//! Swag Labs login screen

use super::expect;
use super::object::{Click, PageObject};
use crate::driver::Locator;
use crate::error::{Result, UiError};
use regex::Regex;
use serde::Deserialize;

pub const TITLE_LOGO: &str = ".login_logo";
pub const USERS_CONTAINER: &str = r#"[data-test="login-credentials"]"#;
pub const USERS_HEADER: &str = "Accepted usernames";
pub const PASSWORDS_CONTAINER: &str = r#"[data-test="login-password"]"#;
pub const PASSWORDS_HEADER: &str = "Password for all users";
pub const INVENTORY_URL_PATTERN: &str = r".*/inventory\.html";

/// Selectors used on the login screen
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthSelectors {
    pub input_selectors: InputSelectors,
    pub button_selectors: ButtonSelectors,
    pub error_message_selectors: ErrorMessageSelectors,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputSelectors {
    pub username_input: String,
    pub password_input: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ButtonSelectors {
    pub login_button: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorMessageSelectors {
    pub error_message: String,
}

pub struct AuthPage<'a> {
    page: &'a PageObject,
    base_url: String,
    selectors: AuthSelectors,
}

impl<'a> AuthPage<'a> {
    pub fn new(
        page: &'a PageObject,
        base_url: impl Into<String>,
        selectors: AuthSelectors,
    ) -> Self {
        Self {
            page,
            base_url: base_url.into(),
            selectors,
        }
    }

    pub fn page(&self) -> &PageObject {
        self.page
    }

    pub fn selectors(&self) -> &AuthSelectors {
        &self.selectors
    }

    pub async fn open(&self) -> Result<()> {
        log::info!("Opening the login page: {}", self.base_url);
        self.page.navigate_to(&self.base_url).await
    }

    /// Open the login page, type the credentials and press the Login button.
    pub async fn login(&self, username: &str, password: &str) -> Result<()> {
        self.open().await?;
        let inputs = &self.selectors.input_selectors;
        self.page
            .fill_and_confirm(&inputs.username_input, username, "")
            .await?;
        self.page
            .fill_and_confirm(&inputs.password_input, password, "")
            .await?;
        self.page
            .click_with_verification(
                "Login",
                &self.selectors.button_selectors.login_button,
                Click::Yes,
            )
            .await
    }

    pub async fn expect_error_message(&self, expected_text: &str) -> Result<()> {
        let error = Locator::new(&self.selectors.error_message_selectors.error_message);
        log::debug!("Checking the error text contains {:?}", expected_text);
        expect::expect_contains_text(
            self.page.driver(),
            &error,
            expected_text,
            self.page.config().timeout,
        )
        .await
    }

    pub async fn users_list(&self) -> Result<Vec<String>> {
        self.page
            .extract_delimited_list(USERS_CONTAINER, &[USERS_HEADER])
            .await
    }

    pub async fn passwords_list(&self) -> Result<Vec<String>> {
        self.page
            .extract_delimited_list(PASSWORDS_CONTAINER, &[PASSWORDS_HEADER])
            .await
    }

    pub async fn check_title_logo(&self, expected_title: &str) -> Result<()> {
        expect::expect_text(
            self.page.driver(),
            &Locator::new(TITLE_LOGO),
            expected_title,
            self.page.config().timeout,
        )
        .await
    }

    /// Wait for the browser to land on the inventory page
    pub async fn expect_inventory(&self) -> Result<()> {
        self.expect_url(INVENTORY_URL_PATTERN).await
    }

    pub async fn expect_url(&self, pattern: &str) -> Result<()> {
        let pattern = Regex::new(pattern)
            .map_err(|e| UiError::assertion(format!("invalid URL pattern {:?}: {}", pattern, e)))?;
        expect::expect_url(self.page.driver(), &pattern, self.page.config().timeout).await
    }
}
