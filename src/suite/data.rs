//! Scenario data for the authentication suite

use crate::error::Result;
use crate::page::AuthSelectors;
use serde::Deserialize;

/// Embedded copy of `testdata/auth-users.json`
const AUTH_USERS_JSON: &str = include_str!("../../testdata/auth-users.json");

pub const LOCKED_OUT_USER: &str = "locked_out_user";
pub const SHARED_PASSWORD: &str = "secret_sauce";

#[derive(Debug, Clone, Deserialize)]
pub struct AuthData {
    pub elements: Elements,
    pub users: Vec<UserCredentials>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Elements {
    pub title_logo: String,
    #[serde(rename = "titlesH4")]
    pub titles_h4: Vec<String>,
    pub list_of_users: Vec<String>,
    pub list_of_passwords: Vec<String>,
    pub buttons: Vec<ButtonSpec>,
    pub auth_page_selectors: AuthSelectors,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ButtonSpec {
    #[serde(rename = "class")]
    pub selector: String,
    pub label: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserCredentials {
    pub username: String,
    pub password: String,
}

impl UserCredentials {
    /// Logins that the storefront rejects with an error banner
    pub fn expects_error(&self) -> bool {
        self.username == LOCKED_OUT_USER || self.username.is_empty() || self.password.is_empty()
    }

    pub fn display_name(&self) -> &str {
        if self.username.is_empty() {
            "empty credentials"
        } else {
            &self.username
        }
    }
}

impl AuthData {
    pub fn embedded() -> Result<Self> {
        Self::from_json(AUTH_USERS_JSON)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
