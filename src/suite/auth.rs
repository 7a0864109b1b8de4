//! `test_01`: authentication suite
//!
//! Login page copy and controls, a login attempt per configured user, and
//! the per-user quirks of the storefront's special accounts.

use super::data::{AuthData, UserCredentials, SHARED_PASSWORD};
use super::runner::{step, Scenario, Suite};
use crate::config::Env;
use crate::driver::Locator;
use crate::error::{Result, UiError};
use crate::page::expect::{assert_equals, expect_visible};
use crate::page::{AuthPage, PageObject};
use std::sync::Arc;

pub const NAME: &str = "test_01";
pub const DESCRIPTION: &str = "Authentication";

pub const LOGIN_CONTAINER: &str = ".login_container";
pub const LOGIN_ERROR_TEXT: &str = "Epic sadface";

/// Accounts with storefront-specific behaviour after login
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecialCase {
    /// Broken product images
    ProblemUser,
    /// Slow login
    PerformanceGlitchUser,
    ErrorUser,
    VisualUser,
}

impl SpecialCase {
    pub const ALL: [SpecialCase; 4] = [
        SpecialCase::ProblemUser,
        SpecialCase::PerformanceGlitchUser,
        SpecialCase::ErrorUser,
        SpecialCase::VisualUser,
    ];

    pub fn username(&self) -> &'static str {
        match self {
            SpecialCase::ProblemUser => "problem_user",
            SpecialCase::PerformanceGlitchUser => "performance_glitch_user",
            SpecialCase::ErrorUser => "error_user",
            SpecialCase::VisualUser => "visual_user",
        }
    }

    /// Post-login checks for this account
    pub async fn check(&self, auth: &AuthPage<'_>) -> Result<()> {
        let page = auth.page();
        let timeout = page.config().timeout;
        match self {
            SpecialCase::ProblemUser => {
                expect_visible(page.driver(), &Locator::new(".inventory_item_img").first(), timeout)
                    .await
            }
            SpecialCase::PerformanceGlitchUser => auth.expect_inventory().await,
            SpecialCase::ErrorUser => {
                expect_visible(page.driver(), &Locator::new(".inventory_list"), timeout).await
            }
            SpecialCase::VisualUser => {
                expect_visible(page.driver(), &Locator::new(".inventory_list"), timeout).await?;
                expect_visible(page.driver(), &Locator::new(".shopping_cart_link"), timeout).await
            }
        }
    }
}

/// Shared, read-only inputs of every scenario in the suite
#[derive(Debug)]
pub struct AuthContext {
    pub data: AuthData,
    pub base_url: String,
}

impl AuthContext {
    pub fn auth_page<'a>(&self, page: &'a PageObject) -> AuthPage<'a> {
        AuthPage::new(
            page,
            self.base_url.clone(),
            self.data.elements.auth_page_selectors.clone(),
        )
    }
}

/// The suite against the configured base URL and the embedded data
pub fn build(env: &Env) -> Result<Suite> {
    Ok(build_with(AuthData::embedded()?, env.base_url.clone()))
}

pub fn build_with(data: AuthData, base_url: String) -> Suite {
    let users = data.users.clone();
    let ctx = Arc::new(AuthContext { data, base_url });
    let mut suite = Suite::new(NAME, DESCRIPTION);

    {
        let ctx = ctx.clone();
        suite.add(Scenario::new("UI checks on login page", move |page| {
            let ctx = ctx.clone();
            Box::pin(async move { login_page_ui_checks(page, &ctx).await })
        }));
    }

    for user in users {
        let ctx = ctx.clone();
        let name = format!("Login test: {}", user.display_name());
        suite.add(Scenario::new(name, move |page| {
            let ctx = ctx.clone();
            let user = user.clone();
            Box::pin(async move { login_attempt(page, &ctx, &user).await })
        }));
    }

    for case in SpecialCase::ALL {
        let ctx = ctx.clone();
        let name = format!("Special case check: {}", case.username());
        suite.add(Scenario::new(name, move |page| {
            let ctx = ctx.clone();
            Box::pin(async move { special_case(page, &ctx, case).await })
        }));
    }

    suite
}

pub async fn login_page_ui_checks(page: &PageObject, ctx: &AuthContext) -> Result<()> {
    let auth = ctx.auth_page(page);
    let elements = &ctx.data.elements;
    auth.open().await?;

    step("Check title logo", auth.check_title_logo(&elements.title_logo)).await?;

    step("Check H4 titles", async {
        let titles = page.extract_headings_excluding_dialogs(LOGIN_CONTAINER).await?;
        let expected: Vec<String> = elements
            .titles_h4
            .iter()
            .map(|t| t.trim().to_string())
            .collect();
        assert_equals(&titles, &expected, "h4 titles")
    })
    .await?;

    step("Check list of users", async {
        let users = auth.users_list().await?;
        assert_equals(&users, &elements.list_of_users, "list of users")
    })
    .await?;

    step("Check list of passwords", async {
        let passwords = auth.passwords_list().await?;
        assert_equals(&passwords, &elements.list_of_passwords, "list of passwords")
    })
    .await?;

    step("Check buttons", async {
        for button in &elements.buttons {
            if !page.probe_button_visible(&button.selector, &button.label, "").await {
                return Err(UiError::assertion(format!(
                    "button \"{}\" ({}) is not visible",
                    button.label, button.selector
                )));
            }
        }
        Ok(())
    })
    .await
}

pub async fn login_attempt(
    page: &PageObject,
    ctx: &AuthContext,
    user: &UserCredentials,
) -> Result<()> {
    let auth = ctx.auth_page(page);
    auth.login(&user.username, &user.password).await?;

    if user.expects_error() {
        auth.expect_error_message(LOGIN_ERROR_TEXT).await
    } else {
        auth.expect_inventory().await
    }
}

pub async fn special_case(page: &PageObject, ctx: &AuthContext, case: SpecialCase) -> Result<()> {
    let auth = ctx.auth_page(page);
    auth.login(case.username(), SHARED_PASSWORD).await?;
    auth.expect_inventory().await?;
    step(&format!("{} checks", case.username()), case.check(&auth)).await
}
