//! Shared helpers for the integration tests

#![allow(dead_code)]

pub mod fake_dom;

use std::time::Duration;
use swaglabs_e2e::{PageConfig, PageObject};

pub use fake_dom::{Action, ClickEffect, FakeDom, FakeElement, ERROR_SELECTOR};

/// Short timeout so negative cases finish quickly
pub const TEST_TIMEOUT: Duration = Duration::from_millis(50);

pub fn page_config(debug_highlight: bool) -> PageConfig {
    PageConfig {
        debug_highlight,
        timeout: TEST_TIMEOUT,
    }
}

pub fn page_on(dom: &FakeDom) -> PageObject {
    PageObject::new(dom.boxed(), page_config(false))
}

pub fn highlighting_page_on(dom: &FakeDom) -> PageObject {
    PageObject::new(dom.boxed(), page_config(true))
}

/// Login screen shaped like the storefront's
pub fn login_screen(inventory_url: &str) -> FakeDom {
    FakeDom::new()
        .with(FakeElement::new(&[".login_logo"], "Swag Labs"))
        .with(FakeElement::new(&[".login_container"], ""))
        .with(FakeElement::new(
            &[".login_container h4"],
            "Accepted usernames are:",
        ))
        .with(FakeElement::new(
            &[".login_container h4"],
            "Password for all users:",
        ))
        .with(FakeElement::new(
            &[r#"[data-test="login-credentials"]"#],
            "Accepted usernames are:\nstandard_user\nlocked_out_user\nproblem_user\n\
             performance_glitch_user\nerror_user\nvisual_user\n",
        ))
        .with(FakeElement::new(
            &[r#"[data-test="login-password"]"#],
            "Password for all users:\nsecret_sauce\n",
        ))
        .with(FakeElement::new(&["#user-name"], ""))
        .with(FakeElement::new(&["#password"], ""))
        .with(FakeElement::new(&["#login-button"], "Login").submits_login(inventory_url))
}
