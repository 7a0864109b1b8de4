//! Page objects
//!
//! [`BasePage`] owns the session, [`PageObject`] layers the assertion-backed
//! helpers on top, and screen-specific pages such as [`AuthPage`] borrow a
//! `PageObject` and add their own selector table.

pub mod auth;
pub mod base;
pub mod expect;
pub mod highlight;
pub mod object;

pub use auth::{AuthPage, AuthSelectors};
pub use base::BasePage;
pub use object::{Click, PageObject, ProbeOutcome};
