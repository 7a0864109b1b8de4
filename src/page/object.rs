//! Reusable UI interactions
//!
//! Every helper establishes the state it needs (attached or visible) before
//! acting, asserts what it can, and only then touches the page. Failures
//! propagate, except for the two explicit escape hatches: [`PageObject::probe_button_visible`]
//! turns failure into `false`, and highlighting swallows its own errors.

use super::base::BasePage;
use super::expect;
use super::highlight;
use crate::config::PageConfig;
use crate::driver::{Driver, Locator, TextFilter, WaitState};
use crate::error::{Result, UiError};
use std::collections::HashSet;
use std::fmt;

/// Selector for modal dialogs whose headings are not page content
pub const DIALOG_SELECTOR: &str = "dialog";
pub const DEFAULT_HEADING_TAG: &str = "h4";
pub const DEFAULT_SUBMIT_KEY: &str = "Enter";

/// Whether a verified button should also be clicked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Click {
    #[default]
    Yes,
    No,
}

/// What a button probe found
#[derive(Debug)]
pub enum ProbeOutcome {
    Visible,
    /// Attached but never rendered within the timeout
    Hidden,
    /// Nothing matched within the timeout
    Absent,
    /// The driver failed (bad selector, dead session, ...)
    Failed(UiError),
}

impl ProbeOutcome {
    pub fn is_visible(&self) -> bool {
        matches!(self, ProbeOutcome::Visible)
    }
}

impl fmt::Display for ProbeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeOutcome::Visible => write!(f, "visible"),
            ProbeOutcome::Hidden => write!(f, "present but not visible"),
            ProbeOutcome::Absent => write!(f, "not found"),
            ProbeOutcome::Failed(e) => write!(f, "probe failed: {}", e),
        }
    }
}

/// Session wrapper with assertion-backed interaction helpers
pub struct PageObject {
    base: BasePage,
    config: PageConfig,
}

impl PageObject {
    pub fn new(driver: Box<dyn Driver>, config: PageConfig) -> Self {
        Self {
            base: BasePage::new(driver),
            config,
        }
    }

    pub fn config(&self) -> &PageConfig {
        &self.config
    }

    pub fn driver(&self) -> &dyn Driver {
        self.base.driver()
    }

    pub async fn navigate_to(&self, url: &str) -> Result<()> {
        self.base.navigate_to(url).await
    }

    pub async fn close(self) -> Result<()> {
        self.base.close().await
    }

    async fn maybe_highlight(&self, locator: &Locator) {
        if self.config.debug_highlight {
            highlight::highlight(self.driver(), locator).await;
        }
    }

    /// Paint `locator` regardless of the debug flag. Never fails.
    pub async fn highlight(&self, locator: &Locator) {
        highlight::highlight(self.driver(), locator).await;
    }

    /// [`Self::click_with_verification`] with [`Click::Yes`]
    pub async fn click_button(&self, label: &str, selector: &str) -> Result<()> {
        self.click_with_verification(label, selector, Click::Yes).await
    }

    /// Verify that the element under `selector` labelled `label` shows exactly
    /// that text and is visible, then click it when `mode` is [`Click::Yes`].
    ///
    /// Nothing is clicked unless both checks pass.
    pub async fn click_with_verification(
        &self,
        label: &str,
        selector: &str,
        mode: Click,
    ) -> Result<()> {
        let timeout = self.config.timeout;
        let button = Locator::new(selector).has_text(label);

        expect::expect_text(self.driver(), &button, label, timeout).await?;
        expect::expect_visible(self.driver(), &button, timeout).await?;
        self.maybe_highlight(&button).await;

        if mode == Click::Yes {
            log::info!("Clicking \"{}\" ({})", label, selector);
            self.driver().click(&button).await?;
        } else {
            log::debug!("Verified \"{}\" ({}) without clicking", label, selector);
        }
        Ok(())
    }

    /// [`Self::fill_and_confirm`] submitting with Enter
    pub async fn fill_input(&self, selector: &str, value: &str) -> Result<()> {
        self.fill_and_confirm(selector, value, DEFAULT_SUBMIT_KEY).await
    }

    /// Set the field's value, assert it reads back exactly, then press
    /// `submit_key` unless it is empty.
    pub async fn fill_and_confirm(
        &self,
        selector: &str,
        value: &str,
        submit_key: &str,
    ) -> Result<()> {
        let input = Locator::new(selector);
        self.driver()
            .wait_for(&input, WaitState::Visible, self.config.timeout)
            .await?;

        log::info!("Filling {} with {:?}", selector, value);
        self.driver().fill(&input, value).await?;
        expect::expect_value(self.driver(), &input, value).await?;

        if !submit_key.is_empty() {
            self.driver().press(&input, submit_key).await?;
        }
        Ok(())
    }

    /// Trimmed `h4` texts under `container_selector`, minus any text that also
    /// appears as an `h4` inside a dialog. Container order is kept.
    pub async fn extract_headings_excluding_dialogs(
        &self,
        container_selector: &str,
    ) -> Result<Vec<String>> {
        self.extract_headings_with_tag(container_selector, DEFAULT_HEADING_TAG)
            .await
    }

    pub async fn extract_headings_with_tag(
        &self,
        container_selector: &str,
        heading_tag: &str,
    ) -> Result<Vec<String>> {
        let dialog_headings = Locator::new(format!("{} {}", DIALOG_SELECTOR, heading_tag));
        let dialog_titles = trimmed_non_empty(self.driver().text_contents(&dialog_headings).await?);
        log::debug!("{} in dialogs: {:?}", heading_tag, dialog_titles);

        self.driver()
            .wait_for(
                &Locator::new(container_selector),
                WaitState::Attached,
                self.config.timeout,
            )
            .await?;

        let container_headings = Locator::new(format!("{} {}", container_selector, heading_tag));
        let raw = self.driver().text_contents(&container_headings).await?;

        let mut titles = Vec::with_capacity(raw.len());
        for (i, text) in raw.iter().enumerate() {
            let title = text.trim();
            if title.is_empty() {
                continue;
            }
            titles.push(title.to_string());
            self.maybe_highlight(&container_headings.clone().nth(i)).await;
        }

        let filtered = exclude_titles(titles, &dialog_titles);
        log::debug!("{} in {}: {:?}", heading_tag, container_selector, filtered);
        Ok(filtered)
    }

    /// Probe for a button labelled exactly `label` (surrounding whitespace
    /// ignored), optionally scoped inside `dialog_scope`.
    pub async fn probe_button(
        &self,
        button_selector: &str,
        label: &str,
        dialog_scope: &str,
    ) -> ProbeOutcome {
        let filter = match TextFilter::exact_trimmed(label) {
            Ok(filter) => filter,
            Err(e) => return ProbeOutcome::Failed(e),
        };
        let button = Locator::new(button_selector)
            .within(dialog_scope)
            .with_filter(filter);
        self.maybe_highlight(&button).await;

        let timeout = self.config.timeout;
        match self.driver().wait_for(&button, WaitState::Attached, timeout).await {
            Ok(()) => {}
            Err(e) if e.is_not_found() => return ProbeOutcome::Absent,
            Err(e) => return ProbeOutcome::Failed(e),
        }

        match self.driver().wait_for(&button, WaitState::Visible, timeout).await {
            Ok(()) => ProbeOutcome::Visible,
            Err(e) if e.is_not_found() => ProbeOutcome::Hidden,
            Err(e) => ProbeOutcome::Failed(e),
        }
    }

    /// Boolean form of [`Self::probe_button`]. Never returns an error.
    pub async fn probe_button_visible(
        &self,
        button_selector: &str,
        label: &str,
        dialog_scope: &str,
    ) -> bool {
        let outcome = self.probe_button(button_selector, label, dialog_scope).await;
        if outcome.is_visible() {
            log::debug!("Button \"{}\" is visible", label);
            true
        } else {
            log::error!("Button \"{}\" not found or not visible: {}", label, outcome);
            false
        }
    }

    /// Lines of the container's rendered text, trimmed, without blanks and
    /// without lines starting with any of `exclude_prefixes`.
    pub async fn extract_delimited_list<S: AsRef<str>>(
        &self,
        container_selector: &str,
        exclude_prefixes: &[S],
    ) -> Result<Vec<String>> {
        let container = Locator::new(container_selector);
        self.driver()
            .wait_for(&container, WaitState::Visible, self.config.timeout)
            .await?;
        let text = self.driver().inner_text(&container).await?;
        let items = parse_delimited_list(&text, exclude_prefixes);
        log::debug!("List in {}: {:?}", container_selector, items);
        Ok(items)
    }

    /// Scroll `selector` into view if it is not already; no-op otherwise.
    pub async fn scroll_into_view(&self, selector: &str) -> Result<()> {
        let element = Locator::new(selector);
        self.driver()
            .wait_for(&element, WaitState::Attached, self.config.timeout)
            .await?;
        if self.driver().scroll_into_view_if_needed(&element).await? {
            log::debug!("Scrolled to {}", selector);
        }
        self.maybe_highlight(&element).await;
        Ok(())
    }
}

fn trimmed_non_empty(texts: Vec<String>) -> Vec<String> {
    texts
        .into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect()
}

/// `titles` minus everything in `excluded`, order preserved
pub fn exclude_titles(titles: Vec<String>, excluded: &[String]) -> Vec<String> {
    let excluded: HashSet<&str> = excluded.iter().map(String::as_str).collect();
    titles
        .into_iter()
        .filter(|t| !excluded.contains(t.as_str()))
        .collect()
}

pub fn parse_delimited_list<S: AsRef<str>>(text: &str, exclude_prefixes: &[S]) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter(|line| {
            !exclude_prefixes
                .iter()
                .any(|prefix| line.starts_with(prefix.as_ref()))
        })
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const NO_PREFIXES: &[&str] = &[];

    #[test]
    fn test_parse_list_keeps_order_and_drops_blanks() {
        assert_eq!(
            parse_delimited_list("Header\nAlice\n\nBob\n", NO_PREFIXES),
            vec!["Header", "Alice", "Bob"]
        );
    }

    #[test]
    fn test_parse_list_excludes_prefixes() {
        assert_eq!(
            parse_delimited_list("Header\nAlice\n\nBob\n", &["Header"]),
            vec!["Alice", "Bob"]
        );
        assert_eq!(
            parse_delimited_list(
                "Accepted usernames are:\n standard_user \r\nlocked_out_user",
                &["Accepted usernames"]
            ),
            vec!["standard_user", "locked_out_user"]
        );
    }

    #[test]
    fn test_parse_list_prefix_is_not_substring() {
        assert_eq!(
            parse_delimited_list("my Header\nHeader two", &["Header"]),
            vec!["my Header"]
        );
    }

    #[test]
    fn test_exclude_titles() {
        let titles = vec!["A".to_string(), "B".to_string(), "C".to_string()];
        assert_eq!(exclude_titles(titles, &["B".to_string()]), vec!["A", "C"]);
    }

    #[test]
    fn test_click_default_is_yes() {
        assert_eq!(Click::default(), Click::Yes);
    }

    #[test]
    fn test_probe_outcome_display() {
        assert!(ProbeOutcome::Visible.is_visible());
        assert!(!ProbeOutcome::Absent.is_visible());
        assert_eq!(ProbeOutcome::Hidden.to_string(), "present but not visible");
        let failed = ProbeOutcome::Failed(UiError::Driver("boom".to_string()));
        assert_eq!(failed.to_string(), "probe failed: Driver error: boom");
    }
}
