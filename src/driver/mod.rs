//! Browser driver contract
//!
//! The page helpers only talk to a browser through [`Driver`]. A [`Locator`]
//! is a description of which nodes to act on, never a handle: every driver
//! call resolves it again against the live DOM.

pub mod chrome;

use crate::error::{Result, UiError};
use async_trait::async_trait;
use regex::Regex;
use serde_json::json;
use std::fmt;
use std::time::Duration;

pub use chrome::{ChromeBrowser, ChromeSession, ConnectionMode};

/// Text constraint applied after the CSS selector has matched
#[derive(Debug, Clone)]
pub enum TextFilter {
    /// Case-insensitive substring of the whitespace-normalised text
    Contains(String),
    /// Regular expression tested against the raw rendered text
    Matches(Regex),
}

impl TextFilter {
    /// Regex matching `label` exactly, ignoring surrounding whitespace.
    pub fn exact_trimmed(label: &str) -> Result<Self> {
        let pattern = format!(r"^\s*{}\s*$", regex::escape(label));
        Regex::new(&pattern)
            .map(TextFilter::Matches)
            .map_err(|e| UiError::Driver(format!("Invalid label pattern for '{}': {}", label, e)))
    }

    /// Whether `text` (rendered text of one node) passes the filter.
    pub fn is_match(&self, text: &str) -> bool {
        match self {
            TextFilter::Contains(needle) => normalize_whitespace(text)
                .to_lowercase()
                .contains(&normalize_whitespace(needle).to_lowercase()),
            TextFilter::Matches(re) => re.is_match(text),
        }
    }

    fn to_json(&self) -> serde_json::Value {
        match self {
            TextFilter::Contains(text) => json!({ "kind": "contains", "text": text }),
            TextFilter::Matches(re) => json!({ "kind": "regex", "source": re.as_str() }),
        }
    }
}

/// Lazy reference to zero or more DOM nodes
#[derive(Debug, Clone)]
pub struct Locator {
    selector: String,
    filter: Option<TextFilter>,
    index: Option<usize>,
}

impl Locator {
    pub fn new(selector: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
            filter: None,
            index: None,
        }
    }

    /// Keep only nodes whose text contains `text`
    pub fn has_text(mut self, text: impl Into<String>) -> Self {
        self.filter = Some(TextFilter::Contains(text.into()));
        self
    }

    pub fn with_filter(mut self, filter: TextFilter) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Restrict to descendants of `scope`. An empty scope is a no-op.
    pub fn within(mut self, scope: &str) -> Self {
        if !scope.trim().is_empty() {
            self.selector = format!("{} {}", scope.trim(), self.selector);
        }
        self
    }

    /// Pick the `index`-th match (0-based) after filtering
    pub fn nth(mut self, index: usize) -> Self {
        self.index = Some(index);
        self
    }

    pub fn first(self) -> Self {
        self.nth(0)
    }

    pub fn selector(&self) -> &str {
        &self.selector
    }

    pub fn filter(&self) -> Option<&TextFilter> {
        self.filter.as_ref()
    }

    pub fn index(&self) -> Option<usize> {
        self.index
    }

    /// JSON form understood by the in-page locator script
    pub fn to_json(&self) -> serde_json::Value {
        json!({
            "selector": self.selector,
            "filter": self.filter.as_ref().map(TextFilter::to_json),
            "index": self.index,
        })
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.selector)?;
        match &self.filter {
            Some(TextFilter::Contains(text)) => write!(f, " [has text \"{}\"]", text)?,
            Some(TextFilter::Matches(re)) => write!(f, " [text =~ /{}/]", re.as_str())?,
            None => {}
        }
        if let Some(index) = self.index {
            write!(f, " [nth={}]", index)?;
        }
        Ok(())
    }
}

/// State a locator must reach before the caller proceeds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitState {
    /// At least one node is in the DOM
    Attached,
    /// At least one node is rendered with a non-empty box
    Visible,
}

impl fmt::Display for WaitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WaitState::Attached => write!(f, "attached"),
            WaitState::Visible => write!(f, "visible"),
        }
    }
}

/// Inline style properties forced onto matched nodes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleOverride {
    pub background_color: String,
    pub border: String,
    pub color: String,
}

impl StyleOverride {
    pub fn to_json(&self) -> serde_json::Value {
        json!({
            "backgroundColor": self.background_color,
            "border": self.border,
            "color": self.color,
        })
    }
}

/// Primitives a browser backend must supply.
///
/// Single-node operations are strict: they fail when the locator resolves to
/// no node or to more than one.
#[async_trait]
pub trait Driver: Send + Sync {
    /// Load `url` and wait for the navigation to settle
    async fn navigate(&self, url: &str) -> Result<()>;

    async fn current_url(&self) -> Result<String>;

    /// Poll until `locator` reaches `state`, failing with
    /// `ElementNotFound` once `timeout` elapses
    async fn wait_for(&self, locator: &Locator, state: WaitState, timeout: Duration)
        -> Result<()>;

    async fn click(&self, locator: &Locator) -> Result<()>;

    /// Replace the field's value with `value`
    async fn fill(&self, locator: &Locator, value: &str) -> Result<()>;

    async fn input_value(&self, locator: &Locator) -> Result<String>;

    async fn press(&self, locator: &Locator, key: &str) -> Result<()>;

    /// Rendered text of every match, in document order
    async fn text_contents(&self, locator: &Locator) -> Result<Vec<String>>;

    /// Layout-aware text (line breaks for `<br>` and blocks) of the single match
    async fn inner_text(&self, locator: &Locator) -> Result<String>;

    /// Apply `style` to every match; returns how many nodes were styled
    async fn apply_style(&self, locator: &Locator, style: &StyleOverride) -> Result<usize>;

    /// Scroll the match into view unless it already is; returns whether it scrolled
    async fn scroll_into_view_if_needed(&self, locator: &Locator) -> Result<bool>;

    /// PNG capture of the viewport
    async fn screenshot(&self) -> Result<Vec<u8>>;

    async fn close(&self) -> Result<()>;
}

/// Collapse whitespace runs to single spaces and trim
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
