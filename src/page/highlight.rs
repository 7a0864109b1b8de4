//! Debug highlighting
//!
//! Paints touched elements so a headed run shows what the suite is doing.
//! Never fails the caller.

use crate::driver::{Driver, Locator, StyleOverride};
use crate::error::{Result, UiError};

pub fn highlight_style() -> StyleOverride {
    StyleOverride {
        background_color: "yellow".to_string(),
        border: "2px solid red".to_string(),
        color: "blue".to_string(),
    }
}

/// Apply the highlight style; errors when nothing could be styled.
pub async fn try_highlight(driver: &dyn Driver, locator: &Locator) -> Result<usize> {
    match driver.apply_style(locator, &highlight_style()).await {
        Ok(0) => Err(UiError::Highlight(format!("no element matches {}", locator))),
        Ok(styled) => Ok(styled),
        Err(UiError::Highlight(message)) => Err(UiError::Highlight(message)),
        Err(other) => Err(UiError::Highlight(other.to_string())),
    }
}

/// Fire-and-forget variant: failures are logged at warn level and dropped.
pub async fn highlight(driver: &dyn Driver, locator: &Locator) {
    match try_highlight(driver, locator).await {
        Ok(styled) => log::debug!("Highlighted {} element(s) for {}", styled, locator),
        Err(e) => log::warn!("Could not highlight {}: {}", locator, e),
    }
}
