//! Assertions over the live page
//!
//! Each check fails with [`UiError::Assertion`] carrying a message that names
//! the locator and both the expected and the actual value.

use crate::driver::{normalize_whitespace, Driver, Locator, WaitState};
use crate::error::{Result, UiError};
use regex::Regex;
use std::fmt::Debug;
use std::time::{Duration, Instant};

const URL_POLL_INTERVAL: Duration = Duration::from_millis(100);

pub fn assert_equals<T>(actual: &T, expected: &T, what: &str) -> Result<()>
where
    T: PartialEq + Debug + ?Sized,
{
    if actual == expected {
        Ok(())
    } else {
        Err(UiError::assertion(format!(
            "{}: expected {:?}, got {:?}",
            what, expected, actual
        )))
    }
}

pub fn assert_contains(actual: &str, substring: &str, what: &str) -> Result<()> {
    if actual.contains(substring) {
        Ok(())
    } else {
        Err(UiError::assertion(format!(
            "{}: expected {:?} to contain {:?}",
            what, actual, substring
        )))
    }
}

/// Wait for `locator` to render, failing as an assertion if it never does.
pub async fn expect_visible(
    driver: &dyn Driver,
    locator: &Locator,
    timeout: Duration,
) -> Result<()> {
    match driver.wait_for(locator, WaitState::Visible, timeout).await {
        Ok(()) => Ok(()),
        Err(e) if e.is_not_found() => Err(UiError::assertion(format!(
            "expected {} to be visible within {:?}",
            locator, timeout
        ))),
        Err(e) => Err(e),
    }
}

/// The single node behind `locator` must have exactly `expected` as its
/// text (whitespace-normalised on both sides).
pub async fn expect_text(
    driver: &dyn Driver,
    locator: &Locator,
    expected: &str,
    timeout: Duration,
) -> Result<()> {
    match driver.wait_for(locator, WaitState::Attached, timeout).await {
        Ok(()) => {}
        Err(e) if e.is_not_found() => {
            return Err(UiError::assertion(format!(
                "expected {} to have text {:?}, but no element matched within {:?}",
                locator, expected, timeout
            )))
        }
        Err(e) => return Err(e),
    }

    let texts = driver.text_contents(locator).await?;
    if texts.len() != 1 {
        return Err(UiError::assertion(format!(
            "expected {} to resolve to one element with text {:?}, found {}",
            locator,
            expected,
            texts.len()
        )));
    }

    assert_equals(
        normalize_whitespace(&texts[0]).as_str(),
        normalize_whitespace(expected).as_str(),
        &format!("text of {}", locator),
    )
}

/// The rendered text of the visible node behind `locator` contains `substring`.
pub async fn expect_contains_text(
    driver: &dyn Driver,
    locator: &Locator,
    substring: &str,
    timeout: Duration,
) -> Result<()> {
    expect_visible(driver, locator, timeout).await?;
    let text = driver.inner_text(locator).await?;
    assert_contains(&text, substring, &format!("text of {}", locator))
}

/// Field value must equal `expected` byte for byte.
pub async fn expect_value(driver: &dyn Driver, locator: &Locator, expected: &str) -> Result<()> {
    let actual = driver.input_value(locator).await?;
    assert_equals(actual.as_str(), expected, &format!("value of {}", locator))
}

/// Wait until the session URL matches `pattern`.
pub async fn expect_url(driver: &dyn Driver, pattern: &Regex, timeout: Duration) -> Result<()> {
    let started = Instant::now();
    loop {
        let url = driver.current_url().await?;
        if pattern.is_match(&url) {
            return Ok(());
        }
        if started.elapsed() >= timeout {
            return Err(UiError::assertion(format!(
                "expected URL to match /{}/ within {:?}, got {:?}",
                pattern.as_str(),
                timeout,
                url
            )));
        }
        tokio::time::sleep(URL_POLL_INTERVAL).await;
    }
}
