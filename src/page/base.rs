use crate::driver::Driver;
use crate::error::{Result, UiError};

/// Owns the session handle for the lifetime of one scenario
pub struct BasePage {
    driver: Box<dyn Driver>,
}

impl BasePage {
    pub fn new(driver: Box<dyn Driver>) -> Self {
        Self { driver }
    }

    /// Load `url` in the owned session. Not retried.
    pub async fn navigate_to(&self, url: &str) -> Result<()> {
        log::info!("Navigating to {}", url);
        self.driver.navigate(url).await.map_err(|e| match e {
            UiError::Navigation(_) => e,
            other => UiError::Navigation(format!("{}: {}", url, other)),
        })
    }

    pub fn driver(&self) -> &dyn Driver {
        self.driver.as_ref()
    }

    /// Release the session
    pub async fn close(self) -> Result<()> {
        self.driver.close().await
    }
}
