use thirtyfour::error::WebDriverResult;
use thirtyfour::{ChromiumLikeCapabilities, DesiredCapabilities, WebDriver};

use crate::configuration::{Browser, WebDriverSettings};

/// Owns the browser session for the lifetime of a run.
pub struct Droid {
    pub driver: WebDriver,
}

impl Droid {
    pub async fn new(settings: &WebDriverSettings) -> WebDriverResult<Self> {
        let driver = match settings.browser {
            Browser::Firefox => {
                let mut caps = DesiredCapabilities::firefox();
                if settings.headless {
                    caps.set_headless()?;
                }
                WebDriver::new(&settings.url, caps).await?
            }
            Browser::Chrome => {
                let mut caps = DesiredCapabilities::chrome();
                if settings.headless {
                    caps.set_headless()?;
                }
                WebDriver::new(&settings.url, caps).await?
            }
        };
        driver.maximize_window().await?;

        Ok(Droid { driver })
    }

    /// Ends the session. The server keeps orphaned sessions alive
    /// otherwise.
    pub async fn quit(self) -> WebDriverResult<()> {
        self.driver.quit().await
    }
}
