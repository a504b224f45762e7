use std::time::Duration;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub webdriver: WebDriverSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebDriverSettings {
    pub url: String,
    pub browser: Browser,
    pub headless: bool,
    pub element_timeout_secs: u64,
    pub poll_interval_millis: u64,
    pub stale_retry_limit: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Browser {
    Firefox,
    Chrome,
}

impl WebDriverSettings {
    pub fn element_timeout(&self) -> Duration {
        Duration::from_secs(self.element_timeout_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_millis)
    }
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let settings = config::Config::builder()
        .set_default("webdriver.url", "http://localhost:4444")?
        .set_default("webdriver.browser", "firefox")?
        .set_default("webdriver.headless", false)?
        .set_default("webdriver.element_timeout_secs", 30)?
        .set_default("webdriver.poll_interval_millis", 500)?
        .set_default("webdriver.stale_retry_limit", 8)?
        .add_source(config::File::new("configuration", config::FileFormat::Yaml).required(false))
        .add_source(config::Environment::with_prefix("JOBSCOUT").separator("__"))
        .build()?;

    settings.try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configuration_covers_every_webdriver_knob() {
        let settings = get_configuration().unwrap();

        assert_eq!(settings.webdriver.url, "http://localhost:4444");
        assert_eq!(settings.webdriver.browser, Browser::Firefox);
        assert!(!settings.webdriver.headless);
        assert_eq!(settings.webdriver.element_timeout(), Duration::from_secs(30));
        assert_eq!(
            settings.webdriver.poll_interval(),
            Duration::from_millis(500)
        );
        assert_eq!(settings.webdriver.stale_retry_limit, 8);
    }
}
