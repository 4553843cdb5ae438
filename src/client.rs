use reqwest::blocking::{Client, ClientBuilder};
use std::time::Duration;

/// Production weather endpoint
pub const WEATHER_ENDPOINT: &str = "https://weatherkit.apple.com/api/v1/weather";

/// Production availability endpoint
pub const AVAILABILITY_ENDPOINT: &str = "https://weatherkit.apple.com/api/v1/availability";

/// Create the default HTTP client for WeatherKit API requests
pub fn create_http_client() -> Client {
    ClientBuilder::new()
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .build()
        .expect("Failed to create HTTP client")
}

/// Configuration for the WeatherKit client
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the weather endpoint
    pub weather_endpoint: String,
    /// Base URL of the availability endpoint
    pub availability_endpoint: String,
    /// Language code inserted into the weather URL path
    pub language_code: String,
    /// Timezone used for rolling up daily forecasts
    pub timezone: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            weather_endpoint: WEATHER_ENDPOINT.to_string(),
            availability_endpoint: AVAILABILITY_ENDPOINT.to_string(),
            language_code: "en".to_string(),
            timezone: "UTC".to_string(),
        }
    }
}

impl Config {
    /// Create a configuration with the production endpoints and defaults
    pub fn new() -> Self {
        Config::default()
    }

    /// Override the weather endpoint base URL
    pub fn with_weather_endpoint(mut self, url: impl Into<String>) -> Self {
        self.weather_endpoint = url.into();
        self
    }

    /// Override the availability endpoint base URL
    pub fn with_availability_endpoint(mut self, url: impl Into<String>) -> Self {
        self.availability_endpoint = url.into();
        self
    }

    /// Set the default language code
    pub fn with_language_code(mut self, language_code: impl Into<String>) -> Self {
        self.language_code = language_code.into();
        self
    }

    /// Set the default timezone
    pub fn with_timezone(mut self, timezone: impl Into<String>) -> Self {
        self.timezone = timezone.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.weather_endpoint, WEATHER_ENDPOINT);
        assert_eq!(config.availability_endpoint, AVAILABILITY_ENDPOINT);
        assert_eq!(config.language_code, "en");
        assert_eq!(config.timezone, "UTC");
    }

    #[test]
    fn test_config_overrides() {
        let config = Config::new()
            .with_weather_endpoint("http://localhost:8080/weather")
            .with_availability_endpoint("http://localhost:8080/availability")
            .with_language_code("de")
            .with_timezone("Europe/Berlin");

        assert_eq!(config.weather_endpoint, "http://localhost:8080/weather");
        assert_eq!(config.availability_endpoint, "http://localhost:8080/availability");
        assert_eq!(config.language_code, "de");
        assert_eq!(config.timezone, "Europe/Berlin");
    }
}
