use chrono::{DateTime, Utc};
use log::debug;
use reqwest::blocking::Client;
use serde_json::Value;
use url::Url;

use crate::auth::Auth;
use crate::client::{create_http_client, Config};
use crate::error::{Result, WeatherKitError};
use crate::query::{DataSet, Query};
use crate::response::WeatherResponse;
use crate::token::resolve_bearer;

/// Client for the WeatherKit REST API.
///
/// One instance holds one resolved bearer token and one set of accumulated
/// request parameters. The fluent setters consume and return the instance;
/// the fetch methods borrow it, so parameters survive across calls.
pub struct WeatherKit {
    /// HTTP client
    client: Client,
    /// Configuration
    config: Config,
    /// Resolved bearer token
    token: String,
    /// Accumulated request state
    query: Query,
}

impl WeatherKit {
    /// Create a new client with the default configuration
    pub fn new(auth: Auth) -> Result<Self> {
        Self::with_config(auth, Config::default())
    }

    /// Create a new client with a custom configuration.
    ///
    /// Authentication is resolved here, once: signed auth decodes its key
    /// and mints the developer token, a pre-generated token passes through.
    /// Any failure is wrapped in [`WeatherKitError::Initialization`].
    pub fn with_config(auth: Auth, config: Config) -> Result<Self> {
        let token = resolve_bearer(&auth).map_err(WeatherKitError::initialization)?;

        Ok(WeatherKit {
            client: create_http_client(),
            query: Query::new(&config.language_code, &config.timezone),
            config,
            token,
        })
    }

    /// Set the coordinates of the point of interest
    pub fn location(mut self, lat: f64, lon: f64) -> Self {
        self.query.lat = Some(lat);
        self.query.lon = Some(lon);
        self
    }

    /// Replace the data-set selection.
    ///
    /// The selection persists exactly as given; clearing it means later
    /// fetches send no `dataSets` parameter at all.
    pub fn data_sets(mut self, data_sets: Vec<DataSet>) -> Self {
        self.query.data_sets = data_sets;
        self
    }

    /// Set the reference instant for current conditions, or unset with `None`
    pub fn current_as_of(mut self, instant: Option<DateTime<Utc>>) -> Self {
        self.query.current_as_of = instant;
        self
    }

    /// Set the first day of the daily forecast window, or unset with `None`
    pub fn daily_start(mut self, instant: Option<DateTime<Utc>>) -> Self {
        self.query.daily_start = instant;
        self
    }

    /// Set the last day of the daily forecast window, or unset with `None`
    pub fn daily_end(mut self, instant: Option<DateTime<Utc>>) -> Self {
        self.query.daily_end = instant;
        self
    }

    /// Set the first hour of the hourly forecast window, or unset with `None`
    pub fn hourly_start(mut self, instant: Option<DateTime<Utc>>) -> Self {
        self.query.hourly_start = instant;
        self
    }

    /// Set the last hour of the hourly forecast window, or unset with `None`
    pub fn hourly_end(mut self, instant: Option<DateTime<Utc>>) -> Self {
        self.query.hourly_end = instant;
        self
    }

    /// Set the timezone used for rolling up daily forecasts
    pub fn timezone(mut self, timezone: impl Into<String>) -> Self {
        self.query.timezone = Some(timezone.into());
        self
    }

    /// Set the language code used in the weather URL path
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.query.language = language.into();
        self
    }

    /// Record a country code.
    ///
    /// The current endpoints do not consume it; the value is readable back
    /// through [`query`](Self::query).
    pub fn country(mut self, country: impl Into<String>) -> Self {
        self.query.country = Some(country.into());
        self
    }

    /// Get the accumulated request state
    pub fn query(&self) -> &Query {
        &self.query
    }

    /// Get the client configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Fetch weather for the configured location.
    ///
    /// The response is keyed by data-set name and carries the currently
    /// selected data sets, minus any the location does not support.
    pub fn weather(&self) -> Result<WeatherResponse> {
        let url = self.weather_url()?;
        self.get(&url)
    }

    /// Fetch the data sets available for the configured location.
    ///
    /// The returned list replaces the current data-set selection, so a
    /// following [`weather`](Self::weather) call requests exactly what the
    /// location supports.
    pub fn availability(&mut self) -> Result<Vec<DataSet>> {
        let url = self.availability_url()?;
        let names: Vec<String> = self.get(&url)?;
        Ok(self.replace_data_sets(names))
    }

    /// Fetch only the current conditions.
    ///
    /// Narrows the data-set selection to `currentWeather` before fetching;
    /// the narrowed selection persists on this instance.
    pub fn currently(&mut self) -> Result<Value> {
        self.single_data_set(DataSet::CurrentWeather)
    }

    /// Fetch only the daily forecast
    pub fn daily(&mut self) -> Result<Value> {
        self.single_data_set(DataSet::ForecastDaily)
    }

    /// Fetch only the hourly forecast
    pub fn hourly(&mut self) -> Result<Value> {
        self.single_data_set(DataSet::ForecastHourly)
    }

    /// Fetch only the next-hour precipitation forecast.
    ///
    /// Fails with [`WeatherKitError::DataSetNotFound`] where Apple has no
    /// next-hour coverage.
    pub fn next_hour(&mut self) -> Result<Value> {
        self.single_data_set(DataSet::ForecastNextHour)
    }

    /// Narrow the selection to one data set, fetch, and extract its payload
    fn single_data_set(&mut self, data_set: DataSet) -> Result<Value> {
        self.query.data_sets = vec![data_set.clone()];
        self.weather()?.into_data_set(&data_set)
    }

    /// Replace the data-set selection with names reported by the API
    fn replace_data_sets(&mut self, names: Vec<String>) -> Vec<DataSet> {
        let data_sets: Vec<DataSet> = names.into_iter().map(DataSet::from).collect();
        self.query.data_sets = data_sets.clone();
        data_sets
    }

    /// Weather URL for the current state: `{base}/{language}/{lat}/{lon}`
    fn weather_url(&self) -> Result<String> {
        let (lat, lon) = self.query.coordinates()?;
        Ok(format!(
            "{}/{}/{}/{}",
            self.config.weather_endpoint, self.query.language, lat, lon
        ))
    }

    /// Availability URL for the current state: `{base}/{lat}/{lon}`
    fn availability_url(&self) -> Result<String> {
        let (lat, lon) = self.query.coordinates()?;
        Ok(format!(
            "{}/{}/{}",
            self.config.availability_endpoint, lat, lon
        ))
    }

    /// Execute a GET request and deserialize the JSON response
    fn get<T>(&self, endpoint: &str) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        // Build URL with query parameters
        let mut url = Url::parse(endpoint)?;
        for (key, value) in self.query.params() {
            url.query_pairs_mut().append_pair(key, &value);
        }

        debug!("GET {}", url);

        // Execute request
        let start = std::time::Instant::now();
        let response = self
            .client
            .get(url.as_str())
            .header("Authorization", format!("Bearer {}", self.token))
            .send()?;
        let status = response.status();
        let body = response.bytes()?;

        debug!("GET {} => {} ({:?})", url.path(), status, start.elapsed());

        if !status.is_success() {
            return Err(WeatherKitError::http(
                status.as_u16(),
                String::from_utf8_lossy(&body).to_string(),
            ));
        }

        serde_json::from_slice(&body).map_err(|e| e.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    // Unroutable endpoints so no test traffic leaves the machine
    fn offline_config() -> Config {
        Config::new()
            .with_weather_endpoint("http://127.0.0.1:9/weather")
            .with_availability_endpoint("http://127.0.0.1:9/availability")
    }

    fn offline_client() -> WeatherKit {
        WeatherKit::with_config(Auth::token("test-token"), offline_config()).unwrap()
    }

    #[test]
    fn test_static_token_is_used_verbatim() {
        let kit = WeatherKit::new(Auth::token("eyJhbGciOiJFUzI1NiJ9.e30.sig")).unwrap();
        assert_eq!(kit.token, "eyJhbGciOiJFUzI1NiJ9.e30.sig");
    }

    #[test]
    fn test_initialization_failure_is_wrapped() {
        let result = WeatherKit::new(Auth::signed_key("/no/such/key.p8", "kid", "team", "bundle"));
        match result {
            Err(WeatherKitError::Initialization { source }) => {
                assert!(matches!(*source, WeatherKitError::KeyFileMissing { .. }));
            }
            _ => panic!("expected Initialization error"),
        }
    }

    #[test]
    fn test_missing_coordinates_fail_before_any_request() {
        let mut kit = offline_client();
        assert!(matches!(
            kit.weather(),
            Err(WeatherKitError::MissingCoordinates)
        ));
        assert!(matches!(
            kit.availability(),
            Err(WeatherKitError::MissingCoordinates)
        ));
        assert!(matches!(
            kit.currently(),
            Err(WeatherKitError::MissingCoordinates)
        ));
    }

    #[test]
    fn test_zero_coordinates_are_valid() {
        // (0.0, 0.0) passes the precondition and reaches transport
        let kit = offline_client().location(0.0, 0.0);
        assert!(matches!(kit.weather(), Err(WeatherKitError::Reqwest(_))));
    }

    #[test]
    fn test_url_shapes() {
        let kit = WeatherKit::new(Auth::token("t"))
            .unwrap()
            .location(51.5072, -0.1276);

        assert_eq!(
            kit.weather_url().unwrap(),
            "https://weatherkit.apple.com/api/v1/weather/en/51.5072/-0.1276"
        );
        assert_eq!(
            kit.availability_url().unwrap(),
            "https://weatherkit.apple.com/api/v1/availability/51.5072/-0.1276"
        );
    }

    #[test]
    fn test_single_accessor_narrows_selection_persistently() {
        let mut kit = offline_client().location(51.5072, -0.1276);
        let _ = kit.currently(); // transport fails, the narrowing has already happened

        assert_eq!(kit.query().data_sets, vec![DataSet::CurrentWeather]);

        // A later plain fetch keeps the narrowed selection
        let _ = kit.weather();
        assert_eq!(kit.query().data_sets, vec![DataSet::CurrentWeather]);
    }

    #[test]
    fn test_availability_list_replaces_selection() {
        let mut kit = offline_client();
        let listed = kit.replace_data_sets(vec![
            "currentWeather".to_string(),
            "forecastDaily".to_string(),
            "trendComparison".to_string(),
        ]);

        assert_eq!(
            listed,
            vec![
                DataSet::CurrentWeather,
                DataSet::ForecastDaily,
                DataSet::Other("trendComparison".to_string()),
            ]
        );
        assert_eq!(kit.query().data_sets, listed);

        // The replaced selection is what later requests serialize
        let params = kit.query().params();
        let (_, data_sets) = params.iter().find(|(k, _)| *k == "dataSets").unwrap();
        assert_eq!(data_sets, "currentWeather,forecastDaily,trendComparison");
    }

    #[test]
    fn test_fluent_chain() {
        let kit = offline_client()
            .location(51.5072, -0.1276)
            .timezone("Europe/London")
            .language("en-GB")
            .country("GB")
            .data_sets(vec![DataSet::CurrentWeather, DataSet::ForecastDaily])
            .daily_start(Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()))
            .current_as_of(None);

        let query = kit.query();
        assert_eq!(query.lat, Some(51.5072));
        assert_eq!(query.lon, Some(-0.1276));
        assert_eq!(query.language, "en-GB");
        assert_eq!(query.country.as_deref(), Some("GB"));

        let keys: Vec<&str> = query.params().iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, vec!["dataSets", "timezone", "dailyStart"]);
    }

    #[test]
    fn test_default_query_follows_config() {
        let config = Config::new()
            .with_language_code("fr")
            .with_timezone("Europe/Paris");
        let kit = WeatherKit::with_config(Auth::token("t"), config).unwrap();

        assert_eq!(kit.query().language, "fr");
        assert_eq!(kit.query().timezone.as_deref(), Some("Europe/Paris"));
        assert_eq!(kit.query().data_sets, DataSet::default_set());
    }
}
