use chrono::{DateTime, SecondsFormat, Utc};
use std::fmt;

use crate::error::{Result, WeatherKitError};

/// Data sets the WeatherKit API can return
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSet {
    /// Current conditions
    CurrentWeather,
    /// Day-by-day forecast
    ForecastDaily,
    /// Hour-by-hour forecast
    ForecastHourly,
    /// Next-hour precipitation forecast
    ForecastNextHour,
    /// A data set name this crate does not know, carried verbatim so
    /// availability responses round-trip losslessly
    Other(String),
}

impl DataSet {
    /// Get the wire name of this data set
    pub fn as_str(&self) -> &str {
        match self {
            DataSet::CurrentWeather => "currentWeather",
            DataSet::ForecastDaily => "forecastDaily",
            DataSet::ForecastHourly => "forecastHourly",
            DataSet::ForecastNextHour => "forecastNextHour",
            DataSet::Other(name) => name,
        }
    }

    /// The full selection requested when none is configured
    pub fn default_set() -> Vec<DataSet> {
        vec![
            DataSet::CurrentWeather,
            DataSet::ForecastDaily,
            DataSet::ForecastHourly,
            DataSet::ForecastNextHour,
        ]
    }
}

impl fmt::Display for DataSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<&str> for DataSet {
    fn from(name: &str) -> Self {
        match name {
            "currentWeather" => DataSet::CurrentWeather,
            "forecastDaily" => DataSet::ForecastDaily,
            "forecastHourly" => DataSet::ForecastHourly,
            "forecastNextHour" => DataSet::ForecastNextHour,
            other => DataSet::Other(other.to_string()),
        }
    }
}

impl From<String> for DataSet {
    fn from(name: String) -> Self {
        match name.as_str() {
            "currentWeather" => DataSet::CurrentWeather,
            "forecastDaily" => DataSet::ForecastDaily,
            "forecastHourly" => DataSet::ForecastHourly,
            "forecastNextHour" => DataSet::ForecastNextHour,
            _ => DataSet::Other(name),
        }
    }
}

/// Accumulated request state for a client instance.
///
/// Fields are written through the client's fluent setters and serialized on
/// every fetch; building parameters never consumes or mutates the state.
#[derive(Debug, Clone)]
pub struct Query {
    /// Latitude of the point of interest
    pub lat: Option<f64>,
    /// Longitude of the point of interest
    pub lon: Option<f64>,
    /// Data sets to request
    pub data_sets: Vec<DataSet>,
    /// Language code used in the weather URL path
    pub language: String,
    /// Country code; carried for callers but not sent to the current endpoints
    pub country: Option<String>,
    /// Timezone used for rolling up daily forecasts
    pub timezone: Option<String>,
    /// Reference instant for current conditions
    pub current_as_of: Option<DateTime<Utc>>,
    /// First day of the daily forecast window
    pub daily_start: Option<DateTime<Utc>>,
    /// Last day of the daily forecast window
    pub daily_end: Option<DateTime<Utc>>,
    /// First hour of the hourly forecast window
    pub hourly_start: Option<DateTime<Utc>>,
    /// Last hour of the hourly forecast window
    pub hourly_end: Option<DateTime<Utc>>,
}

impl Query {
    /// Create the initial query state for a client
    pub(crate) fn new(language: &str, timezone: &str) -> Self {
        Query {
            lat: None,
            lon: None,
            data_sets: DataSet::default_set(),
            language: language.to_string(),
            country: None,
            timezone: (!timezone.is_empty()).then(|| timezone.to_string()),
            current_as_of: None,
            daily_start: None,
            daily_end: None,
            hourly_start: None,
            hourly_end: None,
        }
    }

    /// Get the coordinates, failing if either half is unset
    pub(crate) fn coordinates(&self) -> Result<(f64, f64)> {
        match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => Ok((lat, lon)),
            _ => Err(WeatherKitError::MissingCoordinates),
        }
    }

    /// Serialize the query parameters in their documented order.
    ///
    /// Unset fields are omitted entirely, never sent as empty values. An
    /// empty data set selection omits the `dataSets` key, which the API
    /// answers with an empty weather object.
    pub(crate) fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();

        if !self.data_sets.is_empty() {
            let joined = self
                .data_sets
                .iter()
                .map(DataSet::as_str)
                .collect::<Vec<_>>()
                .join(",");
            params.push(("dataSets", joined));
        }

        if let Some(timezone) = &self.timezone {
            if !timezone.is_empty() {
                params.push(("timezone", timezone.clone()));
            }
        }

        if let Some(instant) = self.current_as_of {
            params.push(("currentAsOf", zulu(instant)));
        }
        if let Some(instant) = self.daily_start {
            params.push(("dailyStart", zulu(instant)));
        }
        if let Some(instant) = self.daily_end {
            params.push(("dailyEnd", zulu(instant)));
        }
        if let Some(instant) = self.hourly_start {
            params.push(("hourlyStart", zulu(instant)));
        }
        if let Some(instant) = self.hourly_end {
            params.push(("hourlyEnd", zulu(instant)));
        }

        params
    }
}

/// Format an instant as an ISO-8601 Zulu string with second precision,
/// e.g. `2024-01-01T00:00:00Z`
fn zulu(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Secs, true)
}
