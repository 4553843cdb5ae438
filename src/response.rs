use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Result, WeatherKitError};
use crate::query::DataSet;

/// A weather response keyed by data-set name.
///
/// The payload structure is passed through uninterpreted; this type only
/// provides top-level data-set lookup, path traversal and deserialization
/// into caller-defined types.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeatherResponse {
    data: Map<String, Value>,
}

impl WeatherResponse {
    /// Get the payload of a data set, if the response carries it
    pub fn data_set(&self, name: &str) -> Option<&Value> {
        self.data.get(name)
    }

    /// Check whether the response carries a data set
    pub fn has_data_set(&self, name: &str) -> bool {
        self.data.contains_key(name)
    }

    /// Names of the data sets present in the response
    pub fn data_sets(&self) -> Vec<&str> {
        self.data.keys().map(String::as_str).collect()
    }

    /// Extract the payload of a single data set.
    ///
    /// Fails with [`WeatherKitError::DataSetNotFound`] when the API answered
    /// without it, e.g. next-hour forecasts outside their coverage area.
    pub fn into_data_set(mut self, data_set: &DataSet) -> Result<Value> {
        self.data
            .remove(data_set.as_str())
            .ok_or_else(|| WeatherKitError::DataSetNotFound {
                data_set: data_set.as_str().to_string(),
            })
    }

    /// Get a value by a slash-separated path.
    /// For example, "currentWeather/temperature" accesses the "temperature"
    /// field inside the "currentWeather" data set.
    pub fn get(&self, path: &str) -> Option<&Value> {
        let mut parts = path.split('/').filter(|s| !s.is_empty());

        let mut current = self.data.get(parts.next()?)?;

        for part in parts {
            current = match current {
                Value::Object(map) => map.get(part)?,
                Value::Array(arr) => {
                    let index: usize = part.parse().ok()?;
                    arr.get(index)?
                }
                _ => return None,
            };
        }

        Some(current)
    }

    /// Get a string value by a slash-separated path
    pub fn get_string(&self, path: &str) -> Option<String> {
        self.get(path).and_then(|v| v.as_str().map(|s| s.to_string()))
    }

    /// Deserialize the whole response into the provided type
    pub fn decode<T>(&self) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        serde_json::from_value(Value::Object(self.data.clone())).map_err(|e| e.into())
    }

    /// Get the raw response map
    pub fn raw(&self) -> &Map<String, Value> {
        &self.data
    }
}

impl From<Map<String, Value>> for WeatherResponse {
    fn from(data: Map<String, Value>) -> Self {
        WeatherResponse { data }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> WeatherResponse {
        let json = r#"{
            "currentWeather": {
                "temperature": 11.5,
                "conditionCode": "Cloudy"
            },
            "forecastHourly": {
                "hours": [{"temperature": 10.9}]
            }
        }"#;

        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_data_set_lookup() {
        let response = sample();
        assert!(response.has_data_set("currentWeather"));
        assert!(response.data_set("forecastHourly").is_some());
        assert!(response.data_set("forecastDaily").is_none());
        assert_eq!(response.data_sets(), vec!["currentWeather", "forecastHourly"]);
    }

    #[test]
    fn test_into_data_set() {
        let payload = sample().into_data_set(&DataSet::CurrentWeather).unwrap();
        assert_eq!(payload["conditionCode"], "Cloudy");
    }

    #[test]
    fn test_into_data_set_not_found() {
        let result = sample().into_data_set(&DataSet::ForecastNextHour);
        assert!(matches!(
            result,
            Err(WeatherKitError::DataSetNotFound { ref data_set }) if data_set == "forecastNextHour"
        ));
    }

    #[test]
    fn test_response_get() {
        let response = sample();
        assert_eq!(
            response.get("currentWeather/temperature"),
            Some(&Value::from(11.5))
        );
        assert_eq!(
            response.get_string("currentWeather/conditionCode"),
            Some("Cloudy".to_string())
        );
        // Array traversal by index
        assert_eq!(
            response.get("forecastHourly/hours/0/temperature"),
            Some(&Value::from(10.9))
        );
        assert!(response.get("forecastDaily/days").is_none());
    }

    #[test]
    fn test_response_decode() {
        #[derive(Deserialize)]
        struct Current {
            temperature: f64,
        }

        #[derive(Deserialize)]
        struct Weather {
            #[serde(rename = "currentWeather")]
            current_weather: Current,
        }

        let weather: Weather = sample().decode().unwrap();
        assert_eq!(weather.current_weather.temperature, 11.5);
    }
}
