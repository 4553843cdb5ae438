use thiserror::Error;

/// Main error type for WeatherKit operations
#[derive(Debug, Error)]
pub enum WeatherKitError {
    /// Key source looked like a path but no file exists there
    #[error("cannot find key at path {path}")]
    KeyFileMissing { path: String },

    /// Key bytes were read but could not be parsed as an ES256 private key
    #[error("key could not be decoded")]
    KeyDecoding {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Signing or encoding the developer token failed
    #[error("token failed to generate")]
    TokenGenerationFailed {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A fetch was attempted before both latitude and longitude were set
    #[error("missing coordinates of either latitude or longitude")]
    MissingCoordinates,

    /// A requested data set was absent from the API response
    #[error("{data_set} data set not available for this location")]
    DataSetNotFound { data_set: String },

    /// Client construction failed while resolving authentication
    #[error("failed to initialize WeatherKit client")]
    Initialization {
        #[source]
        source: Box<WeatherKitError>,
    },

    /// HTTP error status returned by the API
    #[error("HTTP error {status}: {body}")]
    Http { status: u16, body: String },

    /// HTTP client error
    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing error
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl WeatherKitError {
    /// Create a new key decoding error
    pub fn key_decoding(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        WeatherKitError::KeyDecoding {
            source: source.into(),
        }
    }

    /// Create a new token generation error
    pub fn token_generation(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        WeatherKitError::TokenGenerationFailed {
            source: source.into(),
        }
    }

    /// Create a new HTTP error
    pub fn http(status: u16, body: String) -> Self {
        WeatherKitError::Http { status, body }
    }

    /// Wrap a construction failure
    pub fn initialization(source: WeatherKitError) -> Self {
        WeatherKitError::Initialization {
            source: Box::new(source),
        }
    }

    /// Check if this error is an unauthorized error (401), e.g. a rejected token
    pub fn is_unauthorized(&self) -> bool {
        self.status_code() == Some(401)
    }

    /// Check if this error is a not found error (404)
    pub fn is_not_found(&self) -> bool {
        self.status_code() == Some(404)
    }

    /// Get the HTTP status code if this is a transport-level error
    pub fn status_code(&self) -> Option<u16> {
        match self {
            WeatherKitError::Http { status, .. } => Some(*status),
            WeatherKitError::Reqwest(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Result type for WeatherKit operations
pub type Result<T> = std::result::Result<T, WeatherKitError>;
