//! # weatherkit - Apple WeatherKit REST API client
//!
//! A Rust client for the [Apple WeatherKit REST API]. This library handles
//! developer token authentication, request building and response extraction,
//! leaving the payload structure to the caller.
//!
//! [Apple WeatherKit REST API]: https://developer.apple.com/documentation/weatherkitrestapi
//!
//! ## Features
//!
//! - Two authentication methods:
//!   - Pre-generated developer token (JWT) passed in verbatim
//!   - Self-signed ES256 token minted from a `.p8` signing key, given inline
//!     or as a file path
//! - Fluent request building with data-set selection, forecast windows,
//!   timezone and language
//! - Availability lookup reporting which data sets a location supports
//! - Response parsing with path-based value access
//!
//! ## Basic Usage
//!
//! ```no_run
//! use weatherkit::{Auth, WeatherKit};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut client = WeatherKit::new(Auth::token("eyJhbGciOiJFUzI1NiJ9..."))?
//!         .location(51.5072, -0.1276)
//!         .timezone("Europe/London");
//!
//!     // Everything at once
//!     let weather = client.weather()?;
//!     println!("{:?}", weather.get("currentWeather/temperature"));
//!
//!     // Or a single data set
//!     let current = client.currently()?;
//!     println!("{}", current["conditionCode"]);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Authentication
//!
//! With a token generated elsewhere:
//!
//! ```no_run
//! use weatherkit::{Auth, WeatherKit};
//!
//! let client = WeatherKit::new(Auth::token("eyJhbGciOiJFUzI1NiJ9..."))?;
//! # Ok::<(), weatherkit::WeatherKitError>(())
//! ```
//!
//! With the signing key downloaded from the developer portal, either as a
//! path to the `.p8` file or as inline PEM text:
//!
//! ```no_run
//! use weatherkit::{Auth, WeatherKit};
//!
//! let auth = Auth::signed_key(
//!     "/keys/AuthKey_ABC123DEFG.p8",
//!     "ABC123DEFG",
//!     "TEAM123456",
//!     "com.example.weather",
//! )
//! .with_token_ttl(3600);
//!
//! let client = WeatherKit::new(auth)?;
//! # Ok::<(), weatherkit::WeatherKitError>(())
//! ```

pub mod auth;
pub mod client;
pub mod error;
pub mod key;
pub mod query;
pub mod response;
pub mod token;
pub mod weather;

// Re-export main types for convenience
pub use auth::{Auth, DEFAULT_TOKEN_TTL};
pub use client::Config;
pub use error::{Result, WeatherKitError};
pub use key::decode_key;
pub use query::{DataSet, Query};
pub use response::WeatherResponse;
pub use token::JwtToken;
pub use weather::WeatherKit;
