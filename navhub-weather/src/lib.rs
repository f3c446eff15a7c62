//! Core library for the navhub weather endpoint.
//!
//! This crate defines:
//! - Configuration loading
//! - Abstraction over the geolocation, geocoding and forecast providers
//! - The lookup cascade and its response envelope
//! - The WMO weather code table
//!
//! It is used by `navhub-server`, but can also be reused by other binaries or services.

pub mod address;
pub mod config;
pub mod error;
pub mod lookup;
pub mod model;
pub mod provider;
pub mod weather_code;

pub use address::ClientAddress;
pub use config::{Config, LoggingConfig, ProvidersConfig, ServerConfig};
pub use error::LookupError;
pub use lookup::WeatherLookup;
pub use model::{WeatherEnvelope, WeatherFailure, WeatherReport};
pub use provider::{ForecastProvider, GeocodingProvider, GeolocationProvider, ProviderId};
