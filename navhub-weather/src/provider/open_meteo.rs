use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;
use tracing::debug;

use crate::{
    LookupError,
    model::{ForecastSnapshot, Place},
};

use super::{ForecastProvider, GeocodingProvider, ProviderId, fetch_json, parse_endpoint};

/// Open-Meteo geocoding search. Asks for a single candidate, localized to Chinese.
#[derive(Debug, Clone)]
pub struct OpenMeteoGeocoding {
    endpoint: Url,
    http: Client,
}

impl OpenMeteoGeocoding {
    pub fn new(http: Client, endpoint: &str) -> anyhow::Result<Self> {
        Ok(Self {
            endpoint: parse_endpoint(ProviderId::OpenMeteoGeocoding, endpoint)?,
            http,
        })
    }
}

#[derive(Debug, Deserialize)]
struct OmSearchResponse {
    // Omitted entirely when nothing matches.
    #[serde(default)]
    results: Vec<OmPlace>,
}

#[derive(Debug, Deserialize)]
struct OmPlace {
    latitude: f64,
    longitude: f64,
    name: String,
}

#[async_trait]
impl GeocodingProvider for OpenMeteoGeocoding {
    async fn search(&self, name: &str) -> Result<Option<Place>, LookupError> {
        debug!(query = name, "Querying Open-Meteo geocoding");

        let request = self.http.get(self.endpoint.clone()).query(&[
            ("name", name),
            ("count", "1"),
            ("language", "zh"),
            ("format", "json"),
        ]);
        let parsed: OmSearchResponse = fetch_json(ProviderId::OpenMeteoGeocoding, request).await?;

        Ok(parsed.results.into_iter().next().map(|p| Place {
            latitude: p.latitude,
            longitude: p.longitude,
            name: p.name,
        }))
    }
}

/// Open-Meteo forecast for a single day, timezone picked from the coordinates.
#[derive(Debug, Clone)]
pub struct OpenMeteoForecast {
    endpoint: Url,
    http: Client,
}

impl OpenMeteoForecast {
    const CURRENT: &'static str = "temperature_2m,weather_code,wind_speed_10m";
    const DAILY: &'static str = "weather_code,temperature_2m_max,temperature_2m_min";

    pub fn new(http: Client, endpoint: &str) -> anyhow::Result<Self> {
        Ok(Self {
            endpoint: parse_endpoint(ProviderId::OpenMeteoForecast, endpoint)?,
            http,
        })
    }
}

#[derive(Debug, Deserialize)]
struct OmCurrent {
    temperature_2m: f64,
    weather_code: i32,
    wind_speed_10m: f64,
}

#[derive(Debug, Deserialize)]
struct OmDaily {
    weather_code: Vec<i32>,
    temperature_2m_max: Vec<f64>,
    temperature_2m_min: Vec<f64>,
}

#[derive(Debug, Deserialize)]
struct OmForecastResponse {
    current: OmCurrent,
    daily: OmDaily,
}

impl OmForecastResponse {
    fn into_snapshot(self) -> Result<ForecastSnapshot, LookupError> {
        fn first<T: Copy>(values: &[T], field: &'static str) -> Result<T, LookupError> {
            values.first().copied().ok_or(LookupError::MissingData {
                provider: ProviderId::OpenMeteoForecast,
                field,
            })
        }

        Ok(ForecastSnapshot {
            temperature: self.current.temperature_2m,
            weather_code: self.current.weather_code,
            wind_speed: self.current.wind_speed_10m,
            max_temp: first(&self.daily.temperature_2m_max, "daily.temperature_2m_max")?,
            min_temp: first(&self.daily.temperature_2m_min, "daily.temperature_2m_min")?,
            daily_weather_code: first(&self.daily.weather_code, "daily.weather_code")?,
        })
    }
}

#[async_trait]
impl ForecastProvider for OpenMeteoForecast {
    async fn forecast(&self, place: &Place) -> Result<ForecastSnapshot, LookupError> {
        debug!(
            latitude = place.latitude,
            longitude = place.longitude,
            "Querying Open-Meteo forecast"
        );

        let latitude = place.latitude.to_string();
        let longitude = place.longitude.to_string();
        let request = self.http.get(self.endpoint.clone()).query(&[
            ("latitude", latitude.as_str()),
            ("longitude", longitude.as_str()),
            ("current", Self::CURRENT),
            ("daily", Self::DAILY),
            ("timezone", "auto"),
            ("forecast_days", "1"),
        ]);
        let parsed: OmForecastResponse = fetch_json(ProviderId::OpenMeteoForecast, request).await?;

        parsed.into_snapshot()
    }
}
