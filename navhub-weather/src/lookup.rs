//! The weather lookup cascade: client address → place name → coordinates → forecast.
//!
//! Every step runs once, in order; the first error short-circuits the chain and
//! [`WeatherLookup::lookup`] turns it into the static fallback envelope.

use chrono::{DateTime, Local, SecondsFormat, Utc};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::{
    ClientAddress, LookupError,
    config::ProvidersConfig,
    model::{
        CurrentWeather, ForecastSnapshot, GeoLocation, LocationInfo, Place, TodayWeather,
        WeatherEnvelope, WeatherFailure, WeatherInfo, WeatherReport, round_reading,
    },
    provider::{
        ForecastProvider, GeocodingProvider, GeolocationProvider, IpApiProvider,
        OpenMeteoForecast, OpenMeteoGeocoding, http_client,
    },
    weather_code::weather_text,
};

#[derive(Debug, Clone)]
pub struct WeatherLookup {
    geolocation: Arc<dyn GeolocationProvider>,
    geocoding: Arc<dyn GeocodingProvider>,
    forecast: Arc<dyn ForecastProvider>,
}

impl WeatherLookup {
    pub fn new(
        geolocation: Arc<dyn GeolocationProvider>,
        geocoding: Arc<dyn GeocodingProvider>,
        forecast: Arc<dyn ForecastProvider>,
    ) -> Self {
        Self {
            geolocation,
            geocoding,
            forecast,
        }
    }

    /// Wire up the real providers, sharing one HTTP client.
    pub fn from_config(config: &ProvidersConfig) -> anyhow::Result<Self> {
        let http = http_client(config)?;

        Ok(Self::new(
            Arc::new(IpApiProvider::new(http.clone(), &config.geolocation_url)?),
            Arc::new(OpenMeteoGeocoding::new(http.clone(), &config.geocoding_url)?),
            Arc::new(OpenMeteoForecast::new(http, &config.forecast_url)?),
        ))
    }

    /// Run the cascade and never fail: errors become the fallback envelope.
    pub async fn lookup(&self, address: &ClientAddress) -> WeatherEnvelope {
        match self.try_lookup(address).await {
            Ok(report) => WeatherEnvelope::Success(report),
            Err(err) => {
                warn!(%address, error = %err, "Weather lookup failed, serving fallback");
                WeatherEnvelope::Failure(WeatherFailure::new(err.to_string()))
            }
        }
    }

    pub async fn try_lookup(&self, address: &ClientAddress) -> Result<WeatherReport, LookupError> {
        let location = self.geolocation.locate(address).await?;
        info!(
            city = %location.city,
            region = %location.region_name,
            country = %location.country,
            "Located client"
        );

        let place = resolve_place(self.geocoding.as_ref(), &location).await?;
        let snapshot = self.forecast.forecast(&place).await?;

        Ok(build_report(&location, place, &snapshot, Utc::now()))
    }
}

/// Geocode the city, then the region when the city has no match.
pub async fn resolve_place(
    geocoding: &dyn GeocodingProvider,
    location: &GeoLocation,
) -> Result<Place, LookupError> {
    if let Some(place) = search_named(geocoding, &location.city).await? {
        return Ok(place);
    }

    debug!(
        city = %location.city,
        region = %location.region_name,
        "No coordinates for city, retrying with region"
    );

    search_named(geocoding, &location.region_name)
        .await?
        .ok_or(LookupError::CoordinatesNotFound)
}

// Open-Meteo rejects an empty name with 400; a blank name simply has no match.
async fn search_named(
    geocoding: &dyn GeocodingProvider,
    name: &str,
) -> Result<Option<Place>, LookupError> {
    if name.trim().is_empty() {
        return Ok(None);
    }
    geocoding.search(name).await
}

pub fn build_report(
    location: &GeoLocation,
    place: Place,
    snapshot: &ForecastSnapshot,
    now: DateTime<Utc>,
) -> WeatherReport {
    WeatherReport {
        success: true,
        location: LocationInfo {
            city: place.name,
            region: location.region_name.clone(),
            country: location.country.clone(),
        },
        weather: WeatherInfo {
            current: CurrentWeather {
                temperature: round_reading(snapshot.temperature),
                weather_code: snapshot.weather_code,
                weather_text: weather_text(snapshot.weather_code).to_string(),
                wind_speed: round_reading(snapshot.wind_speed),
                time: now.with_timezone(&Local).format("%H:%M").to_string(),
            },
            today: TodayWeather {
                max_temp: round_reading(snapshot.max_temp),
                min_temp: round_reading(snapshot.min_temp),
                weather_code: snapshot.daily_weather_code,
                weather_text: weather_text(snapshot.daily_weather_code).to_string(),
            },
        },
        timestamp: now.to_rfc3339_opts(SecondsFormat::Millis, true),
    }
}
