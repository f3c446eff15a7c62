use serde::{Deserialize, Serialize};

/// Place name resolved from the client address by the geolocation provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeoLocation {
    pub country: String,
    pub region_name: String,
    pub city: String,
}

/// First candidate returned by the geocoding provider.
#[derive(Debug, Clone, PartialEq)]
pub struct Place {
    pub latitude: f64,
    pub longitude: f64,
    pub name: String,
}

/// Current conditions plus today's forecast for one location.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastSnapshot {
    pub temperature: f64,
    pub weather_code: i32,
    pub wind_speed: f64,
    pub max_temp: f64,
    pub min_temp: f64,
    pub daily_weather_code: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationInfo {
    pub city: String,
    pub region: String,
    pub country: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentWeather {
    pub temperature: i64,
    pub weather_code: i32,
    pub weather_text: String,
    pub wind_speed: i64,
    /// Local wall-clock time, `HH:MM`.
    pub time: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodayWeather {
    pub max_temp: i64,
    pub min_temp: i64,
    pub weather_code: i32,
    pub weather_text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherInfo {
    pub current: CurrentWeather,
    pub today: TodayWeather,
}

/// Body returned when the whole provider chain succeeded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub success: bool,
    pub location: LocationInfo,
    pub weather: WeatherInfo,
    pub timestamp: String,
}

/// Static reading served when any lookup step fails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FallbackWeather {
    pub city: String,
    pub temperature: i64,
    pub weather_text: String,
    pub hint: String,
}

impl Default for FallbackWeather {
    fn default() -> Self {
        Self {
            city: "Tianjin".to_string(),
            temperature: 18,
            weather_text: "晴朗".to_string(),
            hint: "已使用默认天气数据".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherFailure {
    pub success: bool,
    pub error: String,
    pub fallback: FallbackWeather,
}

impl WeatherFailure {
    pub const DEFAULT_ERROR: &'static str = "获取天气信息失败";

    pub fn new(error: impl Into<String>) -> Self {
        let error = error.into();
        let error = if error.trim().is_empty() {
            Self::DEFAULT_ERROR.to_string()
        } else {
            error
        };

        Self {
            success: false,
            error,
            fallback: FallbackWeather::default(),
        }
    }
}

/// JSON envelope of the weather endpoint; both variants carry `success`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WeatherEnvelope {
    Success(WeatherReport),
    Failure(WeatherFailure),
}

impl WeatherEnvelope {
    pub fn is_success(&self) -> bool {
        matches!(self, WeatherEnvelope::Success(_))
    }
}

/// Round half towards positive infinity, so `-2.5` becomes `-2` and `2.5` becomes `3`.
pub fn round_reading(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}
