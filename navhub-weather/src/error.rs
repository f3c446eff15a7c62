use thiserror::Error;

use crate::provider::ProviderId;

/// Everything that can break the weather lookup chain.
///
/// The `Display` text is what the weather endpoint reports in its `error` field.
#[derive(Debug, Error)]
pub enum LookupError {
    /// The geolocation provider answered with a status other than `success`.
    #[error("IP定位失败: {message}")]
    Geolocation { message: String },

    /// Neither the city nor the region produced a geocoding candidate.
    #[error("无法找到该地点的坐标")]
    CoordinatesNotFound,

    #[error("Failed to send request to {provider}: {source}")]
    Request {
        provider: ProviderId,
        #[source]
        source: reqwest::Error,
    },

    #[error("{provider} request failed with status {status}: {body}")]
    Status {
        provider: ProviderId,
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Failed to parse {provider} JSON: {source}")]
    Decode {
        provider: ProviderId,
        #[source]
        source: serde_json::Error,
    },

    #[error("{provider} response is missing {field}")]
    MissingData {
        provider: ProviderId,
        field: &'static str,
    },
}

impl LookupError {
    pub const UNKNOWN_GEOLOCATION_MESSAGE: &'static str = "未知错误";

    pub fn geolocation(message: Option<String>) -> Self {
        let message = message
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| Self::UNKNOWN_GEOLOCATION_MESSAGE.to_string());
        LookupError::Geolocation { message }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn geolocation_message_is_prefixed() {
        let err = LookupError::geolocation(Some("private range".into()));
        assert_eq!(err.to_string(), "IP定位失败: private range");
    }

    #[test]
    fn geolocation_message_defaults_when_absent() {
        assert_eq!(LookupError::geolocation(None).to_string(), "IP定位失败: 未知错误");
        assert_eq!(
            LookupError::geolocation(Some(String::new())).to_string(),
            "IP定位失败: 未知错误"
        );
    }

    #[test]
    fn missing_data_names_provider() {
        let err = LookupError::MissingData {
            provider: ProviderId::OpenMeteoForecast,
            field: "daily.weather_code",
        };
        assert_eq!(
            err.to_string(),
            "open-meteo-forecast response is missing daily.weather_code"
        );
    }
}
