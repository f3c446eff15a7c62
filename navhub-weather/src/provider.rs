use crate::{
    ClientAddress, LookupError,
    config::ProvidersConfig,
    model::{ForecastSnapshot, GeoLocation, Place},
};
use anyhow::{Context, anyhow};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use std::{fmt::Debug, time::Duration};

pub mod ip_api;
pub mod open_meteo;

pub use ip_api::IpApiProvider;
pub use open_meteo::{OpenMeteoForecast, OpenMeteoGeocoding};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderId {
    IpApi,
    OpenMeteoGeocoding,
    OpenMeteoForecast,
}

impl ProviderId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::IpApi => "ip-api",
            ProviderId::OpenMeteoGeocoding => "open-meteo-geocoding",
            ProviderId::OpenMeteoForecast => "open-meteo-forecast",
        }
    }

    pub const fn all() -> &'static [ProviderId] {
        &[
            ProviderId::IpApi,
            ProviderId::OpenMeteoGeocoding,
            ProviderId::OpenMeteoForecast,
        ]
    }
}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolves a client address to a place name.
#[async_trait]
pub trait GeolocationProvider: Send + Sync + Debug {
    async fn locate(&self, address: &ClientAddress) -> Result<GeoLocation, LookupError>;
}

/// Resolves a place name to coordinates. `Ok(None)` means no candidate matched.
#[async_trait]
pub trait GeocodingProvider: Send + Sync + Debug {
    async fn search(&self, name: &str) -> Result<Option<Place>, LookupError>;
}

/// Fetches current conditions and today's forecast for a place.
#[async_trait]
pub trait ForecastProvider: Send + Sync + Debug {
    async fn forecast(&self, place: &Place) -> Result<ForecastSnapshot, LookupError>;
}

/// Build the HTTP client shared by every provider.
pub fn http_client(config: &ProvidersConfig) -> anyhow::Result<Client> {
    let mut builder = Client::builder();

    if let Some(secs) = config.request_timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    if let Some(agent) = config.user_agent.as_deref() {
        builder = builder.user_agent(agent);
    }

    builder.build().context("Failed to build HTTP client")
}

/// Parse a configured provider endpoint.
pub(crate) fn parse_endpoint(id: ProviderId, raw: &str) -> anyhow::Result<Url> {
    let url = Url::parse(raw).with_context(|| format!("Invalid URL for provider '{id}': {raw}"))?;

    if url.cannot_be_a_base() {
        return Err(anyhow!("URL for provider '{id}' cannot be used as a base: {raw}"));
    }

    Ok(url)
}

/// Send `request` and decode a JSON body, mapping each failure to the provider.
pub(crate) async fn fetch_json<T: DeserializeOwned>(
    provider: ProviderId,
    request: RequestBuilder,
) -> Result<T, LookupError> {
    let res = request
        .send()
        .await
        .map_err(|source| LookupError::Request { provider, source })?;

    let status = res.status();
    let body = res
        .text()
        .await
        .map_err(|source| LookupError::Request { provider, source })?;

    if !status.is_success() {
        return Err(LookupError::Status {
            provider,
            status,
            body: truncate_body(&body),
        });
    }

    serde_json::from_str(&body).map_err(|source| LookupError::Decode { provider, source })
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.chars().count() > MAX {
        let head: String = body.chars().take(MAX).collect();
        format!("{head}...")
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_ids_are_distinct() {
        let names: Vec<_> = ProviderId::all().iter().map(|id| id.as_str()).collect();
        assert_eq!(names, ["ip-api", "open-meteo-geocoding", "open-meteo-forecast"]);
        assert_eq!(ProviderId::IpApi.to_string(), "ip-api");
    }

    #[test]
    fn parse_endpoint_rejects_garbage() {
        let err = parse_endpoint(ProviderId::IpApi, "not a url").unwrap_err();
        assert!(err.to_string().contains("Invalid URL for provider 'ip-api'"));

        let err = parse_endpoint(ProviderId::IpApi, "mailto:someone@example.com").unwrap_err();
        assert!(err.to_string().contains("cannot be used as a base"));
    }

    #[test]
    fn truncate_body_respects_char_boundaries() {
        let long = "天".repeat(300);
        let truncated = truncate_body(&long);
        assert!(truncated.ends_with("..."));
        assert_eq!(truncated.chars().count(), 203);

        assert_eq!(truncate_body("short"), "short");
    }

    #[test]
    fn http_client_builds_with_timeout() {
        let cfg = ProvidersConfig {
            request_timeout_secs: Some(3),
            user_agent: Some("navhub-test".into()),
            ..ProvidersConfig::default()
        };
        assert!(http_client(&cfg).is_ok());
    }
}
