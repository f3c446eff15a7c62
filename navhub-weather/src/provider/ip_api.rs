use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;
use tracing::debug;

use crate::{ClientAddress, LookupError, model::GeoLocation};

use super::{GeolocationProvider, ProviderId, fetch_json, parse_endpoint};

/// ip-api.com JSON endpoint. Free tier, no key, plain HTTP only.
#[derive(Debug, Clone)]
pub struct IpApiProvider {
    endpoint: Url,
    http: Client,
}

impl IpApiProvider {
    const LANG: &'static str = "zh-CN";
    const FIELDS: &'static str = "status,message,country,regionName,city";

    pub fn new(http: Client, endpoint: &str) -> anyhow::Result<Self> {
        Ok(Self {
            endpoint: parse_endpoint(ProviderId::IpApi, endpoint)?,
            http,
        })
    }

    /// `{endpoint}/{address}`; an unknown address leaves the segment empty.
    fn lookup_url(&self, address: &ClientAddress) -> Url {
        let mut url = self.endpoint.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(address.as_query_segment());
        }
        url
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IpApiResponse {
    status: String,
    message: Option<String>,
    #[serde(default)]
    country: String,
    #[serde(default)]
    region_name: String,
    #[serde(default)]
    city: String,
}

#[async_trait]
impl GeolocationProvider for IpApiProvider {
    async fn locate(&self, address: &ClientAddress) -> Result<GeoLocation, LookupError> {
        let url = self.lookup_url(address);
        debug!(%url, "Querying ip-api");

        let request = self
            .http
            .get(url)
            .query(&[("lang", Self::LANG), ("fields", Self::FIELDS)]);
        let parsed: IpApiResponse = fetch_json(ProviderId::IpApi, request).await?;

        if parsed.status != "success" {
            return Err(LookupError::geolocation(parsed.message));
        }

        Ok(GeoLocation {
            country: parsed.country,
            region_name: parsed.region_name,
            city: parsed.city,
        })
    }
}
