use crate::domain::model::{GeoPoint, GeocodingResult};
use crate::domain::ports::Geocoder;
use crate::utils::error::{GeocodingError, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;

pub const DEFAULT_BASE_URL: &str = "https://nominatim.openstreetmap.org";
pub const DEFAULT_USER_AGENT: &str = "NiedersachsenBeratungsMap/1.0";
pub const DEFAULT_COUNTRY_CODES: &str = "de";

#[derive(Debug, Deserialize)]
struct SearchHit {
    lat: String,
    lon: String,
    #[serde(default)]
    display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ReverseHit {
    #[serde(default)]
    display_name: Option<String>,
}

/// Geocoder backed by a Nominatim-compatible search API.
#[derive(Debug, Clone)]
pub struct NominatimGeocoder {
    client: Client,
    base_url: String,
    user_agent: String,
    country_codes: String,
}

impl NominatimGeocoder {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            country_codes: DEFAULT_COUNTRY_CODES.to_string(),
        }
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_country_codes(mut self, country_codes: impl Into<String>) -> Self {
        self.country_codes = country_codes.into();
        self
    }

    fn check_status(status: StatusCode) -> std::result::Result<(), GeocodingError> {
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(GeocodingError::RateLimited);
        }
        if !status.is_success() {
            return Err(GeocodingError::Provider {
                status: status.as_u16(),
            });
        }
        Ok(())
    }

    async fn search(&self, address: &str) -> std::result::Result<GeocodingResult, GeocodingError> {
        if address.trim().is_empty() {
            return Err(GeocodingError::EmptyAddress);
        }

        let url = format!("{}/search", self.base_url);
        tracing::debug!("Making geocoding request to: {}", url);

        let response = self
            .client
            .get(&url)
            .header(reqwest::header::USER_AGENT, &self.user_agent)
            .query(&[
                ("format", "json"),
                ("q", address),
                ("countrycodes", self.country_codes.as_str()),
                ("limit", "1"),
            ])
            .send()
            .await?;

        tracing::debug!("Geocoding response status: {}", response.status());
        Self::check_status(response.status())?;

        let hits: Vec<SearchHit> = response.json().await?;
        let hit = hits.into_iter().next().ok_or_else(|| GeocodingError::NotFound {
            address: address.to_string(),
        })?;

        let parse = |field: &str, raw: &str| {
            raw.parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| GeocodingError::InvalidResponse {
                    message: format!("{} '{}' is not a number", field, raw),
                })
        };

        let result = GeocodingResult {
            lat: parse("lat", &hit.lat)?,
            lng: parse("lon", &hit.lon)?,
        };

        if let Some(name) = &hit.display_name {
            tracing::debug!("Resolved '{}' to {}", address, name);
        }
        Ok(result)
    }

    async fn reverse(&self, point: GeoPoint) -> std::result::Result<String, GeocodingError> {
        let url = format!("{}/reverse", self.base_url);
        let response = self
            .client
            .get(&url)
            .header(reqwest::header::USER_AGENT, &self.user_agent)
            .query(&[
                ("format", "json".to_string()),
                ("lat", point.latitude.to_string()),
                ("lon", point.longitude.to_string()),
            ])
            .send()
            .await?;

        Self::check_status(response.status())?;

        let hit: ReverseHit = response.json().await?;
        Ok(hit.display_name.unwrap_or_else(|| "Unknown location".to_string()))
    }
}

impl Default for NominatimGeocoder {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn geocode(&self, address: &str) -> Result<GeocodingResult> {
        Ok(self.search(address).await?)
    }

    async fn reverse_geocode(&self, point: GeoPoint) -> Result<String> {
        Ok(self.reverse(point).await?)
    }
}
