//! Zip code lookup via a Zippopotam-style API (`GET {base}/us/{zip}`).

use crate::weather::{CityState, ZipLookup};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;

#[derive(Debug, thiserror::Error)]
pub enum ZipLookupError {
    #[error("zip lookup request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("zip lookup api error: {0}")]
    Api(String),
}

#[derive(Debug, Deserialize)]
struct PostCodeResponse {
    #[serde(default)]
    places: Vec<Place>,
}

#[derive(Debug, Deserialize)]
struct Place {
    #[serde(rename = "place name")]
    place_name: String,
    #[serde(rename = "state abbreviation")]
    state_abbreviation: String,
}

/// True for a five-digit US zip code. Anything else is not worth a network call.
pub fn is_valid_zip(zip: &str) -> bool {
    zip.len() == 5 && zip.bytes().all(|b| b.is_ascii_digit())
}

/// HTTP client for US zip code lookups.
#[derive(Clone)]
pub struct ZippopotamClient {
    base_url: String,
    client: reqwest::Client,
}

impl ZippopotamClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl ZipLookup for ZippopotamClient {
    async fn lookup(&self, zip: &str) -> Result<Option<CityState>, ZipLookupError> {
        if !is_valid_zip(zip) {
            return Ok(None);
        }
        let url = format!("{}/us/{}", self.base_url, zip);
        let res = self.client.get(&url).send().await?;
        if res.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            return Err(ZipLookupError::Api(format!("{} {}", status, body)));
        }
        let data: PostCodeResponse = res.json().await?;
        Ok(data.places.into_iter().next().map(|p| CityState {
            city: p.place_name,
            state: p.state_abbreviation,
        }))
    }
}
