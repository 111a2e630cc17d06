//! Weather Underground conditions API client.
//! `GET {base}/api/{key}/conditions/q/{state}/{city}.json`; spaces in the city name become underscores.

use crate::weather::{CityState, Conditions, WeatherSource};
use async_trait::async_trait;
use reqwest::Url;
use serde::Deserialize;

#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("weather request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("weather api error: {0}")]
    Api(String),
    #[error("invalid weather base url: {0}")]
    Url(String),
}

#[derive(Debug, Deserialize)]
struct ConditionsResponse {
    #[serde(default)]
    response: Option<ResponseMeta>,
    #[serde(default)]
    current_observation: Option<Observation>,
}

#[derive(Debug, Deserialize)]
struct ResponseMeta {
    #[serde(default)]
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default, rename = "type")]
    kind: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct Observation {
    display_location: DisplayLocation,
    weather: String,
    temperature_string: String,
    wind_string: String,
    forecast_url: String,
}

#[derive(Debug, Deserialize)]
struct DisplayLocation {
    full: String,
}

/// Client for the conditions endpoint. Cheap to clone.
#[derive(Clone)]
pub struct WundergroundClient {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl WundergroundClient {
    pub fn new(base_url: &str, api_key: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            client: reqwest::Client::new(),
        }
    }

    fn conditions_url(&self, place: &CityState) -> Result<Url, WeatherError> {
        let mut url =
            Url::parse(&self.base_url).map_err(|e| WeatherError::Url(e.to_string()))?;
        let file = format!("{}.json", place.city.replace(' ', "_"));
        url.path_segments_mut()
            .map_err(|_| WeatherError::Url(self.base_url.clone()))?
            .pop_if_empty()
            .extend([
                "api",
                self.api_key.as_str(),
                "conditions",
                "q",
                place.state.as_str(),
                file.as_str(),
            ]);
        Ok(url)
    }
}

#[async_trait]
impl WeatherSource for WundergroundClient {
    async fn conditions(&self, place: &CityState) -> Result<Conditions, WeatherError> {
        let url = self.conditions_url(place)?;
        let res = self.client.get(url).send().await?;
        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            return Err(WeatherError::Api(format!("{} {}", status, body)));
        }
        let data: ConditionsResponse = res.json().await?;
        if let Some(err) = data.response.and_then(|r| r.error) {
            return Err(WeatherError::Api(format!("{}: {}", err.kind, err.description)));
        }
        let obs = data
            .current_observation
            .ok_or_else(|| WeatherError::Api("no current_observation in response".to_string()))?;
        Ok(Conditions {
            location: obs.display_location.full,
            weather: obs.weather,
            temperature: obs.temperature_string,
            wind: obs.wind_string,
            forecast_url: obs.forecast_url,
        })
    }
}
