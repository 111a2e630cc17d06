//! Lookups behind a weather reply: zip code to city/state, then current conditions.
//!
//! Each lookup is a trait so the responder can be driven by fakes in tests; the HTTP
//! clients here are the production implementations.

mod wunderground;
mod zipcode;

use async_trait::async_trait;

pub use wunderground::{WeatherError, WundergroundClient};
pub use zipcode::{is_valid_zip, ZipLookupError, ZippopotamClient};

/// City and two-letter state a zip code belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CityState {
    pub city: String,
    pub state: String,
}

/// Current conditions at a location, already rendered as display strings by the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conditions {
    /// Display name, e.g. "New York, NY".
    pub location: String,
    pub weather: String,
    pub temperature: String,
    pub wind: String,
    pub forecast_url: String,
}

/// Resolves a zip code. `Ok(None)` means the code is unknown or malformed.
#[async_trait]
pub trait ZipLookup: Send + Sync {
    async fn lookup(&self, zip: &str) -> Result<Option<CityState>, ZipLookupError>;
}

/// Fetches current conditions for a city/state.
#[async_trait]
pub trait WeatherSource: Send + Sync {
    async fn conditions(&self, place: &CityState) -> Result<Conditions, WeatherError>;
}
