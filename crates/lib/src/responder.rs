//! Weather reply for a zip code: resolve the zip, fetch conditions, post the text back to the space.
//! Lookup failures become chat messages; posting failures are logged and dropped.

use crate::channels::ReplyChannel;
use crate::weather::{Conditions, WeatherSource, ZipLookup};
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Sent when any part of the weather lookup fails after the zip resolved.
pub const WEATHER_FAILED_MESSAGE: &str =
    "Hey, it's foggy and I had issues retrieving the weather. Try again later";

/// Sent when the zip is unknown or malformed.
pub fn zip_not_found_message(zip: &str) -> String {
    format!("Hmm, I can't seem to find the weather for {}", zip)
}

/// Formatted current conditions (markdown understood by the chat platform).
pub fn conditions_message(c: &Conditions) -> String {
    format!(
        "Current conditions (powered by Wunderground, an IBM company) for _{}_: {}\n\
         *Air temp* is {} and *winds* {}\n\
         Click [here]({}) to learn more.",
        c.location, c.weather, c.temperature, c.wind, c.forecast_url
    )
}

/// Text to post back to one space.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundReply {
    pub space_id: String,
    pub text: String,
}

/// Turns a zip token into a posted reply. Shared read-only across requests.
pub struct Responder {
    zips: Arc<dyn ZipLookup>,
    weather: Arc<dyn WeatherSource>,
    channel: Arc<dyn ReplyChannel>,
}

impl Responder {
    pub fn new(
        zips: Arc<dyn ZipLookup>,
        weather: Arc<dyn WeatherSource>,
        channel: Arc<dyn ReplyChannel>,
    ) -> Self {
        Self {
            zips,
            weather,
            channel,
        }
    }

    /// Reply text for `zip`. Never fails: every failure has a message of its own.
    pub async fn compose(&self, zip: &str) -> String {
        log::info!("responder: getting weather for zip code '{}'", zip);
        let place = match self.zips.lookup(zip).await {
            Ok(Some(place)) => place,
            Ok(None) => return zip_not_found_message(zip),
            Err(e) => {
                log::warn!("responder: zip lookup failed: {}", e);
                return WEATHER_FAILED_MESSAGE.to_string();
            }
        };
        log::info!(
            "responder: looking up weather for {}, {}",
            place.city,
            place.state
        );
        match self.weather.conditions(&place).await {
            Ok(c) => conditions_message(&c),
            Err(e) => {
                log::warn!("responder: weather lookup failed: {}", e);
                WEATHER_FAILED_MESSAGE.to_string()
            }
        }
    }

    /// Compose the reply for one space.
    pub async fn reply_for(&self, space_id: &str, zip: &str) -> OutboundReply {
        OutboundReply {
            space_id: space_id.to_string(),
            text: self.compose(zip).await,
        }
    }

    /// Compose and post. Errors are returned; callers that fire and forget use [`Responder::spawn_respond`].
    pub async fn respond(&self, space_id: &str, zip: &str) -> anyhow::Result<()> {
        let reply = self.reply_for(space_id, zip).await;
        log::info!(
            "responder: posting reply to space {} via {}",
            reply.space_id,
            self.channel.id()
        );
        self.channel
            .post_message(&reply.space_id, &reply.text)
            .await
    }

    /// Run [`Responder::respond`] in the background. Failures are logged and the reply is dropped; nothing retries.
    pub fn spawn_respond(self: &Arc<Self>, space_id: String, zip: String) -> JoinHandle<()> {
        let responder = Arc::clone(self);
        tokio::spawn(async move {
            if let Err(e) = responder.respond(&space_id, &zip).await {
                log::warn!("responder: dropping reply to space {}: {:#}", space_id, e);
            }
        })
    }
}
