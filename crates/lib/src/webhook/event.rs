//! Inbound webhook payloads and their classification.

use serde::Deserialize;
use serde_json::Value;

/// Raw webhook body. Every field is optional; classification decides what is required.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InboundEvent {
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub space_id: Option<String>,
    /// Echoed back verbatim, whatever JSON type the platform sent.
    #[serde(default)]
    pub challenge: Option<Value>,
}

/// A `message-created` event with its text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageCreated {
    pub content: String,
    pub space_id: Option<String>,
}

/// What to do with an inbound call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookEvent {
    /// Endpoint verification; the challenge is echoed back signed.
    Verification { challenge: Option<Value> },
    /// A new chat message.
    MessageCreated(MessageCreated),
    /// Unknown type, missing type, or unusable body: acknowledge only.
    Ignored,
}

impl WebhookEvent {
    /// Classify a raw request body. Never fails: anything unparsable is `Ignored`.
    pub fn from_body(body: &[u8]) -> Self {
        match serde_json::from_slice::<InboundEvent>(body) {
            Ok(event) => Self::classify(event),
            Err(e) => {
                log::debug!("webhook: unparsable body ignored: {}", e);
                Self::Ignored
            }
        }
    }

    pub fn classify(event: InboundEvent) -> Self {
        match event.kind.as_deref() {
            Some("verification") => Self::Verification {
                challenge: event.challenge,
            },
            Some("message-created") => match event.content {
                Some(content) => Self::MessageCreated(MessageCreated {
                    content,
                    space_id: event.space_id,
                }),
                None => Self::Ignored,
            },
            _ => Self::Ignored,
        }
    }
}
