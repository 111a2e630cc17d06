//! Endpoint verification: sign the echoed challenge with the webhook secret.
//!
//! The platform recomputes HMAC-SHA256 over the exact response bytes, so the body is
//! serialized once and the same buffer is both signed and sent.

use hmac::{Hmac, Mac};
use serde::Serialize;
use serde_json::Value;
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Response header carrying the hex signature.
pub const OUTBOUND_TOKEN_HEADER: &str = "X-OUTBOUND-TOKEN";

/// Body echoed back for a verification challenge. An absent challenge serializes as `{}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VerificationResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<Value>,
}

/// HMAC-SHA256 of `payload` keyed by `secret`, lowercase hex.
pub fn sign(secret: &str, payload: &[u8]) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size");
    mac.update(payload);
    hex::encode(mac.finalize().into_bytes())
}

/// Serialized response body and its signature for `challenge`.
pub fn verification_response(secret: &str, challenge: Option<&Value>) -> (Vec<u8>, String) {
    let body = VerificationResponse {
        response: challenge.cloned(),
    };
    let bytes = serde_json::to_vec(&body).unwrap_or_else(|_| b"{}".to_vec());
    let signature = sign(secret, &bytes);
    (bytes, signature)
}
