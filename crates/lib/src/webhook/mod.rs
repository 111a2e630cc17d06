//! Webhook endpoint for the chat platform.
//!
//! Every inbound POST is classified by its `type`: verification challenges are signed and
//! echoed synchronously, keyword messages are acknowledged and answered in the background,
//! everything else is acknowledged and dropped.

mod command;
mod event;
mod server;
mod verify;

pub use command::extract_zip;
pub use event::{InboundEvent, MessageCreated, WebhookEvent};
pub use server::{router, run_server, WebhookState, LIVENESS_TEXT};
pub use verify::{sign, verification_response, VerificationResponse, OUTBOUND_TOKEN_HEADER};
