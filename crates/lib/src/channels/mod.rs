//! Outbound chat channel: where weather replies are posted.
//!
//! The responder only needs "post this text to that space"; the workspace client is the
//! production implementation.

mod workspace;

use async_trait::async_trait;

pub use workspace::{AccessToken, AppMessage, Annotation, WorkspaceClient, WorkspaceError};

/// Posts text replies into a conversation space.
#[async_trait]
pub trait ReplyChannel: Send + Sync {
    /// Channel id used in logs (e.g. "workspace").
    fn id(&self) -> &str;
    /// Post `text` into `space_id`.
    async fn post_message(&self, space_id: &str, text: &str) -> anyhow::Result<()>;
}
