//! Workspace chat platform: client-credentials auth and app message posting.
//!
//! Every post authenticates first; tokens are not cached between posts.

use crate::channels::ReplyChannel;
use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum WorkspaceError {
    #[error("workspace request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("workspace authentication failed: {0}")]
    Auth(String),
    #[error("workspace message post failed: {0}")]
    Post(String),
    #[error("invalid workspace url: {0}")]
    Url(String),
}

/// Bearer token from the client-credentials exchange. Debug output is redacted.
#[derive(Clone)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AccessToken(..)")
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Body of `POST /v1/spaces/{spaceId}/messages`.
#[derive(Debug, Clone, Serialize)]
pub struct AppMessage {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub version: f32,
    pub annotations: Vec<Annotation>,
}

/// A single generic annotation carrying the reply text.
#[derive(Debug, Clone, Serialize)]
pub struct Annotation {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub version: f32,
    pub color: String,
    pub title: String,
    pub text: String,
}

impl AppMessage {
    pub fn generic(color: &str, title: &str, text: &str) -> Self {
        Self {
            kind: "appMessage",
            version: 1.0,
            annotations: vec![Annotation {
                kind: "generic",
                version: 1.0,
                color: color.to_string(),
                title: title.to_string(),
                text: text.to_string(),
            }],
        }
    }
}

/// Client for the workspace REST API, authenticated as the registered application.
#[derive(Clone)]
pub struct WorkspaceClient {
    id: String,
    base_url: String,
    app_id: String,
    app_secret: String,
    color: String,
    title: String,
    client: reqwest::Client,
}

impl WorkspaceClient {
    pub fn new(base_url: &str, app_id: &str, app_secret: &str) -> Self {
        Self {
            id: "workspace".to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            app_id: app_id.to_string(),
            app_secret: app_secret.to_string(),
            color: "#D5212B".to_string(),
            title: "Current weather conditions".to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Set annotation color and title used for every posted message.
    pub fn with_style(mut self, color: &str, title: &str) -> Self {
        self.color = color.to_string();
        self.title = title.to_string();
        self
    }

    /// POST /oauth/token with basic auth and `grant_type=client_credentials`. Only 200 counts as success.
    pub async fn authenticate(&self) -> Result<AccessToken, WorkspaceError> {
        let url = format!("{}/oauth/token", self.base_url);
        let res = self
            .client
            .post(&url)
            .basic_auth(&self.app_id, Some(&self.app_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?;
        if res.status() != StatusCode::OK {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            return Err(WorkspaceError::Auth(format!("{} {}", status, body)));
        }
        let data: TokenResponse = res.json().await?;
        Ok(AccessToken(data.access_token))
    }

    fn messages_url(&self, space_id: &str) -> Result<Url, WorkspaceError> {
        let mut url =
            Url::parse(&self.base_url).map_err(|e| WorkspaceError::Url(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| WorkspaceError::Url(self.base_url.clone()))?
            .pop_if_empty()
            .extend(["v1", "spaces", space_id, "messages"]);
        Ok(url)
    }

    /// Authenticate, then POST the message to the space. Only 201 counts as success.
    pub async fn send_message(&self, space_id: &str, text: &str) -> Result<(), WorkspaceError> {
        let token = self.authenticate().await?;
        let url = self.messages_url(space_id)?;
        let body = AppMessage::generic(&self.color, &self.title, text);
        let res = self
            .client
            .post(url)
            .bearer_auth(token.as_str())
            .json(&body)
            .send()
            .await?;
        if res.status() != StatusCode::CREATED {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            return Err(WorkspaceError::Post(format!("{} {}", status, body)));
        }
        Ok(())
    }
}

#[async_trait]
impl ReplyChannel for WorkspaceClient {
    fn id(&self) -> &str {
        &self.id
    }

    async fn post_message(&self, space_id: &str, text: &str) -> anyhow::Result<()> {
        Ok(self.send_message(space_id, text).await?)
    }
}
