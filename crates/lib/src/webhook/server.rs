//! Webhook HTTP server: liveness on `GET /`, events on `POST /webhook`.

use crate::channels::WorkspaceClient;
use crate::config::{self, Config, Credentials};
use crate::responder::Responder;
use crate::weather::{WundergroundClient, ZippopotamClient};
use crate::webhook::command::extract_zip;
use crate::webhook::event::{MessageCreated, WebhookEvent};
use crate::webhook::verify::{verification_response, OUTBOUND_TOKEN_HEADER};
use anyhow::{Context, Result};
use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use std::sync::Arc;

/// Body of `GET /`.
pub const LIVENESS_TEXT: &str = "Weather bot for Watson Workspace";

/// Shared state for the webhook handlers. Built once at startup; read-only afterwards.
#[derive(Clone)]
pub struct WebhookState {
    /// Key for signing verification challenges.
    pub webhook_secret: Arc<str>,
    /// Messages must start with this to be answered.
    pub keyword: Arc<str>,
    pub responder: Arc<Responder>,
}

impl WebhookState {
    pub fn new(webhook_secret: &str, keyword: &str, responder: Arc<Responder>) -> Self {
        Self {
            webhook_secret: Arc::from(webhook_secret),
            keyword: Arc::from(keyword),
            responder,
        }
    }

    /// Wire the production HTTP collaborators from config and resolved credentials.
    pub fn from_config(config: &Config, credentials: &Credentials) -> Self {
        let workspace = WorkspaceClient::new(
            &config.workspace.base_url,
            &credentials.app_id,
            &credentials.app_secret,
        )
        .with_style(&config.workspace.color, &config.workspace.title);
        let responder = Responder::new(
            Arc::new(ZippopotamClient::new(&config.zipcode.base_url)),
            Arc::new(WundergroundClient::new(
                &config.weather.base_url,
                &credentials.weather_key,
            )),
            Arc::new(workspace),
        );
        Self::new(
            &credentials.webhook_secret,
            &config.workspace.keyword,
            Arc::new(responder),
        )
    }
}

/// Routes for the webhook service.
pub fn router(state: WebhookState) -> Router {
    Router::new()
        .route("/", get(liveness))
        .route("/webhook", post(webhook))
        .with_state(state)
}

/// Run the webhook server; binds to config.server.bind:config.server.port.
/// Fails before binding when the keyword is empty or any credential is missing. Blocks until shutdown (e.g. Ctrl+C).
pub async fn run_server(config: Config) -> Result<()> {
    if config.workspace.keyword.trim().is_empty() {
        anyhow::bail!("workspace.keyword must not be empty");
    }
    let credentials = config::resolve_credentials(&config)?;
    let state = WebhookState::from_config(&config, &credentials);
    let app = router(state);

    let bind_addr = format!("{}:{}", config.server.bind.trim(), config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("binding to {}", bind_addr))?;
    log::info!(
        "webhook listening on {} (keyword {:?})",
        bind_addr,
        config.workspace.keyword
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("webhook server exited")?;
    log::info!("webhook server stopped");
    Ok(())
}

/// Future that completes when the process should shut down (SIGINT or SIGTERM).
/// In-flight background replies are not awaited.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    log::info!("shutdown signal received, draining connections");
}

/// GET / returns a static liveness string.
async fn liveness() -> &'static str {
    LIVENESS_TEXT
}

/// POST /webhook — classify the event; sign verification challenges, hand keyword messages
/// to the responder, acknowledge everything with 200.
async fn webhook(State(state): State<WebhookState>, body: Bytes) -> Response {
    match WebhookEvent::from_body(&body) {
        WebhookEvent::Verification { challenge } => {
            log::info!("webhook: verifying challenge");
            let (bytes, signature) =
                verification_response(&state.webhook_secret, challenge.as_ref());
            (
                [
                    ("content-type", "application/json".to_string()),
                    (OUTBOUND_TOKEN_HEADER, signature),
                ],
                bytes,
            )
                .into_response()
        }
        WebhookEvent::MessageCreated(msg) => {
            handle_message(&state, msg);
            StatusCode::OK.into_response()
        }
        WebhookEvent::Ignored => StatusCode::OK.into_response(),
    }
}

/// Start a background reply for keyword messages. Returns immediately so the ack is not
/// held up by the lookups.
fn handle_message(state: &WebhookState, msg: MessageCreated) {
    let Some(zip) = extract_zip(&msg.content, &state.keyword) else {
        return;
    };
    let Some(space_id) = msg.space_id else {
        log::warn!("webhook: keyword message without spaceId, nowhere to reply");
        return;
    };
    log::debug!("webhook: accepted command for space {}", space_id);
    state.responder.spawn_respond(space_id, zip);
}
