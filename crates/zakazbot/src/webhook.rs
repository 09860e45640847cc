//! Webhook HTTP surface.
//!
//! One POST per inbound update. The platform's preflight gets permissive
//! static CORS headers; a body that fails to parse is the only 500 —
//! everything past the parse is acknowledged with `{"ok":true}` no
//! matter how handling went.

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde_json::json;
use zakazcore::BackendClient;

use crate::api::TelegramApi;
use crate::commands;
use crate::update::TelegramUpdate;

/// Webhook route path.
pub const WEBHOOK_PATH: &str = "/telegram-bot";

const CORS_HEADERS: [(&str, &str); 3] = [
    ("Access-Control-Allow-Origin", "*"),
    ("Access-Control-Allow-Methods", "GET, POST, PUT, DELETE, OPTIONS"),
    ("Access-Control-Allow-Headers", "Content-Type, Authorization, X-Client-Info, Apikey"),
];

/// Shared handles for the webhook handlers.
#[derive(Clone)]
pub struct WebhookState {
    pub api: TelegramApi,
    pub backend: BackendClient,
}

/// Router for the webhook service.
pub fn router(state: WebhookState) -> Router {
    Router::new()
        .route(WEBHOOK_PATH, post(webhook_handler).options(preflight_handler))
        .with_state(state)
}

/// OPTIONS preflight: 200 with the static CORS headers, no body.
async fn preflight_handler() -> Response {
    with_cors(StatusCode::OK.into_response())
}

/// POST: parse the envelope, handle it, acknowledge.
async fn webhook_handler(State(state): State<WebhookState>, body: Bytes) -> Response {
    let update: TelegramUpdate = match serde_json::from_slice(&body) {
        Ok(update) => update,
        Err(e) => {
            log::error!("Error: {}", e);
            return with_cors(
                (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": "Internal server error" }))).into_response(),
            );
        }
    };

    commands::handle_update(&state.api, &state.backend, update).await;
    with_cors(Json(json!({ "ok": true })).into_response())
}

fn with_cors(mut response: Response) -> Response {
    let headers = response.headers_mut();
    for (name, value) in CORS_HEADERS {
        headers.insert(name, HeaderValue::from_static(value));
    }
    response
}
