//! Zakazbot - Telegram webhook service for the orders backend
//!
//! Stateless request/response: one inbound update per POST, a command
//! dispatch over the shared backend client, and a fire-and-forget reply
//! through the Bot API.
//!
//! # Module Structure
//!
//! - `webhook`: HTTP surface (POST handler, preflight, CORS)
//! - `commands`: exact-string command dispatch and reply formatting
//! - `update`: inbound envelope types
//! - `api`: outbound Bot API client

pub mod api;
pub mod commands;
pub mod update;
pub mod webhook;

pub use api::TelegramApi;
pub use webhook::{router, WebhookState, WEBHOOK_PATH};
