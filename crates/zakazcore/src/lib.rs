//! Zakazcore - shared library for the Zakaz order dashboard and bot
//!
//! Everything both services need to talk to the managed backend:
//! the typed data model, the REST query client, the realtime
//! subscription client, configuration and logging. No Telegram and
//! no UI code lives here.
//!
//! # Module Structure
//!
//! - `backend`: count and joined-select queries over REST
//! - `realtime`: live update channel (websocket) for order row events
//! - `model`: orders, customers, stats and change events
//! - `config`: environment configuration
//! - `error`: error taxonomy
//! - `logging`: console + file logger setup

pub mod backend;
pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod realtime;

// Re-export commonly used types for convenience
pub use backend::BackendClient;
pub use error::{AppError, Result};
pub use logging::init_logger;
pub use model::{Customer, CustomerSummary, Order, OrderEvent, OrderEventKind, OrderStatus, Stats};
pub use realtime::{subscribe_to_orders, OrderSubscription};
