//! Zakazdash - realtime order dashboard over the managed backend
//!
//! One page, four stat tiles, the ten most recent orders, and a live
//! subscription that patches both as new rows arrive.
//!
//! # Module Structure
//!
//! - `state`: the `{Loading → Ready}` dashboard state machine
//! - `server`: axum surface (page, JSON API, SSE feed) and the
//!   subscription loop
//! - `frontend`: the embedded page

pub mod frontend;
pub mod server;
pub mod state;

pub use server::{router, run_dashboard, serve, AppState, SharedState};
pub use state::Dashboard;
