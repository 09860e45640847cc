//! Dashboard HTTP surface: embedded page, JSON API, SSE snapshot feed.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive, Sse},
        Html, IntoResponse, Json,
    },
    routing::get,
    Router,
};
use futures_util::stream::Stream;
use serde::Deserialize;
use tokio::net::TcpListener;
use tokio::sync::{broadcast, watch, RwLock};

use zakazcore::config::dashboard::RECENT_ORDERS_LIMIT;
use zakazcore::{BackendClient, Order, OrderSubscription, Stats};

use crate::frontend;
use crate::state::Dashboard;

/// Snapshot fanout capacity; a lagging SSE client skips ahead.
const SNAPSHOT_BUFFER: usize = 64;

/// Shared state for the dashboard server.
pub struct AppState {
    pub backend: BackendClient,
    dashboard: RwLock<Dashboard>,
    snapshots: broadcast::Sender<String>,
}

pub type SharedState = Arc<AppState>;

impl AppState {
    pub fn new(backend: BackendClient) -> SharedState {
        let (snapshots, _) = broadcast::channel(SNAPSHOT_BUFFER);
        Arc::new(Self { backend, dashboard: RwLock::new(Dashboard::new()), snapshots })
    }

    /// Current snapshot as the JSON the feed carries.
    pub async fn snapshot_json(&self) -> String {
        serde_json::to_string(&*self.dashboard.read().await)
            .unwrap_or_else(|_| r#"{"phase":"loading"}"#.to_string())
    }

    async fn broadcast_snapshot(&self) {
        // no receivers is fine; nobody is watching
        let _ = self.snapshots.send(self.snapshot_json().await);
    }
}

/// Router for the dashboard server.
pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/api/stats", get(stats_handler))
        .route("/api/orders", get(orders_handler))
        .route("/events", get(events_handler))
        .route("/health", get(health_handler))
        .with_state(state)
}

/// Start the dashboard server.
pub async fn serve(port: u16, state: SharedState, shutdown: watch::Receiver<bool>) -> anyhow::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let app = router(state);

    log::info!("Starting dashboard server on http://{}", addr);
    log::info!("  /            - Dashboard page");
    log::info!("  /api/stats   - Aggregate counts (JSON)");
    log::info!("  /api/orders  - Recent orders (JSON)");
    log::info!("  /events      - Live snapshot feed (SSE)");
    log::info!("  /health      - Health check");

    let listener = TcpListener::bind(&addr).await?;
    let mut shutdown = shutdown;
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = shutdown.changed().await;
        })
        .await?;
    Ok(())
}

/// Initial load plus the live subscription loop. Owns every state
/// transition; request handlers only read.
///
/// The two initial fetches resolve concurrently; the component stays in
/// `Loading` until both are in. The subscription is released exactly
/// once, on shutdown.
pub async fn run_dashboard(state: SharedState, subscription: Option<OrderSubscription>, mut shutdown: watch::Receiver<bool>) {
    let (stats, orders) = tokio::join!(
        state.backend.get_stats(),
        state.backend.get_recent_orders(RECENT_ORDERS_LIMIT),
    );
    state.dashboard.write().await.finish_loading(stats, orders);
    state.broadcast_snapshot().await;
    log::info!("Dashboard ready");

    let Some(mut subscription) = subscription else {
        let _ = shutdown.changed().await;
        return;
    };

    loop {
        tokio::select! {
            _ = shutdown.changed() => {
                subscription.unsubscribe();
                break;
            }
            event = subscription.recv() => {
                match event {
                    Some(event) => {
                        state.dashboard.write().await.apply_event(&event);
                        state.broadcast_snapshot().await;
                    }
                    None => {
                        // no reconnect: the dashboard keeps its last state
                        log::warn!("Live update channel ended");
                        let _ = shutdown.changed().await;
                        break;
                    }
                }
            }
        }
    }
}

/// GET / — the embedded dashboard page.
async fn index_handler() -> Html<&'static str> {
    Html(frontend::INDEX_HTML)
}

/// GET /api/stats — fresh aggregate counts from the backend.
async fn stats_handler(State(state): State<SharedState>) -> Json<Stats> {
    Json(state.backend.get_stats().await)
}

#[derive(Deserialize)]
struct OrdersQuery {
    #[serde(default = "default_orders_limit")]
    limit: usize,
}

fn default_orders_limit() -> usize {
    RECENT_ORDERS_LIMIT
}

/// GET /api/orders — recent orders, newest first.
async fn orders_handler(State(state): State<SharedState>, Query(query): Query<OrdersQuery>) -> Json<Vec<Order>> {
    Json(state.backend.get_recent_orders(query.limit).await)
}

/// GET /events — the current snapshot, then one message per live event.
async fn events_handler(State(state): State<SharedState>) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let current = state.snapshot_json().await;
    let rx = state.snapshots.subscribe();

    let stream = futures_util::stream::unfold((rx, Some(current)), |(mut rx, mut first)| async move {
        if let Some(snapshot) = first.take() {
            return Some((Ok(Event::default().data(snapshot)), (rx, None)));
        }
        loop {
            match rx.recv().await {
                Ok(snapshot) => return Some((Ok(Event::default().data(snapshot)), (rx, None))),
                // dropped a few snapshots; the next one is still current
                Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}

/// GET /health — simple health check.
async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}
