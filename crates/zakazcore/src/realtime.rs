//! Live update channel over the backend's realtime websocket.
//!
//! Joins the `orders` topic with a phoenix-style envelope, keeps the
//! channel alive with heartbeat frames, and forwards decoded row events
//! to the subscriber. No deduplication, no filtering, no backpressure,
//! and no reconnect: when the server closes the socket the stream ends.

use futures_util::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};
use url::Url;

use crate::config;
use crate::error::{AppError, Result};
use crate::model::{Order, OrderEvent, OrderEventKind};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Channel topic the orders subscription joins.
const ORDERS_TOPIC: &str = "realtime:orders-channel";

/// Phoenix envelope carried on the realtime socket.
#[derive(Debug, Serialize, Deserialize)]
struct Envelope {
    topic: String,
    event: String,
    payload: serde_json::Value,
    #[serde(rename = "ref")]
    reference: Option<String>,
}

/// Body of a `postgres_changes` payload's `data` field.
#[derive(Debug, Deserialize)]
struct ChangeData {
    #[serde(rename = "type")]
    kind: OrderEventKind,
    #[serde(default)]
    record: Option<Order>,
    #[serde(default)]
    old_record: Option<Order>,
}

/// Handle to an open orders subscription.
///
/// An event stream plus an explicit release: `recv()` yields decoded row
/// events in delivery order; `unsubscribe()` tears the socket task down.
/// Dropping the handle releases the channel too, so the release happens
/// exactly once either way.
pub struct OrderSubscription {
    rx: mpsc::UnboundedReceiver<OrderEvent>,
    task: Option<JoinHandle<()>>,
}

impl OrderSubscription {
    /// Next event from the channel. `None` once the subscription was
    /// released or the socket is gone.
    pub async fn recv(&mut self) -> Option<OrderEvent> {
        self.rx.recv().await
    }

    /// Release the channel. Idempotent.
    pub fn unsubscribe(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
        self.rx.close();
    }

    /// Subscription backed by a plain channel, with no socket behind it.
    /// Lets tests feed synthetic events deterministically.
    pub fn from_channel(rx: mpsc::UnboundedReceiver<OrderEvent>) -> Self {
        Self { rx, task: None }
    }
}

impl Drop for OrderSubscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

/// Opens the realtime websocket and joins the orders topic.
///
/// Events for every insert/update/delete on `orders` flow through the
/// returned handle as fast as the backend sends them.
pub async fn subscribe_to_orders(base_url: &str, api_key: &str) -> Result<OrderSubscription> {
    let url = websocket_url(base_url, api_key)?;
    let (mut ws, _response) = connect_async(url.as_str()).await?;
    log::info!("Realtime channel connected");

    join_orders_topic(&mut ws).await?;

    let (tx, rx) = mpsc::unbounded_channel();
    let task = tokio::spawn(run_channel(ws, tx));
    Ok(OrderSubscription { rx, task: Some(task) })
}

/// `https://xyz.example.co` → `wss://xyz.example.co/realtime/v1/websocket?...`
fn websocket_url(base_url: &str, api_key: &str) -> Result<String> {
    let url = Url::parse(base_url).map_err(|e| AppError::Realtime(format!("invalid backend URL: {}", e)))?;
    let scheme = if url.scheme() == "http" { "ws" } else { "wss" };
    let host = url
        .host_str()
        .ok_or_else(|| AppError::Realtime("backend URL has no host".to_string()))?;
    let port = url.port().map(|p| format!(":{}", p)).unwrap_or_default();
    Ok(format!(
        "{}://{}{}/realtime/v1/websocket?apikey={}&vsn=1.0.0",
        scheme, host, port, api_key
    ))
}

async fn join_orders_topic(ws: &mut WsStream) -> Result<()> {
    let join = Envelope {
        topic: ORDERS_TOPIC.to_string(),
        event: "phx_join".to_string(),
        payload: json!({
            "config": {
                "postgres_changes": [
                    { "event": "*", "schema": "public", "table": "orders" }
                ]
            }
        }),
        reference: Some("1".to_string()),
    };
    ws.send(Message::Text(serde_json::to_string(&join)?)).await?;
    log::info!("Joined realtime topic {}", ORDERS_TOPIC);
    Ok(())
}

/// Socket loop: heartbeats out, frames in, decoded events forwarded.
/// Ends on socket close/error or when the subscriber goes away.
async fn run_channel(mut ws: WsStream, tx: mpsc::UnboundedSender<OrderEvent>) {
    let mut heartbeat = tokio::time::interval(config::realtime::heartbeat_interval());
    let mut heartbeat_ref: u64 = 1;

    loop {
        tokio::select! {
            _ = heartbeat.tick() => {
                heartbeat_ref += 1;
                let frame = Envelope {
                    topic: "phoenix".to_string(),
                    event: "heartbeat".to_string(),
                    payload: json!({}),
                    reference: Some(heartbeat_ref.to_string()),
                };
                let Ok(text) = serde_json::to_string(&frame) else { continue };
                if ws.send(Message::Text(text)).await.is_err() {
                    log::warn!("Realtime heartbeat failed; channel is gone");
                    break;
                }
            }
            frame = ws.next() => {
                match frame {
                    Some(Ok(Message::Text(text))) => {
                        if let Some(event) = decode_event(&text) {
                            if tx.send(event).is_err() {
                                // subscriber unsubscribed
                                break;
                            }
                        }
                    }
                    Some(Ok(Message::Ping(data))) => {
                        let _ = ws.send(Message::Pong(data)).await;
                    }
                    Some(Ok(Message::Close(_))) => {
                        log::info!("Realtime channel closed by server");
                        break;
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        log::error!("Realtime channel error: {}", e);
                        break;
                    }
                    None => break,
                }
            }
        }
    }
}

/// One inbound frame → at most one order event.
///
/// Protocol chatter (`phx_reply`, `system`, presence) is skipped quietly;
/// a `postgres_changes` payload that does not map onto the typed row is
/// logged loudly and skipped.
fn decode_event(text: &str) -> Option<OrderEvent> {
    let envelope: Envelope = match serde_json::from_str(text) {
        Ok(envelope) => envelope,
        Err(e) => {
            log::warn!("Undecodable realtime frame: {}", e);
            return None;
        }
    };

    if envelope.event != "postgres_changes" {
        return None;
    }

    let data = match envelope.payload.get("data") {
        Some(data) => data.clone(),
        None => envelope.payload,
    };
    match parse_change(data) {
        Ok(event) => Some(event),
        Err(e) => {
            log::error!("Realtime payload shape mismatch: {}", e);
            None
        }
    }
}

fn parse_change(data: serde_json::Value) -> Result<OrderEvent> {
    let change: ChangeData = serde_json::from_value(data)?;
    let order = match change.kind {
        OrderEventKind::Insert | OrderEventKind::Update => change.record,
        OrderEventKind::Delete => change.old_record.or(change.record),
    }
    .ok_or_else(|| AppError::Realtime("change event without a row".to_string()))?;

    Ok(OrderEvent { kind: change.kind, order })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn order_json() -> serde_json::Value {
        json!({
            "id": "6f2d9df0-9a41-4a3e-9f6e-0d7a3c6b1a10",
            "customer_id": "c0a8012e-1111-4a3e-9f6e-0d7a3c6b1a10",
            "amount": 150000,
            "status": "pending",
            "description": "Доставка",
            "created_at": "2024-05-01T10:30:00Z"
        })
    }

    #[test]
    fn websocket_url_swaps_scheme_and_keeps_port() {
        let url = websocket_url("https://db.example.co", "secret").unwrap();
        assert_eq!(url, "wss://db.example.co/realtime/v1/websocket?apikey=secret&vsn=1.0.0");

        let url = websocket_url("http://localhost:54321/", "k").unwrap();
        assert_eq!(url, "ws://localhost:54321/realtime/v1/websocket?apikey=k&vsn=1.0.0");
    }

    #[test]
    fn websocket_url_rejects_garbage() {
        assert!(websocket_url("not a url", "k").is_err());
    }

    #[test]
    fn decodes_insert_frame() {
        let frame = json!({
            "topic": ORDERS_TOPIC,
            "event": "postgres_changes",
            "payload": {
                "ids": [1],
                "data": {
                    "type": "INSERT",
                    "schema": "public",
                    "table": "orders",
                    "record": order_json()
                }
            },
            "ref": null
        });
        let event = decode_event(&frame.to_string()).unwrap();
        assert_eq!(event.kind, OrderEventKind::Insert);
        assert_eq!(event.order.description, "Доставка");
    }

    #[test]
    fn delete_frame_uses_old_record() {
        let frame = json!({
            "topic": ORDERS_TOPIC,
            "event": "postgres_changes",
            "payload": {
                "data": {
                    "type": "DELETE",
                    "schema": "public",
                    "table": "orders",
                    "old_record": order_json()
                }
            },
            "ref": null
        });
        let event = decode_event(&frame.to_string()).unwrap();
        assert_eq!(event.kind, OrderEventKind::Delete);
    }

    #[test]
    fn protocol_chatter_is_skipped() {
        let reply = json!({
            "topic": ORDERS_TOPIC,
            "event": "phx_reply",
            "payload": { "status": "ok", "response": {} },
            "ref": "1"
        });
        assert!(decode_event(&reply.to_string()).is_none());
    }

    #[test]
    fn shape_mismatch_is_skipped_not_coerced() {
        let frame = json!({
            "topic": ORDERS_TOPIC,
            "event": "postgres_changes",
            "payload": {
                "data": {
                    "type": "INSERT",
                    "record": { "id": "not-a-uuid", "status": "weird" }
                }
            },
            "ref": null
        });
        assert!(decode_event(&frame.to_string()).is_none());
    }

    #[test]
    fn change_without_row_is_an_error() {
        let result = parse_change(json!({ "type": "INSERT" }));
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn synthetic_subscription_delivers_in_order_and_closes() {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut subscription = OrderSubscription::from_channel(rx);

        let order: Order = serde_json::from_value(order_json()).unwrap();
        tx.send(OrderEvent { kind: OrderEventKind::Insert, order: order.clone() }).unwrap();
        tx.send(OrderEvent { kind: OrderEventKind::Update, order }).unwrap();
        drop(tx);

        assert_eq!(subscription.recv().await.unwrap().kind, OrderEventKind::Insert);
        assert_eq!(subscription.recv().await.unwrap().kind, OrderEventKind::Update);
        assert!(subscription.recv().await.is_none());
    }

    #[tokio::test]
    async fn unsubscribe_ends_the_stream() {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut subscription = OrderSubscription::from_channel(rx);
        subscription.unsubscribe();
        assert!(tx.send(OrderEvent {
            kind: OrderEventKind::Insert,
            order: serde_json::from_value(order_json()).unwrap(),
        }).is_err());
        assert!(subscription.recv().await.is_none());
    }
}
