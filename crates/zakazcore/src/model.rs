use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Статус заказа в том виде, в котором его хранит бэкенд.
///
/// Unknown strings are a deserialization error, not a silent default —
/// a schema change on the backend should show up in the logs, not as a
/// mislabeled badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Completed,
    Cancelled,
}

impl OrderStatus {
    /// Lowercase wire form, as stored in the `orders.status` column.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Badge color used by the dashboard frontend.
    pub fn badge_color(self) -> &'static str {
        match self {
            Self::Pending => "#fbbf24",
            Self::Completed => "#10b981",
            Self::Cancelled => "#ef4444",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Сводка по клиенту, приходящая вместе с заказом (embedded join).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerSummary {
    pub name: String,
    pub phone: String,
}

/// Строка таблицы `orders`. Создаётся внешним актором; для этой системы read-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub amount: f64,
    pub status: OrderStatus,
    #[serde(default)]
    pub description: String,
    pub created_at: DateTime<Utc>,
    /// Joined customer summary. The backend embeds it under `customers`;
    /// plain row events on the live channel carry no join, hence `None`.
    #[serde(rename = "customers", default)]
    pub customer: Option<CustomerSummary>,
}

/// Строка таблицы `customers`. Read-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    pub id: Uuid,
    pub name: String,
    pub phone: String,
    pub created_at: DateTime<Utc>,
}

/// Derived, non-persisted aggregate over both tables.
///
/// Serializes with the historical camelCase field names so the dashboard
/// JSON API keeps its original shape.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    #[serde(rename = "totalOrders")]
    pub total_orders: u64,
    #[serde(rename = "totalCustomers")]
    pub total_customers: u64,
    #[serde(rename = "pendingOrders")]
    pub pending_orders: u64,
    #[serde(rename = "completedOrders")]
    pub completed_orders: u64,
}

impl Stats {
    /// Best-effort patch for an order arriving on the live channel:
    /// the total always goes up, pending only for pending rows.
    /// Completed/cancelled rows arriving directly leave the other
    /// counters untouched, so the aggregate can drift until a reload.
    pub fn apply_new_order(&mut self, status: OrderStatus) {
        self.total_orders += 1;
        if status == OrderStatus::Pending {
            self.pending_orders += 1;
        }
    }
}

/// Kind of row-level change delivered by the live channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderEventKind {
    Insert,
    Update,
    Delete,
}

/// One row-level change on the `orders` relation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderEvent {
    pub kind: OrderEventKind,
    pub order: Order,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn status_round_trips_through_wire_form() {
        for status in [OrderStatus::Pending, OrderStatus::Completed, OrderStatus::Cancelled] {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{}\"", status.as_str()));
            let back: OrderStatus = serde_json::from_str(&json).unwrap();
            assert_eq!(back, status);
        }
    }

    #[test]
    fn unknown_status_is_rejected() {
        let result: Result<OrderStatus, _> = serde_json::from_str("\"refunded\"");
        assert!(result.is_err());
    }

    #[test]
    fn stats_patch_increments_total_and_pending_only_for_pending() {
        let mut stats = Stats { total_orders: 12, total_customers: 5, pending_orders: 3, completed_orders: 4 };

        stats.apply_new_order(OrderStatus::Pending);
        assert_eq!(stats.total_orders, 13);
        assert_eq!(stats.pending_orders, 4);
        assert_eq!(stats.completed_orders, 4);

        stats.apply_new_order(OrderStatus::Completed);
        assert_eq!(stats.total_orders, 14);
        assert_eq!(stats.pending_orders, 4);
        // known drift: a completed row arriving live does not bump this
        assert_eq!(stats.completed_orders, 4);

        stats.apply_new_order(OrderStatus::Cancelled);
        assert_eq!(stats.total_orders, 15);
        assert_eq!(stats.pending_orders, 4);
    }

    #[test]
    fn stats_serializes_with_historical_field_names() {
        let stats = Stats { total_orders: 1, total_customers: 2, pending_orders: 3, completed_orders: 4 };
        let value = serde_json::to_value(stats).unwrap();
        assert_eq!(value["totalOrders"], 1);
        assert_eq!(value["totalCustomers"], 2);
        assert_eq!(value["pendingOrders"], 3);
        assert_eq!(value["completedOrders"], 4);
    }

    #[test]
    fn order_maps_embedded_customers_join() {
        let json = r#"{
            "id": "6f2d9df0-9a41-4a3e-9f6e-0d7a3c6b1a10",
            "customer_id": "c0a8012e-1111-4a3e-9f6e-0d7a3c6b1a10",
            "amount": 150000,
            "status": "pending",
            "description": "Доставка",
            "created_at": "2024-05-01T10:30:00Z",
            "customers": { "name": "Азиз", "phone": "+998901234567" }
        }"#;
        let order: Order = serde_json::from_str(json).unwrap();
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.amount, 150000.0);
        assert_eq!(order.customer.as_ref().unwrap().name, "Азиз");
    }

    #[test]
    fn order_without_join_or_description_still_parses() {
        let json = r#"{
            "id": "6f2d9df0-9a41-4a3e-9f6e-0d7a3c6b1a10",
            "customer_id": "c0a8012e-1111-4a3e-9f6e-0d7a3c6b1a10",
            "amount": 99.5,
            "status": "completed",
            "created_at": "2024-05-01T10:30:00Z"
        }"#;
        let order: Order = serde_json::from_str(json).unwrap();
        assert!(order.customer.is_none());
        assert!(order.description.is_empty());
    }
}
