//! Dashboard state machine.
//!
//! `{Loading → Ready}`, with pure merge functions for live events:
//! prepend, cap the list, patch the counters. Purity matters because the
//! subscription task interleaves with request handlers — last applied
//! wins in delivery order, nothing here establishes an ordering of its
//! own.

use serde::Serialize;
use zakazcore::config::dashboard::RECENT_ORDERS_LIMIT;
use zakazcore::{Order, OrderEvent, Stats};

/// Snapshot the dashboard serves and broadcasts.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "phase", rename_all = "lowercase")]
pub enum Dashboard {
    /// Initial fetches still in flight; the frontend shows a placeholder.
    Loading,
    /// Stat tiles plus the capped recent-orders list.
    Ready { stats: Stats, orders: Vec<Order> },
}

impl Dashboard {
    pub fn new() -> Self {
        Self::Loading
    }

    /// Leave the loading placeholder with the initial fetch results.
    pub fn finish_loading(&mut self, stats: Stats, mut orders: Vec<Order>) {
        orders.truncate(RECENT_ORDERS_LIMIT);
        *self = Self::Ready { stats, orders };
    }

    /// Merge one live event. Events arriving before the initial load
    /// completes are dropped. The patch is best-effort: the total always
    /// goes up, pending only for pending rows; completed/cancelled
    /// counters are left alone (known drift source, kept as-is).
    pub fn apply_event(&mut self, event: &OrderEvent) {
        let Self::Ready { stats, orders } = self else { return };
        orders.insert(0, event.order.clone());
        orders.truncate(RECENT_ORDERS_LIMIT);
        stats.apply_new_order(event.order.status);
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready { .. })
    }
}

impl Default for Dashboard {
    fn default() -> Self {
        Self::new()
    }
}
