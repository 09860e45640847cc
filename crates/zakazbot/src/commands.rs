//! Command dispatch and reply formatting.
//!
//! Commands are matched on the exact message text. Every reply goes out
//! through [`TelegramApi::send_message`]; anything that goes wrong while
//! handling an update is logged and swallowed, so the webhook still
//! acknowledges the delivery.

use zakazcore::config;
use zakazcore::{BackendClient, Order, Stats};

use crate::api::TelegramApi;
use crate::update::TelegramUpdate;

const NO_ORDERS: &str = "Заказлар йўқ";
const UNKNOWN_COMMAND: &str = "Буни манени тушунмадим. /start ни сўра";

/// Handles one inbound update end to end. Never fails.
pub async fn handle_update(api: &TelegramApi, backend: &BackendClient, update: TelegramUpdate) {
    if let Err(e) = dispatch(api, backend, &update).await {
        log::error!("Error handling update: {}", e);
    }
}

async fn dispatch(api: &TelegramApi, backend: &BackendClient, update: &TelegramUpdate) -> anyhow::Result<()> {
    let Some(message) = &update.message else { return Ok(()) };
    let Some(text) = message.text.as_deref() else { return Ok(()) };
    let chat_id = message.from.id;

    match text {
        "/start" => {
            api.send_message(chat_id, &greeting(&message.from.first_name)).await?;
        }
        "/stats" => {
            let stats = backend.get_stats().await;
            api.send_message(chat_id, &stats_message(&stats)).await?;
        }
        "/orders" => {
            let orders = backend.get_recent_orders(config::webhook::ORDERS_COMMAND_LIMIT).await;
            if orders.is_empty() {
                api.send_message(chat_id, NO_ORDERS).await?;
            } else {
                api.send_message(chat_id, &orders_message(&orders)).await?;
            }
        }
        _ => {
            api.send_message(chat_id, UNKNOWN_COMMAND).await?;
        }
    }
    Ok(())
}

fn greeting(first_name: &str) -> String {
    format!("Салом {}! 👋\n\nБот статистика:\n/stats - Заказ статистика\n/orders - Йўқори заказлар", first_name)
}

fn stats_message(stats: &Stats) -> String {
    format!(
        "📊 Заказ Статистика:\n\n✅ Умумий заказлар: {}\n👥 Умумий мижозлар: {}\n⏳ Кутиётирган заказлар: {}",
        stats.total_orders, stats.total_customers, stats.pending_orders
    )
}

fn orders_message(orders: &[Order]) -> String {
    let mut message = String::from("📋 Охирги заказлар:\n\n");
    for (index, order) in orders.iter().enumerate() {
        let name = order.customer.as_ref().map(|c| c.name.as_str()).unwrap_or("Unknown");
        message.push_str(&format!(
            "{}. {} - {} сум ({})\n",
            index + 1,
            name,
            format_amount(order.amount),
            order.status
        ));
    }
    message
}

/// Amounts render the way the historical JSON number did: integral
/// values without a fraction, everything else as-is.
fn format_amount(amount: f64) -> String {
    if amount.fract() == 0.0 {
        format!("{:.0}", amount)
    } else {
        amount.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use zakazcore::OrderStatus;

    fn order(name: &str, amount: f64, status: OrderStatus) -> Order {
        serde_json::from_value(serde_json::json!({
            "id": "6f2d9df0-9a41-4a3e-9f6e-0d7a3c6b1a10",
            "customer_id": "c0a8012e-1111-4a3e-9f6e-0d7a3c6b1a10",
            "amount": amount,
            "status": status.as_str(),
            "description": "",
            "created_at": "2024-05-01T10:30:00Z",
            "customers": { "name": name, "phone": "+998901234567" }
        }))
        .unwrap()
    }

    #[test]
    fn greeting_is_personalized() {
        let text = greeting("Азиз");
        assert!(text.starts_with("Салом Азиз! 👋"));
        assert!(text.contains("/stats"));
        assert!(text.contains("/orders"));
    }

    #[test]
    fn stats_message_formats_the_three_lines_exactly() {
        let stats = Stats { total_orders: 12, total_customers: 5, pending_orders: 3, completed_orders: 4 };
        assert_eq!(
            stats_message(&stats),
            "📊 Заказ Статистика:\n\n✅ Умумий заказлар: 12\n👥 Умумий мижозлар: 5\n⏳ Кутиётирган заказлар: 3"
        );
    }

    #[test]
    fn orders_message_is_a_one_indexed_numbered_list() {
        let orders = vec![
            order("Азиз", 150000.0, OrderStatus::Pending),
            order("Гулнора", 99.5, OrderStatus::Completed),
        ];
        assert_eq!(
            orders_message(&orders),
            "📋 Охирги заказлар:\n\n1. Азиз - 150000 сум (pending)\n2. Гулнора - 99.5 сум (completed)\n"
        );
    }

    #[test]
    fn missing_customer_join_renders_unknown() {
        let mut row = order("Азиз", 10.0, OrderStatus::Cancelled);
        row.customer = None;
        assert_eq!(orders_message(&[row]), "📋 Охирги заказлар:\n\n1. Unknown - 10 сум (cancelled)\n");
    }

    #[test]
    fn amounts_drop_trailing_zero_fractions() {
        assert_eq!(format_amount(150000.0), "150000");
        assert_eq!(format_amount(99.5), "99.5");
        assert_eq!(format_amount(0.0), "0");
    }
}
