//! Thin query client over the backend's REST surface.
//!
//! All persistence, indexing and counting live on the backend; this module
//! only issues count-only HEAD requests and one joined select, with typed
//! mapping at the boundary. Query failures are logged and degraded to
//! zero/empty — the read paths never raise to their callers.

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_RANGE};

use crate::config;
use crate::error::{AppError, Result};
use crate::model::{Order, Stats};

/// Explicitly constructed backend handle.
///
/// Passed by value into each service instead of living in a global, so
/// tests can point it at a mock server.
#[derive(Debug, Clone)]
pub struct BackendClient {
    base_url: String,
    api_key: String,
    http: reqwest::Client,
}

impl BackendClient {
    /// Client against an explicit base URL and service-role key.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        let http = reqwest::Client::builder()
            .timeout(config::network::timeout())
            .build()
            .unwrap_or_default();
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            http,
        }
    }

    /// Client from the SUPABASE_URL / SUPABASE_SERVICE_ROLE_KEY environment.
    pub fn from_env() -> Self {
        Self::new(config::SUPABASE_URL.as_str(), config::SUPABASE_SERVICE_ROLE_KEY.as_str())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn auth_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Ok(key) = HeaderValue::from_str(&self.api_key) {
            headers.insert("apikey", key);
        }
        if let Ok(bearer) = HeaderValue::from_str(&format!("Bearer {}", self.api_key)) {
            headers.insert(AUTHORIZATION, bearer);
        }
        headers
    }

    /// Count-only query: HEAD with `Prefer: count=exact`; the count comes
    /// back in the Content-Range header (`*/42` or `0-9/42`).
    async fn count(&self, table: &str, filter: Option<(&str, &str)>) -> Result<u64> {
        let mut request = self
            .http
            .head(self.table_url(table))
            .headers(self.auth_headers())
            .header("Prefer", "count=exact")
            .query(&[("select", "id")]);
        if let Some((column, operator)) = filter {
            request = request.query(&[(column, operator)]);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(AppError::Http(response.status()));
        }

        response
            .headers()
            .get(CONTENT_RANGE)
            .and_then(|value| value.to_str().ok())
            .and_then(parse_content_range_total)
            .ok_or(AppError::ContentRange)
    }

    /// Four independent counts, issued concurrently. A failed count is
    /// logged and substituted with 0; the aggregate itself never fails.
    pub async fn get_stats(&self) -> Stats {
        let (orders, customers, pending, completed) = tokio::join!(
            self.count("orders", None),
            self.count("customers", None),
            self.count("orders", Some(("status", "eq.pending"))),
            self.count("orders", Some(("status", "eq.completed"))),
        );

        Stats {
            total_orders: count_or_zero("orders", orders),
            total_customers: count_or_zero("customers", customers),
            pending_orders: count_or_zero("pending orders", pending),
            completed_orders: count_or_zero("completed orders", completed),
        }
    }

    /// The `limit` most recent orders, newest first, left-joined with the
    /// customer summary. On any failure: logged, empty list.
    pub async fn get_recent_orders(&self, limit: usize) -> Vec<Order> {
        match self.fetch_recent_orders(limit).await {
            Ok(orders) => orders,
            Err(e) => {
                log::error!("Error fetching orders: {}", e);
                Vec::new()
            }
        }
    }

    async fn fetch_recent_orders(&self, limit: usize) -> Result<Vec<Order>> {
        let response = self
            .http
            .get(self.table_url("orders"))
            .headers(self.auth_headers())
            .query(&[
                ("select", "id,customer_id,amount,status,description,created_at,customers(name,phone)"),
                ("order", "created_at.desc"),
                ("limit", limit.to_string().as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AppError::Http(response.status()));
        }

        // Typed mapping at the boundary: a shape mismatch is an error here,
        // not a silently reshaped row.
        let body = response.text().await?;
        let mut orders: Vec<Order> = serde_json::from_str(&body)?;
        // the backend already limits; this just pins the contract locally
        orders.truncate(limit);
        Ok(orders)
    }
}

/// Total out of a Content-Range value; `*/0` and `0-9/42` both carry one.
fn parse_content_range_total(value: &str) -> Option<u64> {
    let (_, total) = value.rsplit_once('/')?;
    total.trim().parse().ok()
}

fn count_or_zero(what: &str, result: Result<u64>) -> u64 {
    match result {
        Ok(count) => count,
        Err(e) => {
            log::error!("Count query for {} failed: {}", what, e);
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn content_range_with_star_prefix() {
        assert_eq!(parse_content_range_total("*/42"), Some(42));
    }

    #[test]
    fn content_range_with_window_prefix() {
        assert_eq!(parse_content_range_total("0-9/42"), Some(42));
    }

    #[test]
    fn content_range_zero_rows() {
        assert_eq!(parse_content_range_total("*/0"), Some(0));
    }

    #[test]
    fn content_range_garbage_is_none() {
        assert_eq!(parse_content_range_total("whatever"), None);
        assert_eq!(parse_content_range_total("0-9/many"), None);
        assert_eq!(parse_content_range_total(""), None);
    }

    #[test]
    fn base_url_is_normalized() {
        let client = BackendClient::new("https://db.example.com/", "key");
        assert_eq!(client.table_url("orders"), "https://db.example.com/rest/v1/orders");
    }
}
