use once_cell::sync::Lazy;
use std::env;
use std::time::Duration;

/// Configuration constants for the dashboard and webhook services

/// Base URL of the managed backend.
/// Read once at startup from the SUPABASE_URL environment variable.
/// Both the REST surface (`/rest/v1`) and the realtime websocket
/// (`/realtime/v1`) live under it.
///
/// Defaults to the empty string when unset: queries fail at call time
/// with a transport error instead of failing at startup.
pub static SUPABASE_URL: Lazy<String> = Lazy::new(|| env::var("SUPABASE_URL").unwrap_or_else(|_| String::new()));

/// Service-role credential sent as `apikey` + bearer token on every
/// backend request and as the `apikey` query parameter on the realtime
/// socket. Empty string when unset (requests will be rejected by the
/// backend, not by us).
pub static SUPABASE_SERVICE_ROLE_KEY: Lazy<String> =
    Lazy::new(|| env::var("SUPABASE_SERVICE_ROLE_KEY").unwrap_or_else(|_| String::new()));

/// Telegram bot token used by the webhook service for outbound sends.
/// Empty string when unset.
pub static TELEGRAM_BOT_TOKEN: Lazy<String> =
    Lazy::new(|| env::var("TELEGRAM_BOT_TOKEN").unwrap_or_else(|_| String::new()));

/// Base URL of the Bot API. Override with BOT_API_URL to point at a
/// local Bot API server or a test double.
pub static BOT_API_URL: Lazy<String> =
    Lazy::new(|| env::var("BOT_API_URL").unwrap_or_else(|_| "https://api.telegram.org".to_string()));

/// Log file path, next to the binary unless LOG_FILE_PATH says otherwise.
pub static LOG_FILE_PATH: Lazy<String> =
    Lazy::new(|| env::var("LOG_FILE_PATH").unwrap_or_else(|_| "zakaz.log".to_string()));

/// Dashboard service configuration
pub mod dashboard {
    /// Default HTTP port for the dashboard server
    pub const DEFAULT_PORT: u16 = 3000;

    /// How many orders the recent list keeps
    pub const RECENT_ORDERS_LIMIT: usize = 10;
}

/// Webhook service configuration
pub mod webhook {
    /// Default HTTP port for the webhook server
    pub const DEFAULT_PORT: u16 = 8787;

    /// How many orders the /orders command shows
    pub const ORDERS_COMMAND_LIMIT: usize = 5;
}

/// Realtime channel configuration
pub mod realtime {
    use super::Duration;

    /// Interval between phoenix heartbeat frames (in seconds)
    pub const HEARTBEAT_SECONDS: u64 = 30;

    /// Heartbeat interval duration
    pub fn heartbeat_interval() -> Duration {
        Duration::from_secs(HEARTBEAT_SECONDS)
    }
}

/// Network configuration
pub mod network {
    use super::Duration;

    /// Request timeout for backend and Bot API HTTP requests (in seconds)
    pub const REQUEST_TIMEOUT_SECS: u64 = 30;

    /// Request timeout duration
    pub fn timeout() -> Duration {
        Duration::from_secs(REQUEST_TIMEOUT_SECS)
    }
}

/// Logs secret configuration state at startup, without the values.
///
/// Absence is a warning, not an error: the services still come up and
/// degrade to empty responses / failed sends per the error policy.
pub fn log_configuration() {
    for (name, value) in [
        ("SUPABASE_URL", SUPABASE_URL.as_str()),
        ("SUPABASE_SERVICE_ROLE_KEY", SUPABASE_SERVICE_ROLE_KEY.as_str()),
        ("TELEGRAM_BOT_TOKEN", TELEGRAM_BOT_TOKEN.as_str()),
    ] {
        if value.is_empty() {
            log::warn!("⚠️  {}: not set — dependent calls will fail", name);
        } else {
            log::info!("✅ {}: set", name);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heartbeat_interval_matches_constant() {
        assert_eq!(realtime::heartbeat_interval(), Duration::from_secs(realtime::HEARTBEAT_SECONDS));
    }

    #[test]
    fn request_timeout_matches_constant() {
        assert_eq!(network::timeout(), Duration::from_secs(network::REQUEST_TIMEOUT_SECS));
    }
}
