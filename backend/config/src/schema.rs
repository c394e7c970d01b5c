//! photodrop runtime configuration schema.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

use crate::defaults::{DEFAULT_BIND_ADDRESS, DEFAULT_LOG_LEVEL, DEFAULT_PORT};
use crate::redact::redact;

/// Root configuration.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelayConfig {
    /// Telegram bot credential (`BOT_TOKEN`).
    pub bot_token: String,
    /// Chat id every notification and file is sent to (`USER_ID`).
    pub user_id: i64,
    /// Liveness HTTP port (`PORT`).
    pub port: u16,
    /// Liveness bind address (`BIND_ADDRESS`).
    pub bind_address: String,
    /// Log filter used when `RUST_LOG` is unset.
    pub log_level: String,
    /// Directory for rolling JSON log files (`LOG_DIR`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_dir: Option<PathBuf>,
}

impl RelayConfig {
    /// Config with defaults for everything but the credentials.
    pub fn new(bot_token: impl Into<String>, user_id: i64) -> Self {
        Self {
            bot_token: bot_token.into(),
            user_id,
            port: DEFAULT_PORT,
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            log_dir: None,
        }
    }

    /// `bind_address:port` for the liveness server.
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }

    /// Safe-to-log JSON snapshot with secrets masked.
    pub fn redacted(&self) -> serde_json::Value {
        serde_json::to_value(self)
            .map(|v| redact(&v))
            .unwrap_or(serde_json::Value::Null)
    }
}

impl fmt::Debug for RelayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RelayConfig {}", self.redacted())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_does_not_leak_token() {
        let config = RelayConfig::new("123456789:AAHdqTcvCH1vGWJxfSeofSAs0K5PALDsaw", 42);
        let printed = format!("{config:?}");
        assert!(!printed.contains("AAHdqTcvCH1vGWJxfSeofSAs0K5PALDsaw"));
        assert!(printed.contains("\"userId\":42"));
    }

    #[test]
    fn listen_addr_joins_bind_and_port() {
        let mut config = RelayConfig::new("t", 1);
        config.port = 8081;
        assert_eq!(config.listen_addr(), "0.0.0.0:8081");
    }
}
