//! Environment variable loading.
//!
//! Recognized variables: `BOT_TOKEN`, `USER_ID` (required), `PORT`, `BIND_ADDRESS`,
//! `RUST_LOG`, `LOG_DIR` (optional). Empty values count as unset.

use std::collections::HashMap;
use std::path::PathBuf;

use crate::defaults::{DEFAULT_BIND_ADDRESS, DEFAULT_LOG_LEVEL, DEFAULT_PORT};
use crate::schema::RelayConfig;

/// Error returned when the environment cannot produce a usable config.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required env var \"{0}\"")]
    Missing(&'static str),

    #[error("invalid value for \"{var}\": {reason}")]
    Invalid { var: String, reason: String },
}

/// Load config from the process environment.
pub fn from_env() -> Result<RelayConfig, ConfigError> {
    from_vars(&std::env::vars().collect())
}

/// Load config from a provided map (useful for testing).
pub fn from_vars(env: &HashMap<String, String>) -> Result<RelayConfig, ConfigError> {
    let get = |name: &str| {
        env.get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    };

    let bot_token = get("BOT_TOKEN").ok_or(ConfigError::Missing("BOT_TOKEN"))?;

    let user_id = get("USER_ID").ok_or(ConfigError::Missing("USER_ID"))?;
    let user_id: i64 = user_id.parse().map_err(|e| ConfigError::Invalid {
        var: "USER_ID".into(),
        reason: format!("{user_id:?} is not a chat id ({e})"),
    })?;

    let port = match get("PORT") {
        Some(p) => p.parse::<u16>().map_err(|e| ConfigError::Invalid {
            var: "PORT".into(),
            reason: format!("{p:?} is not a port number ({e})"),
        })?,
        None => DEFAULT_PORT,
    };

    Ok(RelayConfig {
        bot_token: bot_token.to_string(),
        user_id,
        port,
        bind_address: get("BIND_ADDRESS")
            .unwrap_or(DEFAULT_BIND_ADDRESS)
            .to_string(),
        log_level: get("RUST_LOG").unwrap_or(DEFAULT_LOG_LEVEL).to_string(),
        log_dir: get("LOG_DIR").map(PathBuf::from),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn applies_defaults() {
        let config = from_vars(&env(&[("BOT_TOKEN", "123:abc"), ("USER_ID", "987654321")])).unwrap();
        assert_eq!(config.user_id, 987654321);
        assert_eq!(config.port, 3000);
        assert_eq!(config.bind_address, "0.0.0.0");
        assert_eq!(config.log_level, "info");
        assert!(config.log_dir.is_none());
    }

    #[test]
    fn reads_optional_vars() {
        let config = from_vars(&env(&[
            ("BOT_TOKEN", "123:abc"),
            ("USER_ID", "-100200300"),
            ("PORT", "8080"),
            ("BIND_ADDRESS", "127.0.0.1"),
            ("RUST_LOG", "debug"),
            ("LOG_DIR", "/var/log/photodrop"),
        ]))
        .unwrap();
        assert_eq!(config.user_id, -100200300);
        assert_eq!(config.port, 8080);
        assert_eq!(config.listen_addr(), "127.0.0.1:8080");
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.log_dir, Some(PathBuf::from("/var/log/photodrop")));
    }

    #[test]
    fn error_on_missing_token() {
        let err = from_vars(&env(&[("USER_ID", "1")])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("BOT_TOKEN")));
    }

    #[test]
    fn empty_user_id_counts_as_missing() {
        let err = from_vars(&env(&[("BOT_TOKEN", "123:abc"), ("USER_ID", "  ")])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("USER_ID")));
    }

    #[test]
    fn error_on_invalid_numbers() {
        let err = from_vars(&env(&[("BOT_TOKEN", "t"), ("USER_ID", "me")])).unwrap_err();
        assert!(err.to_string().contains("USER_ID"));

        let err = from_vars(&env(&[("BOT_TOKEN", "t"), ("USER_ID", "1"), ("PORT", "70000")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { ref var, .. } if var == "PORT"));
    }
}
