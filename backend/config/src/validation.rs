//! Config validation: sanity checks with field-level messages.

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use crate::schema::RelayConfig;

/// Shape of a Bot API token: `<numeric bot id>:<secret>`.
static BOT_TOKEN_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+:[A-Za-z0-9_-]+$").unwrap());

/// A config validation error with field path and message.
#[derive(Debug, Error)]
#[error("Config validation error at '{path}': {message}")]
pub struct ConfigValidationError {
    pub path: String,
    pub message: String,
}

/// A collection of validation errors found in one pass.
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }

    fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }
}

/// Validate the config and return a report of all errors and warnings.
pub fn validate(config: &RelayConfig) -> ValidationReport {
    let mut report = ValidationReport::default();

    if !BOT_TOKEN_PATTERN.is_match(&config.bot_token) {
        report.warn(
            "BOT_TOKEN",
            "Does not look like a Bot API token (<bot id>:<secret>); Telegram will likely reject it",
        );
    }

    if config.user_id == 0 {
        report.error("USER_ID", "Chat id 0 is not a valid recipient");
    }

    if config.port == 0 {
        report.warn("PORT", "Port 0 binds a random port; health checks will not find it");
    }

    report
}
