//! `photodrop-config`: runtime configuration for the photodrop relay.
//!
//! Provides:
//! - Typed config (`RelayConfig`) loaded from environment variables
//! - Default values for optional settings
//! - Validation with warnings for suspicious values
//! - Redaction for safe logging/display

pub mod defaults;
pub mod env;
pub mod redact;
pub mod schema;
pub mod validation;

// Re-export most-used types at crate root.
pub use schema::RelayConfig;
pub use env::{from_env, from_vars, ConfigError};
pub use redact::{redact, mask_secret};
pub use validation::{validate, ConfigValidationError, ValidationReport};

/// Validate a loaded config, logging warnings and rejecting it on errors.
///
/// Call after the logger is up so the warnings are visible.
pub fn prepare(config: RelayConfig) -> Result<RelayConfig, ConfigError> {
    let report = validate(&config);
    for warning in &report.warnings {
        tracing::warn!(path = %warning.path, message = %warning.message, "Config warning");
    }
    if let Some(error) = report.errors.into_iter().next() {
        return Err(ConfigError::Invalid {
            var: error.path,
            reason: error.message,
        });
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prepare_rejects_invalid_config() {
        let err = prepare(RelayConfig::new("1:abc", 0)).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { ref var, .. } if var == "USER_ID"));
    }

    #[test]
    fn prepare_passes_config_through() {
        let config = RelayConfig::new("1:abc", 77);
        assert_eq!(prepare(config.clone()).unwrap(), config);
    }
}
