//! Config defaults for optional settings.

/// Default liveness HTTP port.
pub const DEFAULT_PORT: u16 = 3000;

/// Default liveness bind address (all interfaces).
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0";

/// Default log filter when `RUST_LOG` is unset.
pub const DEFAULT_LOG_LEVEL: &str = "info";
