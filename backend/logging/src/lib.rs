//! Structured logging for photodrop.
//!
//! Console output, optional daily-rolling JSON files, and redaction of credentials
//! that would otherwise end up in log lines (bot tokens embedded in Bot API URLs).

pub mod logger;
pub mod redact;

pub use logger::init_logger;
pub use redact::redact_sensitive_data;
