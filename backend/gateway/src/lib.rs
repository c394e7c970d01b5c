//! photodrop liveness HTTP server
//!
//! Answers external health checks while the bot runs.

pub mod server;

pub use server::{liveness_router, start_server, LIVENESS_BODY};
