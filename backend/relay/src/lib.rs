//! The relay core: decides when the recipient is notified and forwards every file.

pub mod dedup;
pub mod mock;
pub mod relay;
pub mod service;

pub use dedup::{AlbumTracking, Decision, DecisionReason, NotificationDeduplicator, DEBOUNCE_WINDOW};
pub use relay::{delivery_file_name, FileRelay, RelayReport};
pub use service::{Handled, RelayService};
