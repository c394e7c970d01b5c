use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::error::RelayError;
use crate::message::Message;
use crate::types::RecipientId;

/// Trait for long-running components fed from the RelayBus.
///
/// Each component receives messages from its channel and runs in its own Tokio task.
#[async_trait]
pub trait Component: Send + Sync + 'static {
    /// Human-readable name of this component.
    fn name(&self) -> &str;

    /// Start the component's event loop, consuming from the given receiver.
    async fn start(&self, rx: mpsc::Receiver<Message>) -> Result<()>;
}

/// Outbound side of a messaging transport: file resolution and delivery to the recipient.
///
/// Every call is a single best-effort attempt; callers decide what a failure means.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Transport name for logging.
    fn name(&self) -> &str;

    /// Resolve a file reference to its bytes.
    async fn fetch_file(&self, file_id: &str) -> Result<Vec<u8>, RelayError>;

    /// Send a plain text message.
    async fn send_text(&self, to: RecipientId, text: &str) -> Result<(), RelayError>;

    async fn send_photo(
        &self,
        to: RecipientId,
        bytes: Vec<u8>,
        file_name: String,
    ) -> Result<(), RelayError>;

    async fn send_document(
        &self,
        to: RecipientId,
        bytes: Vec<u8>,
        file_name: String,
    ) -> Result<(), RelayError>;
}

/// A deferred unit of work run by an [`ExpiryTimer`].
pub type ExpiryTask = Box<dyn FnOnce() + Send + 'static>;

/// Schedules fire-and-forget work after a delay.
///
/// Scheduled tasks cannot be cancelled. Implementations must not run the task
/// synchronously inside `schedule`.
pub trait ExpiryTimer: Send + Sync {
    fn schedule(&self, delay: Duration, task: ExpiryTask);
}
