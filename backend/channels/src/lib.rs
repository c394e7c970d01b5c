use async_trait::async_trait;
use photodrop_core::Message;
use tokio::sync::mpsc;

pub mod telegram;
pub mod telegram_media;

pub use telegram::TelegramAdapter;
pub use telegram_media::TelegramMedia;

/// All channel adapters implement this trait.
#[async_trait]
pub trait ChannelAdapter: Send + Sync {
    /// Human-readable adapter name for logging.
    fn name(&self) -> &str;

    /// Start the adapter's background work (polling loop, WS connection, etc.),
    /// pushing every inbound event onto the relay bus.
    async fn start(&self, inbound_tx: mpsc::Sender<Message>) -> anyhow::Result<()>;
}
