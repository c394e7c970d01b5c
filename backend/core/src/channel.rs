use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::message::Message;

/// Default channel buffer size for inbound events.
const DEFAULT_BUFFER_SIZE: usize = 256;

/// The bus connecting channel adapters to the relay service.
///
/// Adapters push inbound events through `inbound_tx`; the relay consumes `inbound_rx`.
/// Built on Tokio mpsc channels for async, bounded backpressure.
pub struct RelayBus {
    pub inbound_tx: mpsc::Sender<Message>,
    pub inbound_rx: Option<mpsc::Receiver<Message>>,
}

impl RelayBus {
    /// Create a new bus with the default buffer size.
    pub fn new() -> Self {
        Self::with_buffer_size(DEFAULT_BUFFER_SIZE)
    }

    /// Create a new bus with a custom buffer size.
    pub fn with_buffer_size(buffer: usize) -> Self {
        let (inbound_tx, inbound_rx) = mpsc::channel(buffer);

        info!(buffer_size = buffer, "RelayBus initialized");

        Self {
            inbound_tx,
            inbound_rx: Some(inbound_rx),
        }
    }

    /// Take the inbound receiver (can only be called once).
    pub fn take_inbound_rx(&mut self) -> Option<mpsc::Receiver<Message>> {
        debug!("Inbound receiver taken");
        self.inbound_rx.take()
    }
}

impl Default for RelayBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{IncomingMedia, SenderId};
    use chrono::Utc;

    fn inbound() -> Message {
        Message::Inbound(IncomingMedia::new(SenderId(1), Utc::now()))
    }

    #[tokio::test]
    async fn test_bus_send_receive() {
        let mut bus = RelayBus::new();
        let mut rx = bus.take_inbound_rx().unwrap();

        let msg = inbound();
        let event_id = msg.event_id();

        bus.inbound_tx.send(msg).await.unwrap();
        let received = rx.recv().await.unwrap();
        assert_eq!(received.event_id(), event_id);
    }

    #[tokio::test]
    async fn test_bus_take_rx_once() {
        let mut bus = RelayBus::new();
        assert!(bus.take_inbound_rx().is_some());
        assert!(bus.take_inbound_rx().is_none()); // second take is None
    }

    #[tokio::test]
    async fn test_bus_backpressure() {
        let mut bus = RelayBus::with_buffer_size(2);
        let _rx = bus.take_inbound_rx().unwrap();

        for _ in 0..2 {
            bus.inbound_tx.send(inbound()).await.unwrap();
        }

        // Third send should not complete immediately (buffer full)
        assert!(bus.inbound_tx.try_send(inbound()).is_err());
    }
}
