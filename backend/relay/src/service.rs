use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use photodrop_core::{Component, ExpiryTimer, IncomingMedia, Message, RecipientId, Transport};
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, error, info, info_span, Instrument};

use crate::dedup::NotificationDeduplicator;
use crate::relay::{FileRelay, RelayReport};

/// What happened to one inbound event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handled {
    /// The event carried no file.
    Dropped,
    Relayed { notified: bool, report: RelayReport },
}

struct ServiceInner {
    dedup: NotificationDeduplicator,
    files: FileRelay,
    transport: Arc<dyn Transport>,
    recipient: RecipientId,
}

/// Wires each inbound event through the deduplicator and the file relay.
#[derive(Clone)]
pub struct RelayService {
    inner: Arc<ServiceInner>,
}

impl RelayService {
    pub fn new(
        transport: Arc<dyn Transport>,
        recipient: RecipientId,
        timer: Arc<dyn ExpiryTimer>,
    ) -> Self {
        Self::with_deduplicator(transport, recipient, NotificationDeduplicator::new(timer))
    }

    pub fn with_deduplicator(
        transport: Arc<dyn Transport>,
        recipient: RecipientId,
        dedup: NotificationDeduplicator,
    ) -> Self {
        Self {
            inner: Arc::new(ServiceInner {
                dedup,
                files: FileRelay::new(Arc::clone(&transport), recipient),
                transport,
                recipient,
            }),
        }
    }

    pub fn deduplicator(&self) -> &NotificationDeduplicator {
        &self.inner.dedup
    }

    /// Process one inbound event end to end.
    ///
    /// The notification decision is taken before the first await, so concurrent
    /// events for the same album cannot both see it as new.
    pub async fn handle(&self, media: IncomingMedia) -> Handled {
        let inner = &self.inner;

        let files = media.extract_files();
        if files.is_empty() {
            debug!(sender = %media.sender, "No files in message, skipping");
            return Handled::Dropped;
        }

        let decision = inner
            .dedup
            .decide(media.sender, media.album_id.as_ref(), media.received_at);

        let mut notified = false;
        if decision.emit {
            let sender_name = media.sender_display_name();
            let text = format!("New photo received from {sender_name}");
            match inner.transport.send_text(inner.recipient, &text).await {
                Ok(()) => {
                    notified = true;
                    info!(
                        sender = %media.sender,
                        sender_name = %sender_name,
                        album = ?media.album_id,
                        "Notification sent"
                    );
                }
                Err(e) => {
                    error!(sender = %media.sender, error = %e, "Failed to send notification");
                }
            }
        }

        let report = inner.files.relay_all(&files).await;
        info!(
            delivered = report.delivered,
            failed = report.failed,
            "Files sent"
        );

        Handled::Relayed { notified, report }
    }
}

#[async_trait]
impl Component for RelayService {
    fn name(&self) -> &str {
        "relay"
    }

    async fn start(&self, mut rx: mpsc::Receiver<Message>) -> Result<()> {
        info!(transport = self.inner.transport.name(), "Relay service started");

        let mut tasks = JoinSet::new();
        while let Some(msg) = rx.recv().await {
            match msg {
                Message::Inbound(media) => {
                    let span = info_span!("event", event_id = %media.event_id, sender = %media.sender);
                    let service = self.clone();
                    tasks.spawn(async move { service.handle(media).await }.instrument(span));
                }
            }

            // Reap finished handlers so the set does not grow with uptime.
            while let Some(res) = tasks.try_join_next() {
                if let Err(e) = res {
                    error!(error = %e, "Event handler panicked");
                }
            }
        }

        while let Some(res) = tasks.join_next().await {
            if let Err(e) = res {
                error!(error = %e, "Event handler panicked");
            }
        }

        info!("Relay service stopped");
        Ok(())
    }
}
