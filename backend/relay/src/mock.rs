use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;
use photodrop_core::{RecipientId, RelayError, Transport};

/// A call recorded by [`MockTransport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sent {
    Text {
        to: RecipientId,
        text: String,
    },
    Photo {
        to: RecipientId,
        bytes: Vec<u8>,
        file_name: String,
    },
    Document {
        to: RecipientId,
        bytes: Vec<u8>,
        file_name: String,
    },
}

/// An in-memory transport that records deliveries and fails on request.
///
/// A fetched file's bytes are its file id.
#[derive(Default)]
pub struct MockTransport {
    failing_fetches: HashSet<String>,
    fail_text: bool,
    fail_media: bool,
    sent: Mutex<Vec<Sent>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_fetch(mut self, file_id: impl Into<String>) -> Self {
        self.failing_fetches.insert(file_id.into());
        self
    }

    pub fn fail_notifications(mut self) -> Self {
        self.fail_text = true;
        self
    }

    pub fn fail_media_sends(mut self) -> Self {
        self.fail_media = true;
        self
    }

    /// Everything delivered so far, in order.
    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().map(|s| s.clone()).unwrap_or_default()
    }

    pub fn notifications(&self) -> Vec<String> {
        self.sent()
            .into_iter()
            .filter_map(|s| match s {
                Sent::Text { text, .. } => Some(text),
                _ => None,
            })
            .collect()
    }

    pub fn deliveries(&self) -> usize {
        self.sent()
            .iter()
            .filter(|s| !matches!(s, Sent::Text { .. }))
            .count()
    }

    fn record(&self, sent: Sent) {
        if let Ok(mut log) = self.sent.lock() {
            log.push(sent);
        }
    }
}

#[async_trait]
impl Transport for MockTransport {
    fn name(&self) -> &str {
        "mock"
    }

    async fn fetch_file(&self, file_id: &str) -> Result<Vec<u8>, RelayError> {
        // Suspend like a real network call so concurrent events interleave.
        tokio::task::yield_now().await;
        if self.failing_fetches.contains(file_id) {
            return Err(RelayError::fetch(file_id, "mock fetch failure"));
        }
        Ok(file_id.as_bytes().to_vec())
    }

    async fn send_text(&self, to: RecipientId, text: &str) -> Result<(), RelayError> {
        tokio::task::yield_now().await;
        if self.fail_text {
            return Err(RelayError::send("message", "mock send failure"));
        }
        self.record(Sent::Text {
            to,
            text: text.to_string(),
        });
        Ok(())
    }

    async fn send_photo(
        &self,
        to: RecipientId,
        bytes: Vec<u8>,
        file_name: String,
    ) -> Result<(), RelayError> {
        if self.fail_media {
            return Err(RelayError::send("photo", "mock send failure"));
        }
        self.record(Sent::Photo {
            to,
            bytes,
            file_name,
        });
        Ok(())
    }

    async fn send_document(
        &self,
        to: RecipientId,
        bytes: Vec<u8>,
        file_name: String,
    ) -> Result<(), RelayError> {
        if self.fail_media {
            return Err(RelayError::send("document", "mock send failure"));
        }
        self.record(Sent::Document {
            to,
            bytes,
            file_name,
        });
        Ok(())
    }
}
