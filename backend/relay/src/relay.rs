//! File relay: resolves each file reference and forwards the bytes to the recipient.

use std::sync::Arc;

use chrono::Utc;
use photodrop_core::{FileRef, MediaKind, RecipientId, RelayError, Transport};
use tracing::{debug, error};

/// Outcome of relaying the files of one event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RelayReport {
    pub delivered: usize,
    pub failed: usize,
}

/// File name used when forwarding `file`, stamped with `epoch_millis`.
pub fn delivery_file_name(file: &FileRef, epoch_millis: i64) -> String {
    match file.kind {
        MediaKind::Photo => format!("photo_{}_{}.jpg", file.file_id, epoch_millis),
        MediaKind::Document => file
            .file_name
            .clone()
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| format!("document_{}_{}", file.file_id, epoch_millis)),
    }
}

pub struct FileRelay {
    transport: Arc<dyn Transport>,
    recipient: RecipientId,
}

impl FileRelay {
    pub fn new(transport: Arc<dyn Transport>, recipient: RecipientId) -> Self {
        Self {
            transport,
            recipient,
        }
    }

    /// Fetch one file and deliver it as a photo or document.
    pub async fn relay(&self, file: &FileRef) -> Result<(), RelayError> {
        let bytes = self.transport.fetch_file(&file.file_id).await?;
        let file_name = delivery_file_name(file, Utc::now().timestamp_millis());
        debug!(
            file_id = %file.file_id,
            kind = %file.kind,
            bytes = bytes.len(),
            file_name = %file_name,
            "Forwarding file"
        );

        match file.kind {
            MediaKind::Photo => {
                self.transport
                    .send_photo(self.recipient, bytes, file_name)
                    .await
            }
            MediaKind::Document => {
                self.transport
                    .send_document(self.recipient, bytes, file_name)
                    .await
            }
        }
    }

    /// Relay every file independently. Failures are logged and counted, never propagated.
    pub async fn relay_all(&self, files: &[FileRef]) -> RelayReport {
        let mut report = RelayReport::default();
        for file in files {
            match self.relay(file).await {
                Ok(()) => report.delivered += 1,
                Err(e) => {
                    error!(file_id = %file.file_id, error = %e, "Error processing file");
                    report.failed += 1;
                }
            }
        }
        report
    }
}
