use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Display name used when the sender has no first name.
pub const UNKNOWN_SENDER: &str = "Unknown";

/// Chat the files arrive from. Keys the per-sender debounce record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SenderId(pub i64);

impl fmt::Display for SenderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The single chat every notification and file is delivered to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecipientId(pub i64);

impl fmt::Display for RecipientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Correlates the parts of a multi-file album (Telegram's `media_group_id`).
///
/// Not unique forever; only meaningful while its tracking record is alive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AlbumId(pub String);

impl AlbumId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for AlbumId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// How a file is forwarded to the recipient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    Photo,
    Document,
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaKind::Photo => write!(f, "photo"),
            MediaKind::Document => write!(f, "document"),
        }
    }
}

/// One resolution of an image attachment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoVariant {
    pub file_id: String,
    pub width: u32,
    pub height: u32,
}

/// A generic file attachment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentAttachment {
    pub file_id: String,
    pub file_name: Option<String>,
}

/// A file to resolve and forward.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRef {
    pub file_id: String,
    pub kind: MediaKind,
    /// Original name, documents only.
    pub file_name: Option<String>,
}

/// An inbound message event, reduced to the fields the relay consumes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncomingMedia {
    /// Correlation id for logs.
    pub event_id: Uuid,
    pub sender: SenderId,
    pub sender_name: Option<String>,
    /// Ordered low to high resolution.
    pub photos: Vec<PhotoVariant>,
    pub document: Option<DocumentAttachment>,
    pub album_id: Option<AlbumId>,
    /// Arrival time, used as `now` for the notification decision.
    pub received_at: DateTime<Utc>,
}

impl IncomingMedia {
    pub fn new(sender: SenderId, received_at: DateTime<Utc>) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            sender,
            sender_name: None,
            photos: Vec::new(),
            document: None,
            album_id: None,
            received_at,
        }
    }

    pub fn with_sender_name(mut self, name: impl Into<String>) -> Self {
        self.sender_name = Some(name.into());
        self
    }

    pub fn with_photos(mut self, photos: Vec<PhotoVariant>) -> Self {
        self.photos = photos;
        self
    }

    pub fn with_document(mut self, document: DocumentAttachment) -> Self {
        self.document = Some(document);
        self
    }

    pub fn with_album(mut self, album_id: AlbumId) -> Self {
        self.album_id = Some(album_id);
        self
    }

    /// Sender's display name, or `"Unknown"`.
    pub fn sender_display_name(&self) -> &str {
        self.sender_name
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or(UNKNOWN_SENDER)
    }

    /// Extract the files carried by this event.
    ///
    /// An image contributes only its highest-resolution variant. A document is taken
    /// only when no image is present. An empty result means the event carries nothing
    /// to relay and must be dropped.
    pub fn extract_files(&self) -> Vec<FileRef> {
        if let Some(largest) = self.photos.last() {
            return vec![FileRef {
                file_id: largest.file_id.clone(),
                kind: MediaKind::Photo,
                file_name: None,
            }];
        }

        match &self.document {
            Some(doc) => vec![FileRef {
                file_id: doc.file_id.clone(),
                kind: MediaKind::Document,
                file_name: doc.file_name.clone(),
            }],
            None => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn photo(id: &str, size: u32) -> PhotoVariant {
        PhotoVariant {
            file_id: id.into(),
            width: size,
            height: size,
        }
    }

    #[test]
    fn takes_only_largest_photo_variant() {
        let media = IncomingMedia::new(SenderId(7), Utc::now()).with_photos(vec![
            photo("small", 90),
            photo("medium", 320),
            photo("large", 1280),
        ]);

        let files = media.extract_files();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].file_id, "large");
        assert_eq!(files[0].kind, MediaKind::Photo);
    }

    #[test]
    fn takes_document_with_original_name() {
        let media = IncomingMedia::new(SenderId(7), Utc::now()).with_document(DocumentAttachment {
            file_id: "doc-1".into(),
            file_name: Some("IMG_0042.HEIC".into()),
        });

        let files = media.extract_files();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].kind, MediaKind::Document);
        assert_eq!(files[0].file_name.as_deref(), Some("IMG_0042.HEIC"));
    }

    #[test]
    fn photo_wins_over_document() {
        let media = IncomingMedia::new(SenderId(7), Utc::now())
            .with_photos(vec![photo("p", 800)])
            .with_document(DocumentAttachment {
                file_id: "d".into(),
                file_name: None,
            });

        let files = media.extract_files();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].file_id, "p");
    }

    #[test]
    fn text_only_event_yields_nothing() {
        let media = IncomingMedia::new(SenderId(7), Utc::now());
        assert!(media.extract_files().is_empty());
    }

    #[test]
    fn display_name_defaults_to_unknown() {
        let media = IncomingMedia::new(SenderId(7), Utc::now());
        assert_eq!(media.sender_display_name(), "Unknown");

        let named = media.clone().with_sender_name("Alice");
        assert_eq!(named.sender_display_name(), "Alice");

        let blank = media.with_sender_name("");
        assert_eq!(blank.sender_display_name(), "Unknown");
    }
}
