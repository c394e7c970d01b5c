use crate::ChannelAdapter;
use crate::telegram_media::TelegramMedia;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use photodrop_logging::redact_sensitive_data;
use photodrop_core::{
    AlbumId, DocumentAttachment, IncomingMedia, Message, PhotoVariant, RecipientId, RelayError,
    SenderId, Transport,
};
use teloxide::error_handlers::LoggingErrorHandler;
use teloxide::prelude::*;
use teloxide::types::InputFile;
use tokio::sync::mpsc;
use tracing::{debug, error, info};

pub struct TelegramAdapter {
    bot: Bot,
    media: TelegramMedia,
}

impl TelegramAdapter {
    pub fn new(token: String) -> Self {
        Self {
            media: TelegramMedia::new(token.clone()),
            bot: Bot::new(token),
        }
    }
}

/// Convert a Telegram message into the relay's inbound event.
pub fn incoming_from_message(msg: &teloxide::types::Message, received_at: DateTime<Utc>) -> IncomingMedia {
    let mut media = IncomingMedia::new(SenderId(msg.chat.id.0), received_at);
    media.sender_name = msg.chat.first_name().map(str::to_string);

    if let Some(photos) = msg.photo() {
        media.photos = photos
            .iter()
            .map(|p| PhotoVariant {
                file_id: p.file.id.to_string(),
                width: p.width,
                height: p.height,
            })
            .collect();
    }

    if let Some(doc) = msg.document() {
        media.document = Some(DocumentAttachment {
            file_id: doc.file.id.to_string(),
            file_name: doc.file_name.clone(),
        });
    }

    media.album_id = msg.media_group_id().map(|id| AlbumId::new(id.to_string()));
    media
}

#[async_trait]
impl ChannelAdapter for TelegramAdapter {
    fn name(&self) -> &str { "telegram" }

    async fn start(&self, inbound_tx: mpsc::Sender<Message>) -> anyhow::Result<()> {
        info!("Starting Telegram adapter");

        let bot = self.bot.clone();

        let handler = Update::filter_message().endpoint(
            |msg: teloxide::types::Message, tx: mpsc::Sender<Message>| async move {
                let media = incoming_from_message(&msg, Utc::now());
                debug!(
                    event_id = %media.event_id,
                    chat_id = %media.sender,
                    message_id = msg.id.0,
                    album = ?media.album_id,
                    photos = media.photos.len(),
                    document = media.document.is_some(),
                    "Received message"
                );

                if let Err(e) = tx.send(Message::Inbound(media)).await {
                    error!(error = %e, "Relay bus closed, dropping message");
                }
                respond(())
            }
        );

        Dispatcher::builder(bot, handler)
            .dependencies(dptree::deps![inbound_tx])
            .error_handler(LoggingErrorHandler::with_custom_text("Processing Error"))
            .enable_ctrlc_handler()
            .build()
            .dispatch()
            .await;

        info!("Telegram adapter stopped");
        Ok(())
    }
}

#[async_trait]
impl Transport for TelegramAdapter {
    fn name(&self) -> &str { "telegram" }

    async fn fetch_file(&self, file_id: &str) -> Result<Vec<u8>, RelayError> {
        self.media.download(file_id).await
    }

    async fn send_text(&self, to: RecipientId, text: &str) -> Result<(), RelayError> {
        self.bot
            .send_message(ChatId(to.0), text)
            .await
            .map_err(|e| RelayError::send("message", redact_sensitive_data(&e.to_string())))?;
        Ok(())
    }

    async fn send_photo(
        &self,
        to: RecipientId,
        bytes: Vec<u8>,
        file_name: String,
    ) -> Result<(), RelayError> {
        self.bot
            .send_photo(ChatId(to.0), InputFile::memory(bytes).file_name(file_name))
            .await
            .map_err(|e| RelayError::send("photo", redact_sensitive_data(&e.to_string())))?;
        Ok(())
    }

    async fn send_document(
        &self,
        to: RecipientId,
        bytes: Vec<u8>,
        file_name: String,
    ) -> Result<(), RelayError> {
        self.bot
            .send_document(ChatId(to.0), InputFile::memory(bytes).file_name(file_name))
            .await
            .map_err(|e| RelayError::send("document", redact_sensitive_data(&e.to_string())))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use photodrop_core::MediaKind;
    use serde_json::json;

    fn parse(value: serde_json::Value) -> teloxide::types::Message {
        serde_json::from_value(value).expect("valid Bot API message")
    }

    fn private_chat(first_name: Option<&str>) -> serde_json::Value {
        match first_name {
            Some(name) => json!({ "id": 4242, "type": "private", "first_name": name }),
            None => json!({ "id": 4242, "type": "private" }),
        }
    }

    #[test]
    fn converts_album_photo() {
        let msg = parse(json!({
            "message_id": 10,
            "date": 1_700_000_000,
            "chat": private_chat(Some("Alice")),
            "from": { "id": 4242, "is_bot": false, "first_name": "Alice" },
            "media_group_id": "13579",
            "photo": [
                { "file_id": "small", "file_unique_id": "u1", "file_size": 1000, "width": 90, "height": 67 },
                { "file_id": "large", "file_unique_id": "u2", "file_size": 90000, "width": 1280, "height": 960 }
            ]
        }));

        let media = incoming_from_message(&msg, Utc::now());
        assert_eq!(media.sender, SenderId(4242));
        assert_eq!(media.sender_display_name(), "Alice");
        assert_eq!(media.album_id, Some(AlbumId::new("13579")));

        let files = media.extract_files();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].file_id, "large");
        assert_eq!(files[0].kind, MediaKind::Photo);
    }

    #[test]
    fn converts_document() {
        let msg = parse(json!({
            "message_id": 11,
            "date": 1_700_000_000,
            "chat": private_chat(None),
            "document": {
                "file_id": "doc-id",
                "file_unique_id": "u3",
                "file_size": 2048,
                "file_name": "IMG_0001.HEIC"
            }
        }));

        let media = incoming_from_message(&msg, Utc::now());
        assert_eq!(media.sender_display_name(), "Unknown");
        assert!(media.album_id.is_none());

        let files = media.extract_files();
        assert_eq!(files[0].kind, MediaKind::Document);
        assert_eq!(files[0].file_name.as_deref(), Some("IMG_0001.HEIC"));
    }

    #[test]
    fn text_message_has_no_files() {
        let msg = parse(json!({
            "message_id": 12,
            "date": 1_700_000_000,
            "chat": private_chat(Some("Bob")),
            "text": "hello"
        }));

        assert!(incoming_from_message(&msg, Utc::now()).extract_files().is_empty());
    }
}
