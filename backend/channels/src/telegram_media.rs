//! Telegram Media Download
//!
//! Resolves a Bot API `file_id` to a downloadable path with `getFile`, then fetches
//! the bytes from the file endpoint.

use photodrop_core::RelayError;
use photodrop_logging::redact_sensitive_data;
use serde::Deserialize;
use tracing::debug;

pub const TELEGRAM_API_BASE: &str = "https://api.telegram.org";

/// Bot API response envelope.
#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TelegramFile {
    file_path: Option<String>,
    file_size: Option<u64>,
}

pub struct TelegramMedia {
    client: reqwest::Client,
    token: String,
    api_base: String,
}

impl TelegramMedia {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            token: token.into(),
            api_base: TELEGRAM_API_BASE.to_string(),
        }
    }

    /// Point at a different Bot API server (self-hosted or a test double).
    pub fn with_api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = base.into().trim_end_matches('/').to_string();
        self
    }

    /// Download URL for a path returned by `getFile`. Contains the bot token.
    pub fn file_url(&self, file_path: &str) -> String {
        format!("{}/file/bot{}/{}", self.api_base, self.token, file_path)
    }

    /// Ask the Bot API where a file lives.
    pub async fn resolve_path(&self, file_id: &str) -> Result<String, RelayError> {
        let url = format!("{}/bot{}/getFile", self.api_base, self.token);
        let response = self
            .client
            .get(&url)
            .query(&[("file_id", file_id)])
            .send()
            .await
            .map_err(|e| RelayError::fetch(file_id, redact_sensitive_data(&e.to_string())))?;

        let envelope: ApiResponse<TelegramFile> = response
            .json()
            .await
            .map_err(|e| RelayError::fetch(file_id, redact_sensitive_data(&e.to_string())))?;

        if !envelope.ok {
            let reason = envelope
                .description
                .unwrap_or_else(|| "getFile returned ok=false".to_string());
            return Err(RelayError::fetch(file_id, reason));
        }

        let file = envelope
            .result
            .ok_or_else(|| RelayError::fetch(file_id, "getFile returned no result"))?;
        debug!(file_id, file_size = ?file.file_size, "Resolved Telegram file");
        file.file_path
            .ok_or_else(|| RelayError::fetch(file_id, "file is not available for download"))
    }

    /// Resolve and download a file's bytes.
    pub async fn download(&self, file_id: &str) -> Result<Vec<u8>, RelayError> {
        let file_path = self.resolve_path(file_id).await?;
        let url = self.file_url(&file_path);
        debug!(url = %redact_sensitive_data(&url), "Processing file");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| RelayError::fetch(file_id, redact_sensitive_data(&e.to_string())))?;

        let bytes = response
            .bytes()
            .await
            .map_err(|e| RelayError::fetch(file_id, redact_sensitive_data(&e.to_string())))?;
        Ok(bytes.to_vec())
    }
}
