use thiserror::Error;

/// Top-level error type for the photodrop relay.
#[derive(Debug, Error)]
pub enum RelayError {
    /// A file reference could not be resolved to bytes.
    #[error("failed to fetch file {file_id}: {message}")]
    Fetch { file_id: String, message: String },

    /// A notification or content delivery call failed.
    #[error("failed to send {target}: {message}")]
    Send { target: String, message: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RelayError {
    pub fn fetch(file_id: impl Into<String>, message: impl ToString) -> Self {
        Self::Fetch {
            file_id: file_id.into(),
            message: message.to_string(),
        }
    }

    pub fn send(target: impl Into<String>, message: impl ToString) -> Self {
        Self::Send {
            target: target.into(),
            message: message.to_string(),
        }
    }
}
