use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::IncomingMedia;

/// Messages exchanged between components via the RelayBus.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Message {
    /// Channel adapter → Relay: a message arrived from a sender
    Inbound(IncomingMedia),
}

impl Message {
    pub fn event_id(&self) -> Uuid {
        match self {
            Message::Inbound(media) => media.event_id,
        }
    }
}
