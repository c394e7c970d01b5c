pub mod channel;
pub mod error;
pub mod message;
pub mod traits;
pub mod types;

pub use channel::RelayBus;
pub use error::RelayError;
pub use message::Message;
pub use traits::{Component, ExpiryTask, ExpiryTimer, Transport};
pub use types::{
    AlbumId, DocumentAttachment, FileRef, IncomingMedia, MediaKind, PhotoVariant, RecipientId,
    SenderId, UNKNOWN_SENDER,
};
