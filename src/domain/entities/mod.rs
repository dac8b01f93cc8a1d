//! Domain entity definitions.

mod image;
mod message;
mod message_cache;

pub use image::{ImageId, ImageSource, LoadedImage};
pub use message::{Message, MessageId};
pub use message_cache::{DEFAULT_MESSAGE_LIMIT, MessageCache, MessageWindow};
