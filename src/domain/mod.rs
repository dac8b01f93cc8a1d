//! Domain layer with core entities, errors and port definitions.

/// Entity definitions.
pub mod entities;
/// Error types.
pub mod errors;
/// Port definitions.
pub mod ports;

pub use entities::{ImageId, Message, MessageCache, MessageId};
pub use errors::SourceError;
pub use ports::{CacheError, CacheResult, ImageFetcherPort, MessageSourcePort, UiDispatcherPort};
