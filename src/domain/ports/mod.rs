mod image_cache_port;
mod message_source_port;
mod ui_dispatch_port;

pub use image_cache_port::{CacheError, CacheResult, ImageFetcherPort};
pub use message_source_port::{FetchMessagesOptions, MAX_PAGE_SIZE, MessageSourcePort};
pub use ui_dispatch_port::{UiDispatcherPort, UiJob};
