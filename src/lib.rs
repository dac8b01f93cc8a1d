//! oxicord-cache - Client-side caching layer for the oxicord Discord client.
//!
//! This crate provides a per-channel message cache with pagination tracking
//! and a hybrid memory + disk image cache with deduplicated downloads,
//! periodic persistence and size-bounded purging.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

/// Application layer containing use cases.
pub mod application;
/// Domain layer containing entities, errors, and port definitions.
pub mod domain;
/// Infrastructure layer containing adapters for external services.
pub mod infrastructure;

/// Current version of the application.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name.
pub const NAME: &str = "oxicord-cache";
