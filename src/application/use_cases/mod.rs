//! Use case implementations.

mod load_history_use_case;

pub use load_history_use_case::{DEFAULT_PAGE_SIZE, LoadHistoryUseCase};
