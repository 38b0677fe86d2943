//! Utility modules for configuration, error handling, and logging.

pub mod config;
pub mod error;
pub mod observer;

// Re-export commonly used types for convenience
pub use error::{OutputError, ParseError};
pub use observer::{LogObserver, NullObserver, ParseObserver};
