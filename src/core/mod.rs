//! Core types - pure abstractions shared across the codebase.

mod path;
mod state;

pub use path::{AssetPath, FingerprintedPath};
pub use state::{setup_shutdown_handler, shutdown_flag};
