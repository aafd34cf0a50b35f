//! Object store capability.
//!
//! The publisher only sees these traits.
//!
//! | Module   | Store                                             |
//! |----------|---------------------------------------------------|
//! | `http`   | `PUT`/`HEAD` against an HTTP endpoint             |
//! | `memory` | In-process map with failure injection (tests only) |

mod http;
#[cfg(test)]
mod memory;

pub use http::HttpConnector;
#[cfg(test)]
pub use memory::{MemoryConnector, MemoryStore};

use thiserror::Error;

use crate::asset::HeaderSet;

/// Store failures. Per upload they are recorded on the asset; on connect
/// they abort the run.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store answered {code} for `{key}`")]
    Status { key: String, code: u16 },

    #[error("store rejected the credentials ({0})")]
    Unauthorized(u16),

    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("transport error: {0}")]
    Transport(String),
}

/// A connected object store session.
pub trait ObjectStore: Send + Sync {
    /// Upload one object. Overwrites are harmless: keys are content addressed.
    fn put(&self, key: &str, body: &[u8], headers: &HeaderSet) -> Result<(), StoreError>;

    /// Whether `key` is already stored.
    fn exists(&self, key: &str) -> Result<bool, StoreError>;
}

/// Establishes a store session before any upload is issued.
pub trait StoreConnector {
    type Store: ObjectStore;

    fn connect(&self) -> Result<Self::Store, StoreError>;
}
