//! Publish error types.

use std::path::PathBuf;

use thiserror::Error;

use crate::config::ConfigError;
use crate::store::StoreError;

/// Failure of a single asset. Recorded in the report; the run continues.
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("cannot read `{}`", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("upload of `{key}` failed")]
    Upload {
        key: String,
        #[source]
        source: StoreError,
    },

    #[error("not started: publish was interrupted")]
    Interrupted,
}

/// Failures that abort the whole run before any upload.
#[derive(Debug, Error)]
pub enum PublishError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("cannot reach the object store")]
    Connectivity(#[source] StoreError),
}
