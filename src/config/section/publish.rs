//! `[publish]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [publish]
//! jobs = 8                            # Worker threads (default: CPU count)
//! key_prefix = ""                     # Prepended to every store key
//! skip_existing = false               # HEAD before PUT, skip keys already present
//! cache_control = "max-age=315360000"
//! expires_secs = 315360000            # Expires = now + this many seconds
//! acl = "public-read"                 # Sent as x-amz-acl; remove to omit
//!
//! [publish.headers]                   # Extra headers, may override the above
//! "X-Served-By" = "asset-id"
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};

/// Ten years, the far-future lifetime of a fingerprinted object.
pub const TEN_YEARS_SECS: u64 = 315_360_000;

pub struct PublishFields {
    pub jobs: FieldPath,
    pub cache_control: FieldPath,
    pub headers: FieldPath,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PublishConfig {
    /// Worker threads per pass; `None` uses the number of CPUs.
    pub jobs: Option<usize>,

    /// Prefix prepended to every store key.
    pub key_prefix: String,

    /// Skip keys the store already holds.
    pub skip_existing: bool,

    pub cache_control: String,

    pub expires_secs: u64,

    /// Canned ACL header value.
    pub acl: Option<String>,

    /// Extra fixed headers.
    pub headers: BTreeMap<String, String>,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            jobs: None,
            key_prefix: String::new(),
            skip_existing: false,
            cache_control: format!("max-age={TEN_YEARS_SECS}"),
            expires_secs: TEN_YEARS_SECS,
            acl: Some("public-read".to_string()),
            headers: BTreeMap::new(),
        }
    }
}

impl PublishConfig {
    pub const FIELDS: PublishFields = PublishFields {
        jobs: FieldPath::new("publish.jobs"),
        cache_control: FieldPath::new("publish.cache_control"),
        headers: FieldPath::new("publish.headers"),
    };

    /// Effective worker count.
    pub fn worker_count(&self) -> usize {
        self.jobs.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(std::num::NonZeroUsize::get)
                .unwrap_or(1)
        })
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.jobs == Some(0) {
            diag.error(Self::FIELDS.jobs, "must be at least 1");
        }
        if self.cache_control.trim().is_empty() {
            diag.error(Self::FIELDS.cache_control, "must not be empty");
        }
        for (name, value) in &self.headers {
            if !is_header_name(name) {
                diag.error(
                    Self::FIELDS.headers,
                    format!("`{name}` is not a valid header name"),
                );
            }
            if value.contains(['\r', '\n']) {
                diag.error(
                    Self::FIELDS.headers,
                    format!("value of `{name}` contains a line break"),
                );
            }
        }
    }
}

/// RFC 9110 token characters.
fn is_header_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b"!#$%&'*+-.^_`|~".contains(&b))
}
