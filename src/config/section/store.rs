//! `[store]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [store]
//! endpoint = "https://s3.example.com"
//! bucket = "my-assets"
//! token_path = "~/.asset-id-token"    # Optional; ASSET_ID_TOKEN takes precedence
//! timeout_secs = 60
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, ConfigError, FieldPath};

/// Environment variable holding the store token.
pub const TOKEN_ENV: &str = "ASSET_ID_TOKEN";

pub struct StoreFields {
    pub endpoint: FieldPath,
    pub bucket: FieldPath,
    pub token_path: FieldPath,
    pub timeout_secs: FieldPath,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Base URL of the object store.
    pub endpoint: Option<String>,

    pub bucket: String,

    /// File containing the bearer token.
    ///
    /// Keep it outside the repository (e.g. `~/.asset-id-token`).
    pub token_path: Option<PathBuf>,

    /// Per-request timeout.
    pub timeout_secs: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            bucket: String::new(),
            token_path: None,
            timeout_secs: 60,
        }
    }
}

impl StoreConfig {
    pub const FIELDS: StoreFields = StoreFields {
        endpoint: FieldPath::new("store.endpoint"),
        bucket: FieldPath::new("store.bucket"),
        token_path: FieldPath::new("store.token_path"),
        timeout_secs: FieldPath::new("store.timeout_secs"),
    };

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Expand `~` and resolve `token_path` against the project root.
    pub fn normalize(&mut self, project_root: &Path) {
        if let Some(path) = self.token_path.take() {
            let expanded = shellexpand::tilde(&path.to_string_lossy()).into_owned();
            let path = PathBuf::from(expanded);
            self.token_path = Some(if path.is_relative() {
                project_root.join(path)
            } else {
                path
            });
        }
    }

    /// Bearer token from the environment or `token_path`.
    ///
    /// Only a live publish reads the token, so a missing file surfaces here
    /// and not during validation.
    pub fn token(&self) -> Result<Option<String>, ConfigError> {
        if let Ok(token) = std::env::var(TOKEN_ENV)
            && !token.trim().is_empty()
        {
            return Ok(Some(token.trim().to_string()));
        }
        let Some(path) = &self.token_path else {
            return Ok(None);
        };
        let token = std::fs::read_to_string(path).map_err(|e| {
            ConfigError::Validation(format!(
                "{}: cannot read `{}`: {e}",
                Self::FIELDS.token_path.as_str(),
                path.display()
            ))
        })?;
        let token = token.trim();
        Ok((!token.is_empty()).then(|| token.to_string()))
    }

    /// Endpoint and bucket, required before talking to the store.
    pub fn require_target(&self) -> Result<(&str, &str), ConfigError> {
        let endpoint = self.endpoint.as_deref().ok_or_else(|| {
            ConfigError::Validation(format!("{} is required to publish", Self::FIELDS.endpoint.as_str()))
        })?;
        if self.bucket.is_empty() {
            return Err(ConfigError::Validation(format!(
                "{} is required to publish",
                Self::FIELDS.bucket.as_str()
            )));
        }
        Ok((endpoint, &self.bucket))
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if let Some(endpoint) = &self.endpoint {
            match url::Url::parse(endpoint) {
                Ok(url) if matches!(url.scheme(), "http" | "https") => {}
                Ok(url) => diag.error(
                    Self::FIELDS.endpoint,
                    format!("unsupported scheme `{}`", url.scheme()),
                ),
                Err(e) => diag.error_with_hint(
                    Self::FIELDS.endpoint,
                    format!("`{endpoint}` is not a valid URL: {e}"),
                    "use e.g. https://s3.example.com",
                ),
            }
        }

        if self.bucket.contains('/') {
            diag.error(Self::FIELDS.bucket, "must not contain `/`");
        }

        if self.timeout_secs == 0 {
            diag.error(Self::FIELDS.timeout_secs, "must be at least 1");
        }
    }
}
