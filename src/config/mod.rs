//! Configuration management for `asset_id.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Configuration section definitions
//! │   ├── assets     # [assets]
//! │   ├── publish    # [publish]
//! │   └── store      # [store]
//! ├── types/         # Utility types
//! │   ├── error      # ConfigError, ConfigDiagnostics
//! │   └── field      # FieldPath
//! └── mod.rs         # AssetIdConfig (this file)
//! ```
//!
//! # Sections
//!
//! | Section      | Purpose                                           |
//! |--------------|---------------------------------------------------|
//! | `[assets]`   | Public root, catalog entries, reference rewriting |
//! | `[publish]`  | Workers, key prefix, cache headers                |
//! | `[store]`    | Object store endpoint, bucket, token, timeout     |
//!
//! The loaded config is a plain value handed to the publisher. There is no
//! global config handle.

pub mod section;
pub mod types;
mod util;

use util::find_config_file;

// Re-export from section/
pub use section::{AssetsConfig, PublishConfig, StoreConfig};

// Re-export from types/
pub use types::{ConfigDiagnostics, ConfigError, FieldPath};

use crate::cli::PublishArgs;
use crate::{debug, log};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Default config file name, searched upward from the current directory.
pub const CONFIG_FILE: &str = "asset_id.toml";

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing asset_id.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssetIdConfig {
    /// Absolute path to the config file, empty when running on defaults
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Project root directory - parent of config file
    #[serde(skip)]
    pub root: PathBuf,

    #[serde(default)]
    pub assets: AssetsConfig,

    #[serde(default)]
    pub publish: PublishConfig,

    #[serde(default)]
    pub store: StoreConfig,
}

impl AssetIdConfig {
    /// Load configuration.
    ///
    /// An explicit path must exist. Otherwise `asset_id.toml` is searched
    /// upward from cwd; when none is found, defaults rooted at cwd are used.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let cwd = std::env::current_dir().map_err(|e| ConfigError::Io(PathBuf::from("."), e))?;

        let found = match explicit {
            Some(path) => {
                let path = cwd.join(path);
                if !path.is_file() {
                    return Err(ConfigError::Io(
                        path,
                        std::io::Error::new(std::io::ErrorKind::NotFound, "config file not found"),
                    ));
                }
                Some(path)
            }
            None => find_config_file(Path::new(CONFIG_FILE), &cwd),
        };

        let mut config = match &found {
            Some(path) => Self::from_path(path)?,
            None => {
                debug!("config"; "no {} found, using defaults", CONFIG_FILE);
                Self::default()
            }
        };

        let root = found
            .as_deref()
            .and_then(Path::parent)
            .map_or(cwd, Path::to_path_buf);
        config.config_path = found.unwrap_or_default();
        config.finalize(&root);
        config.validate()?;

        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    /// Print warning about unknown fields.
    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring:", display_path);
        for field in fields {
            eprintln!("- {}", field);
        }
    }

    /// Resolve relative paths against the project root.
    fn finalize(&mut self, root: &Path) {
        self.root = root.to_path_buf();
        self.assets.normalize(root);
        self.store.normalize(root);
    }

    /// Apply `publish` command flags on top of the file values.
    pub fn apply_publish_args(&mut self, args: &PublishArgs) {
        Self::update_option(&mut self.publish.jobs, args.jobs.map(Some).as_ref());
        if args.skip_existing {
            self.publish.skip_existing = true;
        }
    }

    /// Update config option if CLI value is provided.
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    /// Validate every section, reporting all errors at once.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut diag = ConfigDiagnostics::new();

        self.assets.validate(&mut diag);
        self.publish.validate(&mut diag);
        self.store.validate(&mut diag);

        diag.into_result().map_err(ConfigError::Diagnostics)
    }
}

// ============================================================================
// Test Helpers (available to all modules via `use crate::config::test_*`)
// ============================================================================

/// Parse config, panicking on unknown fields (to catch config typos in tests).
#[cfg(test)]
pub fn test_parse_config(content: &str) -> AssetIdConfig {
    let (parsed, ignored) = AssetIdConfig::parse_with_ignored(content).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

// ============================================================================
// tests
// ============================================================================
