//! `[assets]` section configuration.
//!
//! Describes where assets live and which of them get references rewritten.
//!
//! # Example
//!
//! ```toml
//! [assets]
//! root = "public"                     # Public root; asset paths are relative to it
//! paths = ["favicon.ico", "images"]   # Listed entries must exist
//! rewrite_types = ["text/css"]        # Content types whose url() refs are rewritten
//! reference_dirs = ["images"]         # Directories a url() ref may point into
//! reference_prefix = "/"              # Prepended to rewritten references
//! ```
//!
//! Leaving out `paths` selects `favicon.ico`, `images`, `javascripts` and
//! `stylesheets`, each skipped when missing.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};
use crate::core::AssetPath;

/// Entries cataloged when `paths` is not set.
pub const DEFAULT_PATHS: &[&str] = &["favicon.ico", "images", "javascripts", "stylesheets"];

/// Field paths used in diagnostics.
pub struct AssetsFields {
    pub root: FieldPath,
    pub paths: FieldPath,
    pub rewrite_types: FieldPath,
    pub reference_dirs: FieldPath,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetsConfig {
    /// Public root directory. Relative to the config file after loading.
    pub root: PathBuf,

    /// Explicit entries (files or directories) under `root`.
    pub paths: Option<Vec<String>>,

    /// Content types whose references are rewritten.
    pub rewrite_types: Vec<String>,

    /// Directories recognised as reference targets.
    pub reference_dirs: Vec<String>,

    /// Prefix of every rewritten reference.
    pub reference_prefix: String,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("public"),
            paths: None,
            rewrite_types: vec!["text/css".to_string()],
            reference_dirs: vec!["images".to_string()],
            reference_prefix: "/".to_string(),
        }
    }
}

impl AssetsConfig {
    pub const FIELDS: AssetsFields = AssetsFields {
        root: FieldPath::new("assets.root"),
        paths: FieldPath::new("assets.paths"),
        rewrite_types: FieldPath::new("assets.rewrite_types"),
        reference_dirs: FieldPath::new("assets.reference_dirs"),
    };

    /// Effective catalog entries.
    pub fn entry_paths(&self) -> Vec<String> {
        match &self.paths {
            Some(paths) => paths.clone(),
            None => DEFAULT_PATHS.iter().map(|p| (*p).to_string()).collect(),
        }
    }

    /// Resolve `root` against the project root.
    pub fn normalize(&mut self, project_root: &Path) {
        if self.root.is_relative() {
            self.root = project_root.join(&self.root);
        }
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.root.as_os_str().is_empty() {
            diag.error(Self::FIELDS.root, "must not be empty");
        }

        if let Some(paths) = &self.paths {
            if paths.is_empty() {
                diag.error_with_hint(
                    Self::FIELDS.paths,
                    "no asset paths listed",
                    "remove `paths` to use the defaults",
                );
            }
            for path in paths {
                if let Err(e) = AssetPath::new(path) {
                    diag.error(Self::FIELDS.paths, format!("`{path}`: {e}"));
                }
            }
        }

        for mime in &self.rewrite_types {
            if !mime.contains('/') {
                diag.error_with_hint(
                    Self::FIELDS.rewrite_types,
                    format!("`{mime}` is not a content type"),
                    "expected `type/subtype`, e.g. `text/css`",
                );
            }
        }

        for dir in &self.reference_dirs {
            if dir.trim_matches('/').is_empty() {
                diag.error(Self::FIELDS.reference_dirs, "directory name must not be empty");
            } else if dir.split('/').any(|seg| seg == "..") {
                diag.error(
                    Self::FIELDS.reference_dirs,
                    format!("`{dir}` must stay inside the public root"),
                );
            }
        }
    }
}
