//! Asset path types for type-safe key handling.
//!
//! - `AssetPath`: where a file lives, relative to the public root
//! - `FingerprintedPath`: where its content-addressed copy is published

use std::borrow::Borrow;
use std::path::{Component, Path};
use std::sync::Arc;

use thiserror::Error;

/// Rejected asset path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("empty asset path")]
    Empty,
    #[error("asset path `{0}` escapes the public root")]
    ParentDir(String),
    #[error("asset path `{0}` is not valid UTF-8")]
    NonUtf8(String),
}

/// Path of an asset relative to the public root.
///
/// Invariants:
/// - Never empty
/// - Forward-slash separated, no leading `/` or `./`
/// - No `.` or `..` segments
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AssetPath(Arc<str>);

impl AssetPath {
    /// Normalize a user or stylesheet supplied path.
    ///
    /// `./images//logo.png` and `/images/logo.png` both become `images/logo.png`.
    pub fn new(raw: &str) -> Result<Self, PathError> {
        let unified = raw.replace('\\', "/");
        let mut segments = Vec::new();
        for seg in unified.split('/') {
            match seg {
                "" | "." => {}
                ".." => return Err(PathError::ParentDir(raw.to_string())),
                s => segments.push(s),
            }
        }
        if segments.is_empty() {
            return Err(PathError::Empty);
        }
        Ok(Self(Arc::from(segments.join("/"))))
    }

    /// Build from a filesystem path already made relative to the root.
    pub fn from_relative(rel: &Path) -> Result<Self, PathError> {
        let mut segments = Vec::new();
        for comp in rel.components() {
            match comp {
                Component::Normal(s) => segments.push(
                    s.to_str()
                        .ok_or_else(|| PathError::NonUtf8(rel.display().to_string()))?,
                ),
                Component::CurDir => {}
                Component::ParentDir => {
                    return Err(PathError::ParentDir(rel.display().to_string()));
                }
                Component::RootDir | Component::Prefix(_) => {}
            }
        }
        Self::new(&segments.join("/"))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Directory part, `None` for top-level files.
    pub fn dir(&self) -> Option<&str> {
        self.0.rsplit_once('/').map(|(dir, _)| dir)
    }

    /// Final segment.
    pub fn file_name(&self) -> &str {
        self.0.rsplit_once('/').map_or(&*self.0, |(_, name)| name)
    }

    /// Split the file name at its last dot.
    ///
    /// Dot-files (`.htaccess`) and names without a dot have no extension.
    pub fn stem_and_ext(&self) -> (&str, Option<&str>) {
        let name = self.file_name();
        match name.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() => (stem, Some(ext)),
            _ => (name, None),
        }
    }
}

impl std::fmt::Display for AssetPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for AssetPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for AssetPath {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<&str> for AssetPath {
    fn eq(&self, other: &&str) -> bool {
        &*self.0 == *other
    }
}

/// Content-addressed path: `dir/base-id-<digest>.ext`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FingerprintedPath(Arc<str>);

impl FingerprintedPath {
    pub(crate) fn from_string(s: String) -> Self {
        Self(Arc::from(s))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Store key with an optional prefix (`"static/"` → `static/images/...`).
    pub fn key_with_prefix(&self, prefix: &str) -> String {
        let prefix = prefix.trim_matches('/');
        if prefix.is_empty() {
            self.0.to_string()
        } else {
            format!("{prefix}/{}", self.0)
        }
    }
}

impl std::fmt::Display for FingerprintedPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for FingerprintedPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<&str> for FingerprintedPath {
    fn eq(&self, other: &&str) -> bool {
        &*self.0 == *other
    }
}
