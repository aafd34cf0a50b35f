//! Asset catalog: enumerate publishable files under the public root.
//!
//! Each configured entry is a root-relative subpath:
//! - a file is included as-is (e.g. `favicon.ico`)
//! - a directory is walked recursively, every file beneath it included
//!
//! ```text
//! public/
//! ├── favicon.ico          -> favicon.ico
//! ├── images/
//! │   ├── logo.png         -> images/logo.png
//! │   └── icons/
//! │       └── home.svg     -> images/icons/home.svg
//! └── stylesheets/
//!     └── app.css          -> stylesheets/app.css
//! ```
//!
//! # Pure Function
//!
//! Enumeration only reads the filesystem. Calling it twice on an unchanged
//! tree yields the same sorted list.

use std::path::{Path, PathBuf};

use rustc_hash::FxHashSet;

use crate::config::{AssetsConfig, ConfigError};
use crate::core::AssetPath;
use crate::debug;

/// One configured root entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogRoot {
    /// Root-relative file or directory.
    pub path: String,
    /// Missing entries are an error instead of being skipped.
    pub required: bool,
}

/// Enumerates asset files under a public root.
#[derive(Debug, Clone)]
pub struct AssetCatalog {
    root: PathBuf,
    entries: Vec<CatalogRoot>,
}

impl AssetCatalog {
    pub fn new(root: impl Into<PathBuf>, entries: Vec<CatalogRoot>) -> Self {
        Self {
            root: root.into(),
            entries,
        }
    }

    /// Catalog described by the `[assets]` section.
    ///
    /// Default paths are optional; explicitly listed paths are required.
    pub fn from_config(config: &AssetsConfig) -> Self {
        let required = config.paths.is_some();
        let entries = config
            .entry_paths()
            .iter()
            .map(|path| CatalogRoot {
                path: path.clone(),
                required,
            })
            .collect();
        Self::new(config.root.clone(), entries)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute location of an asset on disk.
    pub fn absolute(&self, path: &AssetPath) -> PathBuf {
        self.root.join(path.as_str())
    }

    /// List every file reachable from the configured entries.
    ///
    /// Sorted and de-duplicated. Symlinked directories are followed unless
    /// they point back at a directory on the current walk, so link cycles
    /// terminate.
    pub fn enumerate(&self) -> Result<Vec<AssetPath>, ConfigError> {
        let mut results = Vec::new();
        let mut ancestors = FxHashSet::default();

        for entry in &self.entries {
            let rel = AssetPath::new(&entry.path)
                .map_err(|e| ConfigError::Validation(format!("assets.paths: {e}")))?;
            let abs = self.absolute(&rel);

            if !abs.exists() {
                if entry.required {
                    return Err(ConfigError::MissingRoot(abs));
                }
                debug!("catalog"; "skipping missing default root `{}`", rel);
                continue;
            }

            if abs.is_dir() {
                scan_recursive(&mut results, &abs, &self.root, &mut ancestors);
            } else {
                results.push(rel);
            }
        }

        results.sort();
        results.dedup();
        Ok(results)
    }
}

/// Recursive helper for walking one directory.
///
/// `ancestors` holds the canonical directories between the entry root and
/// `dir`. It is restored on return, so separate branches may reach the
/// same target.
fn scan_recursive(
    results: &mut Vec<AssetPath>,
    dir: &Path,
    root: &Path,
    ancestors: &mut FxHashSet<PathBuf>,
) {
    let Ok(canonical) = dir.canonicalize() else {
        return;
    };
    if !ancestors.insert(canonical.clone()) {
        debug!("catalog"; "symlink cycle at `{}`, skipping", dir.display());
        return;
    }
    walk_entries(results, dir, root, ancestors);
    ancestors.remove(&canonical);
}

fn walk_entries(
    results: &mut Vec<AssetPath>,
    dir: &Path,
    root: &Path,
    ancestors: &mut FxHashSet<PathBuf>,
) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        debug!("catalog"; "cannot read directory `{}`", dir.display());
        return;
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            scan_recursive(results, &path, root, ancestors);
            continue;
        }

        let rel = path.strip_prefix(root).unwrap_or(&path);
        match AssetPath::from_relative(rel) {
            Ok(asset) => results.push(asset),
            Err(e) => debug!("catalog"; "skipping `{}`: {}", path.display(), e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn optional(paths: &[&str]) -> Vec<CatalogRoot> {
        paths
            .iter()
            .map(|p| CatalogRoot {
                path: (*p).to_string(),
                required: false,
            })
            .collect()
    }

    fn site() -> TempDir {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("images/icons")).unwrap();
        fs::create_dir_all(root.join("stylesheets")).unwrap();
        fs::write(root.join("favicon.ico"), "icon").unwrap();
        fs::write(root.join("images/logo.png"), "fake png").unwrap();
        fs::write(root.join("images/icons/home.svg"), "<svg/>").unwrap();
        fs::write(root.join("stylesheets/app.css"), "body {}").unwrap();
        fs::write(root.join("robots.txt"), "User-agent: *").unwrap();
        dir
    }

    #[test]
    fn test_enumerate_files_and_dirs() {
        let dir = site();
        let catalog = AssetCatalog::new(
            dir.path(),
            optional(&["favicon.ico", "images", "javascripts", "stylesheets"]),
        );

        let assets = catalog.enumerate().unwrap();
        assert_eq!(
            assets,
            vec![
                "favicon.ico",
                "images/icons/home.svg",
                "images/logo.png",
                "stylesheets/app.css",
            ]
        );
    }

    #[test]
    fn test_enumerate_is_restartable() {
        let dir = site();
        let catalog = AssetCatalog::new(dir.path(), optional(&["favicon.ico", "images"]));

        let first = catalog.enumerate().unwrap();
        let second = catalog.enumerate().unwrap();
        assert_eq!(first, second);

        // Reflects current disk state
        fs::write(dir.path().join("images/new.gif"), "gif").unwrap();
        let third = catalog.enumerate().unwrap();
        assert_eq!(third.len(), first.len() + 1);
        assert!(third.iter().any(|a| *a == "images/new.gif"));
    }

    #[test]
    fn test_overlapping_roots_listed_once() {
        let dir = site();
        let catalog = AssetCatalog::new(dir.path(), optional(&["images", "images/icons"]));

        let assets = catalog.enumerate().unwrap();
        assert_eq!(assets, vec!["images/icons/home.svg", "images/logo.png"]);
    }

    #[test]
    fn test_missing_default_root_skipped() {
        let dir = site();
        let catalog = AssetCatalog::new(dir.path(), optional(&["javascripts"]));
        assert!(catalog.enumerate().unwrap().is_empty());
    }

    #[test]
    fn test_missing_required_root_is_config_error() {
        let dir = site();
        let catalog = AssetCatalog::new(
            dir.path(),
            vec![CatalogRoot {
                path: "javascripts".into(),
                required: true,
            }],
        );
        assert!(matches!(
            catalog.enumerate(),
            Err(ConfigError::MissingRoot(_))
        ));
    }

    #[test]
    fn test_root_escaping_public_dir_rejected() {
        let dir = site();
        let catalog = AssetCatalog::new(dir.path(), optional(&["../etc"]));
        assert!(matches!(
            catalog.enumerate(),
            Err(ConfigError::Validation(_))
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_cycle_terminates() {
        let dir = site();
        std::os::unix::fs::symlink(
            dir.path().join("images"),
            dir.path().join("images/icons/loop"),
        )
        .unwrap();

        let catalog = AssetCatalog::new(dir.path(), optional(&["images"]));
        let assets = catalog.enumerate().unwrap();

        assert_eq!(assets, vec!["images/icons/home.svg", "images/logo.png"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_directory_followed() {
        let dir = site();
        let shared = TempDir::new().unwrap();
        fs::write(shared.path().join("shared.png"), "png").unwrap();
        std::os::unix::fs::symlink(shared.path(), dir.path().join("images/shared")).unwrap();

        let catalog = AssetCatalog::new(dir.path(), optional(&["images"]));
        let assets = catalog.enumerate().unwrap();

        assert!(assets.iter().any(|a| *a == "images/shared/shared.png"));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_into_later_root_keeps_that_root() {
        let dir = site();
        std::os::unix::fs::symlink(
            dir.path().join("stylesheets"),
            dir.path().join("images/css"),
        )
        .unwrap();

        let entries = vec![
            CatalogRoot {
                path: "images".into(),
                required: true,
            },
            CatalogRoot {
                path: "stylesheets".into(),
                required: true,
            },
        ];
        let assets = AssetCatalog::new(dir.path(), entries).enumerate().unwrap();

        assert_eq!(
            assets,
            vec![
                "images/css/app.css",
                "images/icons/home.svg",
                "images/logo.png",
                "stylesheets/app.css",
            ]
        );
    }
}
