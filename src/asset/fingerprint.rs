//! Content fingerprints for cache busting.
//!
//! The digest of the published bytes is embedded in the file name, so a
//! content change always produces a new public URL:
//!
//! ```text
//! images/logo.png  →  images/logo-id-<32 hex>.png
//! ```

use rustc_hash::FxHashMap;

use crate::core::{AssetPath, FingerprintedPath};
use crate::utils::hash::ContentDigest;

/// Marker inserted between file stem and digest.
const ID_MARKER: &str = "-id-";

/// Compute the fingerprinted path of `path` for the given content.
///
/// Pure: same bytes, same result.
pub fn fingerprint(path: &AssetPath, content: &[u8]) -> FingerprintedPath {
    fingerprint_with_digest(path, ContentDigest::of(content))
}

/// Build the fingerprinted path from an already computed digest.
fn fingerprint_with_digest(path: &AssetPath, digest: ContentDigest) -> FingerprintedPath {
    let (stem, ext) = path.stem_and_ext();
    let mut out = String::with_capacity(path.as_str().len() + ID_MARKER.len() + 32);

    if let Some(dir) = path.dir() {
        out.push_str(dir);
        out.push('/');
    }
    out.push_str(stem);
    out.push_str(ID_MARKER);
    out.push_str(&digest.to_hex());
    if let Some(ext) = ext {
        out.push('.');
        out.push_str(ext);
    }

    FingerprintedPath::from_string(out)
}

/// Read-only `AssetPath → FingerprintedPath` table.
///
/// Filled once from every asset's unrewritten bytes, then shared by all
/// stylesheet rewrites so one image resolves identically everywhere.
#[derive(Debug, Default, Clone)]
pub struct FingerprintTable {
    entries: FxHashMap<AssetPath, FingerprintedPath>,
}

impl FingerprintTable {
    /// Look up by normalized asset path string.
    pub fn resolve(&self, path: &str) -> Option<&FingerprintedPath> {
        self.entries.get(path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

impl FromIterator<(AssetPath, FingerprintedPath)> for FingerprintTable {
    fn from_iter<I: IntoIterator<Item = (AssetPath, FingerprintedPath)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(s: &str) -> AssetPath {
        AssetPath::new(s).unwrap()
    }

    #[test]
    fn test_fingerprint_format() {
        let fp = fingerprint(&path("images/logo.png"), b"fake png");
        let hex = ContentDigest::of(b"fake png").to_hex();
        assert_eq!(fp.as_str(), format!("images/logo-id-{hex}.png"));
    }

    #[test]
    fn test_fingerprint_top_level_and_no_extension() {
        let fp = fingerprint(&path("favicon.ico"), b"icon");
        assert!(fp.as_str().starts_with("favicon-id-"));
        assert!(fp.as_str().ends_with(".ico"));
        assert!(!fp.as_str().contains('/'));

        let fp = fingerprint(&path("fonts/LICENSE"), b"text");
        assert_eq!(
            fp.as_str(),
            format!("fonts/LICENSE-id-{}", ContentDigest::of(b"text"))
        );
    }

    #[test]
    fn test_fingerprint_keeps_inner_dots() {
        let fp = fingerprint(&path("javascripts/app.min.js"), b"1");
        assert!(fp.as_str().starts_with("javascripts/app.min-id-"));
        assert!(fp.as_str().ends_with(".js"));
    }

    #[test]
    fn test_fingerprint_deterministic() {
        let p = path("stylesheets/app.css");
        let a = fingerprint(&p, b"body { color: red; }");
        let b = fingerprint(&p, b"body { color: red; }");
        assert_eq!(a, b);

        // Same across "restarts": fixed vector
        let empty = fingerprint(&path("a.txt"), b"");
        assert_eq!(empty.as_str(), "a-id-af1349b9f5f9a1a6a0404dea36dcc949.txt");
    }

    #[test]
    fn test_fingerprint_changes_with_content() {
        let p = path("stylesheets/app.css");
        let a = fingerprint(&p, b"body { color: red; }");
        let b = fingerprint(&p, b"body { color: blue; }");
        assert_ne!(a, b);
    }

    #[test]
    fn test_table_resolve() {
        let table: FingerprintTable = [(
            path("images/bg.png"),
            fingerprint(&path("images/bg.png"), b"bg"),
        )]
        .into_iter()
        .collect();

        assert_eq!(table.len(), 1);
        assert!(table.resolve("images/bg.png").is_some());
        assert!(table.resolve("images/missing.png").is_none());
    }
}
