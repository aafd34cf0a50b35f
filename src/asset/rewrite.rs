//! Stylesheet reference rewriting.
//!
//! Image references inside `url(...)` are replaced by the fingerprinted path
//! of the image *before* the stylesheet itself is hashed, so a changed image
//! also changes every stylesheet that points at it.
//!
//! ```text
//! background: url("../images/bg.png?123") no-repeat;
//!                  ^^^^^^^^^^^^^^^^^^^^ replaced span
//! background: url("/images/bg-id-<hex>.png") no-repeat;
//! ```
//!
//! Only the path and its query string are replaced. Quotes, parentheses,
//! fragments and everything outside the match are kept byte for byte.

use std::ops::Range;

use regex::bytes::Regex;

use crate::core::{AssetPath, FingerprintedPath};

/// A reference found in stylesheet content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    /// Byte span of path + query in the original content.
    pub span: Range<usize>,
    /// The path as written, e.g. `../images/bg.png?123`.
    pub raw: String,
    /// Normalized target, `None` when the path cannot be an asset path.
    pub target: Option<AssetPath>,
}

/// Result of rewriting one stylesheet.
#[derive(Debug, Clone, Default)]
pub struct Rewrite {
    pub content: Vec<u8>,
    /// Number of references substituted.
    pub replaced: usize,
    /// References left unchanged because they could not be resolved.
    pub unresolved: Vec<String>,
}

/// Matcher for `url(...)` references into configured asset directories.
///
/// Matching is ASCII case-insensitive and accepts optional quotes, `./`,
/// `../` (repeated) or `/` prefixes, and a trailing `?query`.
#[derive(Debug, Clone)]
pub struct ReferencePattern {
    /// `None` when no directories are configured.
    regex: Option<Regex>,
    prefix: String,
}

impl ReferencePattern {
    /// Build a pattern for the given directories (e.g. `["images"]`).
    ///
    /// `prefix` is prepended to every substituted path (`"/"` yields
    /// root-relative URLs).
    pub fn new(dirs: &[String], prefix: &str) -> Result<Self, regex::Error> {
        let alternatives: Vec<String> = dirs
            .iter()
            .map(|d| d.trim_matches('/'))
            .filter(|d| !d.is_empty())
            .map(regex::escape)
            .collect();

        let regex = if alternatives.is_empty() {
            None
        } else {
            let dirs = alternatives.join("|");
            Some(Regex::new(&format!(
                r#"(?i-u)url\(\s*["']?(?P<ref>(?P<path>(?:\.{{0,2}}/)*(?:{dirs})/[^"'()\s?#]+)(?:\?[^"'()\s#]*)?)"#
            ))?)
        };

        Ok(Self {
            regex,
            prefix: prefix.to_string(),
        })
    }

    /// All references in `content`, in order of appearance.
    pub fn find(&self, content: &[u8]) -> Vec<Reference> {
        let Some(regex) = &self.regex else {
            return Vec::new();
        };
        regex
            .captures_iter(content)
            .filter_map(|caps| {
                let whole = caps.name("ref")?;
                let path = caps.name("path")?;
                let raw = String::from_utf8_lossy(whole.as_bytes()).into_owned();
                let target = std::str::from_utf8(path.as_bytes())
                    .ok()
                    .and_then(|p| AssetPath::new(strip_relative_markers(p)).ok());
                Some(Reference {
                    span: whole.range(),
                    raw,
                    target,
                })
            })
            .collect()
    }

    /// Rewrite every resolvable reference in `content`.
    ///
    /// Unresolvable references stay as written and are reported in
    /// [`Rewrite::unresolved`].
    pub fn rewrite<F>(&self, content: &[u8], resolve: F) -> Rewrite
    where
        F: Fn(&AssetPath) -> Option<FingerprintedPath>,
    {
        let mut out = Rewrite {
            content: Vec::with_capacity(content.len()),
            ..Rewrite::default()
        };
        let mut last = 0;

        for reference in self.find(content) {
            let resolved = reference.target.as_ref().and_then(|t| resolve(t));
            let Some(fingerprinted) = resolved else {
                out.unresolved.push(reference.raw);
                continue;
            };

            out.content.extend_from_slice(&content[last..reference.span.start]);
            out.content.extend_from_slice(self.prefix.as_bytes());
            out.content.extend_from_slice(fingerprinted.as_str().as_bytes());
            last = reference.span.end;
            out.replaced += 1;
        }

        out.content.extend_from_slice(&content[last..]);
        out
    }
}

/// Strip leading `./`, `../` and `/` markers.
fn strip_relative_markers(path: &str) -> &str {
    let mut rest = path;
    loop {
        let next = rest
            .strip_prefix("../")
            .or_else(|| rest.strip_prefix("./"))
            .or_else(|| rest.strip_prefix('/'));
        match next {
            Some(r) => rest = r,
            None => return rest,
        }
    }
}
