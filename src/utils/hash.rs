//! Content digests for asset fingerprints.
//!
//! A digest is the first 128 bits of the blake3 extended output over the
//! exact bytes that get published. Rendered as 32 lowercase hex chars.
//!
//! # Usage
//!
//! ```ignore
//! use crate::utils::hash::ContentDigest;
//!
//! let d = ContentDigest::of(b"body {}");
//! assert_eq!(d.to_hex().len(), 32);
//! ```

use std::fmt;

/// Digest width in bytes.
pub const DIGEST_LEN: usize = 16;

/// A 128-bit content digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContentDigest([u8; DIGEST_LEN]);

impl ContentDigest {
    /// Hash a byte slice.
    pub fn of<T: AsRef<[u8]> + ?Sized>(data: &T) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(data.as_ref());
        let mut out = [0u8; DIGEST_LEN];
        hasher.finalize_xof().fill(&mut out);
        Self(out)
    }

    /// Lowercase hex rendering.
    pub fn to_hex(self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustc_hash::FxHashSet;

    #[test]
    fn test_digest_is_32_lowercase_hex() {
        let hex = ContentDigest::of("body { color: red; }").to_hex();
        assert_eq!(hex.len(), 32);
        assert!(
            hex.chars()
                .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
        );
    }

    #[test]
    fn test_digest_known_vector() {
        // blake3("") begins with af1349b9f5f9a1a6a0404dea36dcc949
        assert_eq!(
            ContentDigest::of(b"").to_hex(),
            "af1349b9f5f9a1a6a0404dea36dcc949"
        );
    }

    #[test]
    fn test_digest_one_byte_difference() {
        assert_ne!(ContentDigest::of(b"abc"), ContentDigest::of(b"abd"));
        assert_ne!(ContentDigest::of(b"abc"), ContentDigest::of(b"abc\n"));
    }

    #[test]
    fn test_digest_no_collisions_in_random_sample() {
        // Deterministic pseudo-random inputs of varying length.
        let mut stream = blake3::Hasher::new()
            .update(b"asset-id collision sample")
            .finalize_xof();
        let mut seen = FxHashSet::default();
        let mut inputs = FxHashSet::default();

        for i in 0..20_000usize {
            let mut buf = vec![0u8; 1 + i % 97];
            stream.fill(&mut buf);
            if !inputs.insert(buf.clone()) {
                continue;
            }
            assert!(seen.insert(ContentDigest::of(&buf)), "collision at {i}");
        }
        assert_eq!(seen.len(), inputs.len());
    }
}
