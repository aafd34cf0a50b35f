//! Asset cataloging, fingerprinting and reference rewriting.

mod fingerprint;
mod headers;
mod rewrite;
mod scan;

// Fingerprints (pure)
pub use fingerprint::{FingerprintTable, fingerprint};

// Catalog (reads the filesystem)
pub use scan::{AssetCatalog, CatalogRoot};

// Reference rewriting (pure)
pub use rewrite::ReferencePattern;

// Headers
pub use headers::{HeaderPolicy, HeaderSet};
