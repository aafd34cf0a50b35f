//! `fingerprint` command.

use anyhow::Result;
use rustc_hash::FxHashSet;

use crate::asset::{AssetCatalog, CatalogRoot};
use crate::cli::FingerprintArgs;
use crate::config::AssetIdConfig;
use crate::publish::Publisher;

/// Print `path -> fingerprinted path`, after reference rewriting.
///
/// The whole catalog is fingerprinted so stylesheet references resolve,
/// even when only a few paths are requested.
pub fn print_fingerprints(config: &AssetIdConfig, args: &FingerprintArgs) -> Result<bool> {
    let publisher = Publisher::new(config)?;
    let mut paths = publisher.catalog().enumerate()?;

    let selected = if args.paths.is_empty() {
        None
    } else {
        let entries = args
            .paths
            .iter()
            .map(|path| CatalogRoot {
                path: path.clone(),
                required: true,
            })
            .collect();
        let requested = AssetCatalog::new(publisher.catalog().root(), entries).enumerate()?;
        paths.extend(requested.iter().cloned());
        paths.sort();
        paths.dedup();
        Some(requested.into_iter().collect::<FxHashSet<_>>())
    };

    let report = publisher.plan(&paths, false);
    for (path, fingerprinted) in report.mapping() {
        if selected.as_ref().is_none_or(|s| s.contains(path)) {
            println!("{path} -> {fingerprinted}");
        }
    }

    Ok(report.is_success())
}
