//! Fingerprint-and-upload pipeline.
//!
//! # Two Passes
//!
//! ```text
//! catalog ─► pass 1: read + fingerprint raw bytes ─► FingerprintTable
//!                                                        │ (read-only)
//!            pass 2: rewrite css ─► fingerprint ─► headers ─► put
//! ```
//!
//! Pass 1 is complete before pass 2 starts, so every stylesheet sees the
//! same table no matter how the worker pool schedules assets. Within a pass
//! assets run in parallel on a dedicated rayon pool.
//!
//! Per-asset failures (read, upload, interrupt) are recorded in the report
//! and never stop the other assets. Only configuration and connectivity
//! errors abort a run.

mod error;
mod report;

pub use error::{AssetError, PublishError};
pub use report::{AssetOutcome, Outcome, PublishReport, UnresolvedReference};

use std::borrow::Cow;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use rayon::prelude::*;

use crate::asset::{AssetCatalog, FingerprintTable, HeaderPolicy, ReferencePattern, fingerprint};
use crate::config::{AssetIdConfig, ConfigError};
use crate::core::{AssetPath, shutdown_flag};
use crate::logger::ProgressLine;
use crate::store::{ObjectStore, StoreConnector, StoreError};
use crate::utils::mime;
use crate::utils::plural::plural_count;
use crate::{debug, log};

/// Per-run switches.
#[derive(Debug, Clone, Copy, Default)]
pub struct PublishOptions {
    /// Compute everything, call the store never.
    pub dry_run: bool,
    /// Trace `path -> fingerprinted path` for every asset.
    pub debug: bool,
}

/// An asset loaded in pass 1.
struct Loaded {
    path: AssetPath,
    abs: PathBuf,
    content: std::io::Result<Vec<u8>>,
}

/// Orchestrates one publish run over a loaded configuration.
pub struct Publisher<'a> {
    config: &'a AssetIdConfig,
    catalog: AssetCatalog,
    pattern: ReferencePattern,
    headers: HeaderPolicy,
    pool: rayon::ThreadPool,
    shutdown: Arc<AtomicBool>,
}

impl<'a> Publisher<'a> {
    pub fn new(config: &'a AssetIdConfig) -> Result<Self, PublishError> {
        let assets = &config.assets;
        let pattern = ReferencePattern::new(&assets.reference_dirs, &assets.reference_prefix)
            .map_err(|e| ConfigError::Validation(format!("assets.reference_dirs: {e}")))?;

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.publish.worker_count())
            .thread_name(|i| format!("asset-id-{i}"))
            .build()
            .map_err(|e| ConfigError::Validation(format!("publish.jobs: {e}")))?;

        Ok(Self {
            config,
            catalog: AssetCatalog::from_config(assets),
            pattern,
            headers: HeaderPolicy::from_config(&config.publish),
            pool,
            shutdown: shutdown_flag(),
        })
    }

    /// Use `flag` instead of the process-wide Ctrl+C flag.
    #[cfg(test)]
    pub fn with_shutdown(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown = flag;
        self
    }

    pub fn catalog(&self) -> &AssetCatalog {
        &self.catalog
    }

    /// Publish every cataloged asset.
    pub fn publish<C: StoreConnector>(
        &self,
        connector: &C,
        options: PublishOptions,
    ) -> Result<PublishReport, PublishError> {
        let paths = self.catalog.enumerate()?;
        self.publish_paths(connector, &paths, options)
    }

    /// Publish an explicit list of assets.
    ///
    /// Only these assets are fingerprinted, so stylesheet references resolve
    /// against this list alone.
    pub fn publish_paths<C: StoreConnector>(
        &self,
        connector: &C,
        paths: &[AssetPath],
        options: PublishOptions,
    ) -> Result<PublishReport, PublishError> {
        if options.dry_run {
            return Ok(self.run(paths, options, None));
        }
        let store = connector.connect().map_err(PublishError::Connectivity)?;
        Ok(self.run(paths, options, Some(&store as &dyn ObjectStore)))
    }

    /// Dry run without any store at hand.
    pub fn plan(&self, paths: &[AssetPath], debug: bool) -> PublishReport {
        let options = PublishOptions {
            dry_run: true,
            debug,
        };
        self.run(paths, options, None)
    }

    fn run(
        &self,
        paths: &[AssetPath],
        options: PublishOptions,
        store: Option<&dyn ObjectStore>,
    ) -> PublishReport {
        let mode = if options.dry_run { "dry-run" } else { "publish" };
        log!(mode; "{} from {}", plural_count(paths.len(), "asset"), self.catalog.root().display());

        // Pass 1: load and fingerprint unmodified bytes
        let loaded: Vec<Loaded> = self.pool.install(|| {
            paths
                .par_iter()
                .map(|path| {
                    let abs = self.catalog.absolute(path);
                    let content = std::fs::read(&abs);
                    Loaded {
                        path: path.clone(),
                        abs,
                        content,
                    }
                })
                .collect()
        });
        let table: FingerprintTable = loaded
            .iter()
            .filter_map(|a| {
                let content = a.content.as_ref().ok()?;
                Some((a.path.clone(), fingerprint(&a.path, content)))
            })
            .collect();
        debug!("publish"; "fingerprinted {} of {} assets", table.len(), loaded.len());

        // Pass 2: rewrite, fingerprint, upload
        let progress = (store.is_some() && !options.debug && std::io::stdout().is_terminal())
            .then(|| ProgressLine::new("upload", &[("assets", loaded.len())]));

        let results: Vec<(AssetOutcome, Vec<UnresolvedReference>)> = self.pool.install(|| {
            loaded
                .into_par_iter()
                .map(|asset| {
                    let result = self.process(asset, &table, options, store);
                    if let Some(progress) = &progress {
                        progress.inc("assets");
                    }
                    result
                })
                .collect()
        });

        if let Some(progress) = progress {
            progress.finish();
        }

        let mut outcomes = Vec::with_capacity(results.len());
        let mut warnings = Vec::new();
        for (outcome, unresolved) in results {
            outcomes.push(outcome);
            warnings.extend(unresolved);
        }

        for warning in &warnings {
            log!("warning"; "{}", warning);
        }
        let report = PublishReport::new(outcomes, warnings);
        for (path, err) in report.failures() {
            log!("error"; "{}: {}", path, error_chain(err));
        }
        report
    }

    /// Pass 2 for one asset.
    fn process(
        &self,
        asset: Loaded,
        table: &FingerprintTable,
        options: PublishOptions,
        store: Option<&dyn ObjectStore>,
    ) -> (AssetOutcome, Vec<UnresolvedReference>) {
        let Loaded { path, abs, content } = asset;

        let failed = |path: AssetPath, err: AssetError| AssetOutcome {
            path,
            fingerprinted: None,
            key: None,
            outcome: Outcome::Failed(err),
        };

        if self.shutdown.load(Ordering::Relaxed) {
            return (failed(path, AssetError::Interrupted), Vec::new());
        }

        let content = match content {
            Ok(content) => content,
            Err(source) => {
                return (failed(path, AssetError::Read { path: abs, source }), Vec::new());
            }
        };

        let mime = mime::from_path(path.as_str());
        let mut unresolved = Vec::new();
        let body: Cow<'_, [u8]> = if mime::matches_any(mime, &self.config.assets.rewrite_types) {
            let rewrite = self
                .pattern
                .rewrite(&content, |target| table.resolve(target.as_str()).cloned());
            if rewrite.replaced > 0 {
                debug!("rewrite"; "{}: {} references", path, rewrite.replaced);
            }
            unresolved = rewrite
                .unresolved
                .into_iter()
                .map(|reference| UnresolvedReference {
                    asset: path.clone(),
                    reference,
                })
                .collect();
            Cow::Owned(rewrite.content)
        } else {
            Cow::Borrowed(content.as_slice())
        };

        let fingerprinted = fingerprint(&path, &body);
        let key = fingerprinted.key_with_prefix(&self.config.publish.key_prefix);
        if options.debug {
            log!("debug"; "{} -> {}", path, fingerprinted);
        }

        let outcome = match store {
            None => Outcome::DryRun,
            Some(store) => self.upload(store, &key, &body, mime),
        };

        let done = AssetOutcome {
            path,
            fingerprinted: Some(fingerprinted),
            key: Some(key),
            outcome,
        };
        (done, unresolved)
    }

    fn upload(&self, store: &dyn ObjectStore, key: &str, body: &[u8], mime: &str) -> Outcome {
        let upload_error = |source: StoreError| {
            Outcome::Failed(AssetError::Upload {
                key: key.to_owned(),
                source,
            })
        };

        if self.config.publish.skip_existing {
            match store.exists(key) {
                Ok(true) => {
                    debug!("upload"; "{} already present", key);
                    return Outcome::AlreadyPresent;
                }
                Ok(false) => {}
                Err(e) => return upload_error(e),
            }
        }

        let headers = self.headers.for_mime(mime);
        match store.put(key, body, &headers) {
            Ok(()) => {
                debug!("upload"; "{}", key);
                Outcome::Uploaded
            }
            Err(e) => upload_error(e),
        }
    }
}

/// `error: cause: cause` on one line.
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut out = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        out.push_str(": ");
        out.push_str(&cause.to_string());
        source = cause.source();
    }
    out
}
