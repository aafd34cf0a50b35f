//! Per-run publish report.

use std::fmt;

use super::AssetError;
use crate::core::{AssetPath, FingerprintedPath};

/// What happened to one asset.
#[derive(Debug)]
pub enum Outcome {
    Uploaded,
    /// `skip_existing` found the key already stored.
    AlreadyPresent,
    /// Computed but not sent.
    DryRun,
    Failed(AssetError),
}

impl Outcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

/// Result for one asset.
#[derive(Debug)]
pub struct AssetOutcome {
    pub path: AssetPath,
    /// `None` when the asset could not be read or was never started.
    pub fingerprinted: Option<FingerprintedPath>,
    /// Store key (fingerprinted path plus key prefix).
    pub key: Option<String>,
    pub outcome: Outcome,
}

/// A stylesheet reference that resolved to no cataloged asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedReference {
    pub asset: AssetPath,
    pub reference: String,
}

impl fmt::Display for UnresolvedReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: unresolved reference `{}`", self.asset, self.reference)
    }
}

/// Outcome of a publish run.
///
/// `outcomes` is sorted by asset path.
#[derive(Debug, Default)]
pub struct PublishReport {
    pub outcomes: Vec<AssetOutcome>,
    pub warnings: Vec<UnresolvedReference>,
}

impl PublishReport {
    pub(super) fn new(
        mut outcomes: Vec<AssetOutcome>,
        mut warnings: Vec<UnresolvedReference>,
    ) -> Self {
        outcomes.sort_by(|a, b| a.path.cmp(&b.path));
        warnings.sort_by(|a, b| a.asset.cmp(&b.asset));
        Self { outcomes, warnings }
    }

    fn count(&self, pred: impl Fn(&Outcome) -> bool) -> usize {
        self.outcomes.iter().filter(|o| pred(&o.outcome)).count()
    }

    pub fn uploaded(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Uploaded))
    }

    /// Assets skipped because the store already had them.
    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, Outcome::AlreadyPresent))
    }

    pub fn planned(&self) -> usize {
        self.count(|o| matches!(o, Outcome::DryRun))
    }

    pub fn failed(&self) -> usize {
        self.count(Outcome::is_failed)
    }

    /// True when no asset failed. Warnings do not count.
    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }

    /// Outcome for one asset path.
    #[cfg(test)]
    pub fn get(&self, path: &str) -> Option<&AssetOutcome> {
        self.outcomes
            .binary_search_by(|o| o.path.as_str().cmp(path))
            .ok()
            .map(|i| &self.outcomes[i])
    }

    /// `AssetPath → FingerprintedPath` for every asset that was fingerprinted.
    pub fn mapping(&self) -> impl Iterator<Item = (&AssetPath, &FingerprintedPath)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.fingerprinted.as_ref().map(|fp| (&o.path, fp)))
    }

    /// Failed assets with their errors.
    pub fn failures(&self) -> impl Iterator<Item = (&AssetPath, &AssetError)> {
        self.outcomes.iter().filter_map(|o| match &o.outcome {
            Outcome::Failed(e) => Some((&o.path, e)),
            _ => None,
        })
    }
}
