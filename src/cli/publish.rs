//! `publish` command.

use anyhow::Result;

use crate::cli::PublishArgs;
use crate::config::AssetIdConfig;
use crate::log;
use crate::publish::{PublishOptions, PublishReport, Publisher};
use crate::store::HttpConnector;
use crate::utils::plural::plural_count;

/// Run the publish pipeline. Returns whether every asset succeeded.
pub fn publish_assets(config: &AssetIdConfig, args: &PublishArgs) -> Result<bool> {
    let publisher = Publisher::new(config)?;

    let report = if args.dry_run {
        let paths = publisher.catalog().enumerate()?;
        publisher.plan(&paths, args.debug)
    } else {
        let connector = HttpConnector::from_config(&config.store)?;
        let options = PublishOptions {
            dry_run: false,
            debug: args.debug,
        };
        publisher.publish(&connector, options)?
    };

    log_summary(&report, args.dry_run);
    Ok(report.is_success())
}

fn log_summary(report: &PublishReport, dry_run: bool) {
    let mut parts = Vec::new();
    if dry_run {
        parts.push(format!("{} planned", report.planned()));
    } else {
        parts.push(format!("{} uploaded", report.uploaded()));
        if report.skipped() > 0 {
            parts.push(format!("{} already present", report.skipped()));
        }
    }
    if report.failed() > 0 {
        parts.push(format!("{} failed", report.failed()));
    }
    if !report.warnings.is_empty() {
        parts.push(plural_count(report.warnings.len(), "warning"));
    }

    let module = if report.is_success() { "done" } else { "error" };
    log!(module; "{}", parts.join(", "));
}
