use std::sync::Arc;

use anyhow::{Context, Result};
use classify_core::config::{AppConfig, OutputFormat, RunSettings};
use classify_core::source::DirectoryResolver;
use classify_core::ClassificationCataloger;
use tracing::info;

use crate::canonicalize_or_current;
use crate::report::ScanReport;

/// Fold `scan` flags into the loaded config. Flags win over the config file
/// and environment.
pub fn apply_scan_flags(
    config: &mut AppConfig,
    scope: Option<String>,
    output: Option<String>,
    parallelism: Option<usize>,
) {
    if let Some(scope) = scope {
        config.scope = scope;
    }
    if let Some(output) = output {
        config.output = output;
    }
    if let Some(parallelism) = parallelism {
        config.file_classification.parallelism = parallelism;
    }
}

/// Catalog the directory at `path` and build the report.
pub fn scan_report(
    path: &str,
    config: &AppConfig,
    settings: &RunSettings,
    digests: bool,
) -> Result<ScanReport> {
    let root = canonicalize_or_current(path)?;
    let classifiers =
        Arc::new(config.classifier_set().context("Invalid classifier configuration")?);
    let cataloger = ClassificationCataloger::with_options(classifiers, settings.cataloger)
        .context("Invalid cataloger options")?;

    let resolver = DirectoryResolver::new(&root, settings.scope)
        .with_context(|| format!("Cannot scan {}", root.display()))?;
    let result = cataloger
        .catalog(&resolver)
        .with_context(|| format!("Failed to catalog {}", root.display()))?;
    info!(
        path = %resolver.root().display(),
        classified = result.len(),
        "Scan complete"
    );

    ScanReport::from_catalog(&resolver, &result, digests)
}

/// Scan a directory and print the report in the configured format.
pub fn scan_command(
    path: &str,
    config: &AppConfig,
    settings: &RunSettings,
    digests: bool,
) -> Result<()> {
    let report = scan_report(path, config, settings, digests)?;
    match settings.output {
        OutputFormat::Json => println!("{}", report.to_json()?),
        OutputFormat::Table => print!("{}", report.render_table()),
    }
    Ok(())
}
