//! Report document presented to the user after a scan.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use classify_core::source::DirectoryResolver;
use classify_core::{CatalogResult, Classification, FileResolver, Location, Scope};
use serde::Serialize;
use tracing::warn;

use crate::sha256_file;

/// Which tree was scanned and how it was viewed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceInfo {
    pub path: String,
    pub scope: Scope,
}

/// Identifies the tool that produced a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Descriptor {
    pub name: String,
    pub version: String,
    pub generated_at: String,
}

impl Descriptor {
    /// Stamped with `SOURCE_DATE_EPOCH` when set, otherwise the current time.
    pub fn current() -> Self {
        Self::stamped(std::env::var("SOURCE_DATE_EPOCH").ok().as_deref())
    }

    /// Stamped with the given epoch seconds, or now when absent or unparsable.
    pub fn stamped(source_date_epoch: Option<&str>) -> Self {
        let fixed = source_date_epoch.and_then(|raw| {
            let parsed =
                raw.trim().parse::<i64>().ok().and_then(|secs| DateTime::from_timestamp(secs, 0));
            if parsed.is_none() {
                warn!("Ignoring invalid SOURCE_DATE_EPOCH {raw:?}");
            }
            parsed
        });
        Self::at(fixed.unwrap_or_else(Utc::now))
    }

    pub fn at(generated_at: DateTime<Utc>) -> Self {
        Self {
            name: "classify".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            generated_at: generated_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportEntry {
    pub location: Location,
    pub classifications: Vec<Classification>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha256: Option<String>,
}

/// Full scan report, ordered by real path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanReport {
    pub source: SourceInfo,
    pub descriptor: Descriptor,
    pub classifications: Vec<ReportEntry>,
}

impl ScanReport {
    /// Build a report from a finished catalog. With `digests` set, every
    /// classified file is hashed through the resolver's host path.
    pub fn from_catalog(
        resolver: &DirectoryResolver,
        result: &CatalogResult,
        digests: bool,
    ) -> Result<Self> {
        let mut entries = Vec::with_capacity(result.len());
        for entry in result.iter() {
            let sha256 = if digests {
                let host = resolver.host_path(entry.location);
                Some(sha256_file(&host).with_context(|| {
                    format!("Failed to compute digest for {}", entry.location.real_path())
                })?)
            } else {
                None
            };
            entries.push(ReportEntry {
                location: entry.location.clone(),
                classifications: entry.classifications.to_vec(),
                sha256,
            });
        }

        Ok(Self {
            source: SourceInfo {
                path: resolver.root().display().to_string(),
                scope: resolver.scope(),
            },
            descriptor: Descriptor::current(),
            classifications: entries,
        })
    }

    /// Replace the descriptor, e.g. to pin `generated_at` for reproducible output.
    pub fn with_descriptor(mut self, descriptor: Descriptor) -> Self {
        self.descriptor = descriptor;
        self
    }

    pub fn classification_count(&self) -> usize {
        self.classifications.iter().map(|e| e.classifications.len()).sum()
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize report to JSON")
    }

    /// Aligned plain-text table, one row per classification.
    pub fn render_table(&self) -> String {
        let mut out = String::new();
        if self.classifications.is_empty() {
            let _ = writeln!(out, "No classifications found in {}", self.source.path);
            return out;
        }

        let mut rows =
            vec![["PATH".to_string(), "CLASS".into(), "VERSION".into(), "DETAILS".into()]];
        for entry in &self.classifications {
            for classification in &entry.classifications {
                let mut details = extra_metadata(&classification.metadata);
                if let Some(digest) = &entry.sha256 {
                    details.push(format!("sha256={digest}"));
                }
                rows.push([
                    entry.location.to_string(),
                    classification.class.clone(),
                    classification.version().unwrap_or("-").to_string(),
                    details.join(" "),
                ]);
            }
        }

        let mut widths = [0usize; 4];
        for row in &rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }
        for row in &rows {
            let line = format!(
                "{:<w0$}  {:<w1$}  {:<w2$}  {}",
                row[0],
                row[1],
                row[2],
                row[3],
                w0 = widths[0],
                w1 = widths[1],
                w2 = widths[2],
            );
            let _ = writeln!(out, "{}", line.trim_end());
        }
        out
    }
}

fn extra_metadata(metadata: &BTreeMap<String, String>) -> Vec<String> {
    metadata
        .iter()
        .filter(|(key, _)| key.as_str() != "version")
        .map(|(key, value)| format!("{key}={value}"))
        .collect()
}
