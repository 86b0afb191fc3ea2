//! Serializes a signal's labels into the portable export document.
//!
//! The document intentionally omits label ids: they are internal handles,
//! not part of the external contract.

use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    log_info,
    models::{Label, Signal},
};

const ENABLE_LOGS: bool = true;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportOptions {
    /// Adds `sampleRate` and `duration` at the document root.
    pub include_signal_metadata: bool,
    /// Adds `startSample`/`endSample` to every label.
    pub include_sample_indices: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            include_signal_metadata: true,
            include_sample_indices: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExportedLabel {
    pub start_time: f64,
    pub end_time: f64,
    pub category: String,
    pub color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_sample: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_sample: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LabelExport {
    pub signal: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sample_rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    pub labels: Vec<ExportedLabel>,
    pub exported_at: String,
}

fn sample_index(time: f64, sample_rate: f64) -> u64 {
    (time * sample_rate).round().max(0.0) as u64
}

/// Builds the document for `labels` with a caller-supplied timestamp.
/// Output depends only on the inputs.
pub fn build_export(
    signal: &Signal,
    labels: &[Label],
    options: ExportOptions,
    exported_at: DateTime<Utc>,
) -> LabelExport {
    let sample_rate = signal.sample_rate();
    let labels = labels
        .iter()
        .map(|label| {
            let (start_sample, end_sample) = if options.include_sample_indices {
                (
                    Some(sample_index(label.start_time, sample_rate)),
                    Some(sample_index(label.end_time, sample_rate)),
                )
            } else {
                (None, None)
            };
            ExportedLabel {
                start_time: label.start_time,
                end_time: label.end_time,
                category: label.category.clone(),
                color: label.color.clone(),
                description: label.description.clone(),
                start_sample,
                end_sample,
            }
        })
        .collect();

    LabelExport {
        signal: signal.name().to_string(),
        sample_rate: options.include_signal_metadata.then_some(sample_rate),
        duration: options.include_signal_metadata.then(|| signal.duration()),
        labels,
        exported_at: exported_at.to_rfc3339_opts(SecondsFormat::Millis, true),
    }
}

pub fn export_labels(signal: &Signal, labels: &[Label], options: ExportOptions) -> LabelExport {
    build_export(signal, labels, options, Utc::now())
}

/// `{signalId}-labels-{millis}.json`
pub fn export_file_name(signal_id: &str, exported_at: DateTime<Utc>) -> String {
    format!("{}-labels-{}.json", signal_id, exported_at.timestamp_millis())
}

pub fn to_json(document: &LabelExport) -> Result<String> {
    serde_json::to_string_pretty(document).context("Failed to serialize label export")
}

/// Writes the export for `signal` into `dir` and returns the file path.
pub fn write_export(
    dir: &Path,
    signal: &Signal,
    labels: &[Label],
    options: ExportOptions,
) -> Result<PathBuf> {
    let exported_at = Utc::now();
    let document = build_export(signal, labels, options, exported_at);
    let path = dir.join(export_file_name(signal.id(), exported_at));

    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create export directory {}", dir.display()))?;
    fs::write(&path, to_json(&document)?)
        .with_context(|| format!("Failed to write export to {}", path.display()))?;

    log_info!(
        "Exported {} labels for {} to {}",
        document.labels.len(),
        signal.id(),
        path.display()
    );
    Ok(path)
}
