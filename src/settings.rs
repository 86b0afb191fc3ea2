use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::PathBuf,
    sync::{RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use crate::{
    labels::{QuickLabelPolicy, MIN_SEGMENT_DURATION_SECS, QUICK_LABEL_HALF_WIDTH_SECS},
    log_warn,
};

const ENABLE_LOGS: bool = true;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LabelerSettings {
    pub min_segment_duration_secs: f64,
    pub quick_label_half_width_secs: f64,
    pub quick_label_policy: QuickLabelPolicy,
    pub speed_presets: Vec<f64>,
    pub skip_small_secs: f64,
    pub skip_large_secs: f64,
    /// Playback ticker period; roughly one display frame.
    pub tick_interval_ms: u64,
    pub export_dir: PathBuf,
}

impl Default for LabelerSettings {
    fn default() -> Self {
        Self {
            min_segment_duration_secs: MIN_SEGMENT_DURATION_SECS,
            quick_label_half_width_secs: QUICK_LABEL_HALF_WIDTH_SECS,
            quick_label_policy: QuickLabelPolicy::Symmetric,
            speed_presets: vec![0.5, 0.75, 1.0, 1.25, 1.5, 2.0],
            skip_small_secs: 1.0,
            skip_large_secs: 5.0,
            tick_interval_ms: 16,
            export_dir: PathBuf::from("."),
        }
    }
}

pub struct SettingsStore {
    path: PathBuf,
    data: RwLock<LabelerSettings>,
}

impl SettingsStore {
    /// Loads settings from `path`, falling back to defaults when the file is
    /// missing or unreadable as JSON.
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_else(|err| {
                log_warn!("Ignoring malformed settings at {}: {}", path.display(), err);
                LabelerSettings::default()
            })
        } else {
            LabelerSettings::default()
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    pub fn current(&self) -> LabelerSettings {
        self.read().clone()
    }

    pub fn update(&self, settings: LabelerSettings) -> Result<()> {
        let mut guard = self.write();
        *guard = settings;
        self.persist(&guard)
    }

    fn persist(&self, data: &LabelerSettings) -> Result<()> {
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }

    fn read(&self) -> RwLockReadGuard<'_, LabelerSettings> {
        self.data.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, LabelerSettings> {
        self.data.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
