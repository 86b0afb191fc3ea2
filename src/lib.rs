pub mod error;
pub mod export;
pub mod hotkeys;
pub mod labels;
pub mod models;
pub mod playback;
pub mod session;
pub mod settings;
pub mod signals;
pub mod timeline;
pub mod utils;

use std::{path::PathBuf, time::Duration};

use anyhow::{Context, Result};

pub use error::{LabelError, MapperError, PlaybackError, SessionError, SignalError};
pub use export::{ExportOptions, LabelExport};
pub use labels::{LabelStore, QuickLabelPolicy, SegmentSelector};
pub use models::{Label, LabelCategory, LabelUpdate, Segment, Signal, SignalPoint};
pub use playback::{PlaybackClock, PlaybackState};
pub use session::{LabelingSession, SessionController, SessionSnapshot, UiCommand};
pub use settings::{LabelerSettings, SettingsStore};
pub use timeline::TimeAxis;

/// Set to any value to turn on debug output without touching `RUST_LOG`.
const DEBUG_ENV: &str = "SIGNAL_LABELER_DEBUG";
const SETTINGS_ENV: &str = "SIGNAL_LABELER_SETTINGS";
const DEFAULT_SETTINGS_FILE: &str = "signal-labeler.json";

/// Width of the headless viewport used to replay pointer input.
const DEMO_WIDTH_PX: f64 = 1000.0;

pub fn init_logging() {
    let level = if std::env::var_os(DEBUG_ENV).is_some() {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    // Ignore the error when a test harness already installed a logger.
    let _ = env_logger::Builder::from_default_env()
        .filter_level(level)
        .try_init();
}

/// Headless entry point: loads settings, labels the first stock signal with
/// a short scripted session and writes the export next to the settings.
pub async fn run() -> Result<()> {
    init_logging();
    log::info!("Signal labeler starting up...");

    let settings_path = std::env::var_os(SETTINGS_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SETTINGS_FILE));
    let settings = SettingsStore::new(settings_path)
        .context("Failed to load labeler settings")?
        .current();

    let mut signals = signals::default_signals(None).context("Failed to build stock signals")?;
    if signals.is_empty() {
        anyhow::bail!("no signals available");
    }
    let signal = signals.remove(0);
    log::info!(
        "Loaded '{}' ({} samples, {:.1}s)",
        signal.name(),
        signal.data().len(),
        signal.duration()
    );

    let controller = SessionController::new(LabelingSession::new(
        signal,
        models::default_categories(),
        settings,
    ));

    let script = [
        UiCommand::SetSpeed { speed: 2.0 },
        UiCommand::PlayPause,
    ];
    for command in script {
        controller.dispatch(command).await.map_err(anyhow::Error::msg)?;
    }
    tokio::time::sleep(Duration::from_millis(500)).await;
    controller
        .dispatch(UiCommand::QuickLabel { slot: 4 })
        .await
        .map_err(anyhow::Error::msg)?;
    controller.pause().await;

    let drag = [
        UiCommand::PointerDown { x: 600.0, width_px: DEMO_WIDTH_PX },
        UiCommand::PointerMove { x: 750.0, width_px: DEMO_WIDTH_PX },
        UiCommand::PointerUp,
        UiCommand::ConfirmSegment {
            slot: 1,
            description: Some("Scripted drag".to_string()),
        },
    ];
    for command in drag {
        controller.dispatch(command).await.map_err(anyhow::Error::msg)?;
    }

    let snapshot = controller.snapshot().await;
    log::info!(
        "Cursor at {} ({:.0}% played)",
        timeline::format_clock(snapshot.playback.current_time),
        snapshot.playback.progress(snapshot.duration) * 100.0
    );
    for label in &snapshot.labels {
        log::info!(
            "{} {}",
            label.category,
            timeline::format_range(label.start_time, label.end_time)
        );
    }

    let path = controller.export().await?;
    log::info!("Exported {} labels to {}", snapshot.labels.len(), path.display());

    controller.shutdown().await;
    Ok(())
}
