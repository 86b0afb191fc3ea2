use std::{
    path::{Path, PathBuf},
    sync::Arc,
    time::{Duration, Instant},
};

use anyhow::Result;
use tokio::{
    sync::{watch, Mutex},
    task::JoinHandle,
    time,
};
use tokio_util::sync::CancellationToken;

use crate::{
    export::{write_export, ExportOptions},
    log_debug,
    models::Signal,
    playback::TickOutcome,
};

use super::{
    commands::{apply_command, CommandEffect, UiCommand},
    LabelingSession, SessionSnapshot,
};

const ENABLE_LOGS: bool = true;

struct Ticker {
    handle: JoinHandle<()>,
    cancel: CancellationToken,
}

/// Async owner of a [`LabelingSession`].
///
/// Every mutation goes through the session mutex, and each one publishes a
/// fresh [`SessionSnapshot`] for rendering surfaces. While playback runs, a
/// ticker task advances the clock once per `tick_interval`.
#[derive(Clone)]
pub struct SessionController {
    session: Arc<Mutex<LabelingSession>>,
    ticker: Arc<Mutex<Option<Ticker>>>,
    tick_interval: Duration,
    snapshots: Arc<watch::Sender<SessionSnapshot>>,
}

impl SessionController {
    pub fn new(session: LabelingSession) -> Self {
        let tick_interval = Duration::from_millis(session.settings().tick_interval_ms.max(1));
        let (snapshots, _) = watch::channel(session.snapshot());

        Self {
            session: Arc::new(Mutex::new(session)),
            ticker: Arc::new(Mutex::new(None)),
            tick_interval,
            snapshots: Arc::new(snapshots),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.snapshots.subscribe()
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        self.session.lock().await.snapshot()
    }

    /// Applies one UI callback. Errors are rendered as strings for display.
    ///
    /// The ticker slot is locked before the session and held until the
    /// ticker matches the resulting play state, so overlapping dispatches
    /// cannot leave a playing clock without a ticker.
    pub async fn dispatch(&self, command: UiCommand) -> Result<CommandEffect, String> {
        let mut ticker = self.ticker.lock().await;
        let touches_playback = command.touches_playback();
        let mut session = self.session.lock().await;
        let effect = apply_command(&mut session, command, Instant::now());
        self.snapshots.send_replace(session.snapshot());

        if touches_playback {
            if session.playback().is_playing {
                self.start_ticker(&mut ticker);
            } else {
                stop_ticker(&mut ticker);
            }
        }

        effect.map_err(|err| err.to_string())
    }

    pub async fn play(&self) {
        let mut ticker = self.ticker.lock().await;
        let mut session = self.session.lock().await;
        session.play(Instant::now());
        self.snapshots.send_replace(session.snapshot());
        self.start_ticker(&mut ticker);
    }

    pub async fn pause(&self) {
        let mut ticker = self.ticker.lock().await;
        stop_ticker(&mut ticker);
        let mut session = self.session.lock().await;
        session.pause();
        self.snapshots.send_replace(session.snapshot());
    }

    /// Stops the ticker before swapping the signal so no tick can land on
    /// the new signal with the old clock.
    pub async fn switch_signal(&self, signal: Signal) {
        let mut ticker = self.ticker.lock().await;
        stop_ticker(&mut ticker);
        let mut session = self.session.lock().await;
        session.switch_signal(signal);
        self.snapshots.send_replace(session.snapshot());
    }

    pub async fn export_to(&self, dir: &Path, options: ExportOptions) -> Result<PathBuf> {
        let (signal, labels) = {
            let session = self.session.lock().await;
            (session.signal().clone(), session.labels())
        };
        write_export(dir, &signal, &labels, options)
    }

    /// Exports into the directory configured in settings.
    pub async fn export(&self) -> Result<PathBuf> {
        let dir = self.session.lock().await.settings().export_dir.clone();
        self.export_to(&dir, ExportOptions::default()).await
    }

    pub async fn shutdown(&self) {
        stop_ticker(&mut *self.ticker.lock().await);
    }

    /// Replaces any previous ticker with a fresh one. Callers hold the
    /// session lock, so the old task cannot tick in between.
    fn start_ticker(&self, slot: &mut Option<Ticker>) {
        stop_ticker(slot);

        let session = self.session.clone();
        let snapshots = self.snapshots.clone();
        let tick_interval = self.tick_interval;
        let cancel = CancellationToken::new();
        let token = cancel.clone();

        let handle = tokio::spawn(async move {
            let mut interval = time::interval(tick_interval);
            interval.set_missed_tick_behavior(time::MissedTickBehavior::Skip);
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = interval.tick() => {}
                }

                let outcome = {
                    let mut guard = session.lock().await;
                    if token.is_cancelled() {
                        break;
                    }
                    let outcome = guard.tick(Instant::now());
                    if outcome != TickOutcome::Idle {
                        snapshots.send_replace(guard.snapshot());
                    }
                    outcome
                };

                if !matches!(outcome, TickOutcome::Advanced(_)) {
                    break;
                }
            }
            log_debug!("Playback ticker exited");
        });

        log_debug!("Playback ticker started ({:?} interval)", tick_interval);
        *slot = Some(Ticker { handle, cancel });
    }
}

fn stop_ticker(slot: &mut Option<Ticker>) {
    if let Some(ticker) = slot.take() {
        ticker.cancel.cancel();
        ticker.handle.abort();
    }
}
