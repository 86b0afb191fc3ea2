use serde::Serialize;
use std::time::Instant;

use crate::{
    error::{LabelError, SessionError},
    export::{build_export, ExportOptions, LabelExport},
    hotkeys::{handle_hotkey, HotkeyAction, HotkeyContext, HotkeyResult, Key},
    labels::{quick_label_window, LabelStore, SegmentInputSource, SegmentSelector},
    log_info,
    models::{Label, LabelCategory, LabelUpdate, Segment, Signal, SignalPoint},
    playback::{PlaybackClock, PlaybackState, TickOutcome},
    settings::LabelerSettings,
    timeline::{format_seconds, TimeAxis},
};

const ENABLE_LOGS: bool = true;

/// Everything a rendering surface needs to redraw.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub signal_id: String,
    pub duration: f64,
    pub labels: Vec<Label>,
    /// In-flight drag, if any.
    pub selection: Option<Segment>,
    /// Committed drag waiting for a category.
    pub pending_segment: Option<Segment>,
    pub selected_label: Option<String>,
    pub playback: PlaybackState,
}

/// Single owner of one signal's labeling state.
///
/// The label store, drag selector, playback clock and label selection are
/// all mutated through `&mut self`, so no reader ever observes a half
/// applied change. Switching signals replaces all of them in one call.
#[derive(Debug, Clone)]
pub struct LabelingSession {
    signal: Signal,
    catalog: Vec<LabelCategory>,
    settings: LabelerSettings,
    store: LabelStore,
    selector: SegmentSelector,
    clock: PlaybackClock,
    pending_segment: Option<Segment>,
    selected_label: Option<String>,
}

impl LabelingSession {
    pub fn new(signal: Signal, catalog: Vec<LabelCategory>, settings: LabelerSettings) -> Self {
        let duration = signal.duration();
        Self {
            store: LabelStore::new(duration),
            selector: SegmentSelector::new(settings.min_segment_duration_secs),
            clock: PlaybackClock::new(duration),
            signal,
            catalog,
            settings,
            pending_segment: None,
            selected_label: None,
        }
    }

    pub fn signal(&self) -> &Signal {
        &self.signal
    }

    pub fn catalog(&self) -> &[LabelCategory] {
        &self.catalog
    }

    pub fn settings(&self) -> &LabelerSettings {
        &self.settings
    }

    pub fn store(&self) -> &LabelStore {
        &self.store
    }

    pub fn labels(&self) -> Vec<Label> {
        self.store.list()
    }

    pub fn playback(&self) -> PlaybackState {
        self.clock.state()
    }

    pub fn selection(&self) -> Option<Segment> {
        self.selector.selection()
    }

    pub fn pending_segment(&self) -> Option<Segment> {
        self.pending_segment
    }

    pub fn selected_label(&self) -> Option<&str> {
        self.selected_label.as_deref()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            signal_id: self.signal.id().to_string(),
            duration: self.signal.duration(),
            labels: self.store.list(),
            selection: self.selector.selection(),
            pending_segment: self.pending_segment,
            selected_label: self.selected_label.clone(),
            playback: self.clock.state(),
        }
    }

    /// Replaces the active signal, dropping labels, drag, selection and
    /// playback position together.
    pub fn switch_signal(&mut self, signal: Signal) {
        let duration = signal.duration();
        log_info!(
            "Switching signal {} -> {} ({} labels dropped)",
            self.signal.id(),
            signal.id(),
            self.store.len()
        );
        self.signal = signal;
        self.store.reset(duration);
        self.selector.cancel();
        self.clock.reset(duration);
        self.pending_segment = None;
        self.selected_label = None;
    }

    fn axis(&self, width_px: f64) -> Result<TimeAxis, SessionError> {
        Ok(TimeAxis::new(width_px, self.signal.duration())?)
    }

    fn category(&self, slot: usize) -> Result<LabelCategory, SessionError> {
        self.catalog
            .get(slot)
            .cloned()
            .ok_or(SessionError::UnknownCategory(slot))
    }

    // Drag selection

    pub fn pointer_down(&mut self, x: f64, width_px: f64) -> Result<(), SessionError> {
        let axis = self.axis(width_px)?;
        self.selector.pointer_down(x, &axis);
        Ok(())
    }

    pub fn pointer_move(&mut self, x: f64, width_px: f64) -> Result<(), SessionError> {
        let axis = self.axis(width_px)?;
        self.selector.pointer_move(x, &axis);
        Ok(())
    }

    /// Ends the drag. A long enough segment is staged until a category is
    /// chosen with [`LabelingSession::confirm_pending`].
    pub fn pointer_up(&mut self) -> Option<Segment> {
        let segment = self.selector.pointer_up()?;
        self.pending_segment = Some(segment);
        Some(segment)
    }

    pub fn pointer_leave(&mut self) -> Option<Segment> {
        let segment = self.selector.pointer_leave()?;
        self.pending_segment = Some(segment);
        Some(segment)
    }

    /// `"0.42s selected"` while dragging.
    pub fn drag_status(&self) -> Option<String> {
        self.selector
            .selection()
            .map(|segment| format!("{} selected", format_seconds(segment.duration())))
    }

    pub fn discard_pending(&mut self) {
        self.pending_segment = None;
    }

    /// Labels the staged segment. A rejected add keeps the segment staged so
    /// it can be corrected.
    pub fn confirm_pending(
        &mut self,
        slot: usize,
        description: Option<String>,
    ) -> Result<Option<Label>, SessionError> {
        let Some(segment) = self.pending_segment else {
            return Ok(None);
        };
        let category = self.category(slot)?;
        let label = self.store.add(segment, &category, description)?;
        self.pending_segment = None;
        Ok(Some(label))
    }

    // Label store

    pub fn add_label(
        &mut self,
        segment: Segment,
        category: &LabelCategory,
        description: Option<String>,
    ) -> Result<Label, LabelError> {
        self.store.add(segment, category, description)
    }

    /// Labels a window around the playback cursor using the configured
    /// quick-label policy. `Ok(None)` when the window is empty.
    pub fn quick_label(&mut self, slot: usize) -> Result<Option<Label>, SessionError> {
        let category = self.category(slot)?;
        let window = quick_label_window(
            self.clock.current_time(),
            self.settings.quick_label_half_width_secs,
            self.signal.duration(),
            self.settings.quick_label_policy,
            self.store.last_added().map(|label| label.end_time),
        );
        match window {
            Some(segment) => Ok(Some(self.store.add(segment, &category, None)?)),
            None => Ok(None),
        }
    }

    pub fn edit_label(&mut self, id: &str, update: LabelUpdate) -> Result<Label, LabelError> {
        self.store.edit(id, update)
    }

    /// Idempotent; also drops the label from the selection.
    pub fn delete_label(&mut self, id: &str) -> bool {
        if self.selected_label.as_deref() == Some(id) {
            self.selected_label = None;
        }
        self.store.delete(id)
    }

    /// Toggles the label's selection and moves the cursor to its midpoint.
    pub fn click_label(&mut self, id: &str) -> Option<String> {
        let Some(midpoint) = self.store.get(id).map(Label::midpoint) else {
            return self.selected_label.clone();
        };
        if self.selected_label.as_deref() == Some(id) {
            self.selected_label = None;
        } else {
            self.selected_label = Some(id.to_string());
        }
        self.clock.seek(midpoint);
        self.selected_label.clone()
    }

    pub fn labels_at(&self, time: f64) -> Vec<Label> {
        self.store.labels_at(time)
    }

    // Playback

    pub fn play(&mut self, now: Instant) {
        self.clock.play(now);
        log_info!("Playback started at {:.2}s", self.clock.current_time());
    }

    pub fn pause(&mut self) {
        if self.clock.is_playing() {
            log_info!("Playback paused at {:.2}s", self.clock.current_time());
        }
        self.clock.pause();
    }

    pub fn toggle_playback(&mut self, now: Instant) -> bool {
        self.clock.toggle(now)
    }

    pub fn tick(&mut self, now: Instant) -> TickOutcome {
        let outcome = self.clock.tick(now);
        if outcome == TickOutcome::Finished {
            log_info!("Playback reached end of {}", self.signal.id());
        }
        outcome
    }

    pub fn seek(&mut self, time: f64) -> f64 {
        self.clock.seek(time)
    }

    /// Seeks to the time under a click on the plot.
    pub fn seek_pixel(&mut self, x: f64, width_px: f64) -> Result<f64, SessionError> {
        let axis = self.axis(width_px)?;
        Ok(self.clock.seek(axis.pixel_to_time(x)))
    }

    pub fn skip(&mut self, delta: f64) -> f64 {
        self.clock.skip(delta)
    }

    pub fn set_speed(&mut self, speed: f64) -> Result<(), SessionError> {
        Ok(self.clock.set_speed(speed)?)
    }

    /// Steps to the next configured speed preset, wrapping around. A speed
    /// that is not a preset jumps to the first one above it.
    pub fn cycle_speed(&mut self) -> Result<f64, SessionError> {
        let current = self.clock.state().speed;
        let presets = &self.settings.speed_presets;
        let next = presets
            .iter()
            .copied()
            .filter(|preset| *preset > current)
            .min_by(f64::total_cmp)
            .or_else(|| presets.iter().copied().min_by(f64::total_cmp))
            .unwrap_or(current);
        self.clock.set_speed(next)?;
        Ok(next)
    }

    /// Sample under the pointer, for the hover readout.
    pub fn hovered_point(&self, x: f64, width_px: f64) -> Result<SignalPoint, SessionError> {
        let axis = self.axis(width_px)?;
        Ok(self.signal.sample_near(axis.pixel_to_time(x)))
    }

    // Keyboard

    pub fn hotkey_context(&self, input_focused: bool) -> HotkeyContext {
        HotkeyContext {
            input_focused,
            has_selected_label: self.selected_label.is_some(),
            category_count: self.catalog.len(),
        }
    }

    pub fn apply_hotkey(
        &mut self,
        action: HotkeyAction,
        now: Instant,
    ) -> Result<Option<Label>, SessionError> {
        let small = self.settings.skip_small_secs;
        let large = self.settings.skip_large_secs;
        match action {
            HotkeyAction::QuickLabel(slot) => return self.quick_label(slot),
            HotkeyAction::PlayPause => {
                self.toggle_playback(now);
            }
            HotkeyAction::SkipBackward => {
                self.skip(-small);
            }
            HotkeyAction::SkipForward => {
                self.skip(small);
            }
            HotkeyAction::SkipBackwardLarge => {
                self.skip(-large);
            }
            HotkeyAction::SkipForwardLarge => {
                self.skip(large);
            }
            HotkeyAction::DeleteSelectedLabel => {
                if let Some(id) = self.selected_label.clone() {
                    self.delete_label(&id);
                }
            }
            HotkeyAction::Cancel => {
                self.selector.cancel();
                self.pending_segment = None;
                self.selected_label = None;
            }
        }
        Ok(None)
    }

    pub fn key_press(
        &mut self,
        key: &Key,
        shift: bool,
        input_focused: bool,
        now: Instant,
    ) -> Result<HotkeyResult, SessionError> {
        let context = self.hotkey_context(input_focused);
        let result = handle_hotkey(key, shift, false, false, false, &context);
        if let HotkeyResult::Action(action) = result {
            self.apply_hotkey(action, now)?;
        }
        Ok(result)
    }

    // Export

    pub fn export(&self, options: ExportOptions) -> LabelExport {
        build_export(
            &self.signal,
            &self.store.list(),
            options,
            chrono::Utc::now(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        labels::QuickLabelPolicy,
        models::default_categories,
    };
    use std::time::Duration;

    const ANOMALY: usize = 1;

    fn signal(id: &str, duration: f64) -> Signal {
        let samples = (duration * 100.0) as usize;
        let data = (0..samples)
            .map(|i| SignalPoint {
                time: i as f64 / 100.0,
                value: i as f64,
            })
            .collect();
        Signal::new(id, id, "", data, 100.0, duration).unwrap()
    }

    fn session() -> LabelingSession {
        LabelingSession::new(
            signal("ecg-signal", 10.0),
            default_categories(),
            LabelerSettings::default(),
        )
    }

    #[test]
    fn drag_stages_segment_until_confirmed() {
        let mut session = session();
        session.pointer_down(200.0, 1000.0).unwrap();
        session.pointer_move(300.0, 1000.0).unwrap();
        assert_eq!(session.drag_status().as_deref(), Some("1.00s selected"));
        assert_eq!(session.pointer_up(), Some(Segment::new(2.0, 3.0)));
        assert!(session.labels().is_empty());

        let label = session.confirm_pending(ANOMALY, None).unwrap().unwrap();
        assert_eq!((label.start_time, label.end_time), (2.0, 3.0));
        assert_eq!(label.category, "Anomaly");
        assert!(session.pending_segment().is_none());
        assert_eq!(session.labels().len(), 1);
    }

    #[test]
    fn short_drag_stages_nothing() {
        let mut session = session();
        session.pointer_down(400.0, 1000.0).unwrap();
        session.pointer_move(405.0, 1000.0).unwrap();
        assert_eq!(session.pointer_up(), None);
        assert_eq!(session.confirm_pending(ANOMALY, None), Ok(None));
    }

    #[test]
    fn unknown_slot_keeps_pending_segment() {
        let mut session = session();
        session.pointer_down(100.0, 1000.0).unwrap();
        session.pointer_move(500.0, 1000.0).unwrap();
        session.pointer_up();
        assert_eq!(
            session.confirm_pending(42, None),
            Err(SessionError::UnknownCategory(42))
        );
        assert!(session.pending_segment().is_some());
    }

    #[test]
    fn zero_width_surface_is_rejected() {
        let mut session = session();
        assert!(matches!(
            session.pointer_down(10.0, 0.0),
            Err(SessionError::Mapper(_))
        ));
        assert!(!session.selector.is_dragging());
    }

    #[test]
    fn quick_label_uses_cursor_window() {
        let mut session = session();
        session.seek(5.0);
        let label = session.quick_label(0).unwrap().unwrap();
        assert_eq!((label.start_time, label.end_time), (4.75, 5.25));
        assert_eq!(label.category, "Normal");
    }

    #[test]
    fn anchored_quick_labels_tile() {
        let settings = LabelerSettings {
            quick_label_policy: QuickLabelPolicy::AnchorToPrevious,
            ..LabelerSettings::default()
        };
        let mut session =
            LabelingSession::new(signal("s", 10.0), default_categories(), settings);
        session.seek(1.0);
        let first = session.quick_label(0).unwrap().unwrap();
        session.seek(3.0);
        let second = session.quick_label(1).unwrap().unwrap();
        assert_eq!(second.start_time, first.end_time);
        assert_eq!(second.end_time, 3.25);

        session.seek(10.0);
        session.quick_label(2).unwrap();
        assert_eq!(session.quick_label(2), Ok(None));
    }

    #[test]
    fn click_label_toggles_and_seeks() {
        let mut session = session();
        let category = default_categories()[ANOMALY].clone();
        let label = session
            .add_label(Segment::new(2.0, 4.0), &category, None)
            .unwrap();

        assert_eq!(session.click_label(&label.id), Some(label.id.clone()));
        assert_eq!(session.playback().current_time, 3.0);
        assert_eq!(session.click_label(&label.id), None);
        assert_eq!(session.click_label("ghost"), None);
    }

    #[test]
    fn deleting_selected_label_clears_selection() {
        let mut session = session();
        let category = default_categories()[0].clone();
        let label = session
            .add_label(Segment::new(1.0, 2.0), &category, None)
            .unwrap();
        session.click_label(&label.id);
        assert!(session.delete_label(&label.id));
        assert!(session.selected_label().is_none());
        assert!(!session.delete_label(&label.id));
    }

    #[test]
    fn switch_signal_resets_everything() {
        let mut session = session();
        let now = Instant::now();
        let category = default_categories()[0].clone();
        let label = session
            .add_label(Segment::new(8.0, 9.5), &category, None)
            .unwrap();
        session.click_label(&label.id);
        session.set_speed(2.0).unwrap();
        session.play(now);
        session.pointer_down(100.0, 1000.0).unwrap();

        session.switch_signal(signal("short", 2.0));

        let snapshot = session.snapshot();
        assert_eq!(snapshot.signal_id, "short");
        assert_eq!(snapshot.duration, 2.0);
        assert!(snapshot.labels.is_empty());
        assert!(snapshot.selection.is_none());
        assert!(snapshot.selected_label.is_none());
        assert_eq!(snapshot.playback, PlaybackState::default());
        assert!(session
            .add_label(Segment::new(1.0, 3.0), &category, None)
            .is_err());
    }

    #[test]
    fn hotkeys_drive_session() {
        let mut session = session();
        let now = Instant::now();

        session.key_press(&Key::character(" "), false, false, now).unwrap();
        assert!(session.playback().is_playing);
        session.tick(now + Duration::from_millis(2000));
        session.key_press(&Key::character("2"), false, false, now).unwrap();
        assert_eq!(session.labels()[0].category, "Anomaly");

        session.key_press(&Key::ArrowRight, true, false, now).unwrap();
        assert_eq!(session.playback().current_time, 7.0);
        session.key_press(&Key::ArrowLeft, false, false, now).unwrap();
        assert_eq!(session.playback().current_time, 6.0);

        let result = session
            .key_press(&Key::character("3"), false, true, now)
            .unwrap();
        assert_eq!(result, HotkeyResult::Suppressed);
        assert_eq!(session.labels().len(), 1);
    }

    #[test]
    fn delete_hotkey_removes_selected_label() {
        let mut session = session();
        let now = Instant::now();
        let category = default_categories()[0].clone();
        let label = session
            .add_label(Segment::new(1.0, 2.0), &category, None)
            .unwrap();
        session.click_label(&label.id);
        session.key_press(&Key::Delete, false, false, now).unwrap();
        assert!(session.labels().is_empty());
    }

    #[test]
    fn escape_cancels_drag() {
        let mut session = session();
        session.pointer_down(100.0, 1000.0).unwrap();
        session.pointer_move(800.0, 1000.0).unwrap();
        session
            .key_press(&Key::Escape, false, false, Instant::now())
            .unwrap();
        assert_eq!(session.pointer_up(), None);
    }

    #[test]
    fn seek_pixel_clamps_to_signal() {
        let mut session = session();
        assert_eq!(session.seek_pixel(1200.0, 1000.0), Ok(10.0));
        assert_eq!(session.seek_pixel(250.0, 1000.0), Ok(2.5));
    }

    #[test]
    fn hovered_point_reads_nearest_sample() {
        let session = session();
        let point = session.hovered_point(500.0, 1000.0).unwrap();
        // 1000 samples spread over 10s: index round(0.5 * 999) = 500
        assert_eq!(point.value, 500.0);
    }

    #[test]
    fn export_reflects_store() {
        let mut session = session();
        let category = default_categories()[ANOMALY].clone();
        session
            .add_label(Segment::new(2.0, 3.0), &category, None)
            .unwrap();
        let document = session.export(ExportOptions::default());
        assert_eq!(document.signal, "ecg-signal");
        assert_eq!(document.labels[0].start_sample, Some(200));
    }

    #[test]
    fn speed_cycles_through_presets() {
        let mut session = session();
        assert_eq!(session.cycle_speed(), Ok(1.25));
        session.set_speed(2.0).unwrap();
        assert_eq!(session.cycle_speed(), Ok(0.5));
        session.set_speed(0.6).unwrap();
        assert_eq!(session.cycle_speed(), Ok(0.75));
    }
}
