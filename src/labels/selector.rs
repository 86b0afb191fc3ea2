use crate::{log_debug, models::Segment, timeline::TimeAxis};

const ENABLE_LOGS: bool = true;

/// Drags shorter than this (seconds) are discarded on release.
pub const MIN_SEGMENT_DURATION_SECS: f64 = 0.1;

/// Capability a drag-style input needs from the selector, in time units.
///
/// Views translate their own pointer, touch or pen events into these calls;
/// the selector never sees the rendering technology.
pub trait SegmentInputSource {
    fn begin(&mut self, time: f64);
    fn update(&mut self, time: f64);
    /// Ends the gesture, yielding the segment only if it is long enough.
    fn commit(&mut self) -> Option<Segment>;
    fn cancel(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum DragState {
    Idle,
    Dragging { anchor: f64, current: f64 },
}

/// Turns pointer drags into validated segments.
#[derive(Debug, Clone)]
pub struct SegmentSelector {
    min_duration: f64,
    state: DragState,
}

impl Default for SegmentSelector {
    fn default() -> Self {
        Self::new(MIN_SEGMENT_DURATION_SECS)
    }
}

impl SegmentSelector {
    pub fn new(min_duration: f64) -> Self {
        Self {
            min_duration,
            state: DragState::Idle,
        }
    }

    pub fn min_duration(&self) -> f64 {
        self.min_duration
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// The in-flight selection, normalized so `start <= end`.
    pub fn selection(&self) -> Option<Segment> {
        match self.state {
            DragState::Idle => None,
            DragState::Dragging { anchor, current } => Some(Segment::spanning(anchor, current)),
        }
    }

    pub fn pointer_down(&mut self, x: f64, axis: &TimeAxis) {
        self.begin(axis.clamp_time(axis.pixel_to_time(x)));
    }

    pub fn pointer_move(&mut self, x: f64, axis: &TimeAxis) {
        self.update(axis.clamp_time(axis.pixel_to_time(x)));
    }

    pub fn pointer_up(&mut self) -> Option<Segment> {
        self.commit()
    }

    /// Leaving the surface mid-drag behaves like releasing the pointer.
    pub fn pointer_leave(&mut self) -> Option<Segment> {
        if self.is_dragging() {
            self.commit()
        } else {
            None
        }
    }
}

impl SegmentInputSource for SegmentSelector {
    fn begin(&mut self, time: f64) {
        self.state = DragState::Dragging {
            anchor: time,
            current: time,
        };
    }

    fn update(&mut self, time: f64) {
        if let DragState::Dragging { current, .. } = &mut self.state {
            *current = time;
        }
    }

    fn commit(&mut self) -> Option<Segment> {
        let segment = self.selection()?;
        self.state = DragState::Idle;

        if segment.duration() > self.min_duration {
            Some(segment)
        } else {
            log_debug!(
                "Discarded {:.3}s drag (minimum {:.3}s)",
                segment.duration(),
                self.min_duration
            );
            None
        }
    }

    fn cancel(&mut self) {
        self.state = DragState::Idle;
    }
}
