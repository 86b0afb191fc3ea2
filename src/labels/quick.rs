use serde::{Deserialize, Serialize};

use crate::models::Segment;

/// Half of the window a quick-label covers around the playback cursor.
pub const QUICK_LABEL_HALF_WIDTH_SECS: f64 = 0.25;

/// How a quick-label picks its start time.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum QuickLabelPolicy {
    /// `[t - w, t + w]` around the cursor, ignoring existing labels.
    #[default]
    Symmetric,
    /// Starts where the previously added label ended, so labels placed
    /// during continuous playback tile without gaps.
    AnchorToPrevious,
}

/// Window for a quick-label at `current_time`, clamped to `[0, duration]`.
///
/// Returns `None` when the window collapses, e.g. at the very end of the
/// signal or when the anchor lies past the cursor window.
pub fn quick_label_window(
    current_time: f64,
    half_width: f64,
    duration: f64,
    policy: QuickLabelPolicy,
    previous_end: Option<f64>,
) -> Option<Segment> {
    let symmetric_start = (current_time - half_width).max(0.0);
    let start = match (policy, previous_end) {
        (QuickLabelPolicy::AnchorToPrevious, Some(end)) => end,
        _ => symmetric_start,
    };
    let end = (current_time + half_width).min(duration);

    (end > start).then(|| Segment::new(start, end))
}
