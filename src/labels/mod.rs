pub mod quick;
pub mod selector;
pub mod store;

pub use quick::{quick_label_window, QuickLabelPolicy, QUICK_LABEL_HALF_WIDTH_SECS};
pub use selector::{SegmentInputSource, SegmentSelector, MIN_SEGMENT_DURATION_SECS};
pub use store::{validate_interval, LabelStore};
