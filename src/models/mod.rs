pub mod category;
pub mod label;
pub mod signal;

pub use category::{default_categories, find_category, LabelCategory};
pub use label::{Label, LabelUpdate, Segment};
pub use signal::{Signal, SignalPoint};
