pub mod format;
pub mod mapper;

pub use format::{format_clock, format_range, format_seconds};
pub use mapper::{pixel_to_time, time_to_pixel, TimeAxis};
