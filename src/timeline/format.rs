/// `2.5` -> `"2.50s"`.
pub fn format_seconds(time: f64) -> String {
    format!("{time:.2}s")
}

/// `65.5` -> `"1:05.50"`.
pub fn format_clock(time: f64) -> String {
    let time = time.max(0.0);
    let minutes = (time / 60.0).floor();
    let seconds = time - minutes * 60.0;
    format!("{}:{:05.2}", minutes as u64, seconds)
}

pub fn format_range(start: f64, end: f64) -> String {
    format!("{} - {}", format_seconds(start), format_seconds(end))
}
