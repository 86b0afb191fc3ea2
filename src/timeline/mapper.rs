use crate::error::MapperError;

/// Linear map between a signal's `[0, duration]` and a surface's `[0, width]`.
///
/// Results are not clamped. Callers that need an in-range time clamp it
/// themselves (see [`TimeAxis::clamp_time`]).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeAxis {
    width_px: f64,
    duration: f64,
}

impl TimeAxis {
    pub fn new(width_px: f64, duration: f64) -> Result<Self, MapperError> {
        if !duration.is_finite() || duration <= 0.0 {
            return Err(MapperError::NonPositiveDuration(duration));
        }
        if !width_px.is_finite() || width_px <= 0.0 {
            return Err(MapperError::NonPositiveWidth(width_px));
        }
        Ok(Self { width_px, duration })
    }

    pub fn width_px(&self) -> f64 {
        self.width_px
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn time_to_pixel(&self, time: f64) -> f64 {
        time / self.duration * self.width_px
    }

    pub fn pixel_to_time(&self, x: f64) -> f64 {
        x / self.width_px * self.duration
    }

    pub fn clamp_time(&self, time: f64) -> f64 {
        time.clamp(0.0, self.duration)
    }

    /// Pixel span `(x, width)` covered by `[start, end]`.
    pub fn span_px(&self, start: f64, end: f64) -> (f64, f64) {
        let x = self.time_to_pixel(start);
        (x, self.time_to_pixel(end) - x)
    }
}

pub fn time_to_pixel(time: f64, width_px: f64, duration: f64) -> Result<f64, MapperError> {
    if !time.is_finite() {
        return Err(MapperError::NonFinite(time));
    }
    Ok(TimeAxis::new(width_px, duration)?.time_to_pixel(time))
}

pub fn pixel_to_time(x: f64, width_px: f64, duration: f64) -> Result<f64, MapperError> {
    if !x.is_finite() {
        return Err(MapperError::NonFinite(x));
    }
    Ok(TimeAxis::new(width_px, duration)?.pixel_to_time(x))
}
