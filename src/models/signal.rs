use serde::{Deserialize, Serialize};

use crate::error::SignalError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SignalPoint {
    pub time: f64,
    pub value: f64,
}

/// An immutable time series plus the metadata the labeler needs.
///
/// Construction validates the samples once; afterwards nothing can mutate
/// the signal, so every consumer may rely on `duration > 0` and strictly
/// increasing sample times.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Signal {
    id: String,
    name: String,
    description: String,
    data: Vec<SignalPoint>,
    sample_rate: f64,
    duration: f64,
}

impl Signal {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        data: Vec<SignalPoint>,
        sample_rate: f64,
        duration: f64,
    ) -> Result<Self, SignalError> {
        let id = id.into();

        if data.is_empty() {
            return Err(SignalError::Empty(id));
        }
        if !sample_rate.is_finite() || sample_rate <= 0.0 {
            return Err(SignalError::InvalidSampleRate {
                id,
                rate: sample_rate,
            });
        }
        if !duration.is_finite() || duration <= 0.0 {
            return Err(SignalError::InvalidDuration { id, duration });
        }

        let mut previous: Option<f64> = None;
        for (index, point) in data.iter().enumerate() {
            let ordered = point.time.is_finite()
                && point.time >= 0.0
                && point.time <= duration
                && previous.map_or(true, |prev| point.time > prev);
            if !ordered {
                return Err(SignalError::UnorderedSamples {
                    id,
                    index,
                    time: point.time,
                });
            }
            previous = Some(point.time);
        }

        Ok(Self {
            id,
            name: name.into(),
            description: description.into(),
            data,
            sample_rate,
            duration,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn data(&self) -> &[SignalPoint] {
        &self.data
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Sample index nearest to `time` when indices are spread evenly over
    /// the duration. Used for the hover readout.
    pub fn sample_index_near(&self, time: f64) -> usize {
        let last = self.data.len() - 1;
        let ratio = (time / self.duration).clamp(0.0, 1.0);
        ((ratio * last as f64).round() as usize).min(last)
    }

    pub fn sample_near(&self, time: f64) -> SignalPoint {
        self.data[self.sample_index_near(time)]
    }

    /// Minimum and maximum sample values.
    pub fn value_range(&self) -> (f64, f64) {
        self.data
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
                (lo.min(p.value), hi.max(p.value))
            })
    }
}
