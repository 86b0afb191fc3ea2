use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f64::consts::PI;

use crate::models::SignalPoint;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    /// Slow sine with a decaying spike once per beat.
    Ecg,
    /// Three summed sines plus noise.
    Sensor,
    /// Clamped random walk.
    RandomWalk,
}

const ECG_HEART_RATE_HZ: f64 = 1.2;
const WALK_LIMIT: f64 = 3.0;

/// Synthetic sample source, one point per `next()`.
pub struct SignalGenerator {
    waveform: Waveform,
    sample_rate: f64,
    total_samples: usize,
    index: usize,
    last_value: f64,
    rng: StdRng,
}

impl SignalGenerator {
    pub fn new(waveform: Waveform, duration: f64, sample_rate: f64) -> Self {
        Self::with_rng(waveform, duration, sample_rate, StdRng::from_entropy())
    }

    pub fn seeded(waveform: Waveform, duration: f64, sample_rate: f64, seed: u64) -> Self {
        Self::with_rng(waveform, duration, sample_rate, StdRng::seed_from_u64(seed))
    }

    fn with_rng(waveform: Waveform, duration: f64, sample_rate: f64, rng: StdRng) -> Self {
        Self {
            waveform,
            sample_rate,
            total_samples: (duration * sample_rate).round().max(0.0) as usize,
            index: 0,
            last_value: 0.0,
            rng,
        }
    }

    fn value_at(&mut self, index: usize, time: f64) -> f64 {
        match self.waveform {
            Waveform::Ecg => {
                let mut value = (2.0 * PI * ECG_HEART_RATE_HZ * time).sin() * 0.3;
                let beat_period = ((self.sample_rate / ECG_HEART_RATE_HZ).floor() as usize).max(1);
                let phase = index % beat_period;
                if phase < 5 {
                    value += (-(phase as f64)).exp() * 2.0;
                }
                value + self.rng.gen_range(-0.5..0.5) * 0.1
            }
            Waveform::Sensor => {
                (2.0 * PI * 0.5 * time).sin() * 2.0
                    + (2.0 * PI * 1.5 * time).sin() * 0.5
                    + (2.0 * PI * 4.0 * time).sin() * 0.2
                    + self.rng.gen_range(-0.5..0.5) * 0.3
            }
            Waveform::RandomWalk => {
                let step = self.rng.gen_range(-0.5..0.5) * 0.5;
                (self.last_value + step).clamp(-WALK_LIMIT, WALK_LIMIT)
            }
        }
    }
}

impl Iterator for SignalGenerator {
    type Item = SignalPoint;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.total_samples {
            return None;
        }

        let index = self.index;
        let time = index as f64 / self.sample_rate;
        let value = self.value_at(index, time);

        self.last_value = value;
        self.index += 1;
        Some(SignalPoint { time, value })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.total_samples - self.index;
        (remaining, Some(remaining))
    }
}
