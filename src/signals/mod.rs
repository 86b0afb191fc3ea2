pub mod generator;

pub use generator::{SignalGenerator, Waveform};

use crate::{error::SignalError, models::Signal};

pub const FIXTURE_DURATION_SECS: f64 = 10.0;
pub const FIXTURE_SAMPLE_RATE: f64 = 100.0;

struct Fixture {
    id: &'static str,
    name: &'static str,
    description: &'static str,
    waveform: Waveform,
}

const FIXTURES: [Fixture; 3] = [
    Fixture {
        id: "ecg-signal",
        name: "ECG Signal",
        description: "Simulated ECG signal with regular heartbeat patterns",
        waveform: Waveform::Ecg,
    },
    Fixture {
        id: "sensor-data",
        name: "Sensor Data",
        description: "Multi-frequency sensor readings with noise",
        waveform: Waveform::Sensor,
    },
    Fixture {
        id: "random-walk",
        name: "Random Walk",
        description: "Random walk signal for testing",
        waveform: Waveform::RandomWalk,
    },
];

/// Builds the stock signals. A `seed` makes the noise reproducible.
pub fn default_signals(seed: Option<u64>) -> Result<Vec<Signal>, SignalError> {
    FIXTURES
        .iter()
        .enumerate()
        .map(|(offset, fixture)| {
            let generator = match seed {
                Some(seed) => SignalGenerator::seeded(
                    fixture.waveform,
                    FIXTURE_DURATION_SECS,
                    FIXTURE_SAMPLE_RATE,
                    seed.wrapping_add(offset as u64),
                ),
                None => SignalGenerator::new(
                    fixture.waveform,
                    FIXTURE_DURATION_SECS,
                    FIXTURE_SAMPLE_RATE,
                ),
            };
            Signal::new(
                fixture.id,
                fixture.name,
                fixture.description,
                generator.collect(),
                FIXTURE_SAMPLE_RATE,
                FIXTURE_DURATION_SECS,
            )
        })
        .collect()
}
