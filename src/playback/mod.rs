pub mod clock;
pub mod state;

pub use clock::{PlaybackClock, TickOutcome};
pub use state::PlaybackState;
