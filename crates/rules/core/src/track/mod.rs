//! Progress tracks and clocks, plus the documents that persist them.

mod clock;
mod document;
mod progress;

pub use clock::{Clock, ClockError};
pub use document::{ClockDocument, ProgressTrackDocument};
pub use progress::{BOXES, ChallengeRank, MAX_TICKS, ProgressTrack, TICKS_PER_BOX};
