//! Panoramic recording sequencer
//!
//! Splits a full revolution into equal segments and, for each frame,
//! reports progress, fires the shutter, and moves one segment.

pub mod executor;
pub mod progress;

pub use executor::{
    Advisory, FrameOutcome, RunReport, RunSummary, SequenceError, Sequencer, SETTLE_POLL_MS,
};
pub use progress::{SequenceState, FULL_TURN_DEG, SENTINEL_PROGRESS};
