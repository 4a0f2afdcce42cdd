//! Run progress tracking

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One full platform revolution
pub const FULL_TURN_DEG: f32 = 360.0;

/// Progress value meaning "not currently recording"
pub const SENTINEL_PROGRESS: f32 = -1.0;

/// State of the current (or last) recording run
///
/// `progress_deg` is the sentinel whenever no run is active. The frame
/// counters and the `cancelled` flag of the last run stay readable after it
/// ends.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SequenceState {
    /// Frames requested
    pub target_frame_count: u16,
    /// Shutter triggers fired
    pub frames_completed: u16,
    /// Rotation completed in degrees, or the sentinel when idle
    pub progress_deg: f32,
    /// Last run ended by cancellation
    pub cancelled: bool,
}

impl Default for SequenceState {
    fn default() -> Self {
        Self::idle()
    }
}

impl SequenceState {
    /// State before any run
    pub const fn idle() -> Self {
        Self {
            target_frame_count: 0,
            frames_completed: 0,
            progress_deg: SENTINEL_PROGRESS,
            cancelled: false,
        }
    }

    /// Fresh state for a run of `target_frame_count` frames
    pub const fn recording(target_frame_count: u16) -> Self {
        Self {
            target_frame_count,
            frames_completed: 0,
            progress_deg: 0.0,
            cancelled: false,
        }
    }

    /// Check if a run is active
    pub fn is_recording(&self) -> bool {
        self.progress_deg >= 0.0
    }

    /// Angular distance between consecutive frames
    pub fn segment_deg(&self) -> f32 {
        if self.target_frame_count == 0 {
            return 0.0;
        }
        FULL_TURN_DEG / self.target_frame_count as f32
    }

    /// Check if every requested frame has been captured
    pub fn all_frames_captured(&self) -> bool {
        self.frames_completed >= self.target_frame_count
    }

    /// Record a completed segment move
    ///
    /// Progress never exceeds one full turn.
    pub fn advance(&mut self, segment_deg: f32) {
        if self.is_recording() {
            self.progress_deg = (self.progress_deg + segment_deg).min(FULL_TURN_DEG);
        }
    }

    /// End the run, resetting progress to the sentinel
    pub fn end(&mut self, cancelled: bool) {
        self.progress_deg = SENTINEL_PROGRESS;
        self.cancelled = cancelled;
    }
}
