//! Progress reporting trait

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Snapshot passed to the UI once per frame, before the shutter fires
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ProgressReport {
    /// Frames already captured in this run
    pub frames_completed: u16,
    /// Frames requested for this run
    pub target_frame_count: u16,
    /// Rotation completed so far in degrees
    pub progress_deg: f32,
}

impl ProgressReport {
    /// 1-based number of the frame about to be captured
    pub fn current_frame(&self) -> u16 {
        self.frames_completed + 1
    }
}

/// Trait for the progress renderer
///
/// The core does not wait for rendering to complete.
pub trait ProgressSink {
    /// Receive a progress snapshot
    fn on_progress(&mut self, report: ProgressReport);
}

/// Discards all reports
impl ProgressSink for () {
    fn on_progress(&mut self, _report: ProgressReport) {}
}

impl<T: ProgressSink + ?Sized> ProgressSink for &mut T {
    fn on_progress(&mut self, report: ProgressReport) {
        (**self).on_progress(report)
    }
}
