//! Progress output over RTT

use defmt::info;
use panrig_core::traits::{ProgressReport, ProgressSink};

/// Logs each frame's progress over defmt
pub struct DefmtProgress;

impl ProgressSink for DefmtProgress {
    fn on_progress(&mut self, report: ProgressReport) {
        info!(
            "Frame {}/{} at {}°",
            report.current_frame(),
            report.target_frame_count,
            report.progress_deg
        );
    }
}
