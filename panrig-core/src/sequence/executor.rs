//! Recording sequencer
//!
//! Runs a panoramic capture: for each of N frames it reports progress,
//! fires the shutter, moves one `360 / N` degree segment with the
//! trapezoidal profile, and lets the platform settle before the next frame.
//!
//! Cancellation abandons the remaining frames. Captured frames are kept and
//! the platform is left where it stopped; it is not rewound.

use embedded_hal::delay::DelayNs;

use super::progress::SequenceState;
use crate::config::{RigConfig, SequenceConfig};
use crate::motion::{MotionController, MoveError, MoveOutcome, TrapezoidalProfile};
use crate::state::{Event, State};
use crate::traits::{CancelSignal, PhaseOutputs, ProgressReport, ProgressSink, Shutter};

/// Longest settle slice between cancel samples
pub const SETTLE_POLL_MS: u32 = 10;

/// Non-fatal notice about a start request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Advisory {
    /// More frames than the motor can usefully separate; the run proceeds
    FrameCountAboveResolution {
        /// Requested frame count
        frames: u16,
        /// Configured advisory threshold
        threshold: u16,
    },
}

/// Errors that can occur while sequencing
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SequenceError<E> {
    /// Frame count must be at least 1
    InvalidFrameCount,
    /// A run is already active
    AlreadyRecording,
    /// No run is active
    NotRecording,
    /// Motion failed; the run was terminated
    Motion(MoveError<E>),
}

impl<E> From<MoveError<E>> for SequenceError<E> {
    fn from(err: MoveError<E>) -> Self {
        SequenceError::Motion(err)
    }
}

/// Totals for a finished or cancelled run
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RunSummary {
    /// Shutter triggers fired
    pub frames_captured: u16,
    /// Frames requested
    pub target_frame_count: u16,
    /// Degrees physically traveled, including partial segments
    pub traveled_deg: f32,
    /// Run ended by cancellation
    pub cancelled: bool,
}

/// Result of advancing the run by one frame
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameOutcome {
    /// Frame captured and segment moved; more frames remain
    Captured {
        /// Frames captured so far
        frames_completed: u16,
    },
    /// All frames captured
    Finished(RunSummary),
    /// Cancel observed; remaining frames abandoned
    Cancelled(RunSummary),
}

impl FrameOutcome {
    /// Check if the run has ended
    pub fn is_terminal(&self) -> bool {
        !matches!(self, FrameOutcome::Captured { .. })
    }
}

/// Result of a complete [`Sequencer::record`] call
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RunReport {
    /// Run totals
    pub summary: RunSummary,
    /// Notice raised when the run was started
    pub advisory: Option<Advisory>,
}

/// Panoramic recording sequencer
///
/// Owns the motion controller and the shutter and progress collaborators.
/// Moves are issued one at a time and the shutter only fires while the
/// platform is stationary.
#[derive(Debug)]
pub struct Sequencer<O, D, C, S, P> {
    motion: MotionController<O, D, C>,
    shutter: S,
    progress: P,
    profile: TrapezoidalProfile,
    config: SequenceConfig,
    state: State,
    sequence: SequenceState,
    /// Degrees traveled in the current run
    traveled_deg: f32,
}

impl<O, D, C, S, P> Sequencer<O, D, C, S, P>
where
    O: PhaseOutputs,
    D: DelayNs,
    C: CancelSignal,
    S: Shutter,
    P: ProgressSink,
{
    /// Create a new sequencer
    pub fn new(
        motion: MotionController<O, D, C>,
        shutter: S,
        progress: P,
        config: SequenceConfig,
        profile: TrapezoidalProfile,
    ) -> Self {
        Self {
            motion,
            shutter,
            progress,
            profile,
            config,
            state: State::Idle,
            sequence: SequenceState::idle(),
            traveled_deg: 0.0,
        }
    }

    /// Create a sequencer with settings and speed profile from the rig config
    pub fn from_config(
        motion: MotionController<O, D, C>,
        shutter: S,
        progress: P,
        config: &RigConfig,
    ) -> Self {
        Self::new(
            motion,
            shutter,
            progress,
            config.sequence,
            TrapezoidalProfile::from_config(&config.motion),
        )
    }

    /// Current state
    pub fn state(&self) -> State {
        self.state
    }

    /// Current (or last) run state
    pub fn sequence_state(&self) -> &SequenceState {
        &self.sequence
    }

    /// Get the motion controller
    pub fn motion(&self) -> &MotionController<O, D, C> {
        &self.motion
    }

    /// Get the motion controller mutably
    ///
    /// Used for ad-hoc moves and coil release while idle.
    pub fn motion_mut(&mut self) -> &mut MotionController<O, D, C> {
        &mut self.motion
    }

    /// Start a run of `target_frame_count` frames
    ///
    /// Frame counts at or above the configured threshold are accepted with
    /// an advisory.
    pub fn begin(
        &mut self,
        target_frame_count: u16,
    ) -> Result<Option<Advisory>, SequenceError<O::Error>> {
        if self.state.is_recording() {
            return Err(SequenceError::AlreadyRecording);
        }
        if target_frame_count < 1 {
            return Err(SequenceError::InvalidFrameCount);
        }

        let threshold = self.config.frame_warning_threshold;
        let advisory = if target_frame_count >= threshold {
            #[cfg(feature = "defmt")]
            defmt::warn!(
                "{} frames requested, recommended below {}",
                target_frame_count,
                threshold
            );
            Some(Advisory::FrameCountAboveResolution {
                frames: target_frame_count,
                threshold,
            })
        } else {
            None
        };

        self.state = self.state.transition(Event::Start);
        self.sequence = SequenceState::recording(target_frame_count);
        self.traveled_deg = 0.0;

        #[cfg(feature = "defmt")]
        defmt::info!(
            "Recording {} frames, {} deg per segment",
            target_frame_count,
            self.sequence.segment_deg()
        );

        Ok(advisory)
    }

    /// Capture the next frame and move one segment
    ///
    /// The cancel signal is sampled before the frame starts, after every
    /// step of the move, and every [`SETTLE_POLL_MS`] while settling. When
    /// the run ends (all frames, cancel, or motion failure) the
    /// state returns to idle and progress to the sentinel before this
    /// returns.
    pub fn next_frame(&mut self) -> Result<FrameOutcome, SequenceError<O::Error>> {
        if !self.state.motor_allowed() {
            return Err(SequenceError::NotRecording);
        }

        if self.motion.cancel_requested() {
            return Ok(FrameOutcome::Cancelled(self.finish(Event::Cancelled)));
        }

        self.progress.on_progress(ProgressReport {
            frames_completed: self.sequence.frames_completed,
            target_frame_count: self.sequence.target_frame_count,
            progress_deg: self.sequence.progress_deg,
        });

        self.shutter.trigger();
        self.sequence.frames_completed += 1;

        #[cfg(feature = "defmt")]
        defmt::debug!(
            "Frame {}/{}",
            self.sequence.frames_completed,
            self.sequence.target_frame_count
        );

        let segment = self.sequence.segment_deg();
        match self.motion.move_by(segment, &self.profile) {
            Ok(MoveOutcome::Completed(travel)) => {
                self.traveled_deg += travel.degrees;
                self.sequence.advance(segment);
            }
            Ok(MoveOutcome::Cancelled(travel)) => {
                self.traveled_deg += travel.degrees;
                return Ok(FrameOutcome::Cancelled(self.finish(Event::Cancelled)));
            }
            Err(err) => {
                self.traveled_deg += err.travel.degrees;
                self.finish(Event::Fault);
                return Err(err.into());
            }
        }

        if self.sequence.all_frames_captured() {
            return Ok(FrameOutcome::Finished(self.finish(Event::FramesExhausted)));
        }

        if self.settle() {
            return Ok(FrameOutcome::Cancelled(self.finish(Event::Cancelled)));
        }

        Ok(FrameOutcome::Captured {
            frames_completed: self.sequence.frames_completed,
        })
    }

    /// Run a complete recording, blocking until it ends
    pub fn record(
        &mut self,
        target_frame_count: u16,
    ) -> Result<RunReport, SequenceError<O::Error>> {
        let advisory = self.begin(target_frame_count)?;

        loop {
            match self.next_frame()? {
                FrameOutcome::Captured { .. } => continue,
                FrameOutcome::Finished(summary) | FrameOutcome::Cancelled(summary) => {
                    return Ok(RunReport { summary, advisory });
                }
            }
        }
    }

    /// Let the platform settle; returns true if cancel was raised meanwhile
    fn settle(&mut self) -> bool {
        let mut remaining = self.config.settle_ms;
        while remaining > 0 {
            let slice = remaining.min(SETTLE_POLL_MS);
            self.motion.pause_ms(slice);
            remaining -= slice;

            if self.motion.cancel_requested() {
                return true;
            }
        }
        false
    }

    /// Leave the recording state and reset progress
    fn finish(&mut self, event: Event) -> RunSummary {
        let cancelled = event == Event::Cancelled;
        let summary = RunSummary {
            frames_captured: self.sequence.frames_completed,
            target_frame_count: self.sequence.target_frame_count,
            traveled_deg: self.traveled_deg,
            cancelled,
        };

        self.state = self.state.transition(event);
        self.sequence.end(cancelled);

        #[cfg(feature = "defmt")]
        match event {
            Event::Cancelled => defmt::info!(
                "Recording cancelled after {}/{} frames",
                summary.frames_captured,
                summary.target_frame_count
            ),
            Event::Fault => defmt::error!("Recording aborted: output fault"),
            _ => defmt::info!("Recording done, {} frames", summary.frames_captured),
        }

        summary
    }
}
