//! Motion control
//!
//! Full-step phase sequencing, speed profiles, and conversion of angular
//! moves into discrete steps.

pub mod controller;
pub mod error;
pub mod phase;
pub mod profile;

pub use controller::{MotionController, MoveError, MoveOutcome, Travel, MAX_STEPS_PER_MOVE};
pub use error::{InvalidInput, MotionError};
pub use phase::{Direction, PhaseDriver, FULL_STEP_SEQUENCE};
pub use profile::{step_delay_us, ConstantSpeed, SpeedProfile, TrapezoidalProfile};
