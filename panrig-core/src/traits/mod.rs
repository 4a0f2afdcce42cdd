//! Collaborator traits
//!
//! These traits define the interface between the motion and sequencing
//! logic and the hardware-specific implementations. Time is provided by
//! [`embedded_hal::delay::DelayNs`].

pub mod cancel;
pub mod outputs;
pub mod progress;
pub mod shutter;

pub use cancel::CancelSignal;
pub use outputs::{PhaseOutputs, PhasePattern};
pub use progress::{ProgressReport, ProgressSink};
pub use shutter::Shutter;
