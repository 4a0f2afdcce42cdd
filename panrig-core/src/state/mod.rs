//! Recording state machine
//!
//! The sequencer is either idle or recording. The state machine is explicit,
//! finite, and deterministic.

pub mod events;
pub mod machine;

pub use events::Event;
pub use machine::State;
