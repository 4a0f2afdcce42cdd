//! Events that trigger state transitions

/// Events that can trigger state transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    /// Start command with a valid frame count
    Start,
    /// Last frame captured and its segment moved
    FramesExhausted,
    /// Cancel signal observed during motion or between frames
    Cancelled,
    /// Output hardware failed; the run cannot continue
    Fault,
}

impl Event {
    /// Check if this event ends a recording
    pub fn is_terminal(&self) -> bool {
        matches!(self, Event::FramesExhausted | Event::Cancelled | Event::Fault)
    }
}
