//! Cancellation input trait
//!
//! Cancellation is pull-based: the motion controller samples the signal
//! once per physical step and the sequencer samples it between frames.

/// Trait for the user cancel request
///
/// Takes `&mut self` so implementations may debounce or latch the
/// underlying input. Sampling must not have side effects visible to the
/// motion logic.
pub trait CancelSignal {
    /// Check whether cancellation has been requested
    fn is_cancel_requested(&mut self) -> bool;
}

/// Fixed answer, for rigs without a cancel input
impl CancelSignal for bool {
    fn is_cancel_requested(&mut self) -> bool {
        *self
    }
}

impl<T: CancelSignal + ?Sized> CancelSignal for &mut T {
    fn is_cancel_requested(&mut self) -> bool {
        (**self).is_cancel_requested()
    }
}
