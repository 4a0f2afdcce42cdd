//! Shared-flag cancel input
//!
//! Lets another task or an interrupt handler request cancellation by
//! setting an `AtomicBool`. Only plain loads and stores are used, which
//! Cortex-M0+ supports without atomic read-modify-write.

use core::sync::atomic::{AtomicBool, Ordering};

use panrig_core::traits::CancelSignal;

/// Cancel signal backed by a shared flag
#[derive(Debug, Clone, Copy)]
pub struct FlagCancel<'a> {
    flag: &'a AtomicBool,
}

impl<'a> FlagCancel<'a> {
    /// Create a cancel signal reading `flag`
    pub fn new(flag: &'a AtomicBool) -> Self {
        Self { flag }
    }

    /// Raise the flag
    pub fn request(&self) {
        self.flag.store(true, Ordering::Release);
    }

    /// Lower the flag
    pub fn clear(&self) {
        self.flag.store(false, Ordering::Release);
    }
}

impl CancelSignal for FlagCancel<'_> {
    fn is_cancel_requested(&mut self) -> bool {
        self.flag.load(Ordering::Acquire)
    }
}
