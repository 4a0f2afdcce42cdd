//! Shutter trigger trait

/// Trait for the camera shutter release
///
/// Triggering is fire-and-forget: the call returns once the release has been
/// signalled and its duration is expected to be short relative to the settle
/// interval between frames.
pub trait Shutter {
    /// Fire the shutter once
    fn trigger(&mut self);
}

impl<T: Shutter + ?Sized> Shutter for &mut T {
    fn trigger(&mut self) {
        (**self).trigger()
    }
}
