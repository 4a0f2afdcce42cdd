//! Coil output trait
//!
//! Abstracts the four driver lines of a unipolar stepper (ULN2003 IN1..IN4
//! or equivalent).

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Energization state of the four coil lines
///
/// Index 0 is IN1, index 3 is IN4. `true` means the line is driven.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PhasePattern(pub [bool; 4]);

impl PhasePattern {
    /// All four lines off (coils released)
    pub const RELEASED: Self = Self([false; 4]);

    /// Create a pattern from four line states
    pub const fn new(lines: [bool; 4]) -> Self {
        Self(lines)
    }

    /// Get the line states
    pub const fn lines(&self) -> [bool; 4] {
        self.0
    }

    /// Number of energized lines
    pub fn energized(&self) -> usize {
        self.0.iter().filter(|on| **on).count()
    }
}

/// Trait for the coil output bank
///
/// The implementation owns pin configuration and is expected to be
/// synchronous. A failed write is fatal for the motion in progress; callers
/// never retry.
pub trait PhaseOutputs {
    /// Error returned when a line cannot be written
    type Error;

    /// Drive all four lines to the given pattern
    fn set_outputs(&mut self, pattern: PhasePattern) -> Result<(), Self::Error>;
}

impl<T: PhaseOutputs + ?Sized> PhaseOutputs for &mut T {
    type Error = T::Error;

    fn set_outputs(&mut self, pattern: PhasePattern) -> Result<(), Self::Error> {
        (**self).set_outputs(pattern)
    }
}
