//! ULN2003 coil driver board
//!
//! The ULN2003 darlington array sinks coil current for 28BYJ-48 style
//! unipolar steppers. Each of IN1..IN4 is driven by one GPIO; a high pin
//! energizes the matching coil.

use embedded_hal::digital::OutputPin;
use panrig_core::traits::{PhaseOutputs, PhasePattern};

/// Four GPIO lines wired to IN1..IN4 of a ULN2003 board
#[derive(Debug)]
pub struct Uln2003<P> {
    pins: [P; 4],
}

impl<P: OutputPin> Uln2003<P> {
    /// Create the driver from pins in IN1..IN4 order
    ///
    /// The pins are left untouched; call [`release`](Self::release) to
    /// start with the coils off.
    pub fn new(pins: [P; 4]) -> Self {
        Self { pins }
    }

    /// Drive all lines low
    pub fn release(&mut self) -> Result<(), P::Error> {
        self.set_outputs(PhasePattern::RELEASED)
    }

    /// Give the pins back
    pub fn into_pins(self) -> [P; 4] {
        self.pins
    }
}

impl<P: OutputPin> PhaseOutputs for Uln2003<P> {
    type Error = P::Error;

    /// Write IN1 first; stops at the first pin that fails
    fn set_outputs(&mut self, pattern: PhasePattern) -> Result<(), Self::Error> {
        for (pin, on) in self.pins.iter_mut().zip(pattern.lines()) {
            if on {
                pin.set_high()?;
            } else {
                pin.set_low()?;
            }
        }
        Ok(())
    }
}
