//! Push-button cancel input
//!
//! Expects a normally-open button to ground with a pull-up, so a pressed
//! button reads low. A press is latched: once seen, the signal stays raised
//! until [`ButtonCancel::reset`] is called, so a short tap between two
//! samples is not lost once it has been observed.

use embedded_hal::digital::InputPin;
use panrig_core::traits::CancelSignal;

/// Latching cancel button
#[derive(Debug)]
pub struct ButtonCancel<P> {
    pin: P,
    latched: bool,
}

impl<P: InputPin> ButtonCancel<P> {
    /// Create a cancel input on an active-low pin
    pub fn new(pin: P) -> Self {
        Self {
            pin,
            latched: false,
        }
    }

    /// Clear the latch before the next run
    pub fn reset(&mut self) {
        self.latched = false;
    }

    /// Check if a press has been latched
    pub fn is_latched(&self) -> bool {
        self.latched
    }

    /// Give the pin back
    pub fn into_pin(self) -> P {
        self.pin
    }
}

impl<P: InputPin> CancelSignal for ButtonCancel<P> {
    fn is_cancel_requested(&mut self) -> bool {
        if !self.latched {
            // A pin that cannot be read counts as not pressed
            self.latched = self.pin.is_low().unwrap_or(false);

            #[cfg(feature = "defmt")]
            if self.latched {
                defmt::info!("Cancel button pressed");
            }
        }
        self.latched
    }
}
