//! GPIO shutter release
//!
//! Pulses a GPIO wired to the camera's remote port (via optocoupler or
//! transistor). The line is asserted for the configured pulse length and
//! then returned to idle.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use panrig_core::config::ShutterConfig;
use panrig_core::traits::Shutter;

/// Shutter release on a single GPIO
#[derive(Debug)]
pub struct GpioShutter<P, D> {
    pin: P,
    delay: D,
    pulse_ms: u32,
    /// If true, release asserted = pin LOW
    active_low: bool,
    /// Pulses where the pin write failed
    faults: u32,
}

impl<P: OutputPin, D: DelayNs> GpioShutter<P, D> {
    /// Create a new shutter output
    ///
    /// The pin is driven to its idle level immediately.
    pub fn new(pin: P, delay: D, config: &ShutterConfig) -> Self {
        let mut shutter = Self {
            pin,
            delay,
            pulse_ms: config.pulse_ms,
            active_low: config.active_low,
            faults: 0,
        };
        if shutter.drive(false).is_err() {
            shutter.faults += 1;
        }
        shutter
    }

    /// Number of trigger attempts that hit a pin error
    pub fn faults(&self) -> u32 {
        self.faults
    }

    /// Give the pin and delay back
    pub fn into_parts(self) -> (P, D) {
        (self.pin, self.delay)
    }

    fn drive(&mut self, asserted: bool) -> Result<(), P::Error> {
        if asserted != self.active_low {
            self.pin.set_high()
        } else {
            self.pin.set_low()
        }
    }
}

impl<P: OutputPin, D: DelayNs> Shutter for GpioShutter<P, D> {
    fn trigger(&mut self) {
        let result = self.drive(true).and_then(|()| {
            self.delay.delay_ms(self.pulse_ms);
            self.drive(false)
        });

        if result.is_err() {
            // Always try to leave the line idle
            let _ = self.drive(false);
            self.faults += 1;

            #[cfg(feature = "defmt")]
            defmt::warn!("Shutter pin write failed");
        }
    }
}
