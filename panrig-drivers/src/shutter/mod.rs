//! Shutter release drivers

pub mod gpio;

pub use gpio::GpioShutter;
