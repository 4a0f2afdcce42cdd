//! Speed profiles
//!
//! A speed profile maps (degrees already traveled, total degrees) to an
//! instantaneous step rate in steps per second. Profiles are pure: the same
//! inputs always produce the same rate.

use super::error::InvalidInput;
use crate::config::{MotionConfig, MAX_SPEED, MIN_SPEED, RAMP_SPAN_DEG};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Strategy for choosing the step rate during a move
pub trait SpeedProfile {
    /// Step rate for the given progress through a move of `total_deg`
    fn rate(&self, progress_deg: f32, total_deg: f32) -> f32;
}

impl<F: Fn(f32, f32) -> f32> SpeedProfile for F {
    fn rate(&self, progress_deg: f32, total_deg: f32) -> f32 {
        self(progress_deg, total_deg)
    }
}

/// Fixed step rate for the whole move
///
/// This is the default policy for ad-hoc moves.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ConstantSpeed(pub f32);

impl Default for ConstantSpeed {
    fn default() -> Self {
        Self(MAX_SPEED)
    }
}

impl SpeedProfile for ConstantSpeed {
    fn rate(&self, _progress_deg: f32, _total_deg: f32) -> f32 {
        self.0
    }
}

/// Trapezoidal ramp: accelerate, plateau, decelerate
///
/// Moves shorter than two ramp spans run entirely at the minimum speed.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TrapezoidalProfile {
    /// Rate at the start and end of the move
    pub min_speed: f32,
    /// Plateau rate
    pub max_speed: f32,
    /// Ramp length at each end in degrees
    pub ramp_span_deg: f32,
}

impl Default for TrapezoidalProfile {
    fn default() -> Self {
        Self {
            min_speed: MIN_SPEED,
            max_speed: MAX_SPEED,
            ramp_span_deg: RAMP_SPAN_DEG,
        }
    }
}

impl TrapezoidalProfile {
    /// Build the profile from motion configuration
    pub fn from_config(config: &MotionConfig) -> Self {
        Self {
            min_speed: config.min_speed,
            max_speed: config.max_speed,
            ramp_span_deg: config.ramp_span_deg,
        }
    }
}

impl SpeedProfile for TrapezoidalProfile {
    fn rate(&self, progress_deg: f32, total_deg: f32) -> f32 {
        let span = self.ramp_span_deg;

        if span <= 0.0 {
            return self.max_speed;
        }

        if total_deg < 2.0 * span {
            return self.min_speed;
        }

        let slope = (self.max_speed - self.min_speed) / span;

        if progress_deg < span {
            return self.min_speed + slope * progress_deg;
        }

        let until_slowdown = total_deg - span;
        if progress_deg >= until_slowdown {
            return self.max_speed - slope * (progress_deg - until_slowdown);
        }

        self.max_speed
    }
}

/// Convert a step rate into the per-step hold time in microseconds
///
/// Rates so low that the hold exceeds `u32::MAX` µs saturate.
pub fn step_delay_us(rate: f32) -> Result<u32, InvalidInput> {
    if !(rate > 0.0) || !rate.is_finite() {
        return Err(InvalidInput::NonPositiveSpeed);
    }

    let delay_us = 1_000_000.0 / rate;
    if delay_us < 1.0 {
        return Err(InvalidInput::ZeroDelay);
    }

    Ok(delay_us as u32)
}
