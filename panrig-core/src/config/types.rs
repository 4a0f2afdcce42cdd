//! Configuration type definitions

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Full steps per 360° revolution of the platform
pub const DEFAULT_STEPS_PER_REVOLUTION: u16 = 512;

/// Stall-safe minimum step rate (steps per second)
pub const MIN_SPEED: f32 = 20.0;

/// Plateau step rate (steps per second)
pub const MAX_SPEED: f32 = 100.0;

/// Angular distance over which the speed ramps between min and max
pub const RAMP_SPAN_DEG: f32 = 10.0;

/// Pause between frames so the platform can stop vibrating
pub const DEFAULT_SETTLE_MS: u32 = 1000;

/// Frame counts at or above this exceed one frame per resolvable step range
pub const FRAME_WARNING_THRESHOLD: u16 = 360;

/// Configuration validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Steps per revolution must be non-zero
    ZeroStepsPerRevolution,
    /// Speeds must satisfy 0 < min <= max
    InvalidSpeedRange,
    /// Ramp span must be finite and non-negative
    InvalidRampSpan,
    /// Default frame count must be at least 1
    InvalidFrameCount,
}

/// Motor and speed profile configuration
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MotionConfig {
    /// Full steps per platform revolution
    pub steps_per_revolution: u16,
    /// Minimum step rate (steps/s), used for short moves and ramp ends
    pub min_speed: f32,
    /// Maximum step rate (steps/s) on the plateau
    pub max_speed: f32,
    /// Ramp length in degrees at each end of a move
    pub ramp_span_deg: f32,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            steps_per_revolution: DEFAULT_STEPS_PER_REVOLUTION,
            min_speed: MIN_SPEED,
            max_speed: MAX_SPEED,
            ramp_span_deg: RAMP_SPAN_DEG,
        }
    }
}

impl MotionConfig {
    /// Degrees traversed per full step
    pub fn ratio(&self) -> f32 {
        360.0 / self.steps_per_revolution as f32
    }

    /// Check the values are usable
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.steps_per_revolution == 0 {
            return Err(ConfigError::ZeroStepsPerRevolution);
        }
        if !(self.min_speed > 0.0 && self.min_speed <= self.max_speed && self.max_speed.is_finite())
        {
            return Err(ConfigError::InvalidSpeedRange);
        }
        if !(self.ramp_span_deg >= 0.0 && self.ramp_span_deg.is_finite()) {
            return Err(ConfigError::InvalidRampSpan);
        }
        Ok(())
    }
}

/// Recording sequence configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SequenceConfig {
    /// Frame count used when a run is started without a UI selection
    pub default_frames: u16,
    /// Pause between frames in milliseconds
    pub settle_ms: u32,
    /// Frame counts at or above this produce an advisory
    pub frame_warning_threshold: u16,
}

impl Default for SequenceConfig {
    fn default() -> Self {
        Self {
            default_frames: 12,
            settle_ms: DEFAULT_SETTLE_MS,
            frame_warning_threshold: FRAME_WARNING_THRESHOLD,
        }
    }
}

/// Shutter release configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ShutterConfig {
    /// How long the release line is held asserted
    pub pulse_ms: u32,
    /// Release line is asserted low (e.g. open-collector optocoupler)
    pub active_low: bool,
}

impl Default for ShutterConfig {
    fn default() -> Self {
        Self {
            pulse_ms: 100,
            active_low: false,
        }
    }
}

/// Complete rig configuration
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RigConfig {
    /// Motor and speed profile
    pub motion: MotionConfig,
    /// Recording sequence
    pub sequence: SequenceConfig,
    /// Shutter release
    pub shutter: ShutterConfig,
}

impl RigConfig {
    /// Validate all sections
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.motion.validate()?;
        if self.sequence.default_frames == 0 {
            return Err(ConfigError::InvalidFrameCount);
        }
        Ok(())
    }
}
