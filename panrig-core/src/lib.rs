//! Board-agnostic core logic for the panoramic turntable firmware
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Collaborator traits (coil outputs, shutter, cancel input, progress)
//! - Phase driver for 4-phase full-step sequencing
//! - Speed profiles (trapezoidal ramp, constant speed)
//! - Motion controller (degrees to steps, cancellation)
//! - Sequencer for a full panoramic recording
//! - Configuration types and parser

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod config;
pub mod motion;
pub mod sequence;
pub mod state;
pub mod traits;
