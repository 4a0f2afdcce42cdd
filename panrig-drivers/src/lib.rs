//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in panrig-core on top of `embedded-hal` pins:
//!
//! - Coil outputs (ULN2003 darlington board)
//! - Shutter release (GPIO pulse, optocoupler or remote cable)
//! - Cancel inputs (push button, shared flag)

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod input;
pub mod phase;
pub mod shutter;
