//! Panrig - Panoramic Turntable Firmware
//!
//! Main firmware binary for RP2040-based turntable controllers. Drives a
//! 28BYJ-48 stepper through a ULN2003 board and fires the camera between
//! moves until a full revolution has been captured.
//!
//! Wiring:
//! - GP2..GP5: ULN2003 IN1..IN4
//! - GP6: shutter release
//! - GP7: cancel button (to ground)
//! - GP8: start button (to ground)

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_time::{Delay, Timer};
use {defmt_rtt as _, panic_probe as _};

use panrig_core::config::{parse_config, RigConfig};
use panrig_core::motion::{MotionController, PhaseDriver};
use panrig_core::sequence::{Advisory, Sequencer};
use panrig_drivers::input::ButtonCancel;
use panrig_drivers::phase::Uln2003;
use panrig_drivers::shutter::GpioShutter;

use crate::progress::DefmtProgress;

mod progress;

/// Embedded default configuration (compiled into firmware)
/// Edit rig.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../rig.toml");

/// Start button debounce
const DEBOUNCE_MS: u64 = 50;

/// Main entry point
#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    info!("Panrig firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let config = load_config();

    let mut coils = Uln2003::new([
        Output::new(p.PIN_2, Level::Low),
        Output::new(p.PIN_3, Level::Low),
        Output::new(p.PIN_4, Level::Low),
        Output::new(p.PIN_5, Level::Low),
    ]);
    if coils.release().is_err() {
        warn!("Failed to release coils");
    }

    let shutter_level = if config.shutter.active_low {
        Level::High
    } else {
        Level::Low
    };
    let shutter_pin = Output::new(p.PIN_6, shutter_level);
    let shutter = GpioShutter::new(shutter_pin, Delay, &config.shutter);
    let cancel = ButtonCancel::new(Input::new(p.PIN_7, Pull::Up));
    let mut start = Input::new(p.PIN_8, Pull::Up);

    let driver = PhaseDriver::new(coils, Delay);
    let motion = MotionController::from_config(driver, cancel, &config.motion);
    let mut sequencer = Sequencer::from_config(motion, shutter, DefmtProgress, &config);

    let frames = config.sequence.default_frames;

    loop {
        info!("Ready: press start to record {} frames", frames);
        start.wait_for_low().await;
        Timer::after_millis(DEBOUNCE_MS).await;

        sequencer.motion_mut().cancel_mut().reset();

        match sequencer.record(frames) {
            Ok(report) => {
                if let Some(Advisory::FrameCountAboveResolution { threshold, .. }) = report.advisory
                {
                    warn!("Frame count is at or above the {} frame motor resolution", threshold);
                }

                let summary = report.summary;
                if summary.cancelled {
                    info!(
                        "Cancelled: {}/{} frames, {}° traveled",
                        summary.frames_captured, summary.target_frame_count, summary.traveled_deg
                    );
                } else {
                    info!(
                        "Panorama complete: {} frames, {}° traveled",
                        summary.frames_captured, summary.traveled_deg
                    );
                }
            }
            Err(e) => {
                error!("Recording failed: {}", Debug2Format(&e));
            }
        }

        if sequencer.motion_mut().release().is_err() {
            warn!("Failed to release coils");
        }

        // Wait for the start button to be let go before re-arming
        start.wait_for_high().await;
        Timer::after_millis(DEBOUNCE_MS).await;
    }
}

/// Parse the embedded configuration, falling back to defaults
fn load_config() -> RigConfig {
    match parse_config(EMBEDDED_CONFIG) {
        Ok(config) => {
            info!(
                "Config: {} steps/rev, {}-{} steps/s, {} frames",
                config.motion.steps_per_revolution,
                config.motion.min_speed,
                config.motion.max_speed,
                config.sequence.default_frames
            );
            config
        }
        Err(e) => {
            warn!("Invalid rig.toml ({}), using defaults", e);
            RigConfig::default()
        }
    }
}
