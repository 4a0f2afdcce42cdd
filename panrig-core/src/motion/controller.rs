//! Motion controller
//!
//! Converts an angular distance into whole full steps, drives the phase
//! driver at the rate chosen by a speed profile, and stops early when the
//! cancel signal is raised.
//!
//! Traveled distance is always `steps * ratio`; it is never accumulated
//! from floating-point increments.

use embedded_hal::delay::DelayNs;

use super::error::{InvalidInput, MotionError};
use super::phase::{Direction, PhaseDriver};
use super::profile::{step_delay_us, SpeedProfile};
use crate::config::{MotionConfig, DEFAULT_STEPS_PER_REVOLUTION};
use crate::traits::{CancelSignal, PhaseOutputs};

/// Longest single move in steps; keeps both the step counter and the
/// signed position in range
pub const MAX_STEPS_PER_MOVE: u32 = i32::MAX as u32;

/// Distance covered by one move
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Travel {
    /// Physical steps performed
    pub steps: u32,
    /// Degrees covered (`steps * ratio`)
    pub degrees: f32,
    /// Direction of the move
    pub direction: Direction,
}

impl Travel {
    fn new(steps: u32, ratio: f32, direction: Direction) -> Self {
        Self {
            steps,
            degrees: steps as f32 * ratio,
            direction,
        }
    }
}

/// Result of a move that ran without a fault
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MoveOutcome {
    /// Requested distance reached (possibly overshooting by under one step)
    Completed(Travel),
    /// Cancel signal observed; motion stopped early
    Cancelled(Travel),
}

impl MoveOutcome {
    /// Distance actually covered
    pub fn travel(&self) -> Travel {
        match self {
            MoveOutcome::Completed(travel) | MoveOutcome::Cancelled(travel) => *travel,
        }
    }

    /// Check if the move was cut short by cancellation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, MoveOutcome::Cancelled(_))
    }
}

/// A move that stopped on an error
///
/// Carries the distance covered before the failure so callers can
/// reconcile their position.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MoveError<E> {
    /// What went wrong
    pub error: MotionError<E>,
    /// Distance covered before the error
    pub travel: Travel,
}

/// Open-loop motion controller
///
/// Exclusively owns the phase driver, so only one move can be in flight.
#[derive(Debug)]
pub struct MotionController<O, D, C> {
    driver: PhaseDriver<O, D>,
    cancel: C,
    steps_per_revolution: u16,
    /// Net signed steps since construction
    position_steps: i32,
}

impl<O, D, C> MotionController<O, D, C>
where
    O: PhaseOutputs,
    D: DelayNs,
    C: CancelSignal,
{
    /// Create a controller for the default 512 steps per revolution
    pub fn new(driver: PhaseDriver<O, D>, cancel: C) -> Self {
        Self {
            driver,
            cancel,
            steps_per_revolution: DEFAULT_STEPS_PER_REVOLUTION,
            position_steps: 0,
        }
    }

    /// Create a controller using the configured motor resolution
    ///
    /// A zero resolution falls back to the default.
    pub fn from_config(driver: PhaseDriver<O, D>, cancel: C, config: &MotionConfig) -> Self {
        let mut controller = Self::new(driver, cancel);
        if config.steps_per_revolution > 0 {
            controller.steps_per_revolution = config.steps_per_revolution;
        }
        controller
    }

    /// Degrees traversed per full step
    pub fn ratio(&self) -> f32 {
        360.0 / self.steps_per_revolution as f32
    }

    /// Full steps per revolution
    pub fn steps_per_revolution(&self) -> u16 {
        self.steps_per_revolution
    }

    /// Number of steps an uncancelled move of `degrees` performs
    ///
    /// This is the smallest `n` with `n * ratio >= |degrees|`.
    pub fn steps_for(&self, degrees: f32) -> u32 {
        let total = degrees.abs();
        let ratio = self.ratio();
        let mut steps = (total / ratio) as u32;
        if (steps as f32) * ratio < total {
            steps += 1;
        }
        steps
    }

    /// Move by a signed angular distance
    ///
    /// The cancel signal is sampled once before the first step and again
    /// after every step, so a signal already raised when the move starts
    /// produces zero travel and one raised during the last step still
    /// cancels. The rate for each step is validated before the step is
    /// written.
    pub fn move_by<P>(
        &mut self,
        distance_deg: f32,
        profile: &P,
    ) -> Result<MoveOutcome, MoveError<O::Error>>
    where
        P: SpeedProfile + ?Sized,
    {
        let direction = Direction::from_distance(distance_deg);
        let ratio = self.ratio();
        let rejected = |input: InvalidInput| MoveError {
            error: input.into(),
            travel: Travel::new(0, ratio, direction),
        };

        if !distance_deg.is_finite() {
            return Err(rejected(InvalidInput::NonFiniteDistance));
        }

        let total = distance_deg.abs();
        if total / ratio >= MAX_STEPS_PER_MOVE as f32 {
            return Err(rejected(InvalidInput::DistanceTooLarge));
        }

        let mut steps: u32 = 0;
        if total > 0.0 && self.cancel.is_cancel_requested() {
            return Ok(MoveOutcome::Cancelled(Travel::new(steps, ratio, direction)));
        }

        while (steps as f32) * ratio < total {
            let traveled = steps as f32 * ratio;
            let result = step_delay_us(profile.rate(traveled, total))
                .map_err(MotionError::from)
                .and_then(|delay_us| self.driver.step(direction, delay_us));

            if let Err(error) = result {
                return Err(MoveError {
                    error,
                    travel: Travel::new(steps, ratio, direction),
                });
            }

            steps += 1;
            self.position_steps += match direction {
                Direction::Forward => 1,
                Direction::Backward => -1,
            };

            if self.cancel.is_cancel_requested() {
                return Ok(MoveOutcome::Cancelled(Travel::new(steps, ratio, direction)));
            }
        }

        Ok(MoveOutcome::Completed(Travel::new(steps, ratio, direction)))
    }

    /// Sample the cancel signal
    pub fn cancel_requested(&mut self) -> bool {
        self.cancel.is_cancel_requested()
    }

    /// Hold the platform still for `ms` milliseconds
    pub fn pause_ms(&mut self, ms: u32) {
        self.driver.hold_ms(ms);
    }

    /// De-energize the coils
    pub fn release(&mut self) -> Result<(), MotionError<O::Error>> {
        self.driver.release()
    }

    /// Net signed steps moved since construction
    pub fn position_steps(&self) -> i32 {
        self.position_steps
    }

    /// Net orientation in degrees since construction
    pub fn position_deg(&self) -> f32 {
        self.position_steps as f32 * self.ratio()
    }

    /// Get the phase driver
    pub fn driver(&self) -> &PhaseDriver<O, D> {
        &self.driver
    }

    /// Get the phase driver mutably
    pub fn driver_mut(&mut self) -> &mut PhaseDriver<O, D> {
        &mut self.driver
    }

    /// Get the cancel signal mutably
    pub fn cancel_mut(&mut self) -> &mut C {
        &mut self.cancel
    }

    /// Release the driver and cancel signal
    pub fn into_parts(self) -> (PhaseDriver<O, D>, C) {
        (self.driver, self.cancel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motion::profile::{ConstantSpeed, TrapezoidalProfile};
    use crate::traits::PhasePattern;
    use core::cell::Cell;
    use proptest::prelude::*;
    use std::rc::Rc;

    #[derive(Default)]
    struct MockOutputs {
        writes: u32,
        /// Fail on this write (1-based)
        fail_on: Option<u32>,
        /// Write count shared with a [`PressAtWrite`] button
        tap: Rc<Cell<u32>>,
    }

    impl PhaseOutputs for MockOutputs {
        type Error = ();

        fn set_outputs(&mut self, _pattern: PhasePattern) -> Result<(), Self::Error> {
            if self.fail_on == Some(self.writes + 1) {
                return Err(());
            }
            self.writes += 1;
            self.tap.set(self.writes);
            Ok(())
        }
    }

    #[derive(Default)]
    struct MockDelay {
        holds_us: Vec<u32>,
    }

    impl DelayNs for MockDelay {
        fn delay_ns(&mut self, _ns: u32) {}

        fn delay_us(&mut self, us: u32) {
            self.holds_us.push(us);
        }
    }

    /// Cancel button pressed while the coils show write `at`
    struct PressAtWrite {
        writes: Rc<Cell<u32>>,
        at: u32,
    }

    impl CancelSignal for PressAtWrite {
        fn is_cancel_requested(&mut self) -> bool {
            self.writes.get() >= self.at
        }
    }

    /// Controller whose cancel button is pressed during step `at`
    fn pressed_at_step(at: u32) -> MotionController<MockOutputs, MockDelay, PressAtWrite> {
        let outputs = MockOutputs::default();
        let cancel = PressAtWrite {
            writes: outputs.tap.clone(),
            at,
        };
        MotionController::new(PhaseDriver::new(outputs, MockDelay::default()), cancel)
    }

    fn controller<C: CancelSignal>(cancel: C) -> MotionController<MockOutputs, MockDelay, C> {
        let driver = PhaseDriver::new(MockOutputs::default(), MockDelay::default());
        MotionController::new(driver, cancel)
    }

    #[test]
    fn test_quarter_turn_step_count() {
        let mut ctrl = controller(false);

        let outcome = ctrl.move_by(90.0, &TrapezoidalProfile::default()).unwrap();
        let travel = outcome.travel();

        assert!(!outcome.is_cancelled());
        assert_eq!(travel.steps, 128);
        assert_eq!(ctrl.driver().outputs().writes, 128);
        assert!(travel.degrees >= 90.0);
        assert!(travel.degrees < 90.0 + ctrl.ratio());
        assert_eq!(travel.direction, Direction::Forward);
    }

    #[test]
    fn test_fractional_distance_overshoots_by_under_one_step() {
        let mut ctrl = controller(false);

        // 120° / 0.703125° = 170.67 -> 171 steps
        let travel = ctrl.move_by(120.0, &ConstantSpeed::default()).unwrap().travel();
        assert_eq!(travel.steps, 171);
        assert_eq!(ctrl.steps_for(120.0), 171);
        assert!(travel.degrees >= 120.0);
        assert!(travel.degrees < 120.0 + ctrl.ratio());
    }

    #[test]
    fn test_profile_drives_hold_times() {
        let mut ctrl = controller(false);

        // Short move: whole move at min speed (20 steps/s -> 50ms)
        ctrl.move_by(15.0, &TrapezoidalProfile::default()).unwrap();

        let (driver, _) = ctrl.into_parts();
        let (_, delay) = driver.into_parts();
        assert_eq!(delay.holds_us.len(), 22);
        assert!(delay.holds_us.iter().all(|us| *us == 50_000));
    }

    #[test]
    fn test_ramped_move_starts_and_ends_slow() {
        let mut ctrl = controller(false);
        ctrl.move_by(90.0, &TrapezoidalProfile::default()).unwrap();

        let (driver, _) = ctrl.into_parts();
        let (_, delay) = driver.into_parts();
        let holds = delay.holds_us;

        // First step at min speed, plateau at max speed
        assert_eq!(holds[0], 50_000);
        assert_eq!(holds[64], 10_000);
        assert!(holds[127] > holds[64]);
    }

    #[test]
    fn test_zero_distance_does_not_move() {
        let mut ctrl = controller(true);

        let outcome = ctrl.move_by(0.0, &ConstantSpeed::default()).unwrap();
        assert_eq!(outcome.travel().steps, 0);
        assert!(!outcome.is_cancelled());
        assert_eq!(ctrl.driver().outputs().writes, 0);
    }

    #[test]
    fn test_cancel_before_first_step() {
        let mut ctrl = controller(true);

        let outcome = ctrl.move_by(90.0, &TrapezoidalProfile::default()).unwrap();
        assert!(outcome.is_cancelled());
        assert_eq!(outcome.travel().steps, 0);
        assert_eq!(outcome.travel().degrees, 0.0);
        assert_eq!(ctrl.driver().outputs().writes, 0);
    }

    #[test]
    fn test_cancel_mid_move() {
        let mut ctrl = pressed_at_step(40);

        let outcome = ctrl.move_by(90.0, &ConstantSpeed::default()).unwrap();
        assert!(outcome.is_cancelled());
        assert_eq!(outcome.travel().steps, 40);
        assert_eq!(outcome.travel().degrees, 40.0 * ctrl.ratio());
        assert_eq!(ctrl.driver().outputs().writes, 40);
        assert_eq!(ctrl.position_steps(), 40);
    }

    #[test]
    fn test_cancel_during_last_step() {
        let mut ctrl = pressed_at_step(128);

        let outcome = ctrl.move_by(90.0, &TrapezoidalProfile::default()).unwrap();
        assert_eq!(
            outcome,
            MoveOutcome::Cancelled(Travel {
                steps: 128,
                degrees: 90.0,
                direction: Direction::Forward,
            })
        );
        assert_eq!(ctrl.driver().outputs().writes, 128);
    }

    #[test]
    fn test_cancel_during_first_step() {
        let mut ctrl = pressed_at_step(1);

        let outcome = ctrl.move_by(-45.0, &ConstantSpeed::default()).unwrap();
        assert!(outcome.is_cancelled());
        assert_eq!(outcome.travel().steps, 1);
        assert_eq!(outcome.travel().direction, Direction::Backward);
        assert_eq!(ctrl.position_steps(), -1);
    }

    #[test]
    fn test_press_after_move_completes() {
        let mut ctrl = pressed_at_step(129);

        let outcome = ctrl.move_by(90.0, &ConstantSpeed::default()).unwrap();
        assert!(!outcome.is_cancelled());
        assert_eq!(outcome.travel().steps, 128);

        // Held button stops the next move after its first step
        let outcome = ctrl.move_by(90.0, &ConstantSpeed::default()).unwrap();
        assert!(outcome.is_cancelled());
        assert_eq!(outcome.travel().steps, 1);
    }

    #[test]
    fn test_backward_move() {
        let mut ctrl = controller(false);

        let travel = ctrl.move_by(-45.0, &ConstantSpeed::default()).unwrap().travel();
        assert_eq!(travel.direction, Direction::Backward);
        assert_eq!(travel.steps, 64);
        assert_eq!(ctrl.position_steps(), -64);
        assert_eq!(ctrl.position_deg(), -45.0);
    }

    #[test]
    fn test_round_trip_restores_phase() {
        let mut ctrl = controller(false);
        let start_phase = ctrl.driver().phase();

        ctrl.move_by(37.0, &ConstantSpeed::default()).unwrap();
        ctrl.move_by(-37.0, &ConstantSpeed::default()).unwrap();

        assert_eq!(ctrl.driver().phase(), start_phase);
        assert_eq!(ctrl.position_steps(), 0);
    }

    #[test]
    fn test_invalid_speed_rejected_before_write() {
        let mut ctrl = controller(false);

        let err = ctrl.move_by(90.0, &ConstantSpeed(0.0)).unwrap_err();
        assert_eq!(
            err.error,
            MotionError::InvalidInput(InvalidInput::NonPositiveSpeed)
        );
        assert_eq!(err.travel.steps, 0);
        assert_eq!(ctrl.driver().outputs().writes, 0);

        let err = ctrl.move_by(90.0, &ConstantSpeed(-100.0)).unwrap_err();
        assert!(err.error.is_invalid_input());
    }

    #[test]
    fn test_non_finite_distance_rejected() {
        let mut ctrl = controller(false);

        let err = ctrl.move_by(f32::NAN, &ConstantSpeed::default()).unwrap_err();
        assert_eq!(
            err.error,
            MotionError::InvalidInput(InvalidInput::NonFiniteDistance)
        );
        let err = ctrl.move_by(f32::INFINITY, &ConstantSpeed::default()).unwrap_err();
        assert!(err.error.is_invalid_input());
        assert_eq!(ctrl.driver().outputs().writes, 0);
    }

    #[test]
    fn test_oversized_distance_rejected() {
        let mut ctrl = controller(false);

        let err = ctrl.move_by(3.0e9, &ConstantSpeed::default()).unwrap_err();
        assert_eq!(
            err.error,
            MotionError::InvalidInput(InvalidInput::DistanceTooLarge)
        );
        assert_eq!(err.travel.steps, 0);

        let err = ctrl.move_by(-1.0e30, &ConstantSpeed::default()).unwrap_err();
        assert_eq!(err.travel.direction, Direction::Backward);
        assert_eq!(ctrl.driver().outputs().writes, 0);
    }

    #[test]
    fn test_hardware_failure_reports_travel() {
        let outputs = MockOutputs {
            fail_on: Some(11),
            ..Default::default()
        };
        let driver = PhaseDriver::new(outputs, MockDelay::default());
        let mut ctrl = MotionController::new(driver, false);

        let err = ctrl.move_by(90.0, &ConstantSpeed::default()).unwrap_err();
        assert!(err.error.is_hardware());
        assert_eq!(err.travel.steps, 10);
        assert_eq!(ctrl.position_steps(), 10);
    }

    #[test]
    fn test_configured_resolution() {
        let driver = PhaseDriver::new(MockOutputs::default(), MockDelay::default());
        let config = MotionConfig {
            steps_per_revolution: 2048,
            ..Default::default()
        };
        let mut ctrl = MotionController::from_config(driver, false, &config);

        let travel = ctrl.move_by(90.0, &ConstantSpeed::default()).unwrap().travel();
        assert_eq!(travel.steps, 512);
        assert_eq!(travel.degrees, 90.0);
    }

    proptest! {
        #[test]
        fn prop_step_count_is_ceiling(distance in -360.0f32..360.0) {
            let mut ctrl = controller(false);
            let travel = ctrl.move_by(distance, &ConstantSpeed::default()).unwrap().travel();
            let ratio = ctrl.ratio();

            prop_assert_eq!(travel.steps, ctrl.steps_for(distance));
            prop_assert!(travel.degrees >= distance.abs());
            prop_assert!(travel.degrees <= distance.abs() + ratio);
            prop_assert_eq!(ctrl.driver().outputs().writes, travel.steps);
        }
    }
}
