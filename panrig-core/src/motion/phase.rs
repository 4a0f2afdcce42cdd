//! 4-phase full-step driver
//!
//! Drives the four coil lines of a unipolar stepper through the two-coil-on
//! full-step sequence:
//!
//! ```text
//! index   IN1 IN2 IN3 IN4
//!   0      1   0   0   1
//!   1      1   1   0   0
//!   2      0   1   1   0
//!   3      0   0   1   1
//! ```
//!
//! Forward walks the table upward, backward walks it downward, so N forward
//! steps followed by N backward steps leave the driver on its starting phase.

use embedded_hal::delay::DelayNs;

use super::error::{InvalidInput, MotionError};
use crate::traits::{PhaseOutputs, PhasePattern};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Full-step energization sequence, in forward order
pub const FULL_STEP_SEQUENCE: [PhasePattern; 4] = [
    PhasePattern::new([true, false, false, true]),
    PhasePattern::new([true, true, false, false]),
    PhasePattern::new([false, true, true, false]),
    PhasePattern::new([false, false, true, true]),
];

/// Motor rotation direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Direction {
    /// Positive distances
    Forward,
    /// Negative distances
    Backward,
}

impl Direction {
    /// Derive the direction from the sign of a distance or speed
    ///
    /// Zero maps to forward.
    pub fn from_distance(distance: f32) -> Self {
        if distance < 0.0 {
            Direction::Backward
        } else {
            Direction::Forward
        }
    }

    /// Get the opposite direction
    pub fn opposite(self) -> Self {
        match self {
            Direction::Forward => Direction::Backward,
            Direction::Backward => Direction::Forward,
        }
    }

    /// Phase index reached after one step from `phase`
    fn advance(self, phase: u8) -> u8 {
        match self {
            Direction::Forward => (phase + 1) % 4,
            Direction::Backward => (phase + 3) % 4,
        }
    }
}

/// Phase driver for one unipolar stepper
///
/// Owns the coil outputs and the delay used to hold each pattern. The coils
/// stay in their last commanded pattern between steps; call
/// [`release`](Self::release) to de-energize them.
#[derive(Debug)]
pub struct PhaseDriver<O, D> {
    outputs: O,
    delay: D,
    /// Index into FULL_STEP_SEQUENCE of the last commanded pattern
    phase: u8,
    /// Last pattern written to the outputs
    last_pattern: PhasePattern,
}

impl<O: PhaseOutputs, D: DelayNs> PhaseDriver<O, D> {
    /// Create a new phase driver
    ///
    /// Nothing is written until the first step.
    pub fn new(outputs: O, delay: D) -> Self {
        Self {
            outputs,
            delay,
            phase: 0,
            last_pattern: PhasePattern::RELEASED,
        }
    }

    /// Emit one full step and hold it for `delay_us` microseconds
    ///
    /// The phase only advances if the write succeeded.
    pub fn step(
        &mut self,
        direction: Direction,
        delay_us: u32,
    ) -> Result<(), MotionError<O::Error>> {
        if delay_us == 0 {
            return Err(InvalidInput::ZeroDelay.into());
        }

        let next = direction.advance(self.phase);
        let pattern = FULL_STEP_SEQUENCE[next as usize];

        self.outputs
            .set_outputs(pattern)
            .map_err(MotionError::Hardware)?;

        self.phase = next;
        self.last_pattern = pattern;
        self.delay.delay_us(delay_us);
        Ok(())
    }

    /// De-energize all coils
    ///
    /// The phase index is kept so the next step continues the sequence.
    pub fn release(&mut self) -> Result<(), MotionError<O::Error>> {
        self.outputs
            .set_outputs(PhasePattern::RELEASED)
            .map_err(MotionError::Hardware)?;
        self.last_pattern = PhasePattern::RELEASED;
        Ok(())
    }

    /// Block for `ms` milliseconds without touching the outputs
    pub fn hold_ms(&mut self, ms: u32) {
        self.delay.delay_ms(ms);
    }

    /// Current phase index (0..4)
    pub fn phase(&self) -> u8 {
        self.phase
    }

    /// Last pattern written to the coils
    pub fn last_pattern(&self) -> PhasePattern {
        self.last_pattern
    }

    /// Get the coil outputs
    pub fn outputs(&self) -> &O {
        &self.outputs
    }

    /// Release the outputs and delay
    pub fn into_parts(self) -> (O, D) {
        (self.outputs, self.delay)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Records every pattern written
    #[derive(Default)]
    struct MockOutputs {
        writes: Vec<PhasePattern>,
        fail: bool,
    }

    impl PhaseOutputs for MockOutputs {
        type Error = ();

        fn set_outputs(&mut self, pattern: PhasePattern) -> Result<(), Self::Error> {
            if self.fail {
                return Err(());
            }
            self.writes.push(pattern);
            Ok(())
        }
    }

    /// Records every hold
    #[derive(Default)]
    struct MockDelay {
        holds_us: Vec<u32>,
        pauses_ms: Vec<u32>,
    }

    impl DelayNs for MockDelay {
        fn delay_ns(&mut self, _ns: u32) {}

        fn delay_us(&mut self, us: u32) {
            self.holds_us.push(us);
        }

        fn delay_ms(&mut self, ms: u32) {
            self.pauses_ms.push(ms);
        }
    }

    #[test]
    fn test_forward_sequence() {
        let mut driver = PhaseDriver::new(MockOutputs::default(), MockDelay::default());

        for _ in 0..4 {
            driver.step(Direction::Forward, 10_000).unwrap();
        }

        let (outputs, delay) = driver.into_parts();
        assert_eq!(
            outputs.writes,
            [
                FULL_STEP_SEQUENCE[1],
                FULL_STEP_SEQUENCE[2],
                FULL_STEP_SEQUENCE[3],
                FULL_STEP_SEQUENCE[0],
            ]
        );
        assert_eq!(delay.holds_us, [10_000; 4]);
    }

    #[test]
    fn test_backward_is_mirror_of_forward() {
        let mut driver = PhaseDriver::new(MockOutputs::default(), MockDelay::default());

        for _ in 0..4 {
            driver.step(Direction::Backward, 10_000).unwrap();
        }

        let (outputs, _) = driver.into_parts();
        assert_eq!(
            outputs.writes,
            [
                FULL_STEP_SEQUENCE[3],
                FULL_STEP_SEQUENCE[2],
                FULL_STEP_SEQUENCE[1],
                FULL_STEP_SEQUENCE[0],
            ]
        );
    }

    #[test]
    fn test_round_trip_returns_to_start_phase() {
        for n in [1usize, 3, 4, 7, 128] {
            let mut driver = PhaseDriver::new(MockOutputs::default(), MockDelay::default());
            driver.step(Direction::Forward, 1).unwrap();
            let start_phase = driver.phase();
            let start_pattern = driver.last_pattern();

            for _ in 0..n {
                driver.step(Direction::Forward, 1).unwrap();
            }
            for _ in 0..n {
                driver.step(Direction::Backward, 1).unwrap();
            }

            assert_eq!(driver.phase(), start_phase);
            assert_eq!(driver.last_pattern(), start_pattern);
        }
    }

    #[test]
    fn test_adjacent_patterns_share_one_coil() {
        // Two-phase-on: consecutive patterns keep exactly one coil energized
        for i in 0..4 {
            let a = FULL_STEP_SEQUENCE[i].lines();
            let b = FULL_STEP_SEQUENCE[(i + 1) % 4].lines();
            let shared = a.iter().zip(b.iter()).filter(|(x, y)| **x && **y).count();
            assert_eq!(shared, 1);
            assert_eq!(FULL_STEP_SEQUENCE[i].energized(), 2);
        }
    }

    #[test]
    fn test_zero_delay_rejected_before_write() {
        let mut driver = PhaseDriver::new(MockOutputs::default(), MockDelay::default());

        let result = driver.step(Direction::Forward, 0);
        assert_eq!(result, Err(MotionError::InvalidInput(InvalidInput::ZeroDelay)));
        assert_eq!(driver.phase(), 0);

        let (outputs, delay) = driver.into_parts();
        assert!(outputs.writes.is_empty());
        assert!(delay.holds_us.is_empty());
    }

    #[test]
    fn test_write_failure_keeps_phase() {
        let outputs = MockOutputs {
            fail: true,
            ..Default::default()
        };
        let mut driver = PhaseDriver::new(outputs, MockDelay::default());

        let result = driver.step(Direction::Forward, 1_000);
        assert_eq!(result, Err(MotionError::Hardware(())));
        assert_eq!(driver.phase(), 0);
        assert_eq!(driver.last_pattern(), PhasePattern::RELEASED);
    }

    #[test]
    fn test_release_keeps_phase() {
        let mut driver = PhaseDriver::new(MockOutputs::default(), MockDelay::default());
        driver.step(Direction::Forward, 1).unwrap();
        driver.step(Direction::Forward, 1).unwrap();

        driver.release().unwrap();
        assert_eq!(driver.phase(), 2);
        assert_eq!(driver.last_pattern(), PhasePattern::RELEASED);

        driver.step(Direction::Forward, 1).unwrap();
        assert_eq!(driver.last_pattern(), FULL_STEP_SEQUENCE[3]);
    }

    #[test]
    fn test_hold_does_not_write() {
        let mut driver = PhaseDriver::new(MockOutputs::default(), MockDelay::default());
        driver.hold_ms(1000);

        let (outputs, delay) = driver.into_parts();
        assert!(outputs.writes.is_empty());
        assert_eq!(delay.pauses_ms, [1000]);
    }

    #[test]
    fn test_direction_from_distance() {
        assert_eq!(Direction::from_distance(90.0), Direction::Forward);
        assert_eq!(Direction::from_distance(-0.5), Direction::Backward);
        assert_eq!(Direction::from_distance(0.0), Direction::Forward);
        assert_eq!(Direction::Forward.opposite(), Direction::Backward);
    }
}
