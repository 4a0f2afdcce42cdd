//! Motion error types

/// Rejected request, detected before any hardware write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InvalidInput {
    /// Speed profile returned a rate that is zero, negative, NaN or infinite
    NonPositiveSpeed,
    /// Per-step hold time is zero
    ZeroDelay,
    /// Requested distance is NaN or infinite
    NonFiniteDistance,
    /// Requested distance needs more steps than a single move can count
    DistanceTooLarge,
}

/// Errors that can occur while driving the motor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MotionError<E> {
    /// Request violated the input contract; nothing was written for it
    InvalidInput(InvalidInput),
    /// Coil outputs could not be written; the motor state is undefined
    Hardware(E),
}

impl<E> MotionError<E> {
    /// Check if this error was caused by the caller's input
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, MotionError::InvalidInput(_))
    }

    /// Check if this error came from the output hardware
    pub fn is_hardware(&self) -> bool {
        matches!(self, MotionError::Hardware(_))
    }
}

impl<E> From<InvalidInput> for MotionError<E> {
    fn from(input: InvalidInput) -> Self {
        MotionError::InvalidInput(input)
    }
}
