//! State machine definition

use super::events::Event;

/// Sequencer states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum State {
    /// No run active; progress holds the sentinel
    #[default]
    Idle,
    /// Frames are being captured
    Recording,
}

impl State {
    /// Check if this state allows the motor to run
    pub fn motor_allowed(&self) -> bool {
        matches!(self, State::Recording)
    }

    /// Check if a run is active
    pub fn is_recording(&self) -> bool {
        matches!(self, State::Recording)
    }

    /// Process an event and return the next state
    pub fn transition(self, event: Event) -> Self {
        use Event::Start;
        use State::*;

        match (self, event) {
            (Idle, Start) => Recording,

            (Recording, event) if event.is_terminal() => Idle,

            // Default: stay in current state
            _ => self,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_recording() {
        let next = State::Idle.transition(Event::Start);
        assert_eq!(next, State::Recording);
        assert!(next.motor_allowed());
    }

    #[test]
    fn test_terminal_events_return_to_idle() {
        for event in [Event::FramesExhausted, Event::Cancelled, Event::Fault] {
            let next = State::Recording.transition(event);
            assert_eq!(next, State::Idle);
        }
    }

    #[test]
    fn test_start_while_recording_ignored() {
        assert_eq!(State::Recording.transition(Event::Start), State::Recording);
    }

    #[test]
    fn test_idle_ignores_terminal_events() {
        for event in [Event::FramesExhausted, Event::Cancelled, Event::Fault] {
            assert_eq!(State::Idle.transition(event), State::Idle);
        }
        assert!(!State::Idle.motor_allowed());
    }
}
