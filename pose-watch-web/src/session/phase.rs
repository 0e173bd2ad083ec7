//! Session lifecycle: Idle → Loading → Running → Stopped
//!
//! Stopped and Failed sessions can be started again on the same page.

use std::fmt;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Idle,
    /// Model download and camera permission in flight
    Loading,
    Running,
    Stopped,
    /// Loading ended in a fatal error
    Failed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PhaseEvent {
    Start,
    Ready,
    Stop,
    Fail,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TransitionError {
    pub from: Phase,
    pub event: PhaseEvent,
}

impl fmt::Display for TransitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cannot apply {:?} while {}", self.event, self.from.as_str())
    }
}

impl Phase {
    pub fn apply(self, event: PhaseEvent) -> Result<Phase, TransitionError> {
        use Phase::*;
        use PhaseEvent::*;

        match (self, event) {
            (Idle | Stopped | Failed, Start) => Ok(Loading),
            (Loading, Ready) => Ok(Running),
            (Loading | Running, Stop) => Ok(Stopped),
            // Nothing to stop
            (Idle | Stopped | Failed, Stop) => Ok(self),
            (Loading, Fail) => Ok(Failed),
            (from, event) => Err(TransitionError { from, event }),
        }
    }

    /// Loading or running; a second start is refused
    pub fn is_active(self) -> bool {
        matches!(self, Phase::Loading | Phase::Running)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Loading => "loading",
            Phase::Running => "running",
            Phase::Stopped => "stopped",
            Phase::Failed => "failed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_idle() {
        assert_eq!(Phase::default(), Phase::Idle);
    }

    #[test]
    fn test_happy_path() {
        let phase = Phase::Idle.apply(PhaseEvent::Start).unwrap();
        assert_eq!(phase, Phase::Loading);
        let phase = phase.apply(PhaseEvent::Ready).unwrap();
        assert_eq!(phase, Phase::Running);
        let phase = phase.apply(PhaseEvent::Stop).unwrap();
        assert_eq!(phase, Phase::Stopped);
    }

    #[test]
    fn test_restart_after_stop_or_failure() {
        assert_eq!(Phase::Stopped.apply(PhaseEvent::Start), Ok(Phase::Loading));
        assert_eq!(Phase::Failed.apply(PhaseEvent::Start), Ok(Phase::Loading));
    }

    #[test]
    fn test_second_start_is_refused() {
        for phase in [Phase::Loading, Phase::Running] {
            assert!(phase.is_active());
            assert_eq!(
                phase.apply(PhaseEvent::Start),
                Err(TransitionError { from: phase, event: PhaseEvent::Start })
            );
        }
    }

    #[test]
    fn test_stop_while_loading() {
        assert_eq!(Phase::Loading.apply(PhaseEvent::Stop), Ok(Phase::Stopped));
        // A late Ready after stop is rejected
        assert!(Phase::Stopped.apply(PhaseEvent::Ready).is_err());
    }

    #[test]
    fn test_stop_when_inactive_is_noop() {
        assert_eq!(Phase::Idle.apply(PhaseEvent::Stop), Ok(Phase::Idle));
        assert_eq!(Phase::Failed.apply(PhaseEvent::Stop), Ok(Phase::Failed));
    }

    #[test]
    fn test_fail_only_from_loading() {
        assert_eq!(Phase::Loading.apply(PhaseEvent::Fail), Ok(Phase::Failed));
        assert!(Phase::Running.apply(PhaseEvent::Fail).is_err());
        assert_eq!(
            Phase::Idle.apply(PhaseEvent::Ready).unwrap_err().to_string(),
            "cannot apply Ready while idle"
        );
    }
}
