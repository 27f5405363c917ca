//! Appointment status state machine.
//!
//! `scheduled` may move to `done`, `no_show` or `canceled`; all three are
//! terminal. Every other transition attempt is a state error.

use std::fmt;

use crate::error::BookingError;
use crate::models::appointment::{
    CANCELED_BY_CLIENT, CANCELED_BY_STAFF, STATUS_CANCELED, STATUS_DONE, STATUS_NO_SHOW,
    STATUS_SCHEDULED,
};

/// Appointment lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppointmentStatus {
    Scheduled,
    Done,
    NoShow,
    Canceled,
}

impl AppointmentStatus {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            STATUS_SCHEDULED => Some(Self::Scheduled),
            STATUS_DONE => Some(Self::Done),
            STATUS_NO_SHOW => Some(Self::NoShow),
            STATUS_CANCELED => Some(Self::Canceled),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Scheduled => STATUS_SCHEDULED,
            Self::Done => STATUS_DONE,
            Self::NoShow => STATUS_NO_SHOW,
            Self::Canceled => STATUS_CANCELED,
        }
    }

    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Scheduled)
    }

    /// The only legal moves are out of `scheduled` into a terminal state.
    pub fn can_transition_to(self, target: Self) -> bool {
        matches!(self, Self::Scheduled) && target.is_terminal()
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Who canceled an appointment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CanceledBy {
    Client,
    Staff,
}

impl CanceledBy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Client => CANCELED_BY_CLIENT,
            Self::Staff => CANCELED_BY_STAFF,
        }
    }
}

/// Validates a transition from the stored status string to `target`.
pub fn ensure_transition(current: &str, target: AppointmentStatus) -> Result<(), BookingError> {
    let current = AppointmentStatus::parse(current).ok_or_else(|| {
        BookingError::State(format!("Appointment has unknown status '{current}'"))
    })?;

    if !current.can_transition_to(target) {
        return Err(BookingError::State(format!(
            "Appointment cannot move from {current} to {target}"
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scheduled_reaches_every_terminal_state() {
        for target in [
            AppointmentStatus::Done,
            AppointmentStatus::NoShow,
            AppointmentStatus::Canceled,
        ] {
            assert!(ensure_transition(STATUS_SCHEDULED, target).is_ok());
        }
    }

    #[test]
    fn terminal_states_allow_no_transitions() {
        for current in [STATUS_DONE, STATUS_NO_SHOW, STATUS_CANCELED] {
            for target in [
                AppointmentStatus::Scheduled,
                AppointmentStatus::Done,
                AppointmentStatus::NoShow,
                AppointmentStatus::Canceled,
            ] {
                assert!(matches!(
                    ensure_transition(current, target),
                    Err(BookingError::State(_))
                ));
            }
        }
    }

    #[test]
    fn scheduled_cannot_transition_to_itself() {
        assert!(matches!(
            ensure_transition(STATUS_SCHEDULED, AppointmentStatus::Scheduled),
            Err(BookingError::State(_))
        ));
    }

    #[test]
    fn unknown_status_is_a_state_error() {
        assert!(matches!(
            ensure_transition("pending", AppointmentStatus::Done),
            Err(BookingError::State(_))
        ));
    }
}
