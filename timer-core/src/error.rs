use thiserror::Error;

use crate::timer::TimerState;

/// Advisory failures. Every one of them leaves state untouched.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("cannot {command} while {state}")]
    InvalidTransition {
        command: &'static str,
        state: TimerState,
    },

    #[error("no timer selected")]
    NoSelection,

    #[error("timer limit reached ({max})")]
    CollectionFull { max: usize },
}
