//! Single-key command mapping.
//!
//! `Key` is deliberately terminal-agnostic; the app translates its input
//! events into it before calling `Action::from_key`.

use crate::collection::{Direction, TimerCollection};
use crate::error::CoreError;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Key {
    Char(char),
    Space,
    Up,
    Down,
    Enter,
    Esc,
    /// Ctrl+C or an equivalent hard stop request.
    Interrupt,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Action {
    Toggle,
    Lap,
    Reset,
    NewTimer,
    DeleteSelected,
    Navigate(Direction),
    Help,
    Quit,
}

impl Action {
    /// Letters are case-insensitive; anything unmapped yields `None`.
    pub fn from_key(key: Key) -> Option<Self> {
        let action = match key {
            Key::Space | Key::Char(' ') => Action::Toggle,
            Key::Up => Action::Navigate(Direction::Up),
            Key::Down => Action::Navigate(Direction::Down),
            Key::Interrupt => Action::Quit,
            Key::Char(c) => match c.to_ascii_lowercase() {
                'l' => Action::Lap,
                'r' => Action::Reset,
                'n' => Action::NewTimer,
                'd' => Action::DeleteSelected,
                'k' => Action::Navigate(Direction::Up),
                'j' => Action::Navigate(Direction::Down),
                '?' => Action::Help,
                'q' => Action::Quit,
                _ => return None,
            },
            Key::Enter | Key::Esc => return None,
        };
        Some(action)
    }
}

/// What the caller should do once an action has been applied.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Flow {
    Continue,
    ShowHelp,
    Quit,
}

/// Applies `action` synchronously. Errors are advisory and leave the
/// collection untouched.
pub fn dispatch(
    timers: &mut TimerCollection,
    action: Action,
    now_ms: u64,
) -> Result<Flow, CoreError> {
    match action {
        Action::Toggle => {
            timers.selected_mut()?.toggle(now_ms);
        }
        Action::Lap => {
            timers.selected_mut()?.lap(now_ms)?;
        }
        Action::Reset => timers.selected_mut()?.reset(),
        Action::NewTimer => {
            timers.create_timer(None)?;
        }
        Action::DeleteSelected => {
            timers.delete_selected()?;
        }
        Action::Navigate(direction) => {
            timers.navigate(direction)?;
        }
        Action::Help => return Ok(Flow::ShowHelp),
        Action::Quit => return Ok(Flow::Quit),
    }
    Ok(Flow::Continue)
}
