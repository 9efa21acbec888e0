use timer_core::{dispatch, Action, Clock, Flow, Key, Snapshot, TimerCollection};

use crate::settings::Settings;

const STATUS_TTL_MS: u64 = 2000;

pub const HELP_TEXT: &str = "THYMER HELP\n\n\
     Space  Start/Pause\n\
     l      Record lap\n\
     r      Reset timer\n\
     n      New timer\n\
     d      Delete timer\n\
     Up/Dn  Select timer (k/j)\n\
     ?      This help\n\
     q      Quit";

struct StatusLine {
    text: String,
    expires_at_ms: u64,
}

/// Which overlay, if any, covers the timer list.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Overlay {
    None,
    Help,
    ConfirmQuit,
}

/// Everything the renderer needs for one frame.
pub struct Frame<'a> {
    pub snapshot: Snapshot<'a>,
    pub overlay: Overlay,
    pub status: Option<&'a str>,
    pub lap_rows: usize,
}

/// Owns the timers and the UI-only state around them. Keys mutate it,
/// pumps only expire transient state.
pub struct TimersApp<C: Clock> {
    timers: TimerCollection,
    clock: C,
    settings: Settings,
    help_visible: bool,
    confirm_quit: bool,
    status: Option<StatusLine>,
    should_quit: bool,
}

impl<C: Clock> TimersApp<C> {
    pub fn new(settings: Settings, clock: C) -> Self {
        let mut timers = TimerCollection::with_limits(settings.max_timers, settings.navigation);
        for _ in 0..settings.initial_timers {
            if timers.create_timer(None).is_err() {
                break;
            }
        }
        Self {
            timers,
            clock,
            settings,
            help_visible: false,
            confirm_quit: false,
            status: None,
            should_quit: false,
        }
    }

    pub fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }

    pub fn timers(&self) -> &TimerCollection {
        &self.timers
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// The pump only has work while something on screen changes by itself.
    pub fn needs_pump(&self) -> bool {
        self.timers.any_running() || self.status.is_some()
    }

    pub fn handle_key(&mut self, key: Key) {
        if key == Key::Interrupt {
            log::info!("interrupt received");
            self.should_quit = true;
            return;
        }

        // Any key dismisses help
        if self.help_visible {
            self.help_visible = false;
            return;
        }

        if self.confirm_quit {
            match key {
                Key::Char('y') | Key::Char('Y') => {
                    let paused = self.timers.pause_all(self.now_ms());
                    log::info!("quitting, paused {} running timer(s)", paused);
                    self.should_quit = true;
                }
                Key::Char('n') | Key::Char('N') | Key::Esc => self.confirm_quit = false,
                _ => {}
            }
            return;
        }

        let Some(action) = Action::from_key(key) else {
            return;
        };
        if action == Action::Quit
            && self.settings.confirm_quit_while_running
            && self.timers.any_running()
        {
            self.confirm_quit = true;
            return;
        }

        let now = self.now_ms();
        match dispatch(&mut self.timers, action, now) {
            Ok(Flow::Continue) => self.log_applied(action),
            Ok(Flow::ShowHelp) => self.help_visible = true,
            Ok(Flow::Quit) => {
                log::info!("quit requested");
                self.should_quit = true;
            }
            Err(e) => {
                log::debug!("{:?} had no effect: {}", action, e);
                self.status = Some(StatusLine {
                    text: capitalize(&e.to_string()),
                    expires_at_ms: now + STATUS_TTL_MS,
                });
            }
        }
    }

    pub fn handle_pump(&mut self) {
        let now = self.now_ms();
        if self.status.as_ref().is_some_and(|s| now >= s.expires_at_ms) {
            self.status = None;
        }
    }

    pub fn frame(&self) -> Frame<'_> {
        let overlay = if self.help_visible {
            Overlay::Help
        } else if self.confirm_quit {
            Overlay::ConfirmQuit
        } else {
            Overlay::None
        };
        Frame {
            snapshot: self.timers.snapshot(self.now_ms()),
            overlay,
            status: self.status.as_ref().map(|s| s.text.as_str()),
            lap_rows: self.settings.lap_rows,
        }
    }

    fn log_applied(&self, action: Action) {
        let Some(timer) = self.timers.selected() else {
            if action == Action::DeleteSelected {
                log::info!("deleted last timer");
            }
            return;
        };
        match action {
            Action::NewTimer => log::info!("created {} '{}'", timer.id(), timer.name()),
            Action::DeleteSelected => {
                log::info!("deleted timer, {} remaining", self.timers.len())
            }
            Action::Lap => {
                if let Some(lap) = timer.laps().last() {
                    log::debug!("{} lap {} split {}ms", timer.id(), lap.index, lap.split_ms);
                }
            }
            Action::Toggle | Action::Reset => {
                log::debug!("{} now {}", timer.id(), timer.state())
            }
            _ => {}
        }
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
