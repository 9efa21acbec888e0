mod app;
mod error;
mod input;
mod logging;
mod pump;
mod settings;
mod terminal;
mod ui;

use std::sync::mpsc;

use timer_core::{Key, MonotonicClock};

use crate::app::TimersApp;
use crate::error::AppError;
use crate::input::InputReader;
use crate::pump::Pump;
use crate::settings::Settings;
use crate::terminal::Terminal;

/// Messages serialized onto the main loop. Input and pump threads only
/// ever send; the main thread alone touches timer state.
#[derive(Debug)]
pub enum AppOp {
    Redraw,
    Key(Key),
    Pump,
    Quit,
}

fn main() -> anyhow::Result<()> {
    let (settings, config_error) = match Settings::load() {
        Ok(settings) => (settings, None),
        Err(e) => (Settings::default(), Some(e)),
    };
    let log_path = logging::init(&settings)?;
    log::info!("Thymer starting, logging to {}", log_path.display());
    match (config_error, Settings::config_path()) {
        (Some(e), _) => log::warn!("{}: {:?}, using defaults", e, e),
        (None, Some(path)) => log::info!("config loaded from {}", path.display()),
        (None, None) => {}
    }

    let result = run(settings.sanitized());
    match &result {
        Ok(()) => log::info!("Thymer exited cleanly"),
        Err(e) => log::error!("Thymer failed: {:?}", e),
    }
    Ok(result?)
}

fn run(settings: Settings) -> Result<(), AppError> {
    let interval = settings.refresh_interval();
    let (tx, rx) = mpsc::channel();

    let mut terminal = Terminal::enter()?;
    let mut input = InputReader::spawn(tx.clone())?;
    let mut pump = Pump::spawn(tx)?;

    let mut app = TimersApp::new(settings, MonotonicClock::new());
    log::info!("{} timer(s) ready, refresh every {:?}", app.timers().len(), interval);
    terminal.draw(&app.frame())?;

    while let Ok(op) = rx.recv() {
        match op {
            AppOp::Redraw => {}
            AppOp::Key(key) => app.handle_key(key),
            AppOp::Pump => {
                pump.ack();
                app.handle_pump();
            }
            AppOp::Quit => break,
        }
        if app.should_quit() {
            break;
        }

        if app.needs_pump() {
            pump.start(interval);
        } else if pump.is_running() {
            pump.stop();
        }
        terminal.draw(&app.frame())?;
    }

    // Tick source first, then input, then the terminal itself.
    pump.shutdown();
    input.stop();
    drop(terminal);
    Ok(())
}
