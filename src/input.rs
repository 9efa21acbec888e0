//! Keyboard reader thread.
//!
//! Polls crossterm events with a short timeout so the thread notices the
//! stop flag, translates key presses into `timer_core::Key`, and posts them
//! to the main queue. Resizes become redraw requests.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use timer_core::Key;

use crate::error::AppError;
use crate::AppOp;

const POLL_TIMEOUT: Duration = Duration::from_millis(100);

pub struct InputReader {
    handle: Option<JoinHandle<()>>,
    running: Arc<AtomicBool>,
}

impl InputReader {
    pub fn spawn(tx: Sender<AppOp>) -> Result<Self, AppError> {
        let running = Arc::new(AtomicBool::new(true));
        let running_clone = running.clone();

        let handle = thread::Builder::new()
            .name("thymer-input".to_string())
            .spawn(move || read_loop(running_clone, tx))
            .map_err(|source| AppError::Spawn { name: "input", source })?;

        Ok(Self {
            handle: Some(handle),
            running,
        })
    }

    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::error!("input thread panicked");
            }
        }
    }
}

impl Drop for InputReader {
    fn drop(&mut self) {
        self.stop();
    }
}

fn read_loop(running: Arc<AtomicBool>, tx: Sender<AppOp>) {
    while running.load(Ordering::SeqCst) {
        let ready = match event::poll(POLL_TIMEOUT) {
            Ok(ready) => ready,
            Err(e) => {
                log::error!("input poll failed: {}", e);
                tx.send(AppOp::Quit).ok();
                break;
            }
        };
        if !ready {
            continue;
        }

        let op = match event::read() {
            Ok(Event::Key(key)) => translate(key).map(AppOp::Key),
            Ok(Event::Resize(..)) => Some(AppOp::Redraw),
            Ok(_) => None,
            Err(e) => {
                log::error!("input read failed: {}", e);
                Some(AppOp::Quit)
            }
        };
        if let Some(op) = op {
            let quit = matches!(op, AppOp::Quit);
            if tx.send(op).is_err() || quit {
                break;
            }
        }
    }
    log::debug!("input reader exited");
}

/// Maps a crossterm key event to a core key. Releases and repeats are
/// dropped so one physical press is one command.
pub fn translate(event: KeyEvent) -> Option<Key> {
    if event.kind != KeyEventKind::Press {
        return None;
    }
    if event.modifiers.contains(KeyModifiers::CONTROL) {
        return match event.code {
            KeyCode::Char('c') | KeyCode::Char('C') => Some(Key::Interrupt),
            _ => None,
        };
    }
    match event.code {
        KeyCode::Char(' ') => Some(Key::Space),
        KeyCode::Char(c) => Some(Key::Char(c)),
        KeyCode::Up => Some(Key::Up),
        KeyCode::Down => Some(Key::Down),
        KeyCode::Enter => Some(Key::Enter),
        KeyCode::Esc => Some(Key::Esc),
        _ => None,
    }
}
