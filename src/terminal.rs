//! Raw-mode alternate-screen session. Restored on drop, including on an
//! early `?` return from the main loop.

use std::io::{self, BufWriter, Stdout, Write};

use crossterm::cursor::{Hide, Show};
use crossterm::execute;
use crossterm::terminal::{
    self, disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};

use crate::app::Frame;
use crate::ui;

pub struct Terminal {
    out: BufWriter<Stdout>,
}

impl Terminal {
    pub fn enter() -> io::Result<Self> {
        enable_raw_mode()?;
        let mut out = BufWriter::new(io::stdout());
        if let Err(e) = execute!(out, EnterAlternateScreen, Hide) {
            disable_raw_mode().ok();
            return Err(e);
        }
        Ok(Self { out })
    }

    pub fn draw(&mut self, frame: &Frame<'_>) -> io::Result<()> {
        let (width, height) = terminal::size()?;
        ui::draw(&mut self.out, frame, width, height)
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        if let Err(e) = execute!(self.out, Show, LeaveAlternateScreen) {
            log::error!("failed to leave alternate screen: {}", e);
        }
        self.out.flush().ok();
        if let Err(e) = disable_raw_mode() {
            log::error!("failed to disable raw mode: {}", e);
        }
    }
}
