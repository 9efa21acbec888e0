//! Render tick source.
//!
//! A dedicated thread posts `AppOp::Pump` onto the main queue at a fixed
//! cadence while started. It never touches timer state; the main loop
//! redraws from a fresh snapshot on every pump.
//!
//! At most one tick is ever queued: the thread skips a tick while the
//! previous one is unacknowledged, so a slow redraw never builds a backlog
//! in front of key presses.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::error::AppError;
use crate::AppOp;

#[derive(Debug)]
enum PumpOp {
    Start(Duration),
    Stop,
    Quit,
}

pub struct Pump {
    control: Sender<PumpOp>,
    handle: Option<JoinHandle<()>>,
    running: bool,
    pending: Arc<AtomicBool>,
}

impl Pump {
    pub fn spawn(main: Sender<AppOp>) -> Result<Self, AppError> {
        let (control, rx) = mpsc::channel();
        let pending = Arc::new(AtomicBool::new(false));
        let pending_clone = pending.clone();
        let handle = thread::Builder::new()
            .name("thymer-pump".to_string())
            .spawn(move || pump_thread(rx, main, pending_clone))
            .map_err(|source| AppError::Spawn { name: "pump", source })?;
        Ok(Self {
            control,
            handle: Some(handle),
            running: false,
            pending,
        })
    }

    /// Marks the queued tick as consumed so the next one may be sent.
    pub fn ack(&self) {
        self.pending.store(false, Ordering::SeqCst);
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn start(&mut self, interval: Duration) {
        if !self.running {
            self.running = true;
            log::debug!("pump started at {:?}", interval);
            self.control.send(PumpOp::Start(interval)).ok();
        }
    }

    pub fn stop(&mut self) {
        if self.running {
            self.running = false;
            log::debug!("pump stopped");
            self.control.send(PumpOp::Stop).ok();
        }
    }

    /// Stops the thread and waits for it to exit.
    pub fn shutdown(&mut self) {
        self.running = false;
        self.control.send(PumpOp::Quit).ok();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::error!("pump thread panicked");
            }
        }
    }
}

impl Drop for Pump {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn pump_thread(control: Receiver<PumpOp>, main: Sender<AppOp>, pending: Arc<AtomicBool>) {
    let mut interval: Option<Duration> = None;
    let mut deadline = Instant::now();

    loop {
        // Blocks indefinitely when stopped, otherwise until the next tick.
        let op = match interval {
            Some(period) => {
                let wait = deadline.saturating_duration_since(Instant::now());
                match control.recv_timeout(wait) {
                    Ok(op) => Some(op),
                    Err(RecvTimeoutError::Timeout) => {
                        // Previous tick still queued: merge into it.
                        if !pending.swap(true, Ordering::SeqCst)
                            && main.send(AppOp::Pump).is_err()
                        {
                            break;
                        }
                        deadline += period;
                        // Fell behind (e.g. suspended): resync instead of bursting.
                        let now = Instant::now();
                        if deadline < now {
                            deadline = now + period;
                        }
                        None
                    }
                    Err(RecvTimeoutError::Disconnected) => break,
                }
            }
            None => match control.recv() {
                Ok(op) => Some(op),
                Err(_) => break,
            },
        };

        match op {
            Some(PumpOp::Start(period)) => {
                let period = period.max(Duration::from_millis(1));
                interval = Some(period);
                deadline = Instant::now() + period;
            }
            Some(PumpOp::Stop) => interval = None,
            Some(PumpOp::Quit) => break,
            None => {}
        }
    }
}
