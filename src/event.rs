use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use crossterm::event::{self, KeyEvent, KeyEventKind};

use crate::error::{Result, ScopeError};

pub enum Event {
    Key(KeyEvent),
    /// A display refresh, stamped when it was produced.
    Tick(Instant),
}

pub struct EventHandler {
    rx: mpsc::Receiver<Event>,
}

impl EventHandler {
    pub fn new(tick_rate_ms: u64) -> Self {
        let (tx, rx) = mpsc::channel();
        let tick_rate = Duration::from_millis(tick_rate_ms);

        thread::spawn(move || loop {
            if event::poll(tick_rate).unwrap_or(false) {
                if let Ok(crossterm::event::Event::Key(key)) = event::read() {
                    if key.kind == KeyEventKind::Press && tx.send(Event::Key(key)).is_err() {
                        return;
                    }
                }
            } else if tx.send(Event::Tick(Instant::now())).is_err() {
                return;
            }
        });

        Self { rx }
    }

    pub fn next(&self) -> Result<Event> {
        self.rx
            .recv()
            .map_err(|e| ScopeError::Io(std::io::Error::new(std::io::ErrorKind::Other, e)))
    }
}
