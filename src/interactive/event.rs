use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event as CrosstermEvent, KeyEvent, KeyEventKind};

use crate::error::{KanbanError, KanbanResult};

pub enum Event {
    Key(KeyEvent),
    Resize,
    /// Drives reconciliation and notification expiry.
    Tick,
}

/// Polls the terminal on a background thread so the board keeps ticking
/// while no key is pressed.
pub struct EventHandler {
    receiver: mpsc::Receiver<Event>,
}

impl EventHandler {
    pub fn new(tick_rate_ms: u64) -> Self {
        let (sender, receiver) = mpsc::channel();
        let tick_rate = Duration::from_millis(tick_rate_ms);

        thread::spawn(move || {
            let mut last_tick = Instant::now();
            loop {
                let timeout = tick_rate.saturating_sub(last_tick.elapsed());
                if let Ok(true) = event::poll(timeout) {
                    let forwarded = match event::read() {
                        Ok(CrosstermEvent::Key(key)) if key.kind == KeyEventKind::Press => {
                            sender.send(Event::Key(key))
                        }
                        Ok(CrosstermEvent::Resize(_, _)) => sender.send(Event::Resize),
                        _ => Ok(()),
                    };
                    if forwarded.is_err() {
                        break;
                    }
                }
                if last_tick.elapsed() >= tick_rate {
                    if sender.send(Event::Tick).is_err() {
                        break;
                    }
                    last_tick = Instant::now();
                }
            }
        });

        Self { receiver }
    }

    pub fn recv(&self) -> KanbanResult<Event> {
        self.receiver
            .recv()
            .map_err(|_| KanbanError::TerminalError("event thread stopped".to_string()))
    }
}
