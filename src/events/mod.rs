//! Event handling for cointerm.
//!
//! This module provides input event handling and an event loop
//! for processing terminal events.

mod handler;
mod input;

pub use handler::EventHandler;
pub use input::{InputEvent, Key, Modifiers};

use crate::error::Result;
use crossterm::event::{Event as CrosstermEvent, KeyEvent, MouseEvent};
use std::time::Duration;
use tokio::sync::mpsc;

/// Terminal event types.
#[derive(Debug, Clone)]
pub enum Event {
    /// Terminal tick (for notification expiry and redraws).
    Tick,
    /// Key press event.
    Key(KeyEvent),
    /// Mouse event.
    Mouse(MouseEvent),
    /// Terminal resize event.
    Resize(u16, u16),
}

/// Configuration for the event loop.
#[derive(Debug, Clone)]
pub struct EventConfig {
    /// Tick rate for the event loop.
    pub tick_rate: Duration,
    /// Poll timeout for terminal input.
    pub poll_timeout: Duration,
}

impl Default for EventConfig {
    fn default() -> Self {
        Self {
            tick_rate: Duration::from_millis(250),
            poll_timeout: Duration::from_millis(20),
        }
    }
}

impl EventConfig {
    /// Create a new event config with the specified tick rate in milliseconds.
    pub fn with_tick_rate_ms(mut self, ms: u64) -> Self {
        self.tick_rate = Duration::from_millis(ms.max(10));
        self
    }
}

/// Event loop for reading terminal events on a background task.
pub struct EventLoop {
    /// Event sender.
    event_tx: mpsc::UnboundedSender<Event>,
    /// Event receiver.
    event_rx: mpsc::UnboundedReceiver<Event>,
    /// Configuration.
    config: EventConfig,
}

impl EventLoop {
    /// Create a new event loop.
    pub fn new(config: EventConfig) -> Self {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        Self {
            event_tx,
            event_rx,
            config,
        }
    }

    /// Start the event loop. Both tasks stop once the receiver is dropped.
    ///
    /// Terminal input is read on a blocking thread so a pending tick never
    /// cancels a read mid-way and drops a key press.
    pub fn start(self) -> (mpsc::UnboundedReceiver<Event>, tokio::task::JoinHandle<()>) {
        let EventConfig {
            tick_rate,
            poll_timeout,
        } = self.config;

        let input_tx = self.event_tx.clone();
        tokio::task::spawn_blocking(move || {
            while !input_tx.is_closed() {
                match Self::read_crossterm_event(poll_timeout) {
                    Ok(Some(event)) => {
                        if input_tx.send(event).is_err() {
                            break;
                        }
                    }
                    Ok(None) => {}
                    Err(e) => tracing::warn!(error = %e, "Failed to read terminal event"),
                }
            }
        });

        let tick_tx = self.event_tx;
        let handle = tokio::spawn(async move {
            let mut tick_interval = tokio::time::interval(tick_rate);
            loop {
                tick_interval.tick().await;
                if tick_tx.send(Event::Tick).is_err() {
                    break;
                }
            }
        });

        (self.event_rx, handle)
    }

    fn read_crossterm_event(timeout: Duration) -> Result<Option<Event>> {
        if !crossterm::event::poll(timeout)? {
            return Ok(None);
        }

        Ok(match crossterm::event::read()? {
            CrosstermEvent::Key(key) => Some(Event::Key(key)),
            CrosstermEvent::Mouse(mouse) => Some(Event::Mouse(mouse)),
            CrosstermEvent::Resize(w, h) => Some(Event::Resize(w, h)),
            _ => None,
        })
    }
}
