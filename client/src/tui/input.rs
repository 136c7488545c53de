//! Terminal input and redraw events.
//!
//! [`EventHandler`] runs on its own tokio task and multiplexes three
//! sources with `tokio::select!`: a shutdown signal, a redraw interval and
//! crossterm input. Crossterm polling is synchronous, so it runs through
//! `spawn_blocking` with a short timeout.

use std::time::Duration;

use crossterm::event::{self, Event as CrosstermEvent, KeyEvent, KeyEventKind};
use tokio::sync::{mpsc, oneshot};

use crate::error::TuiError;

/// Default redraw period (10 frames per second is plenty for a clock).
pub const DEFAULT_REDRAW_RATE_MS: u64 = 100;

/// Timeout for each terminal poll.
const POLL_TIMEOUT_MS: u64 = 10;

/// Events produced by the terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TuiEvent {
    /// Time to redraw.
    Render,
    /// A key was pressed.
    Key(KeyEvent),
    /// The terminal was resized to (columns, rows).
    Resize(u16, u16),
}

/// Produces [`TuiEvent`]s until shut down.
#[derive(Debug)]
pub struct EventHandler {
    event_tx: mpsc::Sender<TuiEvent>,
    shutdown_rx: oneshot::Receiver<()>,
    redraw_rate: Duration,
}

impl EventHandler {
    pub fn new(event_tx: mpsc::Sender<TuiEvent>, shutdown_rx: oneshot::Receiver<()>) -> Self {
        Self {
            event_tx,
            shutdown_rx,
            redraw_rate: Duration::from_millis(DEFAULT_REDRAW_RATE_MS),
        }
    }

    /// Runs until the shutdown signal fires or the receiver is dropped.
    ///
    /// # Errors
    ///
    /// Returns [`TuiError::Event`] if the blocking poll task panics.
    pub async fn run(mut self) -> Result<(), TuiError> {
        let mut redraw = tokio::time::interval(self.redraw_rate);
        redraw.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        // Kept across iterations so a key read by the blocking task is never lost.
        let mut poll = spawn_poll();

        loop {
            tokio::select! {
                biased;

                _ = &mut self.shutdown_rx => {
                    tracing::debug!("EventHandler received shutdown signal");
                    break;
                }

                _ = redraw.tick() => {
                    if self.event_tx.send(TuiEvent::Render).await.is_err() {
                        break;
                    }
                }

                result = &mut poll => {
                    poll = spawn_poll();
                    match result {
                        Ok(Some(event)) => {
                            if self.event_tx.send(event).await.is_err() {
                                break;
                            }
                        }
                        Ok(None) => {}
                        Err(join_error) => {
                            tracing::error!(error = %join_error, "Terminal polling task panicked");
                            return Err(TuiError::Event(join_error.to_string()));
                        }
                    }
                }
            }
        }

        Ok(())
    }
}

fn spawn_poll() -> tokio::task::JoinHandle<Option<TuiEvent>> {
    tokio::task::spawn_blocking(|| poll_terminal_event(Duration::from_millis(POLL_TIMEOUT_MS)))
}

/// Polls crossterm once. Failures (no terminal, e.g. under test) count as
/// "no event".
fn poll_terminal_event(timeout: Duration) -> Option<TuiEvent> {
    match event::poll(timeout) {
        Ok(true) => match event::read() {
            Ok(crossterm_event) => convert_crossterm_event(crossterm_event),
            Err(e) => {
                tracing::trace!(error = %e, "Failed to read terminal event");
                None
            }
        },
        Ok(false) => None,
        Err(e) => {
            tracing::trace!(error = %e, "Failed to poll terminal");
            None
        }
    }
}

fn convert_crossterm_event(event: CrosstermEvent) -> Option<TuiEvent> {
    match event {
        // Windows reports releases too.
        CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => Some(TuiEvent::Key(key)),
        CrosstermEvent::Resize(cols, rows) => Some(TuiEvent::Resize(cols, rows)),
        _ => None,
    }
}
