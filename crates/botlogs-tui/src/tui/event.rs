use std::time::Duration;

use crossterm::event::{self, Event as CrosstermEvent, KeyEvent, KeyEventKind};
use futures::{FutureExt, StreamExt};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Terminal events
#[derive(Clone, Debug)]
pub enum Event {
    /// Periodic tick, drives toast expiry
    Tick,
    Key(KeyEvent),
    Resize(u16, u16),
    Error(String),
}

/// Reads crossterm input on a background task
pub struct EventHandler {
    receiver: mpsc::UnboundedReceiver<Event>,
    cancel: CancellationToken,
}

impl EventHandler {
    pub fn new(tick_rate: Duration) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();

        let token = cancel.clone();
        tokio::spawn(async move {
            let mut reader = event::EventStream::new();
            let mut tick_interval = tokio::time::interval(tick_rate);

            loop {
                let tick = tick_interval.tick();
                let crossterm_event = reader.next().fuse();

                tokio::select! {
                    _ = token.cancelled() => break,

                    _ = tick => {
                        let _ = sender.send(Event::Tick);
                    }

                    maybe_event = crossterm_event => {
                        match maybe_event {
                            // Release/repeat events are reported on some platforms
                            Some(Ok(CrosstermEvent::Key(key))) if key.kind == KeyEventKind::Press => {
                                let _ = sender.send(Event::Key(key));
                            }
                            Some(Ok(CrosstermEvent::Resize(w, h))) => {
                                let _ = sender.send(Event::Resize(w, h));
                            }
                            Some(Ok(_)) => {}
                            Some(Err(e)) => {
                                tracing::warn!(error = %e, "terminal input error");
                                let _ = sender.send(Event::Error(e.to_string()));
                            }
                            None => break,
                        }
                    }
                }
            }
        });

        Self { receiver, cancel }
    }

    pub async fn next(&mut self) -> Option<Event> {
        self.receiver.recv().await
    }

    pub fn shutdown(&self) {
        self.cancel.cancel();
    }
}

impl Drop for EventHandler {
    fn drop(&mut self) {
        self.shutdown();
    }
}
