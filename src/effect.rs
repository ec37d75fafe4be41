use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use anyhow::{Result, anyhow};
use tracing::{debug, warn};

#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

struct Envelope<M> {
    token: CancelToken,
    message: M,
}

pub struct Effects<M> {
    tx: Sender<Envelope<M>>,
    rx: Receiver<Envelope<M>>,
    in_flight: usize,
}

impl<M: Send + 'static> Effects<M> {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self { tx, rx, in_flight: 0 }
    }

    #[cfg(test)]
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub fn spawn<T, F, W>(&mut self, token: &CancelToken, task: F, into_message: W)
    where
        T: Send + 'static,
        F: FnOnce() -> Result<T> + Send + 'static,
        W: FnOnce(Result<T>) -> M + Send + 'static,
    {
        let tx = self.tx.clone();
        let token = token.clone();
        self.in_flight += 1;

        thread::spawn(move || {
            let outcome = panic::catch_unwind(AssertUnwindSafe(task))
                .unwrap_or_else(|_| Err(anyhow!("background task panicked")));
            let message = into_message(outcome);
            if tx.send(Envelope { token, message }).is_err() {
                debug!("effect finished after its runner was dropped");
            }
        });
    }

    pub fn next(&mut self) -> Option<M> {
        while self.in_flight > 0 {
            let envelope = match self.rx.recv() {
                Ok(envelope) => envelope,
                Err(_) => {
                    warn!(in_flight = self.in_flight, "effect channel closed");
                    self.in_flight = 0;
                    return None;
                }
            };
            self.in_flight -= 1;

            if envelope.token.is_cancelled() {
                debug!("dropping response for a torn-down view");
                continue;
            }
            return Some(envelope.message);
        }
        None
    }
}

impl<M: Send + 'static> Default for Effects<M> {
    fn default() -> Self {
        Self::new()
    }
}
