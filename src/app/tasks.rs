//! Background operations polled once per frame.
//!
//! Blocking network work runs on a worker thread and reports back through a
//! channel. The UI thread polls the channel every frame and applies the
//! result itself, so the scene is only ever touched from the UI thread.

use std::sync::mpsc::{Receiver, TryRecvError, channel};
use std::thread;

/// How a pending operation's closure is run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Executor {
    /// On a fresh worker thread
    #[default]
    Threaded,
    /// Immediately on the calling thread (deterministic, for tests)
    Inline,
}

#[derive(Debug, PartialEq)]
pub enum TaskPoll<T> {
    Pending,
    Ready(T),
    /// The worker went away without reporting (it panicked)
    Lost,
}

/// A handle to a pending operation that can be polled
pub struct PendingOp<T> {
    receiver: Receiver<T>,
}

impl<T: Send + 'static> PendingOp<T> {
    pub fn spawn<F>(executor: Executor, name: &str, job: F) -> Self
    where
        F: FnOnce() -> T + Send + 'static,
    {
        let (sender, receiver) = channel();

        match executor {
            Executor::Inline => {
                let _ = sender.send(job());
            }
            Executor::Threaded => {
                let spawned = thread::Builder::new()
                    .name(name.to_string())
                    .spawn(move || {
                        let _ = sender.send(job());
                    });
                // The sender is dropped with the closure, so polling reports Lost.
                if let Err(e) = spawned {
                    log::error!("Failed to spawn {} worker: {}", name, e);
                }
            }
        }

        Self { receiver }
    }

    pub fn poll(&self) -> TaskPoll<T> {
        match self.receiver.try_recv() {
            Ok(result) => TaskPoll::Ready(result),
            Err(TryRecvError::Empty) => TaskPoll::Pending,
            Err(TryRecvError::Disconnected) => TaskPoll::Lost,
        }
    }
}
