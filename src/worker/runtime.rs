//! Background thread hosting a [`CatalogWorker`].
//!
//! The session posts [`WorkerMessage`]s through a [`WorkerHandle`]; the worker
//! thread processes them in order and hands each [`WorkerResponse`] to the
//! `post` callback supplied at spawn time, which feeds it back into the
//! session's event loop. Dropping the handle closes the channel and lets the
//! thread finish.

use crate::domain::error::{Result, SkipHireError};
use crate::worker::{CatalogWorker, WorkerMessage, WorkerResponse};
use std::sync::mpsc::{self, Sender};
use std::thread::JoinHandle;

/// Session-side handle to the worker thread.
#[derive(Debug)]
pub struct WorkerHandle {
    sender: Option<Sender<WorkerMessage>>,
    thread: Option<JoinHandle<()>>,
}

impl WorkerHandle {
    /// Spawns the worker thread.
    ///
    /// # Errors
    ///
    /// Returns [`SkipHireError::Worker`] if the thread cannot be spawned.
    pub fn spawn<P>(mut worker: CatalogWorker, post: P) -> Result<Self>
    where
        P: Fn(WorkerResponse) + Send + 'static,
    {
        let (sender, receiver) = mpsc::channel::<WorkerMessage>();

        let thread = std::thread::Builder::new()
            .name("skiphire-catalog".to_string())
            .spawn(move || {
                tracing::debug!("catalog worker started");
                for message in receiver {
                    let response = worker.handle_message(message);
                    post(response);
                }
                tracing::debug!("catalog worker stopped");
            })
            .map_err(|e| SkipHireError::Worker(format!("spawning worker thread: {e}")))?;

        Ok(Self {
            sender: Some(sender),
            thread: Some(thread),
        })
    }

    /// Queues a message for the worker.
    ///
    /// # Errors
    ///
    /// Returns [`SkipHireError::Worker`] if the worker thread has exited.
    pub fn post(&self, message: WorkerMessage) -> Result<()> {
        let sender = self
            .sender
            .as_ref()
            .ok_or_else(|| SkipHireError::Worker("worker already shut down".to_string()))?;

        sender
            .send(message)
            .map_err(|_| SkipHireError::Worker("worker thread has exited".to_string()))
    }

    /// Closes the channel and waits for the worker to drain.
    pub fn shutdown(&mut self) {
        self.sender.take();
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                tracing::error!("catalog worker panicked");
            }
        }
    }
}

impl Drop for WorkerHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}
