//! Trailing-edge debouncing for typed input

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;

/// Collapses rapid calls into the last one.
///
/// Every [`call`](Debouncer::call) cancels the pending timer and starts a new
/// one; the action runs once the delay passes without another call.
pub struct Debouncer<T> {
    delay: Duration,
    action: Arc<dyn Fn(T) + Send + Sync>,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl<T: Send + 'static> Debouncer<T> {
    pub fn new<F>(delay: Duration, action: F) -> Self
    where
        F: Fn(T) + Send + Sync + 'static,
    {
        Self {
            delay,
            action: Arc::new(action),
            pending: Mutex::new(None),
        }
    }

    /// Schedule `value`, replacing any call still waiting.
    ///
    /// Must be called from within a tokio runtime.
    pub fn call(&self, value: T) {
        let action = self.action.clone();
        let delay = self.delay;

        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = pending.take() {
            previous.abort();
        }

        *pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            action(value);
        }));
    }

    /// Drop the waiting call, if any; returns whether one was dropped
    pub fn cancel(&self) -> bool {
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        match pending.take() {
            Some(task) if !task.is_finished() => {
                task.abort();
                true
            }
            _ => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|task| !task.is_finished())
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        let pending = self.pending.get_mut().unwrap_or_else(PoisonError::into_inner);
        if let Some(task) = pending.take() {
            task.abort();
        }
    }
}
