//! A value stream that keeps its latest value for late subscribers

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::sync::mpsc;
use tracing::debug;
use uuid::Uuid;

/// Latest value plus one queue per live subscriber.
///
/// Every published value is queued for every subscriber, so back-to-back
/// emissions are never collapsed.
#[derive(Debug)]
pub(crate) struct Topic {
    name: &'static str,
    state: Mutex<TopicState>,
}

#[derive(Debug)]
struct TopicState {
    current: String,
    subscribers: HashMap<Uuid, mpsc::UnboundedSender<String>>,
}

impl Topic {
    pub(crate) fn new(name: &'static str) -> Self {
        Self {
            name,
            state: Mutex::new(TopicState {
                current: String::new(),
                subscribers: HashMap::new(),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, TopicState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn name(&self) -> &'static str {
        self.name
    }

    /// Store `value` and queue it for every subscriber
    pub(crate) fn publish(&self, value: String) {
        debug!(stream = self.name, value = %value, "publish");

        let mut state = self.lock();
        state
            .subscribers
            .retain(|_, tx| tx.send(value.clone()).is_ok());
        state.current = value;
    }

    pub(crate) fn current(&self) -> String {
        self.lock().current.clone()
    }

    /// Register a subscriber, returning the value to replay and its queue
    pub(crate) fn attach(&self, id: Uuid) -> (String, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut state = self.lock();
        state.subscribers.insert(id, tx);
        (state.current.clone(), rx)
    }

    /// Drop a subscriber's queue; false if it was not attached
    pub(crate) fn detach(&self, id: Uuid) -> bool {
        self.lock().subscribers.remove(&id).is_some()
    }

    pub(crate) fn subscriber_count(&self) -> usize {
        self.lock().subscribers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_queues_every_value() {
        let topic = Topic::new("test");
        let id = Uuid::new_v4();
        let (initial, mut rx) = topic.attach(id);
        assert_eq!(initial, "");

        topic.publish("x".to_string());
        topic.publish(String::new());

        assert_eq!(rx.try_recv().unwrap(), "x");
        assert_eq!(rx.try_recv().unwrap(), "");
        assert_eq!(topic.current(), "");
    }

    #[test]
    fn test_detach_closes_queue() {
        let topic = Topic::new("test");
        let id = Uuid::new_v4();
        let (_, mut rx) = topic.attach(id);
        assert_eq!(topic.subscriber_count(), 1);

        assert!(topic.detach(id));
        assert!(!topic.detach(id));
        assert_eq!(topic.subscriber_count(), 0);

        topic.publish("late".to_string());
        assert!(rx.try_recv().is_err());
    }
}
