//! Unregister handles for stream observers

use super::topic::Topic;
use std::sync::{Arc, Weak};
use tokio::task::JoinHandle;
use tracing::debug;
use uuid::Uuid;

/// Live registration of one observer on one stream.
///
/// Dropping the handle releases it as well.
#[derive(Debug)]
pub struct Subscription {
    id: Uuid,
    topic: Weak<Topic>,
    stream: &'static str,
    task: Option<JoinHandle<()>>,
}

impl Subscription {
    /// Attach `observer` to `topic`.
    ///
    /// The current value is delivered before this returns; later values are
    /// forwarded in order from a spawned task.
    pub(crate) fn spawn<F>(topic: &Arc<Topic>, observer: F) -> Self
    where
        F: Fn(String) + Send + Sync + 'static,
    {
        let id = Uuid::new_v4();
        let (current, mut rx) = topic.attach(id);

        observer(current);

        let task = tokio::spawn(async move {
            while let Some(value) = rx.recv().await {
                observer(value);
            }
        });

        debug!(%id, stream = topic.name(), "subscribed");

        Self {
            id,
            topic: Arc::downgrade(topic),
            stream: topic.name(),
            task: Some(task),
        }
    }

    /// Stream this subscription observes
    pub fn stream(&self) -> &'static str {
        self.stream
    }

    pub fn is_active(&self) -> bool {
        self.task.is_some()
    }

    /// Stop delivering values; returns false if already released
    pub fn unsubscribe(&mut self) -> bool {
        match self.task.take() {
            Some(task) => {
                if let Some(topic) = self.topic.upgrade() {
                    topic.detach(self.id);
                }
                task.abort();
                debug!(id = %self.id, stream = self.stream, "unsubscribed");
                true
            }
            None => false,
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[tokio::test]
    async fn test_unsubscribe_is_idempotent() {
        let topic = Arc::new(Topic::new("test"));
        let mut sub = Subscription::spawn(&topic, |_| {});

        assert!(sub.is_active());
        assert_eq!(topic.subscriber_count(), 1);
        assert!(sub.unsubscribe());
        assert!(!sub.unsubscribe());
        assert!(!sub.is_active());
        assert_eq!(topic.subscriber_count(), 0);
        assert_eq!(sub.stream(), "test");
    }

    #[tokio::test]
    async fn test_current_value_delivered_before_return() {
        let topic = Arc::new(Topic::new("test"));
        topic.publish("ready".to_string());

        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let _sub = Subscription::spawn(&topic, move |v| sink.lock().unwrap().push(v));

        // No yield point between subscribing and checking.
        assert_eq!(*seen.lock().unwrap(), vec!["ready".to_string()]);
    }
}
