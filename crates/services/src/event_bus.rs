//! In-process publish/subscribe for course events.

use std::sync::{Arc, Mutex, PoisonError};

use course_core::model::CourseEvent;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;

/// Typed event channel shared by the progression engine and the playback surface.
///
/// Publishing never waits on subscribers. Each subscriber gets its own queue,
/// filled in registration order. Dropped subscriptions are pruned on the next
/// publish.
#[derive(Clone, Default)]
pub struct EventBus {
    subscribers: Arc<Mutex<Vec<UnboundedSender<CourseEvent>>>>,
}

impl EventBus {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn subscribe(&self) -> Subscription {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(tx);
        Subscription { rx }
    }

    /// Deliver `event` to every live subscriber. Returns how many received it.
    pub fn publish(&self, event: &CourseEvent) -> usize {
        let mut subscribers = self
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        subscribers.retain(|tx| tx.send(event.clone()).is_ok());
        subscribers.len()
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        let mut subscribers = self
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        subscribers.retain(|tx| !tx.is_closed());
        subscribers.len()
    }
}

/// Receiving end of a bus registration. Dropping it unregisters.
pub struct Subscription {
    rx: UnboundedReceiver<CourseEvent>,
}

impl Subscription {
    /// Wait for the next event. `None` once the bus has been dropped.
    pub async fn recv(&mut self) -> Option<CourseEvent> {
        self.rx.recv().await
    }

    /// Take the next queued event without waiting.
    pub fn try_recv(&mut self) -> Option<CourseEvent> {
        self.rx.try_recv().ok()
    }
}

/// Background task consuming a subscription. Aborted on drop.
pub struct EventListener {
    handle: JoinHandle<()>,
}

impl EventListener {
    pub(crate) fn new(handle: JoinHandle<()>) -> Self {
        Self { handle }
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    pub fn stop(self) {
        self.handle.abort();
    }
}

impl Drop for EventListener {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
