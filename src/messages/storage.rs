use super::types::{Message, MessageId};
use crossbeam_channel::{unbounded, Receiver, Sender};
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use tracing::debug;

/// Notification sent to subscribers after every append
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreEvent {
    Appended { id: MessageId, index: usize },
}

/// Append-only, ordered message list for one session.
///
/// Cloning yields another handle onto the same list.
#[derive(Debug, Clone)]
pub struct MessageStore {
    messages: Arc<RwLock<Vec<Message>>>,
    subscribers: Arc<Mutex<Vec<Sender<StoreEvent>>>>,
}

impl MessageStore {
    pub fn new() -> Self {
        Self {
            messages: Arc::new(RwLock::new(Vec::new())),
            subscribers: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Append at the end. Insertion order is display order, whenever the
    /// message was built.
    pub fn append(&self, message: Message) {
        let id = message.id;
        let index = {
            let mut messages = self.messages.write();
            messages.push(message);
            messages.len() - 1
        };

        debug!(%id, index, "Message appended");

        let event = StoreEvent::Appended { id, index };
        self.subscribers
            .lock()
            .retain(|subscriber| subscriber.send(event).is_ok());
    }

    /// Snapshot of every message in display order
    pub fn all(&self) -> Vec<Message> {
        self.messages.read().clone()
    }

    pub fn last(&self) -> Option<Message> {
        self.messages.read().last().cloned()
    }

    pub fn len(&self) -> usize {
        self.messages.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.read().is_empty()
    }

    /// Receive a [`StoreEvent`] for each subsequent append
    pub fn subscribe(&self) -> Receiver<StoreEvent> {
        let (tx, rx) = unbounded();
        self.subscribers.lock().push(tx);
        rx
    }
}

impl Default for MessageStore {
    fn default() -> Self {
        Self::new()
    }
}
