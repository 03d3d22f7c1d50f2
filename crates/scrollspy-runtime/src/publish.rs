#![forbid(unsafe_code)]

//! Synchronous state publication.
//!
//! Consumers (the sidebar, the progress bar) register a callback and
//! receive every state snapshot the moment it changes, on the same call
//! stack that changed it. There are no threads or channels here: every
//! event source in this engine runs on one cooperative loop, so delivery
//! is a plain function call. The point of the indirection is the explicit
//! subscribe/unsubscribe contract — producers never know who is listening.

use std::fmt;

/// A unique identifier for a subscriber.
///
/// Used to deduplicate and to unsubscribe; ids are never reused within one
/// publisher's lifetime.
pub type SubId = u64;

/// Registry of snapshot callbacks with synchronous fan-out.
pub struct StatePublisher<T> {
    next_id: SubId,
    subscribers: Vec<(SubId, Box<dyn FnMut(&T)>)>,
}

impl<T> Default for StatePublisher<T> {
    fn default() -> Self {
        Self {
            next_id: 1,
            subscribers: Vec::new(),
        }
    }
}

impl<T> fmt::Debug for StatePublisher<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StatePublisher")
            .field("subscribers", &self.subscribers.len())
            .field("next_id", &self.next_id)
            .finish()
    }
}

impl<T> StatePublisher<T> {
    /// Create a publisher with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback. Returns the id used to unsubscribe.
    pub fn subscribe(&mut self, callback: impl FnMut(&T) + 'static) -> SubId {
        let id = self.next_id;
        self.next_id += 1;
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    /// Remove a subscriber. Returns `false` if the id was unknown.
    pub fn unsubscribe(&mut self, id: SubId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sub_id, _)| *sub_id != id);
        self.subscribers.len() != before
    }

    /// Deliver a snapshot to every subscriber, in subscription order.
    pub fn publish(&mut self, snapshot: &T) {
        for (_, callback) in &mut self.subscribers {
            callback(snapshot);
        }
    }

    /// Deliver a snapshot to one subscriber only (used for the immediate
    /// snapshot on subscribe).
    pub fn notify_one(&mut self, id: SubId, snapshot: &T) {
        if let Some((_, callback)) = self.subscribers.iter_mut().find(|(sub_id, _)| *sub_id == id) {
            callback(snapshot);
        }
    }

    /// Number of registered subscribers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    /// Whether nobody is listening.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }

    /// Drop every subscriber.
    pub fn clear(&mut self) {
        self.subscribers.clear();
    }
}
