//! Actor mailboxes.
//!
//! A mailbox is a FIFO that accepts messages from any number of producers and is
//! drained by exactly one consumer at a time: the actor's active drain task.
//! Implementations must never block in [`Mailbox::offer`] or [`Mailbox::poll`].

use crossbeam::queue::{ArrayQueue, SegQueue};

/// Ordered concurrent container backing an actor.
pub trait Mailbox<M>: Send + Sync + 'static {
    /// Appends a message. Returns the message back if the mailbox rejects it.
    fn offer(&self, message: M) -> Result<(), M>;

    /// Removes the oldest message, or `None` when the mailbox is empty.
    fn poll(&self) -> Option<M>;

    /// Number of queued messages. May be approximate under concurrent access.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Lock-free unbounded mailbox. The default for every actor.
pub struct UnboundedMailbox<M> {
    queue: SegQueue<M>,
}

impl<M> UnboundedMailbox<M> {
    pub fn new() -> Self {
        Self {
            queue: SegQueue::new(),
        }
    }
}

impl<M> Default for UnboundedMailbox<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: Send + 'static> Mailbox<M> for UnboundedMailbox<M> {
    fn offer(&self, message: M) -> Result<(), M> {
        self.queue.push(message);
        Ok(())
    }

    fn poll(&self) -> Option<M> {
        self.queue.pop()
    }

    fn len(&self) -> usize {
        self.queue.len()
    }

    fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

/// Array-backed mailbox with a fixed capacity. Offers beyond capacity are rejected.
pub struct BoundedMailbox<M> {
    queue: ArrayQueue<M>,
}

impl<M> BoundedMailbox<M> {
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        Self {
            queue: ArrayQueue::new(capacity),
        }
    }

    pub fn capacity(&self) -> usize {
        self.queue.capacity()
    }
}

impl<M: Send + 'static> Mailbox<M> for BoundedMailbox<M> {
    fn offer(&self, message: M) -> Result<(), M> {
        self.queue.push(message)
    }

    fn poll(&self) -> Option<M> {
        self.queue.pop()
    }

    fn len(&self) -> usize {
        self.queue.len()
    }

    fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
