use std::{
    fmt,
    hash::{Hash, Hasher},
    sync::Arc,
};

/// Delivery side of an actor, erased over the concrete actor type.
pub(crate) trait Mailer<M>: Send + Sync {
    fn name(&self) -> &str;

    /// Enqueues the message and activates the actor if needed.
    fn deliver(self: Arc<Self>, message: M);

    fn mailbox_len(&self) -> usize;
}

/// Immutable handle to an actor.
///
/// Handles are cheap to clone and can be shared freely between threads and
/// passed inside messages. Fire-and-forget delivery through [`ActorRef::tell`]
/// is their only purpose. Equality and hashing use the actor name.
pub struct ActorRef<M> {
    inner: Arc<dyn Mailer<M>>,
}

impl<M: Send + 'static> ActorRef<M> {
    pub(crate) fn new(inner: Arc<dyn Mailer<M>>) -> Self {
        Self { inner }
    }

    /// Sends a message to the actor. Never blocks.
    pub fn tell(&self, message: M) {
        Arc::clone(&self.inner).deliver(message);
    }

    pub fn name(&self) -> &str {
        self.inner.name()
    }

    pub(crate) fn mailbox_len(&self) -> usize {
        self.inner.mailbox_len()
    }

    /// Reference to the same actor accepting any message convertible into `M`.
    ///
    /// Messages are converted on [`tell`](ActorRef::tell). The narrowed
    /// reference keeps the actor's name, so it compares equal to `self`.
    pub fn narrow<R>(&self) -> ActorRef<R>
    where
        R: Into<M> + Send + 'static,
    {
        ActorRef::new(Arc::new(Narrowed {
            inner: Arc::clone(&self.inner),
        }))
    }
}

struct Narrowed<M> {
    inner: Arc<dyn Mailer<M>>,
}

impl<R, M> Mailer<R> for Narrowed<M>
where
    R: Into<M>,
    M: Send + 'static,
{
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn deliver(self: Arc<Self>, message: R) {
        Arc::clone(&self.inner).deliver(message.into());
    }

    fn mailbox_len(&self) -> usize {
        self.inner.mailbox_len()
    }
}

impl<M> Clone for ActorRef<M> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<M> PartialEq for ActorRef<M> {
    fn eq(&self, other: &Self) -> bool {
        self.inner.name() == other.inner.name()
    }
}

impl<M> Eq for ActorRef<M> {}

impl<M> Hash for ActorRef<M> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.inner.name().hash(state);
    }
}

impl<M> fmt::Debug for ActorRef<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ActorRef").field(&self.inner.name()).finish()
    }
}

impl<M> fmt::Display for ActorRef<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.inner.name())
    }
}

/// Destination actor of a router, as seen by a routing logic.
pub struct Routee<M> {
    actor_ref: ActorRef<M>,
}

impl<M: Send + 'static> Routee<M> {
    pub(crate) fn new(actor_ref: ActorRef<M>) -> Self {
        Self { actor_ref }
    }

    /// Number of messages currently waiting in the routee's mailbox.
    pub fn mailbox_size(&self) -> usize {
        self.actor_ref.mailbox_len()
    }

    pub fn actor_ref(&self) -> &ActorRef<M> {
        &self.actor_ref
    }
}

impl<M> Clone for Routee<M> {
    fn clone(&self) -> Self {
        Self {
            actor_ref: self.actor_ref.clone(),
        }
    }
}

impl<M> fmt::Debug for Routee<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Routee")
            .field("actor", &self.actor_ref.inner.name())
            .finish()
    }
}
