use crate::{
    actor::Actor,
    actor_ref::ActorRef,
    cell::ActorCell,
    error::{ActorError, ActorResult},
    router::Router,
    system::ActorSystem,
};

/// Capabilities handed to an actor's lifecycle callbacks.
///
/// The context is only bound to a system once the actor is registered. A
/// context taken from an unregistered [`ActorCell`] can still report the
/// actor's own reference, but spawning through it fails with
/// [`ActorError::NotRegistered`].
pub struct ActorContext<'a, M> {
    self_ref: ActorRef<M>,
    system: Option<&'a ActorSystem>,
}

impl<'a, M: Send + 'static> ActorContext<'a, M> {
    pub(crate) fn new(self_ref: ActorRef<M>, system: Option<&'a ActorSystem>) -> Self {
        Self { self_ref, system }
    }

    /// The reference of the actor owning this context.
    pub fn self_ref(&self) -> &ActorRef<M> {
        &self.self_ref
    }

    pub fn name(&self) -> &str {
        self.self_ref.name()
    }

    /// The system this actor is registered with.
    pub fn system(&self) -> ActorResult<&'a ActorSystem> {
        self.system
            .ok_or_else(|| ActorError::not_registered(self.self_ref.name()))
    }

    /// Registers another actor in the same system.
    pub fn actor_of<A: Actor>(
        &self,
        actor: impl Into<ActorCell<A>>,
    ) -> ActorResult<ActorRef<A::Message>> {
        Ok(self.system()?.actor_of(actor))
    }

    /// Registers a router, and all of its routees, in the same system.
    pub fn router_of<R: Send + 'static>(&self, router: Router<R>) -> ActorResult<ActorRef<R>> {
        Ok(self.system()?.router_of(router))
    }
}
