//! Routers.
//!
//! A router forwards messages to a fixed set of routee actors according to a
//! [`RoutingLogic`]. The routing decision itself runs inside a dedicated actor,
//! so the logic is serialized by the same activation protocol as any other
//! actor and needs no locking of its own.

use crate::{
    actor::Actor,
    actor_ref::{ActorRef, Routee},
    cell::{generate_name, ActorCell},
    context::ActorContext,
    error::{ActorError, ActorResult},
    routing::RoutingLogic,
    system::ActorSystem,
};
use std::fmt;
use tracing::debug;

/// Routee actor waiting to be registered together with its router.
trait PendingRoutee: Send {
    fn register_boxed(self: Box<Self>, system: &ActorSystem);
}

impl<A: Actor> PendingRoutee for ActorCell<A> {
    fn register_boxed(self: Box<Self>, system: &ActorSystem) {
        system.actor_of(*self);
    }
}

/// A routing logic bound to an ordered list of routee actors.
///
/// Register it with [`ActorSystem::router_of`] (or
/// [`ActorContext::router_of`]) to obtain the reference messages are sent to.
/// The routee list is fixed at construction.
pub struct Router<M: Send + 'static> {
    name: Option<String>,
    logic: Box<dyn RoutingLogic<M>>,
    routees: Vec<Routee<M>>,
    actors: Vec<Box<dyn PendingRoutee>>,
}

impl<M: Send + 'static> Router<M> {
    /// Router over an explicit list of actors of one type, in routing order.
    ///
    /// Fails with [`ActorError::NoRoutees`] if `actors` is empty. Use
    /// [`Router::builder`] to mix actor types sharing the message type.
    pub fn new<L, A, I>(logic: L, actors: I) -> ActorResult<Self>
    where
        L: RoutingLogic<M>,
        A: Actor<Message = M>,
        I: IntoIterator,
        I::Item: Into<ActorCell<A>>,
    {
        let mut builder = Self::builder(logic);
        for actor in actors {
            builder = builder.push::<A>(actor.into());
        }
        builder.build()
    }

    /// Router over `size` actors built by `factory`.
    pub fn pool<L, A, F>(logic: L, size: usize, mut factory: F) -> ActorResult<Self>
    where
        L: RoutingLogic<M>,
        A: Actor<Message = M>,
        F: FnMut() -> A,
    {
        Self::new::<L, A, _>(logic, (0..size).map(|_| factory()))
    }

    /// Starts a router whose routees are added one at a time.
    ///
    /// Routees may be of different actor types as long as they handle `M`.
    pub fn builder<L: RoutingLogic<M>>(logic: L) -> RouterBuilder<M> {
        RouterBuilder {
            name: None,
            logic: Box::new(logic),
            routees: Vec::new(),
            actors: Vec::new(),
        }
    }

    /// Names the router's dispatching actor.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Routees in routing order.
    pub fn routees(&self) -> &[Routee<M>] {
        &self.routees
    }

    pub(crate) fn register(self, system: &ActorSystem) -> ActorRef<M> {
        let Router {
            name,
            logic,
            routees,
            actors,
        } = self;
        for actor in actors {
            actor.register_boxed(system);
        }

        let name = name.unwrap_or_else(|| generate_name("Router"));
        debug!(target: "actor", router = %name, routees = routees.len(), "router registered");
        system.actor_of(ActorCell::named(name, RouterActor { logic, routees }))
    }
}

impl<M: Send + 'static> fmt::Debug for Router<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("name", &self.name)
            .field("routees", &self.routees)
            .finish()
    }
}

/// Incremental [`Router`] construction, see [`Router::builder`].
pub struct RouterBuilder<M: Send + 'static> {
    name: Option<String>,
    logic: Box<dyn RoutingLogic<M>>,
    routees: Vec<Routee<M>>,
    actors: Vec<Box<dyn PendingRoutee>>,
}

impl<M: Send + 'static> RouterBuilder<M> {
    /// Appends a routee; routing order is insertion order.
    pub fn routee<A>(self, actor: impl Into<ActorCell<A>>) -> Self
    where
        A: Actor<Message = M>,
    {
        self.push(actor.into())
    }

    fn push<A: Actor<Message = M>>(mut self, cell: ActorCell<A>) -> Self {
        self.routees.push(Routee::new(cell.actor_ref()));
        self.actors.push(Box::new(cell));
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Fails with [`ActorError::NoRoutees`] if no routee was added.
    pub fn build(self) -> ActorResult<Router<M>> {
        if self.routees.is_empty() {
            return Err(ActorError::NoRoutees);
        }
        Ok(Router {
            name: self.name,
            logic: self.logic,
            routees: self.routees,
            actors: self.actors,
        })
    }
}

impl<M: Send + 'static> fmt::Debug for RouterBuilder<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouterBuilder")
            .field("name", &self.name)
            .field("routees", &self.routees)
            .finish()
    }
}

/// Actor owning a router's logic; applies it to each message it receives.
struct RouterActor<M: Send + 'static> {
    logic: Box<dyn RoutingLogic<M>>,
    routees: Vec<Routee<M>>,
}

impl<M: Send + 'static> Actor for RouterActor<M> {
    type Message = M;

    fn on_message(&mut self, message: M, _ctx: &ActorContext<'_, M>) -> ActorResult {
        self.logic.select(message, &self.routees)
    }
}
