//! Lightweight actor runtime.
//!
//! Actors own a private mailbox and process their messages one at a time. They
//! do not get a thread each: every actor registered with an [`ActorSystem`] is
//! scheduled onto the system's shared work-stealing pool, and an atomic
//! activation flag guarantees that at most one task per actor is queued or
//! running at any moment.
//!
//! ```no_run
//! use fast_actor::{Actor, ActorContext, ActorResult, ActorSystem};
//!
//! struct Greeter;
//!
//! impl Actor for Greeter {
//!     type Message = String;
//!
//!     fn on_message(&mut self, name: String, _ctx: &ActorContext<'_, String>) -> ActorResult {
//!         println!("hello, {name}");
//!         Ok(())
//!     }
//! }
//!
//! let system = ActorSystem::with_default_parallelism()?;
//! let greeter = system.actor_of(Greeter);
//! greeter.tell("world".to_string());
//! system.wait_on_idle(std::time::Duration::from_secs(1));
//! # Ok::<(), fast_actor::ActorError>(())
//! ```

pub mod actor;
pub mod actor_ref;
pub mod cell;
pub mod config;
pub mod context;
pub mod error;
pub mod mailbox;
pub mod router;
pub mod routing;
pub mod system;

pub use actor::Actor;
pub use actor_ref::{ActorRef, Routee};
pub use cell::ActorCell;
pub use config::ActorSystemConfig;
pub use context::ActorContext;
pub use error::{ActorError, ActorResult};
pub use mailbox::{BoundedMailbox, Mailbox, UnboundedMailbox};
pub use router::{Router, RouterBuilder};
pub use routing::{
    BroadcastRoutingLogic, ConsistentHashingRoutingLogic, RandomRoutingLogic,
    RoundRobinRoutingLogic, RoutingLogic, SmallestMailboxRoutingLogic,
};
pub use system::ActorSystem;
