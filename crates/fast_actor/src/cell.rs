//! Scheduling core.
//!
//! Every actor owns an activation flag. `false` means no drain task is queued
//! or running for the actor; `true` means exactly one is. Producers only ever
//! push into the mailbox and try to flip the flag up; the active drain task is
//! the only party that flips it back down, and it re-checks the mailbox right
//! after doing so. That re-check is what keeps a message pushed while the flag
//! was still up from being stranded.

use crate::{
    actor::{short_type_name, Actor},
    actor_ref::{ActorRef, Mailer},
    context::ActorContext,
    error::{ActorError, ActorResult},
    mailbox::{Mailbox, UnboundedMailbox},
    system::ActorSystem,
};
use parking_lot::Mutex;
use std::{
    any::Any,
    panic::{catch_unwind, AssertUnwindSafe},
    sync::{
        atomic::{fence, AtomicBool, Ordering},
        Arc, OnceLock,
    },
};
use tracing::{error, trace, warn};
use uuid::Uuid;

/// An actor together with its mailbox, name and activation flag.
///
/// A cell is created unregistered. Its [`ActorRef`] can be taken and used right
/// away; messages sent before registration wait in the mailbox and are drained
/// once the actor's start hook has run.
pub struct ActorCell<A: Actor> {
    core: Arc<ActorCore<A>>,
}

impl<A: Actor> ActorCell<A> {
    /// Cell with a generated name and an unbounded mailbox.
    pub fn new(actor: A) -> Self {
        Self::build(None, actor, Box::new(UnboundedMailbox::new()))
    }

    /// Cell with the given name and an unbounded mailbox.
    pub fn named(name: impl Into<String>, actor: A) -> Self {
        Self::build(Some(name.into()), actor, Box::new(UnboundedMailbox::new()))
    }

    /// Cell with a custom mailbox. A `None` name is generated.
    pub fn with_mailbox(
        name: Option<String>,
        actor: A,
        mailbox: impl Mailbox<A::Message>,
    ) -> Self {
        Self::build(name, actor, Box::new(mailbox))
    }

    fn build(name: Option<String>, actor: A, mailbox: Box<dyn Mailbox<A::Message>>) -> Self {
        let name = name.unwrap_or_else(|| generate_name(short_type_name::<A>()));
        Self {
            core: Arc::new(ActorCore {
                name,
                actor: Mutex::new(actor),
                mailbox,
                scheduled: AtomicBool::new(false),
                system: OnceLock::new(),
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.core.name
    }

    pub fn actor_ref(&self) -> ActorRef<A::Message> {
        self.core.actor_ref()
    }

    /// Context of the not yet registered actor.
    pub fn context(&self) -> ActorContext<'_, A::Message> {
        ActorContext::new(self.actor_ref(), self.core.system.get())
    }

    /// Binds the actor to `system` and submits its start hook.
    pub(crate) fn register(self, system: &ActorSystem) -> ActorRef<A::Message> {
        let core = self.core;
        // Raised before the system becomes visible so no producer can submit a
        // drain task ahead of the start hook.
        core.scheduled.store(true, Ordering::SeqCst);
        // The cell is consumed here, so the slot is always empty.
        let _ = core.system.set(system.clone());
        trace!(target: "actor", actor = %core.name, "actor registered");

        let start = Arc::clone(&core);
        system.submit(move || start.run_start());
        core.actor_ref()
    }
}

impl<A: Actor> From<A> for ActorCell<A> {
    fn from(actor: A) -> Self {
        ActorCell::new(actor)
    }
}

pub(crate) fn generate_name(type_name: &str) -> String {
    format!("{}/{}", type_name, Uuid::new_v4().simple())
}

pub(crate) struct ActorCore<A: Actor> {
    name: String,
    // Only the task holding the activation flag locks this, so the lock is
    // never contended.
    actor: Mutex<A>,
    mailbox: Box<dyn Mailbox<A::Message>>,
    scheduled: AtomicBool,
    system: OnceLock<ActorSystem>,
}

impl<A: Actor> ActorCore<A> {
    fn actor_ref(self: &Arc<Self>) -> ActorRef<A::Message> {
        ActorRef::new(Arc::clone(self) as Arc<dyn Mailer<A::Message>>)
    }

    /// Submits a drain task if the actor is idle and has pending messages.
    fn schedule_if_needed(self: &Arc<Self>) {
        // Pairs a producer's push with the drain task's flag release: at least
        // one side observes the other.
        fence(Ordering::SeqCst);
        let Some(system) = self.system.get() else {
            return;
        };
        if !self.scheduled.load(Ordering::SeqCst)
            && !self.mailbox.is_empty()
            && self
                .scheduled
                .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
                .is_ok()
        {
            let core = Arc::clone(self);
            system.submit(move || core.run_drain());
        }
    }

    fn release(self: &Arc<Self>) {
        self.scheduled.store(false, Ordering::SeqCst);
        self.schedule_if_needed();
    }

    fn run_start(self: Arc<Self>) {
        let ctx = ActorContext::new(self.actor_ref(), self.system.get());
        {
            let mut actor = self.actor.lock();
            let outcome = catch_unwind(AssertUnwindSafe(|| actor.pre_start(&ctx)));
            self.report("pre_start", outcome);
        }
        self.release();
    }

    fn run_drain(self: Arc<Self>) {
        let ctx = ActorContext::new(self.actor_ref(), self.system.get());
        {
            let mut actor = self.actor.lock();
            while let Some(message) = self.mailbox.poll() {
                let outcome = catch_unwind(AssertUnwindSafe(|| actor.on_message(message, &ctx)));
                self.report("on_message", outcome);
            }
        }
        self.release();
    }

    fn report(&self, stage: &'static str, outcome: std::thread::Result<ActorResult>) {
        let error = match outcome {
            Ok(Ok(())) => return,
            Ok(Err(error)) => error,
            Err(payload) => ActorError::Panic {
                actor: self.name.clone(),
                message: panic_message(&*payload),
            },
        };
        error!(
            target: "actor",
            actor = %self.name,
            stage,
            %error,
            "unexpected failure from actor"
        );
    }
}

impl<A: Actor> Mailer<A::Message> for ActorCore<A> {
    fn name(&self) -> &str {
        &self.name
    }

    fn deliver(self: Arc<Self>, message: A::Message) {
        if self.mailbox.offer(message).is_err() {
            warn!(
                target: "actor",
                actor = %self.name,
                queued = self.mailbox.len(),
                "mailbox rejected message, dropping it"
            );
            return;
        }
        self.schedule_if_needed();
    }

    fn mailbox_len(&self) -> usize {
        self.mailbox.len()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mailbox::BoundedMailbox;

    struct Echo;

    impl Actor for Echo {
        type Message = u32;

        fn on_message(&mut self, _message: u32, _ctx: &ActorContext<'_, u32>) -> ActorResult {
            Ok(())
        }
    }

    #[test]
    fn generated_name_has_type_prefix_and_token() {
        let cell = ActorCell::new(Echo);
        let (prefix, token) = cell.name().split_once('/').unwrap();
        assert_eq!(prefix, "Echo");
        assert_eq!(token.len(), 32);
        assert_ne!(cell.name(), ActorCell::new(Echo).name());
    }

    #[test]
    fn refs_compare_by_name() {
        let cell = ActorCell::named("echo", Echo);
        let other = ActorCell::named("echo", Echo);
        assert_eq!(cell.actor_ref(), cell.actor_ref());
        assert_eq!(cell.actor_ref(), other.actor_ref());
        assert_ne!(cell.actor_ref(), ActorCell::named("echo-2", Echo).actor_ref());
        assert_eq!(format!("{:?}", cell.actor_ref()), "ActorRef(\"echo\")");
    }

    #[test]
    fn messages_queue_until_registration() {
        let cell = ActorCell::named("echo", Echo);
        let actor_ref = cell.actor_ref();
        actor_ref.tell(1);
        actor_ref.tell(2);
        assert_eq!(actor_ref.mailbox_len(), 2);
        assert!(!cell.core.scheduled.load(Ordering::SeqCst));
    }

    #[test]
    fn narrowed_ref_converts_into_the_same_mailbox() {
        let cell = ActorCell::named("echo", Echo);
        let actor_ref = cell.actor_ref();
        let narrowed = actor_ref.narrow::<u8>();
        narrowed.tell(7u8);
        actor_ref.tell(8);
        assert_eq!(narrowed.name(), "echo");
        assert_eq!(narrowed.mailbox_len(), 2);
        assert_eq!(cell.core.mailbox.poll(), Some(7));
        assert_eq!(cell.core.mailbox.poll(), Some(8));
    }

    #[test]
    fn unregistered_context_cannot_spawn() {
        let cell = ActorCell::named("parent", Echo);
        let ctx = cell.context();
        assert_eq!(ctx.name(), "parent");
        let err = ctx.actor_of(Echo).unwrap_err();
        assert!(matches!(err, ActorError::NotRegistered { ref actor } if actor == "parent"));
    }

    #[test]
    fn full_bounded_mailbox_drops_message() {
        let cell = ActorCell::with_mailbox(None, Echo, BoundedMailbox::new(1));
        let actor_ref = cell.actor_ref();
        actor_ref.tell(1);
        actor_ref.tell(2);
        assert_eq!(actor_ref.mailbox_len(), 1);
    }

    #[test]
    fn panic_payloads_are_rendered() {
        assert_eq!(panic_message(&"boom"), "boom");
        assert_eq!(panic_message(&"boom".to_string()), "boom");
        assert_eq!(panic_message(&7u8), "non-string panic payload");
    }
}
