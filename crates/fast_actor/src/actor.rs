use crate::{context::ActorContext, error::ActorResult};

/// Core trait that must be implemented by all actors.
///
/// An actor processes one message at a time. The runtime never invokes two
/// callbacks of the same actor concurrently, so handlers can mutate `self`
/// freely. Handlers run synchronously on a pool worker; a handler that blocks
/// holds that worker for the duration.
pub trait Actor: Send + 'static {
    /// Type of messages accepted by this actor.
    type Message: Send + 'static;

    /// Invoked once after the actor is registered, before any queued message is processed.
    fn pre_start(&mut self, _ctx: &ActorContext<'_, Self::Message>) -> ActorResult {
        Ok(())
    }

    /// Handles a single incoming message.
    ///
    /// A returned error is logged and the message is dropped; the actor keeps
    /// processing subsequent messages.
    fn on_message(
        &mut self,
        message: Self::Message,
        ctx: &ActorContext<'_, Self::Message>,
    ) -> ActorResult;
}

/// Unqualified type name used in generated actor names.
pub(crate) fn short_type_name<A: ?Sized>() -> &'static str {
    let full = std::any::type_name::<A>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Ping;
    struct Wrapper<T>(T);

    #[test]
    fn short_names_drop_module_path_and_generics() {
        assert_eq!(short_type_name::<Ping>(), "Ping");
        assert_eq!(short_type_name::<Wrapper<Ping>>(), "Wrapper");
        assert_eq!(short_type_name::<u32>(), "u32");
    }
}
