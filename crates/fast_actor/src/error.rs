use thiserror::Error;

/// Result type for actor operations.
pub type ActorResult<T = ()> = Result<T, ActorError>;

/// Errors returned by the actor runtime.
#[derive(Debug, Error)]
pub enum ActorError {
    /// Failure returned from a user handler.
    #[error("actor failure: {0}")]
    Handler(String),

    /// A handler panicked; the panic was caught at the drain boundary.
    #[error("actor '{actor}' panicked: {message}")]
    Panic { actor: String, message: String },

    /// The actor is not bound to a system yet.
    #[error(
        "actor '{actor}' is not registered with an actor system; \
         spawn children from pre_start or on_message"
    )]
    NotRegistered { actor: String },

    /// A router was built with, or asked to select from, an empty routee list.
    #[error("router has no routees")]
    NoRoutees,

    #[error("thread pool failure: {0}")]
    ThreadPool(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl ActorError {
    pub fn handler<E: ToString>(err: E) -> Self {
        ActorError::Handler(err.to_string())
    }

    pub fn thread_pool<E: ToString>(err: E) -> Self {
        ActorError::ThreadPool(err.to_string())
    }

    pub fn config<E: ToString>(err: E) -> Self {
        ActorError::Config(err.to_string())
    }

    pub(crate) fn not_registered(actor: &str) -> Self {
        ActorError::NotRegistered {
            actor: actor.to_string(),
        }
    }
}
