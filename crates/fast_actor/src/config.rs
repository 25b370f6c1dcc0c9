//! Actor system configuration.
//!
//! Configuration is plain serde data so it can be embedded in a larger TOML file
//! or loaded on its own:
//!
//! ```toml
//! threads = 8
//! thread_name_prefix = "actor-thread-user"
//! ```

use crate::error::{ActorError, ActorResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Prefix for worker thread names, followed by the worker index.
pub const DEFAULT_THREAD_NAME_PREFIX: &str = "actor-thread-user";

/// Configuration of an [`ActorSystem`](crate::ActorSystem) worker pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActorSystemConfig {
    /// Number of worker threads. `0` selects the host parallelism.
    pub threads: usize,
    /// Worker threads are named `<prefix>-<index>`.
    pub thread_name_prefix: String,
    /// Stack size for worker threads in bytes; `None` keeps the platform default.
    pub stack_size: Option<usize>,
}

impl Default for ActorSystemConfig {
    fn default() -> Self {
        Self {
            threads: 0,
            thread_name_prefix: DEFAULT_THREAD_NAME_PREFIX.to_string(),
            stack_size: None,
        }
    }
}

impl ActorSystemConfig {
    /// Configuration with an explicit thread count.
    pub fn with_threads(threads: usize) -> Self {
        Self {
            threads,
            ..Self::default()
        }
    }

    /// Parses a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> ActorResult<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a TOML configuration file.
    pub fn load(path: impl AsRef<Path>) -> ActorResult<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&text)
    }

    /// Thread count with `0` resolved to the host parallelism.
    pub fn resolved_threads(&self) -> usize {
        if self.threads == 0 {
            num_cpus::get()
        } else {
            self.threads
        }
    }

    pub fn validate(&self) -> ActorResult<()> {
        if self.thread_name_prefix.trim().is_empty() {
            return Err(ActorError::config("thread_name_prefix must not be empty"));
        }
        if self.stack_size == Some(0) {
            return Err(ActorError::config("stack_size must be positive"));
        }
        Ok(())
    }
}
