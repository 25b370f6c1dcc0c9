//! The actor system: a flat group of actors sharing one worker pool.

use crate::{
    actor::Actor,
    actor_ref::ActorRef,
    cell::ActorCell,
    config::ActorSystemConfig,
    error::{ActorError, ActorResult},
    router::Router,
};
use parking_lot::{Condvar, Mutex};
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::{
    fmt,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    time::{Duration, Instant},
};
use tracing::{debug, error};

/// Entry point for creating actors.
///
/// All actors registered with a system, directly or through
/// [`ActorContext::actor_of`](crate::ActorContext::actor_of), share its
/// work-stealing pool. The handle is cheap to clone.
///
/// The pool's workers stop once the last handle is dropped. Every registered
/// actor holds a handle until its own last [`ActorRef`] is gone, so actors
/// that are still referenced keep the pool alive. That includes actors
/// holding references to each other in a cycle: such a system lives until the
/// process exits.
#[derive(Clone)]
pub struct ActorSystem {
    inner: Arc<SystemInner>,
}

struct SystemInner {
    pool: ThreadPool,
    threads: usize,
    /// Tasks submitted and not yet finished, queued or running.
    pending: AtomicUsize,
    idle_lock: Mutex<()>,
    idle: Condvar,
}

impl ActorSystem {
    /// Creates a system whose pool has `threads` workers; `0` selects the host parallelism.
    pub fn new(threads: usize) -> ActorResult<Self> {
        Self::from_config(&ActorSystemConfig::with_threads(threads))
    }

    /// Creates a system with one worker per available CPU.
    pub fn with_default_parallelism() -> ActorResult<Self> {
        Self::from_config(&ActorSystemConfig::default())
    }

    pub fn from_config(config: &ActorSystemConfig) -> ActorResult<Self> {
        config.validate()?;
        let threads = config.resolved_threads();
        let prefix = config.thread_name_prefix.clone();

        let mut builder = ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(move |index| format!("{prefix}-{index}"))
            .panic_handler(|payload| {
                let message = payload
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_default();
                error!(target: "actor", %message, "panic escaped an actor task");
            });
        if let Some(stack_size) = config.stack_size {
            builder = builder.stack_size(stack_size);
        }
        let pool = builder.build().map_err(ActorError::thread_pool)?;

        debug!(target: "actor", threads, "actor system started");
        Ok(Self {
            inner: Arc::new(SystemInner {
                pool,
                threads,
                pending: AtomicUsize::new(0),
                idle_lock: Mutex::new(()),
                idle: Condvar::new(),
            }),
        })
    }

    /// Number of worker threads in the pool.
    pub fn threads(&self) -> usize {
        self.inner.threads
    }

    /// Number of tasks currently queued or running.
    pub fn pending_tasks(&self) -> usize {
        self.inner.pending.load(Ordering::SeqCst)
    }

    /// Registers an actor with this system and schedules its start hook.
    pub fn actor_of<A: Actor>(&self, actor: impl Into<ActorCell<A>>) -> ActorRef<A::Message> {
        actor.into().register(self)
    }

    /// Registers a router's routees and its dispatching actor; returns the router's reference.
    pub fn router_of<M: Send + 'static>(&self, router: Router<M>) -> ActorRef<M> {
        router.register(self)
    }

    /// Blocks until no task is queued or running, or until `timeout` elapses.
    ///
    /// Returns `true` if the pool became idle. Meant for tests and shutdown;
    /// the pool may look idle between two bursts of messages. A timeout too large to express as a deadline waits without one.
    pub fn wait_on_idle(&self, timeout: Duration) -> bool {
        let deadline = Instant::now().checked_add(timeout);
        let mut guard = self.inner.idle_lock.lock();
        while self.inner.pending.load(Ordering::SeqCst) != 0 {
            match deadline {
                Some(deadline) => {
                    if self.inner.idle.wait_until(&mut guard, deadline).timed_out() {
                        return self.inner.pending.load(Ordering::SeqCst) == 0;
                    }
                }
                None => self.inner.idle.wait(&mut guard),
            }
        }
        true
    }

    /// Runs `job` on the pool.
    ///
    /// From one of this pool's workers the job goes to the worker's local
    /// queue; from any other thread it is injected into the pool.
    pub(crate) fn submit<F>(&self, job: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.inner.pending.fetch_add(1, Ordering::SeqCst);
        let task = TaskGuard {
            inner: Arc::clone(&self.inner),
        };
        let run = move || {
            let _task = task;
            job();
        };
        if self.inner.pool.current_thread_index().is_some() {
            rayon::spawn(run);
        } else {
            self.inner.pool.spawn(run);
        }
    }
}

impl fmt::Debug for ActorSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActorSystem")
            .field("threads", &self.inner.threads)
            .field("pending", &self.pending_tasks())
            .finish()
    }
}

/// Marks a submitted task finished when dropped, even if the task unwinds.
struct TaskGuard {
    inner: Arc<SystemInner>,
}

impl Drop for TaskGuard {
    fn drop(&mut self) {
        if self.inner.pending.fetch_sub(1, Ordering::SeqCst) == 1 {
            let _guard = self.inner.idle_lock.lock();
            self.inner.idle.notify_all();
        }
    }
}
