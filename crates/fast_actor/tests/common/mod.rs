#![allow(dead_code)]

use parking_lot::{Condvar, Mutex};
use std::{
    sync::Arc,
    time::{Duration, Instant},
};
use tracing_subscriber::EnvFilter;

/// Installs a test-writer subscriber once per test binary. `RUST_LOG` overrides the filter.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("actor=warn")),
        )
        .with_test_writer()
        .try_init();
}

/// Countdown latch shared between actors and the test thread.
#[derive(Clone)]
pub struct CountDownLatch {
    inner: Arc<(Mutex<usize>, Condvar)>,
}

impl CountDownLatch {
    pub fn new(count: usize) -> Self {
        Self {
            inner: Arc::new((Mutex::new(count), Condvar::new())),
        }
    }

    pub fn count_down(&self) {
        let (count, signal) = &*self.inner;
        let mut count = count.lock();
        if *count > 0 {
            *count -= 1;
            if *count == 0 {
                signal.notify_all();
            }
        }
    }

    pub fn count(&self) -> usize {
        *self.inner.0.lock()
    }

    /// Returns `true` if the count reached zero before `timeout`.
    pub fn wait(&self, timeout: Duration) -> bool {
        let deadline = Instant::now().checked_add(timeout);
        let (count, signal) = &*self.inner;
        let mut count = count.lock();
        while *count > 0 {
            match deadline {
                Some(deadline) => {
                    if signal.wait_until(&mut count, deadline).timed_out() {
                        return *count == 0;
                    }
                }
                None => signal.wait(&mut count),
            }
        }
        true
    }
}

pub const TIMEOUT: Duration = Duration::from_secs(60);
