//! Environment abstraction for wall-clock time.
//!
//! The loopback broker stamps every published event with a timetoken taken
//! from an [`Environment`]. Production uses [`SystemEnv`]; tests use
//! [`ManualEnv`] so timetokens (and their formatted display) are fixed.
//!
//! # Invariants
//!
//! - Implementations must not share global state
//! - `unix_time()` may go backwards (wall clocks do); callers that need
//!   ordering must enforce it themselves

use std::{
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::{Duration, SystemTime, UNIX_EPOCH},
};

/// Abstract source of wall-clock time.
pub trait Environment: Clone + Send + Sync + 'static {
    /// Current time as a duration since the Unix epoch.
    fn unix_time(&self) -> Duration;
}

/// Environment backed by the system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemEnv;

impl Environment for SystemEnv {
    fn unix_time(&self) -> Duration {
        // A clock set before 1970 reads as the epoch.
        SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default()
    }
}

/// Environment whose clock only moves when told to.
///
/// Clones share the same clock.
#[derive(Debug, Clone, Default)]
pub struct ManualEnv {
    nanos: Arc<AtomicU64>,
}

impl ManualEnv {
    /// Clock starting at the given time since the Unix epoch.
    pub fn starting_at(since_epoch: Duration) -> Self {
        let nanos = u64::try_from(since_epoch.as_nanos()).unwrap_or(u64::MAX);
        Self { nanos: Arc::new(AtomicU64::new(nanos)) }
    }

    /// Move the clock forward.
    pub fn advance(&self, by: Duration) {
        let by = u64::try_from(by.as_nanos()).unwrap_or(u64::MAX);
        let _ = self
            .nanos
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| Some(n.saturating_add(by)));
    }
}

impl Environment for ManualEnv {
    fn unix_time(&self) -> Duration {
        Duration::from_nanos(self.nanos.load(Ordering::SeqCst))
    }
}
