use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

/// Time source for the experiment scheduler
pub trait Clock: Clone + Send + Sync {
    /// Monotonic time since the clock was created
    fn now(&self) -> Duration;
    /// Wall-clock time in seconds since the Unix epoch
    fn epoch_seconds(&self) -> f64;

    fn elapsed(&self, since: Duration) -> Duration {
        self.now().saturating_sub(since)
    }
}

#[derive(Debug, Clone)]
pub struct SystemClock {
    pub start: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.start.elapsed()
    }

    fn epoch_seconds(&self) -> f64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs_f64()
    }
}

/// Clock that only moves when told to. Clones share the same time.
#[derive(Debug, Clone)]
pub struct ManualClock {
    nanos: Arc<AtomicU64>,
    epoch_base: f64,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::with_epoch(0.0)
    }

    /// `epoch_base` is the wall-clock reading at monotonic time zero.
    pub fn with_epoch(epoch_base: f64) -> Self {
        Self {
            nanos: Arc::new(AtomicU64::new(0)),
            epoch_base,
        }
    }

    pub fn advance(&self, by: Duration) {
        self.nanos.fetch_add(by.as_nanos() as u64, Ordering::SeqCst);
    }

    /// Moves the clock to `to`; never moves backwards.
    pub fn set(&self, to: Duration) {
        self.nanos.fetch_max(to.as_nanos() as u64, Ordering::SeqCst);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        Duration::from_nanos(self.nanos.load(Ordering::SeqCst))
    }

    fn epoch_seconds(&self) -> f64 {
        self.epoch_base + self.now().as_secs_f64()
    }
}
