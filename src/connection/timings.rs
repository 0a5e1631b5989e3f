//! Timing registry shared by connection handles
//!
//! - One entry per operation name
//! - Count and total duration only (no histograms)
//! - Monotonic; reset only by dropping the registry

use std::collections::BTreeMap;
use std::sync::Mutex;
use std::time::Duration;

/// Count and accumulated time for one operation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimingStat {
    pub count: u64,
    pub total: Duration,
}

/// Named set of operation timings
///
/// Thread-safe: connection handles holding the same `Arc<Timings>` may record
/// from different threads.
#[derive(Debug, Default)]
pub struct Timings {
    name: String,
    entries: Mutex<BTreeMap<String, TimingStat>>,
}

impl Timings {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Mutex::new(BTreeMap::new()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Record one execution of `operation`.
    pub fn record(&self, operation: &str, elapsed: Duration) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        let stat = entries.entry(operation.to_string()).or_default();
        stat.count += 1;
        stat.total += elapsed;
    }

    /// Stats for `operation`, zero if never recorded.
    pub fn stat(&self, operation: &str) -> TimingStat {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.get(operation).copied().unwrap_or_default()
    }

    /// Copy of all entries, ordered by operation name.
    pub fn snapshot(&self) -> BTreeMap<String, TimingStat> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}
