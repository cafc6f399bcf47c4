//! Day-scoped usage counter enforced by the client before each generation.
//!
//! The gate reads and writes a single key holding `{ "date": "YYYY-MM-DD", "count": n }`.
//! There is no locking between the read and the write; two concurrent clients sharing
//! a store can both pass the check.

mod clock;
mod store;

pub use clock::{Clock, SystemClock};
pub use store::{FileStore, MemoryStore, UsageStore};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const STORAGE_KEY: &str = "k-blog-writer-usage";
pub const DAILY_LIMIT: u32 = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageRecord {
    pub date: NaiveDate,
    pub count: u32,
}

impl UsageRecord {
    fn fresh(date: NaiveDate) -> Self { Self { date, count: 0 } }
}

pub struct UsageGate<C, S> {
    clock: C,
    store: S,
    limit: u32,
}

impl<C: Clock, S: UsageStore> UsageGate<C, S> {
    pub fn new(clock: C, store: S) -> Self { Self { clock, store, limit: DAILY_LIMIT } }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    pub fn limit(&self) -> u32 { self.limit }

    /// Today's record. A missing, unreadable or stale entry counts as zero uses today.
    pub fn usage(&self) -> UsageRecord {
        let today = self.clock.today();
        let raw = match self.store.get(STORAGE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return UsageRecord::fresh(today),
            Err(e) => {
                tracing::warn!(error=%e, "usage store read failed");
                return UsageRecord::fresh(today);
            }
        };
        match serde_json::from_str::<UsageRecord>(&raw) {
            Ok(rec) if rec.date == today => rec,
            Ok(_) => UsageRecord::fresh(today),
            Err(e) => {
                tracing::debug!(error=%e, "corrupt usage record; resetting");
                UsageRecord::fresh(today)
            }
        }
    }

    pub fn remaining(&self) -> u32 { self.limit.saturating_sub(self.usage().count) }

    pub fn can_use(&self) -> bool { self.remaining() > 0 }

    /// Records one successful generation for today.
    pub fn increment(&self) -> anyhow::Result<UsageRecord> {
        let current = self.usage();
        let updated = UsageRecord { date: self.clock.today(), count: current.count + 1 };
        self.store.set(STORAGE_KEY, &serde_json::to_string(&updated)?)?;
        Ok(updated)
    }
}
