// Deterministic time and id sources for tests
//
// Kept out of the clock/id modules so production code only sees the real
// sources. Public because the integration tests under tests/ need them too.

use crate::core::{Clock, IdGenerator};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::sync::Mutex;

/// Clock pinned to a value you control
#[derive(Debug, Default)]
pub struct FixedClock {
    millis: AtomicI64,
}

impl FixedClock {
    pub fn new(millis: i64) -> Self {
        Self {
            millis: AtomicI64::new(millis),
        }
    }

    pub fn set(&self, millis: i64) {
        self.millis.store(millis, Ordering::SeqCst);
    }

    pub fn advance(&self, delta: i64) {
        self.millis.fetch_add(delta, Ordering::SeqCst);
    }
}

impl Clock for FixedClock {
    fn now_millis(&self) -> i64 {
        self.millis.load(Ordering::SeqCst)
    }
}

/// Hands out a scripted list of ids, then falls back to `id-<n>`
#[derive(Debug, Default)]
pub struct SequenceIds {
    queued: Mutex<VecDeque<String>>,
    fallback: AtomicU64,
}

impl SequenceIds {
    pub fn new<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            queued: Mutex::new(ids.into_iter().map(Into::into).collect()),
            fallback: AtomicU64::new(0),
        }
    }
}

impl IdGenerator for SequenceIds {
    fn next_id(&self) -> String {
        let scripted = match self.queued.lock() {
            Ok(mut queue) => queue.pop_front(),
            Err(poisoned) => poisoned.into_inner().pop_front(),
        };

        scripted.unwrap_or_else(|| {
            let n = self.fallback.fetch_add(1, Ordering::SeqCst) + 1;
            format!("id-{}", n)
        })
    }
}
