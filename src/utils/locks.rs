//! Per-event serialization locks
//!
//! Admission and batch resolution must run as a single critical section per
//! event: two concurrent registrations against the last open slot must not
//! both pass the capacity check. This registry hands out one async mutex per
//! event id; operations on different events proceed in parallel.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// Registry of per-event async locks
#[derive(Clone, Default)]
pub struct EventLocks {
    locks: Arc<Mutex<HashMap<i64, Arc<AsyncMutex<()>>>>>,
}

impl EventLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the lock for one event, waiting if another worker holds it.
    ///
    /// The guard must be held across the whole read-count/decide/write
    /// sequence; dropping it releases the event for the next worker.
    pub async fn acquire(&self, event_id: i64) -> OwnedMutexGuard<()> {
        let lock = {
            let mut registry = self.locks.lock().unwrap();
            registry
                .entry(event_id)
                .or_insert_with(|| Arc::new(AsyncMutex::new(())))
                .clone()
        };
        lock.lock_owned().await
    }

    /// Number of events with a registered lock
    pub fn len(&self) -> usize {
        self.locks.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.lock().unwrap().is_empty()
    }
}
