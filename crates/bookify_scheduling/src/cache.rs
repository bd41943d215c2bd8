// --- File: crates/bookify_scheduling/src/cache.rs ---
//! Tag-based cache for computed slot lists.
//!
//! Every mutation declares exactly which cached reads it invalidates:
//! saving availability drops every slot entry for the host, a booking
//! mutation drops the entries for the affected host/date pairs. There is no
//! ambient invalidation and no TTL; entries live until a mutation names
//! them.

use crate::models::AvailabilitySlot;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::Mutex;

/// Cache tag: one entry per (host, date, duration) slot query.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SlotCacheKey {
    pub host_id: String,
    pub date: NaiveDate,
    pub duration_minutes: i64,
}

#[derive(Default)]
pub struct SlotCache {
    entries: Mutex<HashMap<SlotCacheKey, Vec<AvailabilitySlot>>>,
}

impl SlotCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &SlotCacheKey) -> Option<Vec<AvailabilitySlot>> {
        self.entries
            .lock()
            .expect("slot cache lock poisoned")
            .get(key)
            .cloned()
    }

    pub fn insert(&self, key: SlotCacheKey, slots: Vec<AvailabilitySlot>) {
        self.entries
            .lock()
            .expect("slot cache lock poisoned")
            .insert(key, slots);
    }

    /// Drops every cached slot list for the host. Used when the host's
    /// working hours change.
    pub fn invalidate_host(&self, host_id: &str) {
        self.entries
            .lock()
            .expect("slot cache lock poisoned")
            .retain(|key, _| key.host_id != host_id);
    }

    /// Drops the cached slot lists for one host/date pair, across all
    /// durations. Used when a booking on that date changes.
    pub fn invalidate_date(&self, host_id: &str, date: NaiveDate) {
        self.entries
            .lock()
            .expect("slot cache lock poisoned")
            .retain(|key, _| !(key.host_id == host_id && key.date == date));
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.lock().expect("slot cache lock poisoned").len()
    }
}
