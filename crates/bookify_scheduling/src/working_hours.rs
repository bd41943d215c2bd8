// --- File: crates/bookify_scheduling/src/working_hours.rs ---
//! Per-host weekly working-hours storage.
//!
//! A host's week is written wholesale: saving availability replaces the full
//! 7-day configuration, there is no per-day mutation and no soft delete.
//! Hosts that never saved anything get the deterministic default week.

use crate::error::SchedulingError;
use crate::models::{DayOfWeek, WeekSchedule, WorkingHoursWindow};
use std::collections::HashMap;
use std::sync::RwLock;
use tracing::debug;

#[derive(Default)]
pub struct WorkingHoursStore {
    weeks: RwLock<HashMap<String, WeekSchedule>>,
}

impl WorkingHoursStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The host's configured week, or the default week when nothing is
    /// stored. Reading never writes the default back.
    pub fn get_week(&self, host_id: &str) -> WeekSchedule {
        self.weeks
            .read()
            .expect("working hours lock poisoned")
            .get(host_id)
            .cloned()
            .unwrap_or_else(WeekSchedule::default_week)
    }

    /// Replaces the host's week. The windows must cover days 0-6 exactly
    /// once, with `start_time < end_time` on every active day.
    pub fn set_week(
        &self,
        host_id: &str,
        windows: Vec<WorkingHoursWindow>,
    ) -> Result<WeekSchedule, SchedulingError> {
        let week = WeekSchedule::from_windows(windows)?;
        debug!("replacing working hours for host {}", host_id);
        self.weeks
            .write()
            .expect("working hours lock poisoned")
            .insert(host_id.to_string(), week.clone());
        Ok(week)
    }

    /// The window governing a specific day for a host.
    pub fn window_for(&self, host_id: &str, day: DayOfWeek) -> WorkingHoursWindow {
        *self.get_week(host_id).window_for(day)
    }
}
