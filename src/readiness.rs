use crate::utils::YearMonth;
use log::debug;
use std::collections::BTreeMap;

/// Persisted map of `"{bank_group_id}_{YYYY-MM}"` to whether funds are confirmed present.
pub type ReadinessMap = BTreeMap<String, bool>;

pub fn readiness_key(group_id: &str, month_key: &str) -> String {
    format!("{}_{}", group_id, month_key)
}

/// Manual per-account, per-month acknowledgement. Unknown keys read as not ready.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReadinessTracker {
    entries: ReadinessMap,
}

impl ReadinessTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_map(entries: ReadinessMap) -> Self {
        Self { entries }
    }

    pub fn as_map(&self) -> &ReadinessMap {
        &self.entries
    }

    pub fn is_ready(&self, group_id: &str, month_key: &str) -> bool {
        self.entries
            .get(&readiness_key(group_id, month_key))
            .copied()
            .unwrap_or(false)
    }

    /// Flips the flag and returns the new value.
    pub fn toggle(&mut self, group_id: &str, month_key: &str) -> bool {
        let flag = self
            .entries
            .entry(readiness_key(group_id, month_key))
            .or_insert(false);
        *flag = !*flag;
        debug!(
            "Readiness for {} in {} is now {}",
            group_id, month_key, *flag
        );
        *flag
    }

    pub fn is_ready_for(&self, group_id: &str, month: YearMonth) -> bool {
        self.is_ready(group_id, &month.key())
    }

    pub fn toggle_for(&mut self, group_id: &str, month: YearMonth) -> bool {
        self.toggle(group_id, &month.key())
    }
}
