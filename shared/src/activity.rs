use serde::{Deserialize, Serialize};

use crate::calendar::CalendarDay;

/// Activity count for one calendar day on one platform (or across all of them).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActivityRecord {
    pub date: CalendarDay,
    pub value: u64,
}

impl ActivityRecord {
    pub fn new(date: CalendarDay, value: u64) -> Self {
        Self { date, value }
    }
}

pub type ActivitySeries = Vec<ActivityRecord>;

/// One record per day that saw any activity, ascending by date.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnifiedActivitySeries {
    records: Vec<ActivityRecord>,
}

impl UnifiedActivitySeries {
    /// Caller guarantees unique, ascending dates.
    pub(crate) fn from_sorted(records: Vec<ActivityRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[ActivityRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<ActivityRecord> {
        self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn total(&self) -> u64 {
        self.records.iter().map(|r| r.value).sum()
    }

    /// Number of days with a non-zero count.
    pub fn active_days(&self) -> usize {
        self.records.iter().filter(|r| r.value > 0).count()
    }

    pub fn value_on(&self, day: CalendarDay) -> u64 {
        self.records
            .binary_search_by(|r| r.date.cmp(&day))
            .map(|idx| self.records[idx].value)
            .unwrap_or(0)
    }
}
