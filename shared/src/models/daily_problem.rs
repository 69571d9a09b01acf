use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use validator::Validate;

use crate::calendar::CalendarDay;
use crate::error::{Result, SharedError};
use crate::models::platform::CodeforcesProblem;
use crate::models::user::RatingRange;

pub const DEFAULT_POINTS: u32 = 500;
const CODEFORCES_PROBLEM_URL: &str = "https://codeforces.com/contest";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProblemStatus {
    #[default]
    Pending,
    Solved,
}

/// A problem assigned to a user for one day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct DailyProblemRecord {
    #[validate(length(min = 1, message = "Problem name is required"))]
    pub name: String,

    #[serde(default)]
    pub rating: Option<i64>,

    #[serde(default)]
    pub tags: BTreeSet<String>,

    #[validate(url)]
    pub link: String,

    #[serde(default = "default_points")]
    pub points: u32,

    #[serde(default)]
    pub status: ProblemStatus,

    pub date: DateTime<Utc>,
}

fn default_points() -> u32 {
    DEFAULT_POINTS
}

/// Zero or missing points fall back to the default award.
pub fn points_or_default(points: Option<u32>) -> u32 {
    match points {
        Some(p) if p != 0 => p,
        _ => DEFAULT_POINTS,
    }
}

pub fn problem_link(contest_id: i64, index: &str) -> String {
    format!("{}/{}/problem/{}", CODEFORCES_PROBLEM_URL, contest_id, index)
}

impl DailyProblemRecord {
    pub fn new(
        name: String,
        rating: Option<i64>,
        tags: impl IntoIterator<Item = String>,
        contest_id: i64,
        index: &str,
        points: Option<u32>,
        date: DateTime<Utc>,
    ) -> Result<Self> {
        let record = Self {
            name,
            rating,
            tags: tags.into_iter().collect(),
            link: problem_link(contest_id, index),
            points: points_or_default(points),
            status: ProblemStatus::Pending,
            date,
        };
        record.validate()?;
        Ok(record)
    }

    /// Problems without a contest id or index cannot be linked and are rejected.
    pub fn from_codeforces(problem: &CodeforcesProblem, date: DateTime<Utc>) -> Result<Self> {
        let contest_id = problem
            .contest_id
            .ok_or_else(|| SharedError::MissingField("contestId".to_string()))?;
        let index = problem
            .index
            .as_deref()
            .ok_or_else(|| SharedError::MissingField("index".to_string()))?;

        Self::new(
            problem.name.clone(),
            problem.rating,
            problem.tags.iter().cloned(),
            contest_id,
            index,
            problem.points.map(|p| p.round().max(0.0) as u32),
            date,
        )
    }

    pub fn day(&self) -> CalendarDay {
        CalendarDay::from_datetime(self.date)
    }

    pub fn is_solved(&self) -> bool {
        self.status == ProblemStatus::Solved
    }

    /// Flips the record to solved. A record can only be solved once.
    pub fn mark_solved(&mut self) -> Result<()> {
        if self.is_solved() {
            return Err(SharedError::Conflict(format!("problem already solved: {}", self.link)));
        }
        self.status = ProblemStatus::Solved;
        Ok(())
    }
}

/// Rated, linkable problems inside `range` that are not already in `history`,
/// deduplicated by contest and index, in first-seen order.
pub fn select_candidates<'a, I>(
    problems: I,
    range: &RatingRange,
    history: &[DailyProblemRecord],
) -> Vec<CodeforcesProblem>
where
    I: IntoIterator<Item = &'a CodeforcesProblem>,
{
    let assigned: HashSet<&str> = history.iter().map(|r| r.link.as_str()).collect();
    let mut seen: HashSet<(i64, String)> = HashSet::new();

    problems
        .into_iter()
        .filter(|p| p.rating.is_some_and(|r| range.contains(r)))
        .filter_map(|p| {
            let key = (p.contest_id?, p.index.clone()?);
            if assigned.contains(problem_link(key.0, &key.1).as_str()) {
                return None;
            }
            seen.insert(key).then(|| p.clone())
        })
        .collect()
}

/// The newest still-pending record for `link`.
pub fn pending_by_link<'a>(history: &'a mut [DailyProblemRecord], link: &str) -> Option<&'a mut DailyProblemRecord> {
    history
        .iter_mut()
        .filter(|r| r.link == link && !r.is_solved())
        .max_by_key(|r| r.date)
}

/// The record assigned on `day`, if any.
pub fn assigned_on(history: &[DailyProblemRecord], day: CalendarDay) -> Option<&DailyProblemRecord> {
    history.iter().find(|r| r.day() == day)
}

/// Newest first.
pub fn sorted_history(history: &[DailyProblemRecord]) -> Vec<DailyProblemRecord> {
    let mut sorted = history.to_vec();
    sorted.sort_by(|a, b| b.date.cmp(&a.date));
    sorted
}
