use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::daily_problem::DailyProblemRecord;

const MILLIS_PER_DAY: i64 = 86_400_000;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreakState {
    pub current_streak: u32,
    pub longest_streak: u32,
}

/// Whole days from `later` back to `earlier`, floored.
fn day_gap(later: DateTime<Utc>, earlier: DateTime<Utc>) -> i64 {
    (later - earlier).num_milliseconds().div_euclid(MILLIS_PER_DAY)
}

/// Current and longest streaks over a full daily-problem history, in any order.
///
/// The current streak walks back from `now` and stops at the first unsolved record or at
/// a gap of more than one day. The first solved record always counts, however old.
pub fn compute_streaks(history: &[DailyProblemRecord], now: DateTime<Utc>) -> StreakState {
    let mut records: Vec<&DailyProblemRecord> = history.iter().collect();
    records.sort_by(|a, b| b.date.cmp(&a.date));

    StreakState {
        current_streak: current_streak(&records, now),
        longest_streak: longest_streak(&records),
    }
}

fn current_streak(newest_first: &[&DailyProblemRecord], now: DateTime<Utc>) -> u32 {
    let mut streak = 0;
    let mut anchor = now;

    for record in newest_first {
        if !record.is_solved() {
            break;
        }
        if day_gap(anchor, record.date) <= 1 || streak == 0 {
            streak += 1;
            anchor = record.date;
        } else {
            break;
        }
    }

    streak
}

fn longest_streak(newest_first: &[&DailyProblemRecord]) -> u32 {
    let mut best = 0;
    let mut run = 0;
    let mut last: Option<DateTime<Utc>> = None;

    for record in newest_first.iter().filter(|r| r.is_solved()) {
        run = match last {
            None => 1,
            Some(previous) if day_gap(previous, record.date) <= 1 => run + 1,
            Some(_) => {
                best = best.max(run);
                1
            }
        };
        last = Some(record.date);
    }

    best.max(run)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::daily_problem::ProblemStatus::{self, Pending, Solved};
    use chrono::{Duration, TimeZone};
    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};
    use std::collections::BTreeSet;

    #[fixture]
    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 18, 0, 0).unwrap()
    }

    fn record(now: DateTime<Utc>, days_ago: i64, status: ProblemStatus) -> DailyProblemRecord {
        DailyProblemRecord {
            name: format!("problem-{}", days_ago),
            rating: Some(800),
            tags: BTreeSet::new(),
            link: format!("https://codeforces.com/contest/{}/problem/A", days_ago + 1),
            points: 500,
            status,
            date: now - Duration::days(days_ago),
        }
    }

    #[rstest]
    #[case::three_consecutive(&[(0, Solved), (1, Solved), (2, Solved)], 3, 3)]
    #[case::gap_breaks_current(&[(0, Solved), (5, Solved), (6, Solved)], 1, 2)]
    #[case::pending_blocks_current(&[(0, Pending), (1, Solved), (2, Solved)], 0, 2)]
    #[case::empty_history(&[], 0, 0)]
    #[case::only_pending(&[(0, Pending), (1, Pending)], 0, 0)]
    #[case::longest_in_the_past(&[(0, Solved), (3, Solved), (4, Solved), (5, Solved)], 1, 3)]
    fn test_streaks(
        now: DateTime<Utc>,
        #[case] history: &[(i64, ProblemStatus)],
        #[case] current: u32,
        #[case] longest: u32,
    ) {
        let history: Vec<_> = history.iter().map(|(ago, status)| record(now, *ago, *status)).collect();

        assert_eq!(
            compute_streaks(&history, now),
            StreakState {
                current_streak: current,
                longest_streak: longest,
            }
        );
    }

    #[rstest]
    fn test_first_solved_record_counts_after_long_gap(now: DateTime<Utc>) {
        let history = vec![record(now, 10, Solved), record(now, 11, Solved), record(now, 14, Solved)];

        let state = compute_streaks(&history, now);

        assert_eq!(state.current_streak, 2);
        assert_eq!(state.longest_streak, 2);
    }

    #[rstest]
    fn test_input_order_does_not_matter(now: DateTime<Utc>) {
        let ordered = vec![record(now, 0, Solved), record(now, 1, Solved), record(now, 3, Solved)];
        let shuffled = vec![ordered[2].clone(), ordered[0].clone(), ordered[1].clone()];

        assert_eq!(compute_streaks(&ordered, now), compute_streaks(&shuffled, now));
    }

    #[test]
    fn test_gap_is_floored() {
        let later = Utc.with_ymd_and_hms(2024, 1, 2, 1, 0, 0).unwrap();
        let earlier = Utc.with_ymd_and_hms(2024, 1, 1, 2, 0, 0).unwrap();
        assert_eq!(day_gap(later, earlier), 0);
        assert_eq!(day_gap(earlier, later), -1);
    }
}
