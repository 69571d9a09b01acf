use std::collections::HashSet;

use super::{rating_series_or_empty, PlatformConversion, PlatformScalars, RatingPoint, RatingSnapshot};
use crate::activity::{ActivityRecord, ActivitySeries};
use crate::calendar::from_epoch_seconds;
use crate::error::Result;
use crate::heatmap::merge_days;
use crate::models::platform::{
    CodeforcesPayload, CodeforcesRatingChange, CodeforcesSubmission, CodeforcesUserInfo, Platform,
};

const ACCEPTED: &str = "OK";
const UNRANKED: &str = "NONE";

/// Submission volume per day and the number of distinct accepted problems.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionSummary {
    pub heat_map: ActivitySeries,
    pub solved: u64,
}

/// Every submission counts toward its day regardless of verdict. A problem counts as
/// solved the first time an accepted submission for its name is seen.
///
/// Returns `None` when there are no submissions.
pub fn convert_submissions(submissions: Option<&[CodeforcesSubmission]>) -> Result<Option<SubmissionSummary>> {
    let submissions = match submissions {
        Some(s) if !s.is_empty() => s,
        _ => return Ok(None),
    };

    let mut days = Vec::with_capacity(submissions.len());
    let mut solved_names: HashSet<&str> = HashSet::new();
    let mut solved = 0u64;

    for submission in submissions {
        days.push(ActivityRecord::new(from_epoch_seconds(submission.creation_time_seconds)?, 1));

        if submission.verdict.as_deref() == Some(ACCEPTED) && solved_names.insert(submission.problem.name.as_str()) {
            solved += 1;
        }
    }

    Ok(Some(SubmissionSummary {
        heat_map: merge_days(days).into_records(),
        solved,
    }))
}

pub fn rating_series(history: &[CodeforcesRatingChange]) -> Result<Vec<RatingPoint>> {
    history
        .iter()
        .map(|change| {
            Ok(RatingPoint {
                date: from_epoch_seconds(change.rating_update_time_seconds)?,
                rating: change.new_rating as f64,
                label: change.contest_name.clone(),
            })
        })
        .collect()
}

/// Prefers `user.info`; falls back to the rating history when it is missing.
pub fn rating_snapshot(
    info: Option<&CodeforcesUserInfo>,
    history: &[CodeforcesRatingChange],
) -> Option<RatingSnapshot> {
    let last = history.last().map(|c| c.new_rating);
    let peak = history.iter().map(|c| c.new_rating).max();

    let current = info.and_then(|i| i.rating).or(last)?;
    let highest = info.and_then(|i| i.max_rating).or(peak).unwrap_or(current);
    let rank = info
        .and_then(|i| i.rank.clone())
        .unwrap_or_else(|| UNRANKED.to_string());

    Some(RatingSnapshot {
        current: current as f64,
        highest: highest as f64,
        rank_or_badge: rank,
    })
}

/// Current rating as used by the leaderboard: the last entry of the history.
pub fn current_rating(history: &[CodeforcesRatingChange]) -> Option<f64> {
    history.last().map(|c| c.new_rating as f64)
}

pub fn convert(payload: &CodeforcesPayload) -> Result<PlatformConversion> {
    let summary = match convert_submissions(payload.submissions.as_deref()) {
        Ok(summary) => summary,
        Err(e) => {
            log::warn!("Dropping {} submissions: {}", Platform::Codeforces, e);
            None
        }
    };
    let history = payload.rating_history.as_deref().unwrap_or_default();
    let series = rating_series_or_empty(Platform::Codeforces, rating_series(history));

    let (activity, solved) = match summary {
        Some(s) => (Some(s.heat_map), Some(s.solved)),
        None => (None, None),
    };

    Ok(PlatformConversion {
        platform: Platform::Codeforces,
        activity,
        scalars: PlatformScalars {
            solved,
            contests: history.len() as u64,
            rating: rating_snapshot(payload.user_info.as_ref(), history),
            rating_series: series,
            badges: Vec::new(),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::CalendarDay;
    use crate::models::platform::CodeforcesProblem;
    use pretty_assertions::assert_eq;

    fn submission(seconds: i64, name: &str, verdict: &str) -> CodeforcesSubmission {
        CodeforcesSubmission {
            creation_time_seconds: seconds,
            verdict: Some(verdict.to_string()),
            problem: CodeforcesProblem {
                name: name.to_string(),
                ..Default::default()
            },
        }
    }

    fn change(seconds: i64, new_rating: i64) -> CodeforcesRatingChange {
        CodeforcesRatingChange {
            contest_id: None,
            contest_name: format!("Round {}", new_rating),
            rating_update_time_seconds: seconds,
            old_rating: 0,
            new_rating,
        }
    }

    // 2024-01-01T00:00:00Z
    const JAN_1: i64 = 1_704_067_200;
    const DAY: i64 = 86_400;

    #[test]
    fn test_first_seen_solve_counting() {
        let subs = vec![
            submission(JAN_1, "A", "OK"),
            submission(JAN_1 + 60, "A", "OK"),
            submission(JAN_1 + 120, "B", "WRONG_ANSWER"),
        ];

        let summary = convert_submissions(Some(&subs)).unwrap().unwrap();

        assert_eq!(summary.solved, 1);
        assert_eq!(
            summary.heat_map,
            vec![ActivityRecord::new(CalendarDay::from_ymd(2024, 1, 1).unwrap(), 3)]
        );
    }

    #[test]
    fn test_every_verdict_counts_toward_activity() {
        let subs = vec![
            submission(JAN_1 + DAY, "C", "TIME_LIMIT_EXCEEDED"),
            submission(JAN_1, "A", "COMPILATION_ERROR"),
            CodeforcesSubmission {
                verdict: None,
                ..submission(JAN_1 + DAY, "C", "")
            },
        ];

        let summary = convert_submissions(Some(&subs)).unwrap().unwrap();

        assert_eq!(summary.solved, 0);
        assert_eq!(summary.heat_map.iter().map(|r| r.value).collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn test_empty_or_absent_is_no_data() {
        assert_eq!(convert_submissions(None).unwrap(), None);
        assert_eq!(convert_submissions(Some(&[])).unwrap(), None);
    }

    #[test]
    fn test_snapshot_prefers_user_info() {
        let info = CodeforcesUserInfo {
            handle: "tourist".into(),
            rating: Some(3500),
            max_rating: Some(3800),
            rank: Some("legendary grandmaster".into()),
        };
        let history = vec![change(JAN_1, 3400)];

        let snapshot = rating_snapshot(Some(&info), &history).unwrap();
        assert_eq!(snapshot.current, 3500.0);
        assert_eq!(snapshot.highest, 3800.0);
        assert_eq!(snapshot.rank_or_badge, "legendary grandmaster");
    }

    #[test]
    fn test_snapshot_falls_back_to_history() {
        let history = vec![change(JAN_1, 1500), change(JAN_1 + DAY, 1700), change(JAN_1 + 2 * DAY, 1600)];

        let snapshot = rating_snapshot(None, &history).unwrap();
        assert_eq!(snapshot.current, 1600.0);
        assert_eq!(snapshot.highest, 1700.0);
        assert_eq!(snapshot.rank_or_badge, "NONE");
        assert_eq!(rating_snapshot(None, &[]), None);
    }

    #[test]
    fn test_out_of_range_timestamps_drop_only_the_series() {
        let payload = CodeforcesPayload {
            submissions: Some(vec![submission(i64::MAX, "A", "OK")]),
            rating_history: Some(vec![change(JAN_1, 1200), change(i64::MAX, 1350)]),
            user_info: None,
        };

        let conversion = convert(&payload).unwrap();

        assert_eq!(conversion.activity, None);
        assert_eq!(conversion.scalars.solved, None);
        assert_eq!(conversion.scalars.contests, 2);
        assert!(conversion.scalars.rating_series.is_empty());
        assert_eq!(conversion.scalars.rating.map(|r| r.current), Some(1350.0));
    }

    #[test]
    fn test_convert_full_payload() {
        let payload = CodeforcesPayload {
            submissions: Some(vec![submission(JAN_1, "A", "OK")]),
            rating_history: Some(vec![change(JAN_1, 1200), change(JAN_1 + DAY, 1350)]),
            user_info: None,
        };

        let conversion = convert(&payload).unwrap();

        assert_eq!(conversion.scalars.solved, Some(1));
        assert_eq!(conversion.scalars.contests, 2);
        assert_eq!(conversion.scalars.rating_series[1].rating, 1350.0);
        assert_eq!(current_rating(payload.rating_history.as_deref().unwrap()), Some(1350.0));
    }
}
