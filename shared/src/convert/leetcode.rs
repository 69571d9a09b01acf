use super::{
    rating_series_or_empty, series_or_absent, PlatformConversion, PlatformScalars, ProfileBadge, RatingPoint,
    RatingSnapshot,
};
use crate::activity::{ActivityRecord, ActivitySeries};
use crate::calendar::from_epoch_seconds;
use crate::error::{Result, SharedError};
use crate::heatmap::merge_days;
use crate::models::platform::{
    LeetCodeBadge, LeetCodeContestData, LeetCodeMatchedUser, LeetCodePayload, Platform, SubmissionCalendar,
};

const LEETCODE_ORIGIN: &str = "https://leetcode.com";
const UNRANKED: &str = "NONE";
const ALL_DIFFICULTIES: &str = "All";

/// One record per calendar key, ascending by date.
///
/// Returns `None` when the calendar is absent. A key that is not epoch seconds or a
/// count that is not a non-negative integer is a format error.
pub fn convert_calendar(calendar: Option<&SubmissionCalendar>) -> Result<Option<ActivitySeries>> {
    let Some(calendar) = calendar else {
        return Ok(None);
    };

    let records = calendar
        .entries()?
        .iter()
        .map(|(key, count)| {
            let seconds = key
                .trim()
                .parse::<i64>()
                .map_err(|_| SharedError::format(format!("calendar key is not epoch seconds: '{}'", key)))?;
            Ok(ActivityRecord::new(from_epoch_seconds(seconds)?, count.as_count()?))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Some(merge_days(records).into_records()))
}

/// Accepted submissions across all difficulties.
pub fn solved_count(user: &LeetCodeMatchedUser) -> Option<u64> {
    let counts = &user.submit_stats.as_ref()?.ac_submission_num;
    counts
        .iter()
        .find(|c| c.difficulty == ALL_DIFFICULTIES)
        .or_else(|| counts.first())
        .map(|c| c.count)
}

pub fn badges(user: &LeetCodeMatchedUser) -> Vec<ProfileBadge> {
    user.badges.iter().map(to_profile_badge).collect()
}

fn to_profile_badge(badge: &LeetCodeBadge) -> ProfileBadge {
    ProfileBadge {
        id: badge.id.clone(),
        name: badge.display_name.clone(),
        icon_url: absolute_icon_url(&badge.icon),
    }
}

fn absolute_icon_url(icon: &str) -> String {
    if icon.starts_with("http://") || icon.starts_with("https://") {
        icon.to_string()
    } else if icon.starts_with('/') {
        format!("{}{}", LEETCODE_ORIGIN, icon)
    } else {
        format!("{}/{}", LEETCODE_ORIGIN, icon)
    }
}

/// Highest is taken over attended contests only; unattended entries carry placeholder ratings.
pub fn rating_snapshot(contest: &LeetCodeContestData) -> Option<RatingSnapshot> {
    let ranking = contest.user_contest_ranking.as_ref()?;
    let highest = contest
        .user_contest_ranking_history
        .iter()
        .filter(|entry| entry.attended)
        .map(|entry| entry.rating)
        .fold(0.0_f64, f64::max);
    let badge = ranking
        .badge
        .as_ref()
        .map(|b| b.name.clone())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| UNRANKED.to_string());

    Some(RatingSnapshot {
        current: ranking.rating,
        highest,
        rank_or_badge: badge,
    })
}

pub fn rating_series(contest: &LeetCodeContestData) -> Result<Vec<RatingPoint>> {
    contest
        .user_contest_ranking_history
        .iter()
        .filter(|entry| entry.attended)
        .filter_map(|entry| entry.contest.start_time.map(|start| (entry, start)))
        .map(|(entry, start)| {
            Ok(RatingPoint {
                date: from_epoch_seconds(start)?,
                rating: entry.rating,
                label: entry.contest.title.clone(),
            })
        })
        .collect()
}

pub fn current_rating(contest: &LeetCodeContestData) -> Option<f64> {
    contest.user_contest_ranking.as_ref().map(|r| r.rating)
}

pub fn convert(payload: &LeetCodePayload) -> Result<PlatformConversion> {
    let user = payload.profile.as_ref().and_then(|p| p.matched_user());
    let activity = series_or_absent(
        Platform::LeetCode,
        convert_calendar(user.and_then(|u| u.submission_calendar.as_ref())),
    );

    let mut scalars = PlatformScalars {
        solved: user.and_then(solved_count),
        badges: user.map(badges).unwrap_or_default(),
        ..Default::default()
    };

    if let Some(contest) = payload.contest.as_ref() {
        scalars.contests = contest
            .user_contest_ranking
            .as_ref()
            .map(|r| r.attended_contests_count)
            .unwrap_or(0);
        scalars.rating = rating_snapshot(contest);
        scalars.rating_series = rating_series_or_empty(Platform::LeetCode, rating_series(contest));
    }

    Ok(PlatformConversion {
        platform: Platform::LeetCode,
        activity,
        scalars,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::CalendarDay;
    use crate::models::platform::{
        FlexNumber, LeetCodeContest, LeetCodeContestBadge, LeetCodeContestHistoryEntry, LeetCodeContestRanking,
    };
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use std::collections::BTreeMap;

    fn day(y: i32, m: u32, d: u32) -> CalendarDay {
        CalendarDay::from_ymd(y, m, d).unwrap()
    }

    #[test]
    fn test_encoded_calendar_is_parsed_and_sorted() {
        // Text order of the keys differs from date order.
        let calendar = SubmissionCalendar::Encoded(
            r#"{"1709251200": 4, "999993600": "1", "1706745600": 2}"#.to_string(),
        );

        let series = convert_calendar(Some(&calendar)).unwrap().unwrap();

        assert_eq!(
            series,
            vec![
                ActivityRecord::new(day(2001, 9, 9), 1),
                ActivityRecord::new(day(2024, 2, 1), 2),
                ActivityRecord::new(day(2024, 3, 1), 4),
            ]
        );
    }

    #[test]
    fn test_absent_calendar_is_no_data() {
        assert_eq!(convert_calendar(None).unwrap(), None);
    }

    #[test]
    fn test_bad_key_is_format_error() {
        let calendar = SubmissionCalendar::Encoded(r#"{"yesterday": 1}"#.to_string());
        assert!(matches!(convert_calendar(Some(&calendar)), Err(SharedError::Format(_))));
    }

    #[test]
    fn test_bad_count_is_format_error() {
        let mut map = BTreeMap::new();
        map.insert("1704067200".to_string(), FlexNumber::Text("lots".into()));
        let calendar = SubmissionCalendar::Map(map);
        assert!(matches!(convert_calendar(Some(&calendar)), Err(SharedError::Format(_))));
    }

    #[test]
    fn test_badge_icons_become_absolute() {
        assert_eq!(
            absolute_icon_url("/static/images/badges/dcc-2024-1.png"),
            "https://leetcode.com/static/images/badges/dcc-2024-1.png"
        );
        assert_eq!(
            absolute_icon_url("https://assets.leetcode.com/b.gif"),
            "https://assets.leetcode.com/b.gif"
        );
    }

    fn history_entry(attended: bool, rating: f64, start: i64) -> LeetCodeContestHistoryEntry {
        LeetCodeContestHistoryEntry {
            attended,
            rating,
            ranking: None,
            contest: LeetCodeContest {
                title: format!("Weekly {}", start),
                start_time: Some(start),
            },
        }
    }

    #[test]
    fn test_contest_snapshot_uses_attended_peak() {
        let contest = LeetCodeContestData {
            user_contest_ranking: Some(LeetCodeContestRanking {
                rating: 1650.4,
                attended_contests_count: 2,
                badge: Some(LeetCodeContestBadge { name: "Knight".into() }),
            }),
            user_contest_ranking_history: vec![
                history_entry(true, 1600.0, 1_704_067_200),
                history_entry(false, 1900.0, 1_704_672_000),
                history_entry(true, 1700.0, 1_705_276_800),
            ],
        };

        let snapshot = rating_snapshot(&contest).unwrap();
        assert_eq!(snapshot.current, 1650.4);
        assert_eq!(snapshot.highest, 1700.0);
        assert_eq!(snapshot.rank_or_badge, "Knight");
        assert_eq!(rating_series(&contest).unwrap().len(), 2);
    }

    #[test]
    fn test_convert_without_contest_data() {
        let payload: LeetCodePayload = serde_json::from_value(serde_json::json!({
            "profile": {"data": {"matchedUser": {
                "submissionCalendar": "{\"1704067200\": 3}",
                "submitStats": {"acSubmissionNum": [{"difficulty": "All", "count": 321}, {"difficulty": "Easy", "count": 200}]},
                "badges": []
            }}}
        }))
        .unwrap();

        let conversion = convert(&payload).unwrap();

        assert_eq!(conversion.scalars.solved, Some(321));
        assert_eq!(conversion.scalars.rating, None);
        assert_eq!(conversion.activity.unwrap().len(), 1);
    }

    proptest! {
        #[test]
        fn prop_output_strictly_ascending(entries in prop::collection::btree_map(0i64..2_000_000_000, 0i64..50, 0..30)) {
            let map = entries
                .into_iter()
                .map(|(k, v)| (k.to_string(), FlexNumber::Int(v)))
                .collect();
            let series = convert_calendar(Some(&SubmissionCalendar::Map(map))).unwrap().unwrap();
            prop_assert!(series.windows(2).all(|w| w[0].date < w[1].date));
        }
    }
}
