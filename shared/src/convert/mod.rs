//! Platform payload converters.
//!
//! Each adapter folds one platform's raw payload into the same shape: an optional
//! activity series (absent means "no data", never zero) plus scalar statistics.

pub mod codechef;
pub mod codeforces;
pub mod leetcode;

use serde::{Deserialize, Serialize};

use crate::activity::ActivitySeries;
use crate::calendar::CalendarDay;
use crate::error::Result;
use crate::models::platform::{Platform, RawPlatformPayload};

/// Current/highest rating plus the platform's rank title, stars or badge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingSnapshot {
    pub current: f64,
    pub highest: f64,
    pub rank_or_badge: String,
}

/// One point on a rating graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingPoint {
    pub date: CalendarDay,
    pub rating: f64,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileBadge {
    pub id: String,
    pub name: String,
    pub icon_url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformScalars {
    pub solved: Option<u64>,
    pub contests: u64,
    pub rating: Option<RatingSnapshot>,
    pub rating_series: Vec<RatingPoint>,
    pub badges: Vec<ProfileBadge>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformConversion {
    pub platform: Platform,
    pub activity: Option<ActivitySeries>,
    pub scalars: PlatformScalars,
}

/// A series that fails to parse is logged and treated as "no data"; the platform's
/// scalars are still reported.
pub(crate) fn series_or_absent(platform: Platform, series: Result<Option<ActivitySeries>>) -> Option<ActivitySeries> {
    match series {
        Ok(series) => series,
        Err(e) => {
            log::warn!("Dropping {} activity series: {}", platform, e);
            None
        }
    }
}

/// Same for rating graphs: a bad point drops the graph, not the platform.
pub(crate) fn rating_series_or_empty(platform: Platform, series: Result<Vec<RatingPoint>>) -> Vec<RatingPoint> {
    series.unwrap_or_else(|e| {
        log::warn!("Dropping {} rating series: {}", platform, e);
        Vec::new()
    })
}

/// Dispatches to the adapter for the payload's platform.
pub fn convert(payload: &RawPlatformPayload) -> Result<PlatformConversion> {
    match payload {
        RawPlatformPayload::Codeforces(p) => codeforces::convert(p),
        RawPlatformPayload::LeetCode(p) => leetcode::convert(p),
        RawPlatformPayload::CodeChef(p) => codechef::convert(p),
    }
}

/// Like [`convert`], but a malformed payload is logged and treated as absent.
pub fn convert_or_absent(payload: &RawPlatformPayload) -> Option<PlatformConversion> {
    match convert(payload) {
        Ok(conversion) => Some(conversion),
        Err(e) => {
            log::warn!("Dropping {} payload: {}", payload.platform(), e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::platform::{CodeChefPayload, CodeforcesPayload};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_dispatch_by_variant() {
        let cf = convert(&RawPlatformPayload::Codeforces(CodeforcesPayload::default())).unwrap();
        assert_eq!(cf.platform, Platform::Codeforces);
        assert_eq!(cf.activity, None);

        let cc = convert(&RawPlatformPayload::CodeChef(CodeChefPayload::default())).unwrap();
        assert_eq!(cc.platform, Platform::CodeChef);
        assert_eq!(cc.activity, Some(vec![]));
    }

    #[test]
    fn test_malformed_series_keeps_scalars() {
        let payload: RawPlatformPayload = serde_json::from_value(serde_json::json!({
            "platform": "LeetCode",
            "payload": {
                "profile": {"data": {"matchedUser": {
                    "submissionCalendar": "{\"soon\": 1}",
                    "submitStats": {"acSubmissionNum": [{"difficulty": "All", "count": 42}]}
                }}},
                "contest": {"userContestRanking": {"rating": 1712.4, "attendedContestsCount": 3}}
            }
        }))
        .unwrap();

        let conversion = convert_or_absent(&payload).unwrap();

        assert_eq!(conversion.activity, None);
        assert_eq!(conversion.scalars.solved, Some(42));
        assert_eq!(conversion.scalars.contests, 3);
        assert_eq!(conversion.scalars.rating.map(|r| r.current), Some(1712.4));
    }

    #[test]
    fn test_malformed_rating_history_keeps_platform() {
        let payload: RawPlatformPayload = serde_json::from_value(serde_json::json!({
            "platform": "CodeChef",
            "payload": {
                "profile": {
                    "currentRating": 1820,
                    "heatMap": [{"date": "2024-01-01", "value": 2}],
                    "ratingData": [{"name": "Start 1", "rating": "n/a", "end_date": "2024-01-01"}]
                }
            }
        }))
        .unwrap();

        let conversion = convert_or_absent(&payload).unwrap();

        assert!(conversion.scalars.rating_series.is_empty());
        assert_eq!(conversion.scalars.contests, 1);
        assert_eq!(conversion.scalars.rating.map(|r| r.current), Some(1820.0));
        assert_eq!(conversion.activity.map(|a| a.len()), Some(1));
    }
}
