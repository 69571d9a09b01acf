pub mod models {
    pub mod daily_problem;
    pub mod platform;
    pub mod user;
}

pub mod dto {
    pub mod daily_problem;
    pub mod dashboard;
    pub mod leaderboard;
    pub mod user;
}

pub mod activity;
pub mod cache;
pub mod calendar;
pub mod convert;
pub mod dashboard;
pub mod error;
pub mod heatmap;
pub mod scoring;
pub mod streak;

// Re-export commonly used items
pub use error::{SharedError, Result};

pub use activity::{ActivityRecord, ActivitySeries, UnifiedActivitySeries};
pub use cache::{CacheKey, CachedValue, FetchCache, InMemoryFetchCache, PayloadKind};
pub use calendar::{normalize, CalendarDay, RawDate};
pub use convert::{convert, PlatformConversion, PlatformScalars, RatingPoint, RatingSnapshot};
pub use dashboard::{DashboardSummary, PlatformCard};
pub use heatmap::{combine, HeatmapCell, HeatmapIntensity, HeatmapPage, HeatmapWindow};
pub use scoring::{composite_score, PlatformRatings, RatingTier};
pub use streak::{compute_streaks, StreakState};

// Re-export models
pub use models::{
    daily_problem::{DailyProblemRecord, ProblemStatus},
    platform::{Platform, RawPlatformPayload},
    user::{PlatformHandles, RatingRange, User},
};

// Re-export DTOs
pub use dto::{
    daily_problem::{SaveDailyProblemRequest, UpdateProblemStatusRequest},
    dashboard::{DashboardQuery, DashboardResponse},
    leaderboard::{
        DailyLeaderboardEntry, DailyLeaderboardQuery, DailyLeaderboardResponse, RatingsLeaderboardEntry,
    },
    user::{PlatformsRequest, PreferencesRequest, ProfileRequest, UserDto},
};

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_payloads_flow_into_one_heatmap() {
        let codeforces: RawPlatformPayload = serde_json::from_value(serde_json::json!({
            "platform": "Codeforces",
            "payload": {
                "submissions": [
                    {"creationTimeSeconds": 1704067200, "verdict": "OK", "problem": {"name": "A"}},
                    {"creationTimeSeconds": 1704070800, "verdict": "WRONG_ANSWER", "problem": {"name": "B"}}
                ]
            }
        }))
        .unwrap();
        let leetcode: RawPlatformPayload = serde_json::from_value(serde_json::json!({
            "platform": "LeetCode",
            "payload": {"profile": {"data": {"matchedUser": {"submissionCalendar": "{\"1704067200\": 4}"}}}}
        }))
        .unwrap();

        let cf = convert(&codeforces).unwrap();
        let lc = convert(&leetcode).unwrap();
        let summary = DashboardSummary::build(Some(&cf), Some(&lc), None);

        let jan_1 = CalendarDay::from_ymd(2024, 1, 1).unwrap();
        assert_eq!(summary.heatmap.records(), &[ActivityRecord::new(jan_1, 6)]);
        assert_eq!(summary.total_solved, 1);
    }
}
