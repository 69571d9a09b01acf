use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::activity::UnifiedActivitySeries;
use crate::convert::{PlatformConversion, ProfileBadge, RatingPoint, RatingSnapshot};
use crate::heatmap::combine;
use crate::models::platform::Platform;

/// Stat card for one judge.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformCard {
    pub linked: bool,
    pub solved: u64,
    pub contests: u64,
    pub rating: Option<RatingSnapshot>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub heatmap: UnifiedActivitySeries,
    pub total_solved: u64,
    pub total_active_days: usize,
    pub total_contests: u64,
    pub platforms: BTreeMap<Platform, PlatformCard>,
    pub rating_series: BTreeMap<Platform, Vec<RatingPoint>>,
    pub badges: Vec<ProfileBadge>,
}

impl DashboardSummary {
    /// Folds whatever conversions are available. A missing platform contributes nothing
    /// and shows up as an unlinked card.
    pub fn build(
        codeforces: Option<&PlatformConversion>,
        leetcode: Option<&PlatformConversion>,
        codechef: Option<&PlatformConversion>,
    ) -> Self {
        let conversions = [
            (Platform::CodeChef, codechef),
            (Platform::Codeforces, codeforces),
            (Platform::LeetCode, leetcode),
        ];

        let heatmap = combine(
            conversions
                .iter()
                .map(|(_, c)| c.and_then(|c| c.activity.as_deref())),
        );

        let mut summary = DashboardSummary {
            total_active_days: heatmap.len(),
            heatmap,
            ..Default::default()
        };

        for (platform, conversion) in conversions {
            let card = match conversion {
                Some(c) => PlatformCard {
                    linked: true,
                    solved: c.scalars.solved.unwrap_or(0),
                    contests: c.scalars.contests,
                    rating: c.scalars.rating.clone(),
                },
                None => PlatformCard::default(),
            };

            summary.total_solved += card.solved;
            summary.total_contests += card.contests;
            summary.platforms.insert(platform, card);

            if let Some(c) = conversion {
                summary.rating_series.insert(platform, c.scalars.rating_series.clone());
                summary.badges.extend(c.scalars.badges.iter().cloned());
            }
        }

        summary
    }
}
