use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::scoring::{PlatformRatings, RatingTier};

pub const DEFAULT_PAGE_SIZE: usize = 5;

fn default_page() -> usize {
    1
}

fn default_limit() -> usize {
    DEFAULT_PAGE_SIZE
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingTiers {
    pub code_chef: RatingTier,
    pub leet_code: RatingTier,
    pub code_forces: RatingTier,
}

impl From<&PlatformRatings> for RatingTiers {
    fn from(ratings: &PlatformRatings) -> Self {
        Self {
            code_chef: RatingTier::for_rating(ratings.code_chef),
            leet_code: RatingTier::for_rating(ratings.leet_code),
            code_forces: RatingTier::for_rating(ratings.code_forces),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingsLeaderboardEntry {
    pub rank: usize,
    pub user_id: String,
    pub name: String,
    pub username: String,
    pub image: Option<String>,
    pub ratings: PlatformRatings,
    pub tiers: RatingTiers,
    pub score: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DailyLeaderboardQuery {
    /// Case-insensitive name filter.
    #[serde(default)]
    #[validate(length(max = 100))]
    pub q: Option<String>,

    #[serde(default = "default_page")]
    #[validate(range(min = 1, message = "page starts at 1"))]
    pub page: usize,

    #[serde(default = "default_limit")]
    #[validate(range(min = 1, max = 100, message = "limit must be between 1 and 100"))]
    pub limit: usize,
}

impl Default for DailyLeaderboardQuery {
    fn default() -> Self {
        Self {
            q: None,
            page: default_page(),
            limit: default_limit(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyLeaderboardEntry {
    pub rank: usize,
    pub user_id: String,
    pub name: String,
    pub username: String,
    pub image: Option<String>,
    pub daily_points: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyLeaderboardResponse {
    pub entries: Vec<DailyLeaderboardEntry>,
    pub total_count: usize,
    pub page: usize,
    pub limit: usize,
}
