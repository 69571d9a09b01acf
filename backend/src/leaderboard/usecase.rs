use futures::future::join_all;
use shared::convert::{codechef, codeforces, leetcode};
use shared::dto::leaderboard::RatingTiers;
use shared::models::user::User;
use shared::scoring::{rank_by_composite, rank_by_daily_points};
use shared::{
    composite_score, DailyLeaderboardEntry, DailyLeaderboardQuery, DailyLeaderboardResponse, Platform,
    PlatformRatings, RatingsLeaderboardEntry,
};
use std::sync::Arc;
use validator::Validate;

use crate::error::ApiError;
use crate::platforms::PlatformSource;
use crate::user::repository::UserRepository;

pub struct LeaderboardUseCaseImpl<R: UserRepository> {
    pub repo: R,
    pub platforms: Arc<dyn PlatformSource>,
}

fn logged<T>(user: &User, platform: Platform, result: anyhow::Result<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            log::warn!("{} rating for {} unavailable: {:#}", platform, user.id, e);
            None
        }
    }
}

impl<R: UserRepository> LeaderboardUseCaseImpl<R> {
    pub fn new(repo: R, platforms: Arc<dyn PlatformSource>) -> Self {
        Self { repo, platforms }
    }

    /// Latest rating per judge. Unlinked handles and failed fetches are `None`.
    async fn ratings_for(&self, user: &User) -> PlatformRatings {
        let handles = &user.platform_ids;

        let code_chef = async {
            let handle = handles.handle(Platform::CodeChef)?;
            let profile = logged(user, Platform::CodeChef, self.platforms.codechef_profile(handle).await)?;
            codechef::current_rating(&profile)
        };
        let code_forces = async {
            let handle = handles.handle(Platform::Codeforces)?;
            let history = logged(
                user,
                Platform::Codeforces,
                self.platforms.codeforces_rating_history(handle).await,
            )?;
            codeforces::current_rating(&history)
        };
        let leet_code = async {
            let handle = handles.handle(Platform::LeetCode)?;
            let contest = logged(user, Platform::LeetCode, self.platforms.leetcode_contest(handle).await)?;
            leetcode::current_rating(&contest)
        };

        let (code_chef, code_forces, leet_code) = futures::join!(code_chef, code_forces, leet_code);
        PlatformRatings {
            code_chef,
            leet_code,
            code_forces,
        }
    }

    /// All users ranked by the weighted sum of their floored ratings.
    pub async fn ratings(&self) -> Result<Vec<RatingsLeaderboardEntry>, ApiError> {
        let users = self.repo.find_all().await?;
        let ratings = join_all(users.iter().map(|u| self.ratings_for(u))).await;

        let mut entries: Vec<RatingsLeaderboardEntry> = users
            .iter()
            .zip(ratings)
            .map(|(user, ratings)| {
                let ratings = ratings.floored();
                RatingsLeaderboardEntry {
                    rank: 0,
                    user_id: user.key().to_string(),
                    name: user.name.clone(),
                    username: user.username.clone(),
                    image: user.image.clone(),
                    tiers: RatingTiers::from(&ratings),
                    score: composite_score(&ratings),
                    ratings,
                }
            })
            .collect();

        rank_by_composite(&mut entries, |e| e.score);
        for (i, entry) in entries.iter_mut().enumerate() {
            entry.rank = i + 1;
        }
        Ok(entries)
    }

    /// Ranked by daily points over all users, then filtered by name and paged.
    pub async fn daily(&self, query: &DailyLeaderboardQuery) -> Result<DailyLeaderboardResponse, ApiError> {
        query.validate()?;

        let mut users = self.repo.find_all().await?;
        rank_by_daily_points(&mut users, |u| u.daily_points);

        let needle = query
            .q
            .as_deref()
            .map(|q| q.trim().to_lowercase())
            .filter(|q| !q.is_empty());

        let matching: Vec<DailyLeaderboardEntry> = users
            .iter()
            .enumerate()
            .filter(|(_, u)| match &needle {
                Some(needle) => u.name.to_lowercase().contains(needle.as_str()),
                None => true,
            })
            .map(|(i, u)| DailyLeaderboardEntry {
                rank: i + 1,
                user_id: u.key().to_string(),
                name: u.name.clone(),
                username: u.username.clone(),
                image: u.image.clone(),
                daily_points: u.daily_points,
            })
            .collect();

        let total_count = matching.len();
        let entries = matching
            .into_iter()
            .skip((query.page - 1).saturating_mul(query.limit))
            .take(query.limit)
            .collect();

        Ok(DailyLeaderboardResponse {
            entries,
            total_count,
            page: query.page,
            limit: query.limit,
        })
    }
}
