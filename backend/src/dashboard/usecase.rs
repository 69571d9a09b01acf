use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use shared::convert::convert_or_absent;
use shared::models::platform::{CodeChefPayload, CodeforcesPayload, LeetCodePayload, RawPlatformPayload};
use shared::models::user::User;
use shared::{
    compute_streaks, CacheKey, CalendarDay, DashboardQuery, DashboardResponse, DashboardSummary, FetchCache,
    HeatmapPage, PayloadKind, Platform,
};
use std::future::Future;
use std::sync::Arc;

use crate::error::ApiError;
use crate::platforms::PlatformSource;
use crate::user::repository::{document_id, UserRepository};

pub struct DashboardUseCaseImpl<R: UserRepository> {
    pub repo: R,
    pub platforms: Arc<dyn PlatformSource>,
    pub cache: Arc<dyn FetchCache>,
}

/// Per-request context for one user's fetches.
struct FetchScope<'a> {
    user_id: &'a str,
    today: CalendarDay,
    refresh: &'a [Platform],
}

impl<R: UserRepository> DashboardUseCaseImpl<R> {
    pub fn new(repo: R, platforms: Arc<dyn PlatformSource>, cache: Arc<dyn FetchCache>) -> Self {
        Self { repo, platforms, cache }
    }

    pub async fn dashboard(
        &self,
        id: &str,
        query: &DashboardQuery,
        now: DateTime<Utc>,
    ) -> Result<DashboardResponse, ApiError> {
        let refresh = query.refresh_targets()?;
        let window = query.heatmap_window(CalendarDay::from_datetime(now))?;
        let user = self
            .repo
            .find_by_id(&document_id(id))
            .await?
            .ok_or_else(|| ApiError::not_found("User not found"))?;

        let scope = FetchScope {
            user_id: user.key(),
            today: CalendarDay::from_datetime(now),
            refresh: &refresh,
        };

        let (codeforces, leetcode, codechef) = futures::join!(
            self.codeforces_payload(&user, &scope),
            self.leetcode_payload(&user, &scope),
            self.codechef_payload(&user, &scope),
        );

        let codeforces = codeforces.as_ref().and_then(convert_or_absent);
        let leetcode = leetcode.as_ref().and_then(convert_or_absent);
        let codechef = codechef.as_ref().and_then(convert_or_absent);

        let summary = DashboardSummary::build(codeforces.as_ref(), leetcode.as_ref(), codechef.as_ref());
        log::debug!(
            "Dashboard for {}: {} active days, {} solved",
            user.id,
            summary.total_active_days,
            summary.total_solved
        );

        Ok(DashboardResponse {
            user_id: user.key().to_string(),
            generated_on: scope.today,
            streaks: compute_streaks(&user.daily_problems, now),
            heatmap_page: HeatmapPage::build(&summary.heatmap, window),
            summary,
        })
    }

    /// Serves today's cached copy unless a refresh was asked for; otherwise fetches and
    /// caches. A failed fetch is logged and yields `None`.
    async fn cached<T, F, Fut>(&self, scope: &FetchScope<'_>, platform: Platform, kind: PayloadKind, fetch: F) -> Option<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = anyhow::Result<T>>,
    {
        let key = CacheKey::new(scope.user_id, platform, kind);

        if !scope.refresh.contains(&platform) {
            match self.cache.get(&key).await {
                Ok(Some(cached)) if cached.is_fresh(scope.today) => match serde_json::from_value(cached.value) {
                    Ok(value) => return Some(value),
                    Err(e) => log::warn!("Ignoring unreadable cache entry {}: {}", key, e),
                },
                Ok(_) => {}
                Err(e) => log::warn!("Cache read failed for {}: {}", key, e),
            }
        }

        match fetch().await {
            Ok(value) => {
                match serde_json::to_value(&value) {
                    Ok(json) => {
                        if let Err(e) = self.cache.set(&key, json, scope.today).await {
                            log::warn!("Cache write failed for {}: {}", key, e);
                        }
                    }
                    Err(e) => log::warn!("Could not serialize {} for caching: {}", key, e),
                }
                Some(value)
            }
            Err(e) => {
                log::warn!("Fetching {} failed: {:#}", key, e);
                None
            }
        }
    }

    async fn codeforces_payload(&self, user: &User, scope: &FetchScope<'_>) -> Option<RawPlatformPayload> {
        let handle = user.platform_ids.handle(Platform::Codeforces)?;
        let platform = Platform::Codeforces;

        let (submissions, rating_history, user_info) = futures::join!(
            self.cached(scope, platform, PayloadKind::Submissions, || {
                self.platforms.codeforces_submissions(handle)
            }),
            self.cached(scope, platform, PayloadKind::RatingHistory, || {
                self.platforms.codeforces_rating_history(handle)
            }),
            self.cached(scope, platform, PayloadKind::UserInfo, || {
                self.platforms.codeforces_user_info(handle)
            }),
        );

        if submissions.is_none() && rating_history.is_none() && user_info.is_none() {
            return None;
        }

        Some(RawPlatformPayload::Codeforces(CodeforcesPayload {
            submissions,
            rating_history,
            user_info: user_info.flatten(),
        }))
    }

    async fn leetcode_payload(&self, user: &User, scope: &FetchScope<'_>) -> Option<RawPlatformPayload> {
        let handle = user.platform_ids.handle(Platform::LeetCode)?;
        let platform = Platform::LeetCode;

        let (profile, contest) = futures::join!(
            self.cached(scope, platform, PayloadKind::Profile, || {
                self.platforms.leetcode_profile(handle)
            }),
            self.cached(scope, platform, PayloadKind::Contest, || {
                self.platforms.leetcode_contest(handle)
            }),
        );

        if profile.is_none() && contest.is_none() {
            return None;
        }

        Some(RawPlatformPayload::LeetCode(LeetCodePayload { profile, contest }))
    }

    async fn codechef_payload(&self, user: &User, scope: &FetchScope<'_>) -> Option<RawPlatformPayload> {
        let handle = user.platform_ids.handle(Platform::CodeChef)?;
        let platform = Platform::CodeChef;

        let (profile, problems_solved) = futures::join!(
            self.cached(scope, platform, PayloadKind::Profile, || {
                self.platforms.codechef_profile(handle)
            }),
            self.cached(scope, platform, PayloadKind::SolvedCount, || {
                self.platforms.codechef_solved_count(handle)
            }),
        );

        if profile.is_none() && problems_solved.is_none() {
            return None;
        }

        Some(RawPlatformPayload::CodeChef(CodeChefPayload {
            profile,
            problems_solved: problems_solved.flatten(),
        }))
    }
}
