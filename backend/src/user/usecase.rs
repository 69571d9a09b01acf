use chrono::{DateTime, Utc};
use futures::future::join_all;
use rand::seq::SliceRandom;
use shared::models::daily_problem::{self, DailyProblemRecord};
use shared::models::platform::CodeforcesProblem;
use shared::models::user::User;
use shared::{
    compute_streaks, CalendarDay, FetchCache, PlatformsRequest, PreferencesRequest, ProfileRequest, SaveDailyProblemRequest,
    StreakState, UpdateProblemStatusRequest, UserDto,
};
use std::collections::BTreeSet;
use std::sync::Arc;
use validator::Validate;

use crate::error::ApiError;
use crate::platforms::PlatformSource;
use crate::user::repository::{document_id, UserRepository};

/// Outcome of a daily assignment request.
#[derive(Debug, Clone, PartialEq)]
pub enum Assignment {
    /// Picked and stored just now.
    Created(DailyProblemRecord),
    /// Today's problem was already assigned.
    Existing(DailyProblemRecord),
}

pub struct UserUseCaseImpl<R: UserRepository> {
    pub repo: R,
    pub platforms: Arc<dyn PlatformSource>,
    pub cache: Arc<dyn FetchCache>,
}

impl<R: UserRepository> UserUseCaseImpl<R> {
    pub fn new(repo: R, platforms: Arc<dyn PlatformSource>, cache: Arc<dyn FetchCache>) -> Self {
        Self { repo, platforms, cache }
    }

    pub async fn load_user(&self, id: &str) -> Result<User, ApiError> {
        self.repo
            .find_by_id(&document_id(id))
            .await?
            .ok_or_else(|| ApiError::not_found("User not found"))
    }

    pub async fn list_users(&self) -> Result<Vec<UserDto>, ApiError> {
        let users = self.repo.find_all().await?;
        Ok(users.iter().map(UserDto::from).collect())
    }

    pub async fn get_user(&self, id: &str) -> Result<UserDto, ApiError> {
        let user = self.load_user(id).await?;
        Ok(UserDto::from(&user))
    }

    /// Replaces the linked handles. Cached payloads for the old handles are dropped.
    pub async fn update_platforms(&self, id: &str, request: PlatformsRequest) -> Result<UserDto, ApiError> {
        request.validate()?;

        let mut user = self.load_user(id).await?;
        user.platform_ids = request.into();
        let saved = self.repo.update(user).await?;

        if let Err(e) = self.cache.invalidate_user(saved.key()).await {
            log::warn!("Could not clear cached payloads for {}: {}", saved.id, e);
        }

        log::info!("Updated platform handles for {}", saved.id);
        Ok(UserDto::from(&saved))
    }

    /// Changes name, username and email. Username and email may not belong to another user.
    pub async fn update_profile(&self, id: &str, request: ProfileRequest) -> Result<UserDto, ApiError> {
        request.validate()?;
        let request = request.normalized();

        let mut user = self.load_user(id).await?;
        let taken = self
            .repo
            .find_by_username_or_email(&request.username, &request.email)
            .await?;
        if let Some(other) = taken.iter().find(|u| u.id != user.id) {
            let field = if other.username == request.username { "Username" } else { "Email" };
            return Err(ApiError::conflict(&format!("{} is already in use", field)));
        }

        user.name = request.name;
        user.username = request.username;
        user.email = request.email;
        let saved = self.repo.update(user).await?;

        log::info!("Updated profile for {}", saved.id);
        Ok(UserDto::from(&saved))
    }

    pub async fn update_preferences(&self, id: &str, request: PreferencesRequest) -> Result<UserDto, ApiError> {
        request.validate()?;

        let mut user = self.load_user(id).await?;
        let tags: BTreeSet<String> = request
            .problem_tags
            .iter()
            .map(|t| t.trim().to_lowercase())
            .collect();
        user.problem_tags = tags.into_iter().collect();
        user.rating_range = request.rating_range;

        let saved = self.repo.update(user).await?;
        Ok(UserDto::from(&saved))
    }

    /// Newest first.
    pub async fn daily_problems(&self, id: &str) -> Result<Vec<DailyProblemRecord>, ApiError> {
        let user = self.load_user(id).await?;
        Ok(daily_problem::sorted_history(&user.daily_problems))
    }

    /// Stores a caller-chosen problem as today's assignment.
    pub async fn save_daily_problem(
        &self,
        id: &str,
        request: SaveDailyProblemRequest,
        now: DateTime<Utc>,
    ) -> Result<DailyProblemRecord, ApiError> {
        request.validate()?;

        let mut user = self.load_user(id).await?;
        let today = CalendarDay::from_datetime(now);
        if let Some(existing) = daily_problem::assigned_on(&user.daily_problems, today) {
            return Err(ApiError::conflict(&format!(
                "A daily problem is already assigned for {}: {}",
                today, existing.link
            )));
        }

        let record = DailyProblemRecord::new(
            request.name,
            request.rating,
            request.tags,
            request.contest_id,
            &request.index,
            request.points,
            now,
        )?;

        user.daily_problems.push(record.clone());
        self.repo.update(user).await?;
        Ok(record)
    }

    /// Picks a random Codeforces problem matching the user's tags and rating range,
    /// at most once per UTC day.
    pub async fn assign_daily_problem(&self, id: &str, now: DateTime<Utc>) -> Result<Assignment, ApiError> {
        let mut user = self.load_user(id).await?;
        let today = CalendarDay::from_datetime(now);
        if let Some(existing) = daily_problem::assigned_on(&user.daily_problems, today) {
            return Ok(Assignment::Existing(existing.clone()));
        }

        let problems = self.problems_for_tags(&user.problem_tags).await?;
        let candidates = daily_problem::select_candidates(&problems, &user.rating_range, &user.daily_problems);
        log::debug!(
            "{} of {} problems match {:?} in {}-{}",
            candidates.len(),
            problems.len(),
            user.problem_tags,
            user.rating_range.min,
            user.rating_range.max
        );

        let picked = {
            let mut rng = rand::thread_rng();
            candidates.choose(&mut rng).cloned()
        }
        .ok_or_else(|| ApiError::not_found("No Codeforces problem matches the daily problem preferences"))?;

        let record = DailyProblemRecord::from_codeforces(&picked, now)?;
        user.daily_problems.push(record.clone());
        self.repo.update(user).await?;

        log::info!("Assigned {} to {} for {}", record.link, id, today);
        Ok(Assignment::Created(record))
    }

    /// Union of the problemset for every tag. Tags whose fetch fails are skipped.
    async fn problems_for_tags(&self, tags: &[String]) -> Result<Vec<CodeforcesProblem>, ApiError> {
        let default_tags = shared::models::user::default_problem_tags();
        let tags = if tags.is_empty() { &default_tags[..] } else { tags };

        let results = join_all(tags.iter().map(|tag| self.platforms.codeforces_problemset(tag))).await;

        let mut problems = Vec::new();
        let mut failures = 0;
        for (tag, result) in tags.iter().zip(results) {
            match result {
                Ok(found) => problems.extend(found),
                Err(e) => {
                    failures += 1;
                    log::warn!("Codeforces problemset for tag '{}' failed: {:#}", tag, e);
                }
            }
        }

        if failures == tags.len() {
            return Err(ApiError::upstream_error("Codeforces problemset is unavailable"));
        }
        Ok(problems)
    }

    /// Marks the problem at `contestId/index` solved and credits its points once.
    pub async fn update_problem_status(
        &self,
        id: &str,
        request: UpdateProblemStatusRequest,
    ) -> Result<DailyProblemRecord, ApiError> {
        request.validate()?;

        let mut user = self.load_user(id).await?;
        let link = daily_problem::problem_link(request.contest_id, &request.index);

        let known = user.daily_problems.iter().any(|p| p.link == link);
        let record = daily_problem::pending_by_link(&mut user.daily_problems, &link).ok_or_else(|| {
            if known {
                ApiError::conflict(&format!("problem already solved: {}", link))
            } else {
                ApiError::not_found("Problem not found")
            }
        })?;

        record.mark_solved()?;
        let points = request.points.unwrap_or(record.points);
        let solved = record.clone();

        user.daily_points = user.daily_points.saturating_add(u64::from(points));
        self.repo.update(user).await?;

        log::info!("{} solved {} for {} points", id, solved.link, points);
        Ok(solved)
    }

    pub async fn streaks(&self, id: &str, now: DateTime<Utc>) -> Result<StreakState, ApiError> {
        let user = self.load_user(id).await?;
        Ok(compute_streaks(&user.daily_problems, now))
    }
}
