pub mod codechef;
pub mod codeforces;
pub mod leetcode;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use shared::models::platform::{
    CodeChefProfile, CodeforcesProblem, CodeforcesRatingChange, CodeforcesSubmission, CodeforcesUserInfo,
    LeetCodeContestData, LeetCodeProfile,
};
use std::time::Duration;

use crate::config::PlatformApiConfig;

const USER_AGENT: &str = concat!("cp-tracker/", env!("CARGO_PKG_VERSION"));

/// Everything the backend reads from the three judges.
///
/// Each call is independent so a caller can run them concurrently and keep whatever succeeds.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PlatformSource: Send + Sync {
    async fn codeforces_submissions(&self, handle: &str) -> Result<Vec<CodeforcesSubmission>>;
    async fn codeforces_rating_history(&self, handle: &str) -> Result<Vec<CodeforcesRatingChange>>;
    async fn codeforces_user_info(&self, handle: &str) -> Result<Option<CodeforcesUserInfo>>;
    async fn codeforces_problemset(&self, tag: &str) -> Result<Vec<CodeforcesProblem>>;
    async fn leetcode_profile(&self, handle: &str) -> Result<LeetCodeProfile>;
    async fn leetcode_contest(&self, handle: &str) -> Result<LeetCodeContestData>;
    async fn codechef_profile(&self, handle: &str) -> Result<CodeChefProfile>;
    async fn codechef_solved_count(&self, handle: &str) -> Result<Option<u64>>;
}

/// Live implementation over the public APIs configured in [`PlatformApiConfig`].
#[derive(Clone)]
pub struct HttpPlatformSource {
    client: reqwest::Client,
    config: PlatformApiConfig,
}

impl HttpPlatformSource {
    pub fn new(config: &PlatformApiConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .user_agent(USER_AGENT)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    async fn get_text(&self, url: &str) -> Result<String> {
        log::debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("Request to {} failed", url))?;

        let status = response.status();
        if !status.is_success() {
            return Err(anyhow!("{} answered {}", url, status));
        }

        Ok(response.text().await?)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let body = self.get_text(url).await?;
        serde_json::from_str(&body).with_context(|| format!("Unexpected payload from {}", url))
    }
}

#[async_trait]
impl PlatformSource for HttpPlatformSource {
    async fn codeforces_submissions(&self, handle: &str) -> Result<Vec<CodeforcesSubmission>> {
        let url = codeforces::user_status_url(&self.config.codeforces_api_url, handle)?;
        codeforces::unwrap_response(self.get_json(url.as_str()).await?)
    }

    async fn codeforces_rating_history(&self, handle: &str) -> Result<Vec<CodeforcesRatingChange>> {
        let url = codeforces::user_rating_url(&self.config.codeforces_api_url, handle)?;
        codeforces::unwrap_response(self.get_json(url.as_str()).await?)
    }

    async fn codeforces_user_info(&self, handle: &str) -> Result<Option<CodeforcesUserInfo>> {
        let url = codeforces::user_info_url(&self.config.codeforces_api_url, handle)?;
        let users: Vec<CodeforcesUserInfo> = codeforces::unwrap_response(self.get_json(url.as_str()).await?)?;
        Ok(users.into_iter().next())
    }

    async fn codeforces_problemset(&self, tag: &str) -> Result<Vec<CodeforcesProblem>> {
        let url = codeforces::problemset_url(&self.config.codeforces_api_url, tag)?;
        let problemset: shared::models::platform::CodeforcesProblemset =
            codeforces::unwrap_response(self.get_json(url.as_str()).await?)?;
        Ok(problemset.problems)
    }

    async fn leetcode_profile(&self, handle: &str) -> Result<LeetCodeProfile> {
        self.get_json(&leetcode::profile_url(&self.config.leetcode_api_url, handle))
            .await
    }

    async fn leetcode_contest(&self, handle: &str) -> Result<LeetCodeContestData> {
        self.get_json(&leetcode::contest_url(&self.config.leetcode_api_url, handle))
            .await
    }

    async fn codechef_profile(&self, handle: &str) -> Result<CodeChefProfile> {
        let body = self
            .get_text(&codechef::profile_api_url(&self.config.codechef_api_url, handle))
            .await?;
        codechef::parse_profile(&body)
    }

    async fn codechef_solved_count(&self, handle: &str) -> Result<Option<u64>> {
        let page = self
            .get_text(&codechef::profile_page_url(&self.config.codechef_site_url, handle))
            .await?;
        Ok(codechef::scrape_total_solved(&page))
    }
}
