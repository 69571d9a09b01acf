use anyhow::{Context, Result};
use shared::models::platform::CodeforcesResponse;
use url::Url;

fn endpoint(base: &str, method: &str, params: &[(&str, &str)]) -> Result<Url> {
    let raw = format!("{}/{}", base.trim_end_matches('/'), method);
    Url::parse_with_params(&raw, params).with_context(|| format!("Invalid Codeforces URL: {}", raw))
}

pub fn user_status_url(base: &str, handle: &str) -> Result<Url> {
    endpoint(base, "user.status", &[("handle", handle), ("from", "1")])
}

pub fn user_rating_url(base: &str, handle: &str) -> Result<Url> {
    endpoint(base, "user.rating", &[("handle", handle)])
}

pub fn user_info_url(base: &str, handle: &str) -> Result<Url> {
    endpoint(base, "user.info", &[("handles", handle), ("checkHistoricHandles", "true")])
}

pub fn problemset_url(base: &str, tag: &str) -> Result<Url> {
    endpoint(base, "problemset.problems", &[("tags", tag)])
}

/// Codeforces wraps every answer in `{status, result, comment}`.
pub fn unwrap_response<T>(response: CodeforcesResponse<T>) -> Result<T> {
    Ok(response.into_result()?)
}
