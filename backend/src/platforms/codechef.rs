use anyhow::{anyhow, Result};
use regex::Regex;
use serde::Deserialize;
use shared::models::platform::CodeChefProfile;
use std::sync::OnceLock;

pub fn profile_api_url(base: &str, handle: &str) -> String {
    format!(
        "{}/handle/{}",
        base.trim_end_matches('/'),
        urlencoding::encode(handle.trim())
    )
}

pub fn profile_page_url(site: &str, handle: &str) -> String {
    format!(
        "{}/users/{}",
        site.trim_end_matches('/'),
        urlencoding::encode(handle.trim())
    )
}

/// The profile API answers 200 with `{success: false}` for unknown handles.
#[derive(Debug, Deserialize)]
struct ApiStatus {
    #[serde(default = "default_success")]
    success: bool,
}

fn default_success() -> bool {
    true
}

pub fn parse_profile(body: &str) -> Result<CodeChefProfile> {
    let status: ApiStatus = serde_json::from_str(body)?;
    if !status.success {
        return Err(anyhow!("CodeChef API reported no such user"));
    }
    Ok(serde_json::from_str(body)?)
}

static HEADING: OnceLock<Option<Regex>> = OnceLock::new();
static NUMBER: OnceLock<Option<Regex>> = OnceLock::new();

fn compiled(cell: &'static OnceLock<Option<Regex>>, pattern: &str) -> Option<&'static Regex> {
    cell.get_or_init(|| Regex::new(pattern).ok()).as_ref()
}

/// First number inside the last `<h3>` that mentions "Total Problems Solved".
pub fn scrape_total_solved(page: &str) -> Option<u64> {
    let heading = compiled(&HEADING, r"(?is)<h3[^>]*>(.*?)</h3>")?;
    let number = compiled(&NUMBER, r"\d+")?;

    heading
        .captures_iter(page)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str())
        .filter(|text| text.contains("Total Problems Solved"))
        .last()
        .and_then(|text| number.find(text))
        .and_then(|m| m.as_str().parse().ok())
}
