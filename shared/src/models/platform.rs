use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::calendar::RawDate;
use crate::error::{Result, SharedError};

/// The three supported judges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Platform {
    CodeChef,
    Codeforces,
    LeetCode,
}

impl Platform {
    pub const ALL: [Platform; 3] = [Platform::CodeChef, Platform::Codeforces, Platform::LeetCode];

    pub fn slug(&self) -> &'static str {
        match self {
            Platform::CodeChef => "codechef",
            Platform::Codeforces => "codeforces",
            Platform::LeetCode => "leetcode",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        Platform::ALL
            .into_iter()
            .find(|p| p.slug().eq_ignore_ascii_case(slug.trim()))
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.slug())
    }
}

/// Numeric field that some platforms send as a string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FlexNumber {
    Int(i64),
    Float(f64),
    Text(String),
}

impl FlexNumber {
    pub fn as_f64(&self) -> Result<f64> {
        match self {
            FlexNumber::Int(n) => Ok(*n as f64),
            FlexNumber::Float(n) => Ok(*n),
            FlexNumber::Text(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| SharedError::format(format!("not a number: '{}'", s))),
        }
    }

    /// Non-negative integer count; fractional parts are truncated.
    pub fn as_count(&self) -> Result<u64> {
        let value = match self {
            FlexNumber::Int(n) => *n as f64,
            FlexNumber::Float(n) => *n,
            FlexNumber::Text(s) => match s.trim().parse::<i64>() {
                Ok(n) => n as f64,
                Err(_) => self.as_f64()?,
            },
        };
        if !value.is_finite() || value < 0.0 {
            return Err(SharedError::format(format!("invalid count: {:?}", self)));
        }
        Ok(value.trunc() as u64)
    }
}

// ---------------------------------------------------------------------------
// Codeforces
// ---------------------------------------------------------------------------

/// Envelope returned by every Codeforces API method.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodeforcesResponse<T> {
    pub status: String,
    #[serde(default = "Option::default")]
    pub result: Option<T>,
    #[serde(default)]
    pub comment: Option<String>,
}

impl<T> CodeforcesResponse<T> {
    pub fn into_result(self) -> Result<T> {
        if self.status != "OK" {
            return Err(SharedError::BadRequest(
                self.comment.unwrap_or_else(|| format!("codeforces status {}", self.status)),
            ));
        }
        self.result
            .ok_or_else(|| SharedError::MissingField("result".to_string()))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeforcesProblem {
    #[serde(default)]
    pub contest_id: Option<i64>,
    #[serde(default)]
    pub index: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub rating: Option<i64>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub points: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeforcesSubmission {
    pub creation_time_seconds: i64,
    /// Missing while the submission is still being judged.
    #[serde(default)]
    pub verdict: Option<String>,
    #[serde(default)]
    pub problem: CodeforcesProblem,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeforcesRatingChange {
    #[serde(default)]
    pub contest_id: Option<i64>,
    #[serde(default)]
    pub contest_name: String,
    #[serde(default)]
    pub rating_update_time_seconds: i64,
    #[serde(default)]
    pub old_rating: i64,
    pub new_rating: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeforcesUserInfo {
    #[serde(default)]
    pub handle: String,
    #[serde(default)]
    pub rating: Option<i64>,
    #[serde(default)]
    pub max_rating: Option<i64>,
    #[serde(default)]
    pub rank: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CodeforcesProblemset {
    #[serde(default)]
    pub problems: Vec<CodeforcesProblem>,
}

/// Everything fetched from Codeforces for one handle. Each part is absent when its call failed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeforcesPayload {
    #[serde(default)]
    pub submissions: Option<Vec<CodeforcesSubmission>>,
    #[serde(default)]
    pub rating_history: Option<Vec<CodeforcesRatingChange>>,
    #[serde(default)]
    pub user_info: Option<CodeforcesUserInfo>,
}

// ---------------------------------------------------------------------------
// LeetCode
// ---------------------------------------------------------------------------

/// Epoch-seconds keyed submission counts, either as a map or as its JSON encoding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SubmissionCalendar {
    Encoded(String),
    Map(BTreeMap<String, FlexNumber>),
}

impl SubmissionCalendar {
    /// Decodes the string form; one parse step at most.
    pub fn entries(&self) -> Result<BTreeMap<String, FlexNumber>> {
        match self {
            SubmissionCalendar::Map(map) => Ok(map.clone()),
            SubmissionCalendar::Encoded(text) if text.trim().is_empty() => Ok(BTreeMap::new()),
            SubmissionCalendar::Encoded(text) => serde_json::from_str(text)
                .map_err(|e| SharedError::format(format!("submission calendar is not a JSON object: {}", e))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeetCodeSubmissionCount {
    #[serde(default)]
    pub difficulty: String,
    #[serde(default)]
    pub count: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeetCodeSubmitStats {
    #[serde(default)]
    pub ac_submission_num: Vec<LeetCodeSubmissionCount>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeetCodeBadge {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub creation_date: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeetCodeMatchedUser {
    #[serde(default)]
    pub submission_calendar: Option<SubmissionCalendar>,
    #[serde(default)]
    pub submit_stats: Option<LeetCodeSubmitStats>,
    #[serde(default)]
    pub badges: Vec<LeetCodeBadge>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeetCodeProfileData {
    #[serde(default)]
    pub matched_user: Option<LeetCodeMatchedUser>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LeetCodeProfile {
    #[serde(default)]
    pub data: Option<LeetCodeProfileData>,
}

impl LeetCodeProfile {
    pub fn matched_user(&self) -> Option<&LeetCodeMatchedUser> {
        self.data.as_ref().and_then(|d| d.matched_user.as_ref())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LeetCodeContestBadge {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeetCodeContestRanking {
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub attended_contests_count: u64,
    #[serde(default)]
    pub badge: Option<LeetCodeContestBadge>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeetCodeContest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub start_time: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeetCodeContestHistoryEntry {
    #[serde(default)]
    pub attended: bool,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub ranking: Option<u64>,
    #[serde(default)]
    pub contest: LeetCodeContest,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeetCodeContestData {
    #[serde(default)]
    pub user_contest_ranking: Option<LeetCodeContestRanking>,
    #[serde(default)]
    pub user_contest_ranking_history: Vec<LeetCodeContestHistoryEntry>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LeetCodePayload {
    #[serde(default)]
    pub profile: Option<LeetCodeProfile>,
    #[serde(default)]
    pub contest: Option<LeetCodeContestData>,
}

// ---------------------------------------------------------------------------
// CodeChef
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeChefHeatEntry {
    pub date: RawDate,
    pub value: FlexNumber,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeChefRatingEntry {
    #[serde(default)]
    pub name: String,
    pub rating: FlexNumber,
    #[serde(default)]
    pub end_date: Option<RawDate>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeChefProfile {
    #[serde(default)]
    pub heat_map: Option<Vec<CodeChefHeatEntry>>,
    #[serde(default)]
    pub rating_data: Option<Vec<CodeChefRatingEntry>>,
    #[serde(default)]
    pub current_rating: Option<f64>,
    #[serde(default)]
    pub highest_rating: Option<f64>,
    #[serde(default)]
    pub stars: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeChefPayload {
    #[serde(default)]
    pub profile: Option<CodeChefProfile>,
    /// Scraped from the public profile page.
    #[serde(default)]
    pub problems_solved: Option<u64>,
}

/// Raw data from one platform, ready for conversion.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "platform", content = "payload")]
pub enum RawPlatformPayload {
    Codeforces(CodeforcesPayload),
    LeetCode(LeetCodePayload),
    CodeChef(CodeChefPayload),
}

impl RawPlatformPayload {
    pub fn platform(&self) -> Platform {
        match self {
            RawPlatformPayload::Codeforces(_) => Platform::Codeforces,
            RawPlatformPayload::LeetCode(_) => Platform::LeetCode,
            RawPlatformPayload::CodeChef(_) => Platform::CodeChef,
        }
    }
}
