use serde::{Deserialize, Serialize};
use validator::Validate;

/// A Codeforces problem to record as today's assignment.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SaveDailyProblemRequest {
    #[validate(length(min = 1, max = 200, message = "Problem name is required"))]
    pub name: String,
    #[serde(default)]
    pub rating: Option<i64>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[validate(range(min = 1, message = "contestId must be positive"))]
    pub contest_id: i64,
    #[validate(length(min = 1, max = 4, message = "index is required"))]
    pub index: String,
    #[serde(default)]
    pub points: Option<u32>,
}

/// Marks the problem at `contestId`/`index` solved.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProblemStatusRequest {
    #[validate(range(min = 1, message = "contestId must be positive"))]
    pub contest_id: i64,
    #[validate(length(min = 1, max = 4, message = "index is required"))]
    pub index: String,
    /// Defaults to the record's own points.
    #[serde(default)]
    pub points: Option<u32>,
}
