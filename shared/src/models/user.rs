use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::models::daily_problem::DailyProblemRecord;
use crate::models::platform::Platform;

pub const DEFAULT_PROBLEM_TAG: &str = "implementation";
pub const DEFAULT_MIN_RATING: i64 = 800;
pub const DEFAULT_MAX_RATING: i64 = 1200;

/// Handles on each judge. Empty or missing means the account is not linked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformHandles {
    #[serde(rename = "CodeChef", default, skip_serializing_if = "Option::is_none")]
    pub code_chef: Option<String>,
    #[serde(rename = "Codeforces", default, skip_serializing_if = "Option::is_none")]
    pub codeforces: Option<String>,
    #[serde(rename = "LeetCode", default, skip_serializing_if = "Option::is_none")]
    pub leet_code: Option<String>,
}

impl PlatformHandles {
    pub fn handle(&self, platform: Platform) -> Option<&str> {
        let handle = match platform {
            Platform::CodeChef => self.code_chef.as_deref(),
            Platform::Codeforces => self.codeforces.as_deref(),
            Platform::LeetCode => self.leet_code.as_deref(),
        };
        handle.map(str::trim).filter(|h| !h.is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_rating_range"))]
pub struct RatingRange {
    #[validate(range(min = 0, max = 5000))]
    pub min: i64,
    #[validate(range(min = 0, max = 5000))]
    pub max: i64,
}

impl Default for RatingRange {
    fn default() -> Self {
        Self {
            min: DEFAULT_MIN_RATING,
            max: DEFAULT_MAX_RATING,
        }
    }
}

impl RatingRange {
    pub fn contains(&self, rating: i64) -> bool {
        self.min <= rating && rating <= self.max
    }
}

fn validate_rating_range(range: &RatingRange) -> Result<(), ValidationError> {
    if range.min > range.max {
        return Err(ValidationError::new("min_exceeds_max"));
    }
    Ok(())
}

pub fn default_problem_tags() -> Vec<String> {
    vec![DEFAULT_PROBLEM_TAG.to_string()]
}

/// A tracked user as stored in the `users` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// ArangoDB document ID (format: "users/{key}")
    #[serde(rename = "_id", default)]
    pub id: String,

    #[serde(rename = "_rev", default)]
    pub rev: String,

    #[validate(length(min = 1, max = 100))]
    pub name: String,

    #[validate(length(min = 1, max = 50))]
    pub username: String,

    #[validate(email)]
    pub email: String,

    #[serde(default)]
    pub image: Option<String>,

    #[serde(default)]
    pub platform_ids: PlatformHandles,

    #[serde(default = "default_problem_tags")]
    pub problem_tags: Vec<String>,

    #[serde(default)]
    #[validate]
    pub rating_range: RatingRange,

    #[serde(default)]
    pub daily_problems: Vec<DailyProblemRecord>,

    #[serde(default)]
    pub daily_points: u64,
}

impl User {
    /// The document key, i.e. the part of `_id` after the collection name.
    pub fn key(&self) -> &str {
        self.id.rsplit('/').next().unwrap_or(&self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_user_defaults_from_minimal_document() {
        let user: User = serde_json::from_value(serde_json::json!({
            "_id": "users/42",
            "_rev": "_abc",
            "name": "Ada",
            "username": "ada",
            "email": "ada@example.com"
        }))
        .unwrap();

        assert_eq!(user.key(), "42");
        assert_eq!(user.problem_tags, vec!["implementation".to_string()]);
        assert_eq!(user.rating_range, RatingRange { min: 800, max: 1200 });
        assert_eq!(user.daily_points, 0);
        assert!(user.daily_problems.is_empty());
    }

    #[test]
    fn test_platform_handles_wire_names() {
        let handles: PlatformHandles =
            serde_json::from_value(serde_json::json!({"CodeChef": "chef_1", "Codeforces": " ", "LeetCode": "lc"})).unwrap();

        assert_eq!(handles.handle(Platform::CodeChef), Some("chef_1"));
        assert_eq!(handles.handle(Platform::Codeforces), None);
        assert_eq!(handles.handle(Platform::LeetCode), Some("lc"));
    }

    #[test]
    fn test_rating_range_validation() {
        assert!(RatingRange { min: 800, max: 1200 }.validate().is_ok());
        assert!(RatingRange { min: 1300, max: 1200 }.validate().is_err());
        assert!(RatingRange::default().contains(1200));
        assert!(!RatingRange::default().contains(1300));
    }
}
