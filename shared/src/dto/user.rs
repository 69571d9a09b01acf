use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::models::user::{PlatformHandles, RatingRange, User};

/// Public view of a user. Daily problem history is served separately.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub id: String,
    pub name: String,
    pub username: String,
    pub email: String,
    pub image: Option<String>,
    pub platform_ids: PlatformHandles,
    pub problem_tags: Vec<String>,
    pub rating_range: RatingRange,
    pub daily_points: u64,
}

impl From<&User> for UserDto {
    fn from(user: &User) -> Self {
        Self {
            id: user.key().to_string(),
            name: user.name.clone(),
            username: user.username.clone(),
            email: user.email.clone(),
            image: user.image.clone(),
            platform_ids: user.platform_ids.clone(),
            problem_tags: user.problem_tags.clone(),
            rating_range: user.rating_range,
            daily_points: user.daily_points,
        }
    }
}

/// Replaces the linked handles.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PlatformsRequest {
    #[serde(rename = "CodeChef", default)]
    #[validate(length(max = 64, message = "Handle must be at most 64 characters"))]
    pub code_chef: Option<String>,

    #[serde(rename = "Codeforces", default)]
    #[validate(length(max = 64, message = "Handle must be at most 64 characters"))]
    pub codeforces: Option<String>,

    #[serde(rename = "LeetCode", default)]
    #[validate(length(max = 64, message = "Handle must be at most 64 characters"))]
    pub leet_code: Option<String>,
}

impl From<PlatformsRequest> for PlatformHandles {
    fn from(request: PlatformsRequest) -> Self {
        let clean = |h: Option<String>| h.map(|s| s.trim().to_string()).filter(|s| !s.is_empty());
        Self {
            code_chef: clean(request.code_chef),
            codeforces: clean(request.codeforces),
            leet_code: clean(request.leet_code),
        }
    }
}

/// Display name, username and email. Username and email must stay unique.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ProfileRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"))]
    pub name: String,

    #[validate(length(min = 3, max = 32, message = "Username must be between 3 and 32 characters"))]
    #[validate(custom = "validate_username")]
    pub username: String,

    #[validate(email(message = "Invalid email address"))]
    pub email: String,
}

impl ProfileRequest {
    /// Trimmed name, trimmed username and lowercased email.
    pub fn normalized(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            username: self.username.trim().to_string(),
            email: self.email.trim().to_lowercase(),
        }
    }
}

fn validate_username(username: &str) -> Result<(), ValidationError> {
    if username.trim().chars().any(char::is_whitespace) {
        return Err(ValidationError::new("username_whitespace"));
    }
    Ok(())
}

/// Daily problem preferences.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PreferencesRequest {
    #[validate(length(min = 1, max = 20, message = "Pick between 1 and 20 tags"))]
    #[validate(custom = "validate_tags")]
    pub problem_tags: Vec<String>,

    #[validate]
    pub rating_range: RatingRange,
}

fn validate_tags(tags: &[String]) -> Result<(), ValidationError> {
    if tags.iter().any(|t| t.trim().is_empty()) {
        return Err(ValidationError::new("empty_tag"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_platforms_request_trims_and_drops_blank() {
        let request: PlatformsRequest =
            serde_json::from_value(serde_json::json!({"CodeChef": " chef ", "Codeforces": ""})).unwrap();
        assert!(request.validate().is_ok());

        let handles = PlatformHandles::from(request);
        assert_eq!(handles.code_chef.as_deref(), Some("chef"));
        assert_eq!(handles.codeforces, None);
        assert_eq!(handles.leet_code, None);
    }

    #[test]
    fn test_profile_validation() {
        let ok = ProfileRequest {
            name: " Ada Lovelace ".to_string(),
            username: "ada".to_string(),
            email: "Ada@Example.com".to_string(),
        };
        assert!(ok.validate().is_ok());
        assert_eq!(ok.clone().normalized().email, "ada@example.com");
        assert_eq!(ok.clone().normalized().name, "Ada Lovelace");

        let spaced = ProfileRequest {
            username: "ada l".to_string(),
            ..ok.clone()
        };
        assert!(spaced.validate().is_err());

        let bad_email = ProfileRequest {
            email: "not-an-email".to_string(),
            ..ok
        };
        assert!(bad_email.validate().is_err());
    }

    #[test]
    fn test_preferences_validation() {
        let ok: PreferencesRequest = serde_json::from_value(serde_json::json!({
            "problemTags": ["dp", "greedy"],
            "ratingRange": {"min": 1000, "max": 1400}
        }))
        .unwrap();
        assert!(ok.validate().is_ok());

        let inverted = PreferencesRequest {
            rating_range: RatingRange { min: 1500, max: 1000 },
            ..ok.clone()
        };
        assert!(inverted.validate().is_err());

        let blank_tag = PreferencesRequest {
            problem_tags: vec!["  ".to_string()],
            ..ok.clone()
        };
        assert!(blank_tag.validate().is_err());

        let no_tags = PreferencesRequest {
            problem_tags: vec![],
            ..ok
        };
        assert!(no_tags.validate().is_err());
    }
}
