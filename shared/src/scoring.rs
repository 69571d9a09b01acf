use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Latest rating on each judge; `None` when unknown or unlinked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformRatings {
    pub code_chef: Option<f64>,
    pub leet_code: Option<f64>,
    pub code_forces: Option<f64>,
}

impl PlatformRatings {
    /// Ratings as displayed on the leaderboard: whole numbers, rounded down.
    pub fn floored(&self) -> Self {
        Self {
            code_chef: self.code_chef.map(floor_rating),
            leet_code: self.leet_code.map(floor_rating),
            code_forces: self.code_forces.map(floor_rating),
        }
    }
}

pub fn floor_rating(rating: f64) -> f64 {
    rating.floor()
}

/// Fixed per-judge weights. Not a calibrated equivalence between rating scales.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompositeWeights {
    pub code_chef: f64,
    pub leet_code: f64,
    pub code_forces: f64,
}

impl Default for CompositeWeights {
    fn default() -> Self {
        Self {
            code_chef: 0.75,
            leet_code: 0.70,
            code_forces: 1.0,
        }
    }
}

impl CompositeWeights {
    pub fn score(&self, ratings: &PlatformRatings) -> f64 {
        self.code_chef * ratings.code_chef.unwrap_or(0.0)
            + self.leet_code * ratings.leet_code.unwrap_or(0.0)
            + self.code_forces * ratings.code_forces.unwrap_or(0.0)
    }
}

/// Weighted sum used only to order users. Missing ratings count as zero.
pub fn composite_score(ratings: &PlatformRatings) -> f64 {
    CompositeWeights::default().score(ratings)
}

/// Highest first. Ties keep their input order; NaN sorts last.
pub fn rank_by_composite<T, F>(entries: &mut [T], score: F)
where
    F: Fn(&T) -> f64,
{
    entries.sort_by(|a, b| descending(score(a), score(b)));
}

/// Highest daily points first, ties in input order.
pub fn rank_by_daily_points<T, F>(entries: &mut [T], points: F)
where
    F: Fn(&T) -> u64,
{
    entries.sort_by_key(|e| std::cmp::Reverse(points(e)));
}

fn descending(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b.total_cmp(&a),
    }
}

/// Display tier for a rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RatingTier {
    Gold,
    Purple,
    Blue,
    Plain,
    None,
}

impl RatingTier {
    pub fn for_rating(rating: Option<f64>) -> Self {
        match rating {
            Some(r) if r >= 2000.0 => RatingTier::Gold,
            Some(r) if r >= 1600.0 => RatingTier::Purple,
            Some(r) if r >= 1200.0 => RatingTier::Blue,
            Some(r) if r > 0.0 => RatingTier::Plain,
            _ => RatingTier::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    fn ratings(cc: Option<f64>, lc: Option<f64>, cf: Option<f64>) -> PlatformRatings {
        PlatformRatings {
            code_chef: cc,
            leet_code: lc,
            code_forces: cf,
        }
    }

    #[test]
    fn test_composite_formula() {
        let score = composite_score(&ratings(Some(2000.0), Some(1500.0), Some(1800.0)));
        assert_relative_eq!(score, 4350.0, epsilon = 1e-9);
    }

    #[test]
    fn test_missing_ratings_count_as_zero() {
        assert_relative_eq!(composite_score(&ratings(None, None, Some(1800.0))), 1800.0);
        assert_relative_eq!(composite_score(&PlatformRatings::default()), 0.0);
    }

    #[test]
    fn test_floored_ratings() {
        let floored = ratings(Some(1511.9), Some(1650.4), None).floored();
        assert_eq!(floored, ratings(Some(1511.0), Some(1650.0), None));
    }

    #[test]
    fn test_rank_is_stable_and_nan_last() {
        let mut entries = vec![("a", 10.0), ("nan", f64::NAN), ("b", 30.0), ("c", 10.0)];

        rank_by_composite(&mut entries, |e| e.1);

        let names: Vec<_> = entries.iter().map(|e| e.0).collect();
        assert_eq!(names, vec!["b", "a", "c", "nan"]);
    }

    #[test]
    fn test_rank_by_daily_points() {
        let mut entries = vec![("a", 500u64), ("b", 1500), ("c", 500)];
        rank_by_daily_points(&mut entries, |e| e.1);
        let names: Vec<_> = entries.iter().map(|e| e.0).collect();
        assert_eq!(names, vec!["b", "a", "c"]);
    }

    #[test_case(Some(2100.0), RatingTier::Gold)]
    #[test_case(Some(1600.0), RatingTier::Purple)]
    #[test_case(Some(1350.0), RatingTier::Blue)]
    #[test_case(Some(900.0), RatingTier::Plain)]
    #[test_case(Some(0.0), RatingTier::None)]
    #[test_case(None, RatingTier::None)]
    fn test_rating_tiers(rating: Option<f64>, expected: RatingTier) {
        assert_eq!(RatingTier::for_rating(rating), expected);
    }
}
