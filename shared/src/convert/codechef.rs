use super::{rating_series_or_empty, series_or_absent, PlatformConversion, PlatformScalars, RatingPoint, RatingSnapshot};
use crate::activity::{ActivityRecord, ActivitySeries};
use crate::calendar::normalize;
use crate::error::Result;
use crate::heatmap::merge_days;
use crate::models::platform::{CodeChefPayload, CodeChefProfile, Platform};

const UNRANKED: &str = "NONE";

/// The profile API already aggregates per day; dates are re-keyed and duplicates summed.
/// A missing heat map is an empty series.
pub fn heat_map(profile: &CodeChefProfile) -> Result<ActivitySeries> {
    let entries = profile.heat_map.as_deref().unwrap_or_default();
    let records = entries
        .iter()
        .map(|entry| Ok(ActivityRecord::new(normalize(&entry.date)?, entry.value.as_count()?)))
        .collect::<Result<Vec<_>>>()?;
    Ok(merge_days(records).into_records())
}

/// Rated contests that carry an end date, in the order the API lists them.
pub fn rating_series(profile: &CodeChefProfile) -> Result<Vec<RatingPoint>> {
    profile
        .rating_data
        .as_deref()
        .unwrap_or_default()
        .iter()
        .filter_map(|entry| entry.end_date.as_ref().map(|end| (entry, end)))
        .map(|(entry, end)| {
            Ok(RatingPoint {
                date: normalize(end)?,
                rating: entry.rating.as_f64()?,
                label: entry.name.clone(),
            })
        })
        .collect()
}

pub fn rating_snapshot(profile: &CodeChefProfile) -> RatingSnapshot {
    let current = profile.current_rating.unwrap_or(0.0);
    RatingSnapshot {
        current,
        highest: profile.highest_rating.unwrap_or(current),
        rank_or_badge: profile
            .stars
            .clone()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| UNRANKED.to_string()),
    }
}

pub fn current_rating(profile: &CodeChefProfile) -> Option<f64> {
    profile.current_rating
}

pub fn convert(payload: &CodeChefPayload) -> Result<PlatformConversion> {
    let default_profile = CodeChefProfile::default();
    let profile = payload.profile.as_ref().unwrap_or(&default_profile);

    Ok(PlatformConversion {
        platform: Platform::CodeChef,
        activity: series_or_absent(Platform::CodeChef, heat_map(profile).map(Some)),
        scalars: PlatformScalars {
            solved: payload.problems_solved,
            contests: profile.rating_data.as_ref().map_or(0, |r| r.len() as u64),
            rating: payload.profile.as_ref().map(rating_snapshot),
            rating_series: rating_series_or_empty(Platform::CodeChef, rating_series(profile)),
            badges: Vec::new(),
        },
    })
}
