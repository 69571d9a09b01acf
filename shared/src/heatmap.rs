use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::activity::{ActivityRecord, UnifiedActivitySeries};
use crate::calendar::CalendarDay;

/// Months covered by one heatmap page.
pub const WINDOW_MONTHS: u32 = 9;

/// Merges per-platform series into one record per day, summing same-day values.
///
/// Absent series contribute nothing. Duplicate days inside a single series also sum.
pub fn combine<'a, I>(series: I) -> UnifiedActivitySeries
where
    I: IntoIterator<Item = Option<&'a [ActivityRecord]>>,
{
    merge_days(series.into_iter().flatten().flatten().copied())
}

/// Sums records by day. Output is ascending by date with unique days.
pub fn merge_days<I>(records: I) -> UnifiedActivitySeries
where
    I: IntoIterator<Item = ActivityRecord>,
{
    let mut by_day: BTreeMap<CalendarDay, u64> = BTreeMap::new();
    for record in records {
        let slot = by_day.entry(record.date).or_insert(0);
        *slot = slot.saturating_add(record.value);
    }

    UnifiedActivitySeries::from_sorted(
        by_day
            .into_iter()
            .map(|(date, value)| ActivityRecord::new(date, value))
            .collect(),
    )
}

/// Colour bucket for a day's count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeatmapIntensity {
    Empty,
    Scale1,
    Scale2,
    Scale3,
    Scale4,
}

impl HeatmapIntensity {
    pub fn for_count(count: u64) -> Self {
        match count {
            0 => HeatmapIntensity::Empty,
            1..=19 => HeatmapIntensity::Scale1,
            20..=39 => HeatmapIntensity::Scale2,
            40..=59 => HeatmapIntensity::Scale3,
            _ => HeatmapIntensity::Scale4,
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            HeatmapIntensity::Empty => "color-empty",
            HeatmapIntensity::Scale1 => "color-scale-1",
            HeatmapIntensity::Scale2 => "color-scale-2",
            HeatmapIntensity::Scale3 => "color-scale-3",
            HeatmapIntensity::Scale4 => "color-scale-4",
        }
    }
}

/// Inclusive day range shown on one heatmap page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeatmapWindow {
    pub start: CalendarDay,
    pub end: CalendarDay,
}

impl HeatmapWindow {
    /// Page `offset` counts back from `today` in nine-month steps; 0 is the current page.
    ///
    /// Returns `None` only if the range falls off the calendar.
    pub fn for_offset(today: CalendarDay, offset: u32) -> Option<Self> {
        let end = today.checked_sub_months(WINDOW_MONTHS.checked_mul(offset)?)?;
        let start = end.checked_sub_months(WINDOW_MONTHS)?;
        Some(Self { start, end })
    }

    pub fn contains(&self, day: CalendarDay) -> bool {
        self.start <= day && day <= self.end
    }
}

/// One active day on a heatmap page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeatmapCell {
    pub date: CalendarDay,
    pub count: u64,
    pub intensity: HeatmapIntensity,
    pub class_name: String,
}

/// The active days of a unified series that fall inside one window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeatmapPage {
    pub window: HeatmapWindow,
    pub cells: Vec<HeatmapCell>,
}

impl HeatmapPage {
    pub fn build(series: &UnifiedActivitySeries, window: HeatmapWindow) -> Self {
        let cells = series
            .within(&window)
            .records()
            .iter()
            .map(|r| {
                let intensity = HeatmapIntensity::for_count(r.value);
                HeatmapCell {
                    date: r.date,
                    count: r.value,
                    intensity,
                    class_name: intensity.css_class().to_string(),
                }
            })
            .collect();
        Self { window, cells }
    }
}

impl UnifiedActivitySeries {
    pub fn within(&self, window: &HeatmapWindow) -> UnifiedActivitySeries {
        UnifiedActivitySeries::from_sorted(
            self.records()
                .iter()
                .filter(|r| window.contains(r.date))
                .copied()
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use test_case::test_case;

    fn day(y: i32, m: u32, d: u32) -> CalendarDay {
        CalendarDay::from_ymd(y, m, d).unwrap()
    }

    fn rec(y: i32, m: u32, d: u32, value: u64) -> ActivityRecord {
        ActivityRecord::new(day(y, m, d), value)
    }

    #[test]
    fn test_same_day_merges_across_series() {
        let a = vec![rec(2024, 1, 1, 3)];
        let b = vec![rec(2024, 1, 1, 3)];

        let unified = combine([Some(&a[..]), Some(&b[..])]);

        assert_eq!(unified.records(), &[rec(2024, 1, 1, 6)]);
    }

    #[test]
    fn test_duplicate_days_within_one_series_sum() {
        let paged = vec![rec(2024, 2, 1, 2), rec(2024, 2, 1, 5), rec(2024, 1, 31, 1)];

        let unified = combine([Some(&paged[..])]);

        assert_eq!(unified.records(), &[rec(2024, 1, 31, 1), rec(2024, 2, 1, 7)]);
    }

    #[test]
    fn test_absent_platforms_contribute_nothing() {
        let codeforces = vec![rec(2024, 1, 1, 5)];

        let unified = combine([None, Some(&codeforces[..]), None]);

        assert_eq!(unified.records(), &[rec(2024, 1, 1, 5)]);
    }

    #[test]
    fn test_combine_nothing_is_empty() {
        let unified = combine(std::iter::empty::<Option<&[ActivityRecord]>>());
        assert!(unified.is_empty());
    }

    #[test_case(0, HeatmapIntensity::Empty)]
    #[test_case(1, HeatmapIntensity::Scale1)]
    #[test_case(19, HeatmapIntensity::Scale1)]
    #[test_case(20, HeatmapIntensity::Scale2)]
    #[test_case(45, HeatmapIntensity::Scale3)]
    #[test_case(60, HeatmapIntensity::Scale4)]
    fn test_intensity_buckets(count: u64, expected: HeatmapIntensity) {
        assert_eq!(HeatmapIntensity::for_count(count), expected);
    }

    #[test]
    fn test_window_offsets() {
        let today = day(2024, 10, 15);

        let current = HeatmapWindow::for_offset(today, 0).unwrap();
        assert_eq!(current.start, day(2024, 1, 15));
        assert_eq!(current.end, today);

        let previous = HeatmapWindow::for_offset(today, 1).unwrap();
        assert_eq!(previous.start, day(2023, 4, 15));
        assert_eq!(previous.end, day(2024, 1, 15));
    }

    #[test]
    fn test_within_window() {
        let unified = combine([Some(&[rec(2023, 12, 31, 1), rec(2024, 3, 1, 2), rec(2024, 11, 1, 4)][..])]);
        let window = HeatmapWindow::for_offset(day(2024, 10, 15), 0).unwrap();

        assert_eq!(unified.within(&window).records(), &[rec(2024, 3, 1, 2)]);
    }

    #[test]
    fn test_page_classifies_days_in_window() {
        let unified = combine([Some(&[rec(2023, 12, 31, 1), rec(2024, 3, 1, 25), rec(2024, 10, 15, 70)][..])]);
        let window = HeatmapWindow::for_offset(day(2024, 10, 15), 0).unwrap();

        let page = HeatmapPage::build(&unified, window);

        assert_eq!(page.window, window);
        let classes: Vec<(CalendarDay, &str)> = page.cells.iter().map(|c| (c.date, c.class_name.as_str())).collect();
        assert_eq!(
            classes,
            vec![(day(2024, 3, 1), "color-scale-2"), (day(2024, 10, 15), "color-scale-4")]
        );
        assert_eq!(page.cells[1].intensity, HeatmapIntensity::Scale4);
    }

    fn arb_series() -> impl Strategy<Value = Vec<ActivityRecord>> {
        prop::collection::vec((0i64..60, 0u64..100), 0..40).prop_map(|items| {
            items
                .into_iter()
                .map(|(offset, value)| {
                    ActivityRecord::new(
                        CalendarDay::from_date(day(2024, 1, 1).date() + chrono::Duration::days(offset)),
                        value,
                    )
                })
                .collect()
        })
    }

    proptest! {
        #[test]
        fn prop_combine_conserves_totals(series in prop::collection::vec(prop::option::of(arb_series()), 0..4)) {
            let expected: u64 = series.iter().flatten().flatten().map(|r| r.value).sum();
            let unified = combine(series.iter().map(|s| s.as_deref()));
            prop_assert_eq!(unified.total(), expected);
        }

        #[test]
        fn prop_combine_yields_unique_ascending_days(series in prop::collection::vec(arb_series(), 0..4)) {
            let unified = combine(series.iter().map(|s| Some(&s[..])));
            prop_assert!(unified.records().windows(2).all(|w| w[0].date < w[1].date));
        }
    }
}
