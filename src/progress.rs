//! Weekly aggregation of progress entries for the progress charts

use chrono::{DateTime, Datelike, Duration, Local, NaiveDate, TimeZone, Utc};
use std::collections::BTreeMap;
use std::fmt;

use crate::models::{BodyArea, ProgressEntry};

/// Default reporting window of the progress screen
pub const DEFAULT_WINDOW_WEEKS: u32 = 4;

/// Longest reporting window accepted from config or the command line
pub const MAX_WINDOW_WEEKS: u32 = 520;

pub fn window(weeks: u32) -> Duration {
    Duration::weeks(i64::from(weeks))
}

/// Start of the window ending at `now`, saturating at the earliest representable instant
pub fn window_start(now: DateTime<Utc>, window: Duration) -> DateTime<Utc> {
    now.checked_sub_signed(window).unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Week number within the calendar year. Weeks start on Sunday and week 1 is
/// the (possibly partial) week containing January 1st.
pub fn week_of_year(date: NaiveDate) -> u32 {
    let ordinal0 = date.ordinal0();
    let weekday = date.weekday().num_days_from_sunday();
    let jan1_weekday = (weekday + 7 - ordinal0 % 7) % 7;
    (ordinal0 + jan1_weekday) / 7 + 1
}

/// Bucket key: calendar year and week number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WeekKey {
    pub year: i32,
    pub week: u32,
}

impl WeekKey {
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            week: week_of_year(date),
        }
    }
}

impl fmt::Display for WeekKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Week {}", self.week)
    }
}

/// Volume of one week, split by body area
#[derive(Debug, Clone, PartialEq)]
pub struct WeekBucket {
    pub key: WeekKey,
    pub volumes: BTreeMap<BodyArea, f64>,
    pub total: f64,
}

impl WeekBucket {
    fn new(key: WeekKey) -> Self {
        let volumes = BodyArea::STANDARD
            .iter()
            .cloned()
            .map(|area| (area, 0.0))
            .collect();

        Self {
            key,
            volumes,
            total: 0.0,
        }
    }

    pub fn volume(&self, area: &BodyArea) -> f64 {
        self.volumes.get(area).copied().unwrap_or(0.0)
    }

    pub fn label(&self) -> String {
        self.key.to_string()
    }
}

/// Group entries by week in the local time zone
pub fn aggregate_weekly(
    entries: &[ProgressEntry],
    now: DateTime<Utc>,
    window: Duration,
) -> Vec<WeekBucket> {
    aggregate_weekly_in(entries, now, window, &Local)
}

/// Group entries dated within `[now - window, now]` by week, summing volume per
/// area. Each bucket's total is the sum across its areas. Buckets come out in
/// chronological order.
pub fn aggregate_weekly_in<Tz: TimeZone>(
    entries: &[ProgressEntry],
    now: DateTime<Utc>,
    window: Duration,
    tz: &Tz,
) -> Vec<WeekBucket> {
    let start = window_start(now, window);
    let mut buckets: BTreeMap<WeekKey, WeekBucket> = BTreeMap::new();

    for entry in entries.iter().filter(|e| e.date >= start && e.date <= now) {
        let key = WeekKey::of(entry.date.with_timezone(tz).date_naive());
        let bucket = buckets.entry(key).or_insert_with(|| WeekBucket::new(key));
        *bucket.volumes.entry(entry.area.clone()).or_insert(0.0) += entry.volume;
    }

    buckets
        .into_values()
        .map(|mut bucket| {
            bucket.total = bucket.volumes.values().sum();
            bucket
        })
        .collect()
}

/// Chart series (label, value) of one area across the buckets
pub fn area_series(buckets: &[WeekBucket], area: &BodyArea) -> Vec<(String, f64)> {
    buckets
        .iter()
        .map(|bucket| (bucket.label(), bucket.volume(area)))
        .collect()
}

/// Chart series (label, total) across the buckets
pub fn total_series(buckets: &[WeekBucket]) -> Vec<(String, f64)> {
    buckets
        .iter()
        .map(|bucket| (bucket.label(), bucket.total))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_week_of_year_sunday_start() {
        // 2023-01-01 is a Sunday
        assert_eq!(week_of_year(day(2023, 1, 1)), 1);
        assert_eq!(week_of_year(day(2023, 1, 7)), 1);
        assert_eq!(week_of_year(day(2023, 1, 8)), 2);

        // 2022-01-01 is a Saturday, so Sunday the 2nd opens week 2
        assert_eq!(week_of_year(day(2022, 1, 1)), 1);
        assert_eq!(week_of_year(day(2022, 1, 2)), 2);
        assert_eq!(week_of_year(day(2024, 12, 31)), 53);
    }

    #[test]
    fn test_aggregate_groups_by_week_and_area() {
        let now = at(2024, 3, 20);
        let entries = vec![
            ProgressEntry::new(at(2024, 3, 11), BodyArea::Legs, 100.0),
            ProgressEntry::new(at(2024, 3, 12), BodyArea::Cardio, 30.0),
            ProgressEntry::new(at(2024, 3, 12), BodyArea::Legs, 50.0),
            ProgressEntry::new(at(2024, 3, 18), BodyArea::Strength, 80.0),
        ];

        let buckets = aggregate_weekly_in(&entries, now, window(4), &Utc);

        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[0].key, WeekKey { year: 2024, week: 11 });
        assert_eq!(buckets[0].volume(&BodyArea::Legs), 150.0);
        assert_eq!(buckets[0].volume(&BodyArea::Cardio), 30.0);
        assert_eq!(buckets[0].volume(&BodyArea::Strength), 0.0);
        assert_eq!(buckets[0].total, 180.0);
        assert_eq!(buckets[1].total, 80.0);
        assert_eq!(buckets[1].label(), "Week 12");
    }

    #[test]
    fn test_entries_outside_window_are_dropped() {
        let now = at(2024, 3, 29);
        let entries = vec![
            ProgressEntry::new(at(2024, 2, 1), BodyArea::Legs, 999.0),
            ProgressEntry::new(at(2024, 3, 2), BodyArea::Legs, 10.0),
            ProgressEntry::new(at(2024, 4, 5), BodyArea::Legs, 999.0),
        ];

        let buckets = aggregate_weekly_in(&entries, now, window(4), &Utc);
        let total: f64 = buckets.iter().map(|b| b.total).sum();
        assert_eq!(total, 10.0);
    }

    #[test]
    fn test_other_areas_count_toward_total() {
        let now = at(2024, 6, 10);
        let entries = vec![
            ProgressEntry::new(at(2024, 6, 9), BodyArea::Other("Core".to_string()), 12.0),
            ProgressEntry::new(at(2024, 6, 9), BodyArea::Cardio, 8.0),
        ];

        let buckets = aggregate_weekly_in(&entries, now, window(4), &Utc);
        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets[0].total, 20.0);
        assert_eq!(buckets[0].volumes.len(), 4);
    }

    #[test]
    fn test_series() {
        let now = at(2024, 3, 20);
        let entries = vec![ProgressEntry::new(at(2024, 3, 19), BodyArea::Cardio, 5.0)];
        let buckets = aggregate_weekly_in(&entries, now, window(4), &Utc);

        assert_eq!(total_series(&buckets), vec![("Week 12".to_string(), 5.0)]);
        assert_eq!(
            area_series(&buckets, &BodyArea::Strength),
            vec![("Week 12".to_string(), 0.0)]
        );
    }

    #[test]
    fn test_oversized_window_saturates() {
        let now = at(2024, 3, 20);
        let huge = window(u32::MAX);

        assert_eq!(window_start(now, huge), DateTime::<Utc>::MIN_UTC);

        let entries = vec![ProgressEntry::new(at(1990, 5, 1), BodyArea::Legs, 7.0)];
        let buckets = aggregate_weekly_in(&entries, now, huge, &Utc);
        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets[0].total, 7.0);
    }

    #[test]
    fn test_empty_input() {
        assert!(aggregate_weekly_in(&[], at(2024, 1, 1), window(4), &Utc).is_empty());
    }
}
