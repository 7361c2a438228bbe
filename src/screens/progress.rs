use chrono::{DateTime, Utc};

use crate::backend::{CollectionPath, FieldFilter, FilterOp};
use crate::config::CollectionsConfig;
use crate::models::ProgressEntry;
use crate::progress::{self, aggregate_weekly, window, WeekBucket};

use super::OwnerScoped;

/// Weekly progress charts of a student
#[derive(Debug, Clone)]
pub struct ProgressScreen {
    pub now: DateTime<Utc>,
    pub window_weeks: u32,
}

impl ProgressScreen {
    pub fn new(now: DateTime<Utc>, window_weeks: u32) -> Self {
        Self { now, window_weeks }
    }

    pub fn window_start(&self) -> DateTime<Utc> {
        progress::window_start(self.now, window(self.window_weeks))
    }
}

impl OwnerScoped for ProgressScreen {
    type Record = ProgressEntry;
    type View = WeekBucket;

    fn empty_message(&self) -> &str {
        "No progress logged in the last weeks."
    }

    fn collection(&self, collections: &CollectionsConfig, owner_id: &str) -> CollectionPath {
        collections.progress(owner_id)
    }

    fn filter(&self) -> Option<FieldFilter> {
        Some(FieldFilter::new(
            "date",
            FilterOp::GreaterThanOrEqual,
            self.window_start(),
        ))
    }

    fn present(&self, records: Vec<ProgressEntry>) -> Vec<WeekBucket> {
        aggregate_weekly(&records, self.now, window(self.window_weeks))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::FieldValue;
    use chrono::Duration;

    #[test]
    fn test_filter_starts_at_window() {
        let now = Utc::now();
        let screen = ProgressScreen::new(now, 4);
        let filter = screen.filter().unwrap();

        assert_eq!(filter.field, "date");
        assert_eq!(filter.op, FilterOp::GreaterThanOrEqual);
        assert_eq!(
            filter.value,
            FieldValue::TimestampValue(now - Duration::weeks(4))
        );
    }

    #[test]
    fn test_huge_window_starts_at_earliest_instant() {
        let screen = ProgressScreen::new(Utc::now(), 20_000_000);
        assert_eq!(screen.window_start(), DateTime::<Utc>::MIN_UTC);
    }
}
