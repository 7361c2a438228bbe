use crate::backend::CollectionPath;
use crate::config::CollectionsConfig;
use crate::models::InjuryRecord;

use super::{display_date, OwnerScoped};

pub const NO_NOTES: &str = "no notes";

#[derive(Debug, Clone, PartialEq)]
pub struct InjuryView {
    pub id: String,
    pub description: String,
    pub date: String,
    pub status: String,
    pub notes: String,
}

/// Injury history of a student
#[derive(Debug, Clone)]
pub struct InjuriesScreen {
    pub date_format: String,
}

impl InjuriesScreen {
    pub fn new(date_format: impl Into<String>) -> Self {
        Self {
            date_format: date_format.into(),
        }
    }
}

impl OwnerScoped for InjuriesScreen {
    type Record = InjuryRecord;
    type View = InjuryView;

    fn empty_message(&self) -> &str {
        "No injuries recorded."
    }

    fn collection(&self, collections: &CollectionsConfig, owner_id: &str) -> CollectionPath {
        collections.injuries(owner_id)
    }

    fn present(&self, mut records: Vec<InjuryRecord>) -> Vec<InjuryView> {
        // Newest first; undated records last
        records.sort_by(|a, b| b.date.cmp(&a.date));

        records
            .into_iter()
            .map(|injury| InjuryView {
                date: display_date(injury.date, &self.date_format),
                status: injury.status.to_string(),
                notes: injury.trainer_notes.unwrap_or_else(|| NO_NOTES.to_string()),
                description: injury.description,
                id: injury.id,
            })
            .collect()
    }
}
