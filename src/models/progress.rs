use chrono::{DateTime, Utc};

use super::{BodyArea, FromDocument, ToFields};
use crate::backend::{BackendError, Document, Fields, FieldsExt};

/// Training volume logged for a student on a given date
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressEntry {
    pub id: String,
    pub date: DateTime<Utc>,
    pub area: BodyArea,
    pub volume: f64,
}

impl ProgressEntry {
    pub fn new(date: DateTime<Utc>, area: BodyArea, volume: f64) -> Self {
        Self {
            id: String::new(),
            date,
            area,
            volume,
        }
    }
}

impl FromDocument for ProgressEntry {
    fn from_document(doc: &Document) -> Result<Self, BackendError> {
        let fields = &doc.fields;

        let date = fields
            .timestamp_field("date")
            .ok_or_else(|| BackendError::malformed(&doc.id, "progress entry without a date"))?;
        let area = fields
            .non_empty_str("area")
            .map(BodyArea::from_wire)
            .ok_or_else(|| BackendError::malformed(&doc.id, "progress entry without an area"))?;
        let volume = fields.f64_field("volume").unwrap_or(0.0);

        Ok(Self {
            id: doc.id.clone(),
            date,
            area,
            volume,
        })
    }
}

impl ToFields for ProgressEntry {
    fn to_fields(&self) -> Fields {
        let mut fields = Fields::new();
        fields.insert("date".to_string(), self.date.into());
        fields.insert("area".to_string(), self.area.as_wire().into());
        fields.insert("volume".to_string(), self.volume.into());
        fields
    }
}
