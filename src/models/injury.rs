use chrono::{DateTime, Utc};
use std::fmt;

use super::{FromDocument, ToFields};
use crate::backend::{BackendError, Document, Fields, FieldsExt};

pub const FIELD_STATUS: &str = "status";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InjuryStatus {
    Active,
    Resolved,
    Other(String),
}

impl InjuryStatus {
    pub fn from_wire(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "activa" | "active" => InjuryStatus::Active,
            "resuelta" | "resolved" => InjuryStatus::Resolved,
            _ => InjuryStatus::Other(value.to_string()),
        }
    }

    pub fn as_wire(&self) -> &str {
        match self {
            InjuryStatus::Active => "Activa",
            InjuryStatus::Resolved => "Resuelta",
            InjuryStatus::Other(raw) => raw,
        }
    }
}

impl fmt::Display for InjuryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InjuryStatus::Active => write!(f, "active"),
            InjuryStatus::Resolved => write!(f, "resolved"),
            InjuryStatus::Other(raw) => write!(f, "{}", raw),
        }
    }
}

/// Injury recorded by a trainer against a student
#[derive(Debug, Clone, PartialEq)]
pub struct InjuryRecord {
    pub id: String,
    pub description: String,
    pub date: Option<DateTime<Utc>>,
    pub status: InjuryStatus,
    pub trainer_notes: Option<String>,
}

impl FromDocument for InjuryRecord {
    fn from_document(doc: &Document) -> Result<Self, BackendError> {
        let fields = &doc.fields;

        Ok(Self {
            id: doc.id.clone(),
            description: fields.str_field("description").unwrap_or_default().to_string(),
            date: fields.timestamp_field("date"),
            status: fields
                .str_field(FIELD_STATUS)
                .map(InjuryStatus::from_wire)
                .unwrap_or(InjuryStatus::Active),
            trainer_notes: fields.non_empty_str("trainerNotes").map(str::to_string),
        })
    }
}

/// Injury about to be created
#[derive(Debug, Clone, PartialEq)]
pub struct NewInjury {
    pub description: String,
    pub trainer_notes: String,
    pub date: DateTime<Utc>,
    pub status: InjuryStatus,
}

impl NewInjury {
    /// New injuries always start active
    pub fn new(description: &str, trainer_notes: &str, date: DateTime<Utc>) -> Self {
        Self {
            description: description.to_string(),
            trainer_notes: trainer_notes.trim().to_string(),
            date,
            status: InjuryStatus::Active,
        }
    }
}

impl ToFields for NewInjury {
    fn to_fields(&self) -> Fields {
        let mut fields = Fields::new();
        fields.insert("description".to_string(), self.description.as_str().into());
        fields.insert("date".to_string(), self.date.into());
        fields.insert(FIELD_STATUS.to_string(), self.status.as_wire().into());
        fields.insert("trainerNotes".to_string(), self.trainer_notes.as_str().into());
        fields
    }
}
