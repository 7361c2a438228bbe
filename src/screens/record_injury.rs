//! Injury recording by a trainer, and status changes of recorded injuries

use chrono::{DateTime, Utc};

use crate::backend::{DocumentStore, Fields};
use crate::config::CollectionsConfig;
use crate::error::{Result, ValidationError};
use crate::models::injury::FIELD_STATUS;
use crate::models::{InjuryStatus, NewInjury, ToFields};

/// Form state of the injury screen
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InjuryForm {
    pub student_id: Option<String>,
    pub description: String,
    pub trainer_notes: String,
}

impl InjuryForm {
    pub fn new(student_id: Option<&str>, description: &str, trainer_notes: &str) -> Self {
        Self {
            student_id: student_id.map(str::to_string),
            description: description.to_string(),
            trainer_notes: trainer_notes.to_string(),
        }
    }

    /// Target student and the injury to create
    pub fn validate(&self, now: DateTime<Utc>) -> Result<(String, NewInjury), ValidationError> {
        let student_id = self
            .student_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or(ValidationError::InjuryIncomplete)?;

        let description = self.description.trim();
        if description.is_empty() {
            return Err(ValidationError::InjuryIncomplete);
        }

        Ok((
            student_id.to_string(),
            NewInjury::new(description, &self.trainer_notes, now),
        ))
    }

    /// Reset the text inputs; the selected student stays
    pub fn clear_text(&mut self) {
        self.description.clear();
        self.trainer_notes.clear();
    }
}

/// Create the injury and clear the text inputs once the write succeeded.
/// Returns the new injury id.
pub async fn submit(
    store: &dyn DocumentStore,
    collections: &CollectionsConfig,
    form: &mut InjuryForm,
    now: DateTime<Utc>,
) -> Result<String> {
    let (student_id, injury) = form.validate(now)?;

    let id = store
        .create_document(&collections.injuries(&student_id), injury.to_fields())
        .await
        .map_err(|e| {
            tracing::error!("Error recording injury for {}: {}", student_id, e);
            e
        })?;

    tracing::info!("Recorded injury {} for student {}", id, student_id);
    form.clear_text();
    Ok(id)
}

/// Change the status of a recorded injury
pub async fn update_injury_status(
    store: &dyn DocumentStore,
    collections: &CollectionsConfig,
    student_id: &str,
    injury_id: &str,
    status: &InjuryStatus,
) -> Result<()> {
    let path = collections.injuries(student_id).doc(injury_id);
    let mut fields = Fields::new();
    fields.insert(FIELD_STATUS.to_string(), status.as_wire().into());

    store.update_fields(&path, fields).await?;
    tracing::info!("Injury {} is now {}", path, status);
    Ok(())
}
