//! Trainer dashboard: the trainer's assigned students

use futures::future::join_all;

use crate::backend::DocumentStore;
use crate::config::CollectionsConfig;
use crate::error::{AppError, Result};
use crate::models::{FromDocument, UserProfile};

use super::ListState;

/// Entry of a student picker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentOption {
    pub id: String,
    pub label: String,
}

impl From<&UserProfile> for StudentOption {
    fn from(profile: &UserProfile) -> Self {
        Self {
            id: profile.id.clone(),
            label: profile.label().to_string(),
        }
    }
}

/// Resolve the trainer's student list into picker entries.
///
/// Students whose profile is missing or unreadable are left out.
pub async fn load_students(
    store: &dyn DocumentStore,
    collections: &CollectionsConfig,
    trainer_id: Option<&str>,
) -> Result<Vec<StudentOption>> {
    let trainer_id = trainer_id
        .filter(|id| !id.is_empty())
        .ok_or(AppError::MissingTrainerId)?;

    let trainer = store
        .get_document(&collections.profile(trainer_id))
        .await?
        .ok_or(AppError::TrainerNotFound)?;
    let trainer = UserProfile::from_document(&trainer)?;

    let lookups = trainer.students.iter().map(|student_id| async move {
        let path = collections.profile(student_id);
        match store.get_document(&path).await {
            Ok(Some(doc)) => UserProfile::from_document(&doc).ok(),
            Ok(None) => {
                tracing::warn!("Assigned student {} has no profile", student_id);
                None
            }
            Err(e) => {
                tracing::warn!("Failed to load student {}: {}", student_id, e);
                None
            }
        }
    });

    let students = join_all(lookups)
        .await
        .iter()
        .flatten()
        .map(StudentOption::from)
        .collect();

    Ok(students)
}

/// Dashboard list; failures resolve to the empty state
pub async fn dashboard(
    store: &dyn DocumentStore,
    collections: &CollectionsConfig,
    trainer_id: Option<&str>,
) -> ListState<StudentOption> {
    if trainer_id.is_none() {
        return ListState::Unauthenticated;
    }

    match load_students(store, collections, trainer_id).await {
        Ok(students) => ListState::from_items(students, "No students assigned yet."),
        Err(e) => {
            tracing::warn!("Failed to load trainer dashboard: {}", e);
            ListState::empty("No students assigned yet.")
        }
    }
}
