//! Administrator screens: overview, trainer registration, student assignment

use futures::future::join_all;

use crate::backend::{AuthProvider, DocumentStore, FieldFilter, FilterOp, Fields};
use crate::config::CollectionsConfig;
use crate::error::{AppError, Result, ValidationError};
use crate::models::profile::{FIELD_ROLE, FIELD_STUDENTS};
use crate::models::{FromDocument, Role, UserProfile};

use super::auth::{create_profile, RegisterForm};
use super::ListState;

/// Profiles holding `role` under any of its stored spellings. Failures
/// resolve to the empty state.
pub async fn list_by_role(
    store: &dyn DocumentStore,
    collections: &CollectionsConfig,
    role: &Role,
) -> ListState<UserProfile> {
    let empty = format!("No {}s registered.", role);
    let users = collections.users();
    let filters: Vec<FieldFilter> = role
        .wire_spellings()
        .into_iter()
        .map(|spelling| FieldFilter::new(FIELD_ROLE, FilterOp::Equal, spelling))
        .collect();
    let results =
        join_all(filters.iter().map(|filter| store.query_documents(&users, filter))).await;

    let mut profiles: Vec<UserProfile> = Vec::new();
    let mut failures = 0;
    for result in results {
        match result {
            Ok(documents) => profiles.extend(
                documents.iter().filter_map(|doc| UserProfile::from_document(doc).ok()),
            ),
            Err(e) => {
                tracing::warn!("Failed to list {}s: {}", role, e);
                failures += 1;
            }
        }
    }
    if failures == filters.len() {
        return ListState::empty(empty);
    }

    profiles.sort_by(|a, b| a.label().to_lowercase().cmp(&b.label().to_lowercase()));
    profiles.dedup_by(|a, b| a.id == b.id);
    ListState::from_items(profiles, &empty)
}

#[derive(Debug, Clone, PartialEq)]
pub struct Overview {
    pub trainers: ListState<UserProfile>,
    pub students: ListState<UserProfile>,
}

impl Overview {
    /// Students not assigned to any listed trainer
    pub fn unassigned_students(&self) -> Vec<&UserProfile> {
        self.students
            .items()
            .iter()
            .filter(|student| {
                !self
                    .trainers
                    .items()
                    .iter()
                    .any(|trainer| trainer.students.contains(&student.id))
            })
            .collect()
    }
}

pub async fn overview(store: &dyn DocumentStore, collections: &CollectionsConfig) -> Overview {
    let (trainers, students) = tokio::join!(
        list_by_role(store, collections, &Role::Trainer),
        list_by_role(store, collections, &Role::Student),
    );
    Overview { trainers, students }
}

/// Create a trainer account and profile without leaving the admin session
pub async fn register_trainer(
    auth: &dyn AuthProvider,
    store: &dyn DocumentStore,
    collections: &CollectionsConfig,
    form: &RegisterForm,
) -> Result<UserProfile> {
    create_profile(auth, store, collections, form, Role::Trainer).await
}

/// Append a student to a trainer's list. Returns false when the student was
/// already assigned, in which case nothing is written.
pub async fn assign_student(
    store: &dyn DocumentStore,
    collections: &CollectionsConfig,
    trainer_id: &str,
    student_id: &str,
) -> Result<bool> {
    let (trainer_id, student_id) = (trainer_id.trim(), student_id.trim());
    if trainer_id.is_empty() || student_id.is_empty() {
        return Err(ValidationError::AssignmentIncomplete.into());
    }

    let path = collections.profile(trainer_id);
    let document = store
        .get_document(&path)
        .await?
        .ok_or(AppError::TrainerNotFound)?;
    let mut trainer = UserProfile::from_document(&document)?;

    if trainer.resolved_role() != Role::Trainer {
        return Err(AppError::TrainerNotFound);
    }
    if store
        .get_document(&collections.profile(student_id))
        .await?
        .is_none()
    {
        return Err(AppError::ProfileNotFound(student_id.to_string()));
    }

    if !trainer.assign_student(student_id) {
        tracing::info!("Student {} already assigned to {}", student_id, trainer_id);
        return Ok(false);
    }

    let mut fields = Fields::new();
    fields.insert(FIELD_STUDENTS.to_string(), trainer.students_field());
    store.update_fields(&path, fields).await?;

    tracing::info!("Assigned student {} to trainer {}", student_id, trainer_id);
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::memory::{MemoryAuth, MemoryStore};
    use crate::backend::FieldValue;
    use crate::models::ToFields;

    fn seed() -> (MemoryStore, CollectionsConfig) {
        let store = MemoryStore::new();
        let collections = CollectionsConfig::default();
        for (id, role) in [("t1", Role::Trainer), ("s1", Role::Student), ("s2", Role::Student)] {
            store.insert(&collections.profile(id), UserProfile::new(id, role).to_fields());
        }
        (store, collections)
    }

    #[tokio::test]
    async fn test_assign_student_once() {
        let (store, collections) = seed();

        assert!(assign_student(&store, &collections, "t1", "s1").await.unwrap());
        let writes = store.write_count();
        assert!(!assign_student(&store, &collections, "t1", "s1").await.unwrap());
        assert_eq!(store.write_count(), writes);

        let doc = store.get_document(&collections.profile("t1")).await.unwrap().unwrap();
        assert_eq!(UserProfile::from_document(&doc).unwrap().students, vec!["s1"]);
    }

    #[tokio::test]
    async fn test_assign_rejects_bad_targets() {
        let (store, collections) = seed();

        assert_eq!(
            assign_student(&store, &collections, "", "s1").await,
            Err(AppError::Validation(ValidationError::AssignmentIncomplete))
        );
        assert_eq!(
            assign_student(&store, &collections, "s2", "s1").await,
            Err(AppError::TrainerNotFound)
        );
        assert_eq!(
            assign_student(&store, &collections, "t1", "nobody").await,
            Err(AppError::ProfileNotFound("nobody".to_string()))
        );
    }

    #[tokio::test]
    async fn test_overview() {
        let (store, collections) = seed();
        assign_student(&store, &collections, "t1", "s2").await.unwrap();

        let overview = overview(&store, &collections).await;
        assert_eq!(overview.trainers.items().len(), 1);
        assert_eq!(overview.students.items().len(), 2);
        let unassigned = overview.unassigned_students();
        assert_eq!(unassigned.len(), 1);
        assert_eq!(unassigned[0].id, "s1");
    }

    #[tokio::test]
    async fn test_overview_includes_english_role_spellings() {
        let (store, collections) = seed();
        let mut fields = UserProfile::new("s3", Role::Student).to_fields();
        fields.insert(FIELD_ROLE.to_string(), FieldValue::from("student"));
        store.insert(&collections.profile("s3"), fields);

        let students = list_by_role(&store, &collections, &Role::Student).await;
        let mut ids: Vec<&str> = students.items().iter().map(|p| p.id.as_str()).collect();
        ids.sort();
        assert_eq!(ids, vec!["s1", "s2", "s3"]);
    }

    #[tokio::test]
    async fn test_register_trainer_keeps_admin_session() {
        let (store, collections) = seed();
        let auth = MemoryAuth::new();
        auth.add_account("a1", "admin@gym.test", "adminpw");
        auth.sign_in("admin@gym.test", "adminpw").await.unwrap();

        let form = RegisterForm {
            name: "Marta".to_string(),
            email: "marta@gym.test".to_string(),
            password: "secret1".to_string(),
        };
        let trainer = register_trainer(&auth, &store, &collections, &form).await.unwrap();

        assert_eq!(trainer.role, Some(Role::Trainer));
        assert_eq!(auth.current_user().map(|u| u.uid), Some("a1".to_string()));
        assert_eq!(
            list_by_role(&store, &collections, &Role::Trainer).await.items().len(),
            2
        );
    }
}
