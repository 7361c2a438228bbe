use chrono::{Duration, Utc};

use gym_coach::backend::memory::MemoryStore;
use gym_coach::backend::{DocumentStore, FieldValue, Fields};
use gym_coach::config::CollectionsConfig;
use gym_coach::models::{BodyArea, ProgressEntry, Role, ToFields, UserProfile};
use gym_coach::screens::injuries::InjuriesScreen;
use gym_coach::screens::progress::ProgressScreen;
use gym_coach::screens::record_injury::{self, InjuryForm};
use gym_coach::screens::routines::RoutinesScreen;
use gym_coach::screens::trainer::load_students;
use gym_coach::screens::{load, Alert, AlertKind, ListState};
use gym_coach::AppError;

fn collections() -> CollectionsConfig {
    CollectionsConfig::default()
}

#[tokio::test]
async fn test_empty_collections_show_empty_state() {
    let store = MemoryStore::new();
    let c = collections();

    let routines = load(&RoutinesScreen::new("%d/%m/%Y"), &store, &c, Some("s1")).await;
    let injuries = load(&InjuriesScreen::new("%d/%m/%Y"), &store, &c, Some("s1")).await;
    let progress = load(&ProgressScreen::new(Utc::now(), 4), &store, &c, Some("s1")).await;

    assert_eq!(
        routines,
        ListState::Empty {
            message: "No routines assigned yet.".to_string()
        }
    );
    assert!(matches!(injuries, ListState::Empty { .. }));
    assert!(matches!(progress, ListState::Empty { .. }));
}

#[tokio::test]
async fn test_unauthenticated_screen_issues_no_read() {
    let store = MemoryStore::new();

    let state = load(&RoutinesScreen::new("%d/%m/%Y"), &store, &collections(), None).await;

    assert_eq!(state, ListState::Unauthenticated);
    assert_eq!(store.read_count(), 0);
}

#[tokio::test]
async fn test_backend_failure_resolves_to_empty_state() {
    let store = MemoryStore::new();
    store.set_failing(true);

    let state = load(&InjuriesScreen::new("%d/%m/%Y"), &store, &collections(), Some("s1")).await;

    assert!(matches!(state, ListState::Empty { .. }));
    assert_eq!(store.read_count(), 1);
}

#[tokio::test]
async fn test_routines_are_scoped_to_owner() {
    let store = MemoryStore::new();
    let c = collections();
    let mut fields = Fields::new();
    fields.insert("routineName".to_string(), "Push".into());
    store.insert(&c.routines("s1").doc("r1"), fields.clone());
    store.insert(&c.routines("s2").doc("r2"), fields);

    let state = load(&RoutinesScreen::new("%d/%m/%Y"), &store, &c, Some("s1")).await;

    let items = state.items();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].id, "r1");
    assert_eq!(items[0].start_date, "date unavailable");
}

#[tokio::test]
async fn test_progress_screen_filters_and_aggregates() {
    let store = MemoryStore::new();
    let c = collections();
    let now = Utc::now();

    for (days_ago, area, volume) in [
        (1, BodyArea::Legs, 100.0),
        (2, BodyArea::Cardio, 30.0),
        (10, BodyArea::Strength, 50.0),
        (60, BodyArea::Legs, 999.0),
    ] {
        let entry = ProgressEntry::new(now - Duration::days(days_ago), area, volume);
        store
            .create_document(&c.progress("s1"), entry.to_fields())
            .await
            .unwrap();
    }
    // Entry without an area is skipped, not fatal
    let mut broken = Fields::new();
    broken.insert("date".to_string(), FieldValue::TimestampValue(now));
    store.insert(&c.progress("s1").doc("broken"), broken);

    let state = load(&ProgressScreen::new(now, 4), &store, &c, Some("s1")).await;

    let total: f64 = state.items().iter().map(|bucket| bucket.total).sum();
    assert_eq!(total, 180.0);
    for bucket in state.items() {
        let by_area: f64 = bucket.volumes.values().sum();
        assert_eq!(bucket.total, by_area);
    }
}

#[tokio::test]
async fn test_invalid_injury_issues_no_create() {
    let store = MemoryStore::new();
    let c = collections();

    let mut no_student = InjuryForm::new(None, "Sprained ankle", "");
    let mut no_description = InjuryForm::new(Some("s1"), "", "rest");

    for form in [&mut no_student, &mut no_description] {
        let result = record_injury::submit(&store, &c, form, Utc::now()).await;
        let alert = Alert::failure("Record injury", result.as_ref().unwrap_err());
        assert_eq!(alert.kind, AlertKind::Warning);
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    assert_eq!(store.write_count(), 0);
    assert_eq!(no_description.trainer_notes, "rest");
}

#[tokio::test]
async fn test_trainer_records_injury_for_assigned_student() {
    let store = MemoryStore::new();
    let c = collections();
    let mut trainer = UserProfile::new("t1", Role::Trainer);
    trainer.assign_student("s1");
    store.insert(&c.profile("t1"), trainer.to_fields());
    let mut student = UserProfile::new("s1", Role::Student);
    student.email = Some("ana@gym.test".to_string());
    store.insert(&c.profile("s1"), student.to_fields());

    let students = load_students(&store, &c, Some("t1")).await.unwrap();
    assert_eq!(students[0].label, "ana@gym.test");

    let mut form = InjuryForm::new(Some(students[0].id.as_str()), "Lower back pain", "");
    let result = record_injury::submit(&store, &c, &mut form, Utc::now()).await;
    assert!(Alert::from_result("Record injury", "Injury recorded.", &result).is_success());

    let injuries = load(&InjuriesScreen::new("%d/%m/%Y"), &store, &c, Some("s1")).await;
    let items = injuries.items();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].description, "Lower back pain");
    assert_eq!(items[0].status, "active");
    assert_eq!(items[0].notes, "no notes");
}
