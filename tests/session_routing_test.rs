use std::sync::Arc;
use std::time::Duration;

use gym_coach::backend::memory::{MemoryAuth, MemoryStore};
use gym_coach::backend::{AuthProvider, AuthUser, Fields};
use gym_coach::config::CollectionsConfig;
use gym_coach::models::{Role, ToFields, UserProfile};
use gym_coach::router::{route, Route, Screen};
use gym_coach::session::{SessionContext, SessionState};
use pretty_assertions::assert_eq;

const SETTLE: Duration = Duration::from_secs(2);

struct Harness {
    auth: Arc<MemoryAuth>,
    store: Arc<MemoryStore>,
    collections: CollectionsConfig,
}

impl Harness {
    fn new() -> Self {
        Self {
            auth: Arc::new(MemoryAuth::new()),
            store: Arc::new(MemoryStore::new()),
            collections: CollectionsConfig::default(),
        }
    }

    fn with_profile(self, uid: &str, email: &str, role: &str) -> Self {
        self.auth.add_account(uid, email, "secret1");
        let mut fields = Fields::new();
        fields.insert("role".to_string(), role.into());
        fields.insert("email".to_string(), email.into());
        self.store.insert(&self.collections.profile(uid), fields);
        self
    }

    fn start(&self) -> SessionContext {
        SessionContext::start(
            self.auth.clone(),
            self.store.clone(),
            self.collections.clone(),
        )
    }
}

async fn wait_for_route(context: &SessionContext, predicate: impl Fn(&Route) -> bool) -> Route {
    let mut watch = context.watch();
    let state = tokio::time::timeout(SETTLE, watch.wait_for(|s| predicate(&route(s))))
        .await
        .expect("route did not settle")
        .expect("session listener stopped")
        .clone();
    route(&state)
}

#[tokio::test]
async fn test_starts_at_auth_flow_without_session() {
    let harness = Harness::new();
    let context = harness.start();

    let state = context.settled(SETTLE).await.unwrap();
    assert_eq!(route(&state), Route::Auth);
    assert_eq!(harness.store.read_count(), 0);
}

#[tokio::test]
async fn test_sign_in_mounts_role_tree() {
    let harness = Harness::new()
        .with_profile("t1", "marta@gym.test", "entrenador")
        .with_profile("a1", "admin@gym.test", "adminmaster");
    let context = harness.start();
    context.settled(SETTLE).await.unwrap();

    harness.auth.sign_in("marta@gym.test", "secret1").await.unwrap();
    let trainer = wait_for_route(&context, |r| matches!(r, Route::Trainer { .. })).await;
    assert_eq!(trainer.user_id(), Some("t1"));
    assert!(trainer.allows(Screen::RecordInjury));

    harness.auth.sign_in("admin@gym.test", "secret1").await.unwrap();
    let admin = wait_for_route(&context, |r| matches!(r, Route::Admin { .. })).await;
    assert!(admin.allows(Screen::AssignStudent));
    assert!(!admin.allows(Screen::RecordInjury));
}

#[tokio::test]
async fn test_missing_profile_shows_error_without_hanging() {
    let harness = Harness::new();
    harness.auth.add_account("ghost", "ghost@gym.test", "secret1");
    let context = harness.start();
    context.settled(SETTLE).await.unwrap();

    harness.auth.sign_in("ghost@gym.test", "secret1").await.unwrap();
    let route = wait_for_route(&context, |r| matches!(r, Route::ProfileError(_))).await;

    assert!(route.screens().is_empty());
    assert!(route.placeholder().unwrap().contains("ghost@gym.test"));
    assert!(harness.auth.current_user().is_some());
}

#[tokio::test]
async fn test_unknown_role_renders_placeholder() {
    let harness = Harness::new().with_profile("x1", "x@gym.test", "recepcionista");
    harness.auth.set_current(Some(AuthUser {
        uid: "x1".to_string(),
        email: None,
    }));
    let context = harness.start();

    let state = context.settled(SETTLE).await.unwrap();
    let route = route(&state);
    assert_eq!(route, Route::UnknownRole(Role::Unknown("recepcionista".to_string())));
    assert!(route.screens().is_empty());
}

#[tokio::test]
async fn test_backend_failure_renders_profile_error() {
    let harness = Harness::new().with_profile("s1", "ana@gym.test", "alumno");
    harness.store.set_failing(true);
    harness.auth.set_current(Some(AuthUser {
        uid: "s1".to_string(),
        email: None,
    }));
    let context = harness.start();

    let state = context.settled(SETTLE).await.unwrap();
    assert!(matches!(state, SessionState::ProfileUnavailable { .. }));
    assert!(matches!(route(&state), Route::ProfileError(_)));
}

#[tokio::test]
async fn test_sign_out_returns_to_auth_flow() {
    let harness = Harness::new();
    harness.auth.add_account("s1", "ana@gym.test", "secret1");
    harness.store.insert(
        &harness.collections.profile("s1"),
        UserProfile::new("s1", Role::Student).to_fields(),
    );
    let context = harness.start();
    context.settled(SETTLE).await.unwrap();

    harness.auth.sign_in("ana@gym.test", "secret1").await.unwrap();
    wait_for_route(&context, |r| matches!(r, Route::Student { .. })).await;

    harness.auth.sign_out().await.unwrap();
    let route = wait_for_route(&context, |r| *r == Route::Auth).await;
    assert_eq!(route, Route::Auth);
    assert_eq!(context.state().uid(), None);
}

#[tokio::test]
async fn test_shutdown_releases_subscription() {
    let harness = Harness::new().with_profile("s1", "ana@gym.test", "alumno");
    let mut context = harness.start();
    context.settled(SETTLE).await.unwrap();

    context.shutdown();
    assert!(!context.is_listening());

    let reads = harness.store.read_count();
    harness.auth.sign_in("ana@gym.test", "secret1").await.unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert_eq!(harness.store.read_count(), reads);
    assert_eq!(context.state(), SessionState::SignedOut);
}
