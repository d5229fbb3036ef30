//! End-to-end tests for the sign-in flow
//!
//! These tests compose the session issuer and the auth orchestrator the way
//! the application's server action does: the credential verifier issues the
//! session cookie on success, then the orchestrator reconciles anonymous
//! work and existing projects into a single navigation target.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, Once};

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;

use studio_auth::config::{Environment, SessionConfig};
use studio_auth::models::{
    AnonWork, AuthResult, ChatMessage, FileSystemSnapshot, MessageRole, NewProject, Project,
};
use studio_auth::orchestrator::AuthOrchestrator;
use studio_auth::session::{CookieAttributes, SESSION_COOKIE, SessionIssuer};
use studio_auth::stores::{AnonWorkStore, CookieStore, CredentialVerifier, Navigator, ProjectStore};

fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .init();
    });
}

#[derive(Default)]
struct InMemoryCookieJar {
    cookies: Mutex<HashMap<String, (String, CookieAttributes)>>,
}

impl InMemoryCookieJar {
    fn value_of(&self, name: &str) -> Option<String> {
        self.cookies
            .lock()
            .unwrap()
            .get(name)
            .map(|(value, _)| value.clone())
    }
}

#[async_trait]
impl CookieStore for InMemoryCookieJar {
    async fn set(&self, name: &str, value: &str, attributes: CookieAttributes) -> Result<()> {
        self.cookies
            .lock()
            .unwrap()
            .insert(name.to_string(), (value.to_string(), attributes));
        Ok(())
    }

    async fn get(&self, name: &str) -> Result<Option<String>> {
        Ok(self.value_of(name))
    }

    async fn delete(&self, name: &str) -> Result<()> {
        self.cookies.lock().unwrap().remove(name);
        Ok(())
    }
}

/// Verifier with a single registered account; issues the session cookie on
/// success, like the real sign-in/sign-up server action
struct IssuingVerifier {
    issuer: SessionIssuer,
    user_id: String,
    email: String,
    password: String,
}

#[async_trait]
impl CredentialVerifier for IssuingVerifier {
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthResult> {
        if email != self.email || password != self.password {
            return Ok(AuthResult::failure("Invalid credentials"));
        }
        self.issuer.create_session(&self.user_id, email).await?;
        Ok(AuthResult::Success)
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<AuthResult> {
        if email == self.email {
            return Ok(AuthResult::failure("Email already exists"));
        }
        let _ = password;
        self.issuer.create_session("user-new", email).await?;
        Ok(AuthResult::Success)
    }
}

#[derive(Default)]
struct InMemoryAnonStore {
    work: Mutex<Option<AnonWork>>,
}

#[async_trait]
impl AnonWorkStore for InMemoryAnonStore {
    async fn get(&self) -> Result<Option<AnonWork>> {
        Ok(self.work.lock().unwrap().clone())
    }

    async fn clear(&self) -> Result<()> {
        *self.work.lock().unwrap() = None;
        Ok(())
    }
}

/// Project store keeping projects most-recently-created first
struct InMemoryProjectStore {
    projects: Mutex<Vec<Project>>,
    next_id: AtomicU64,
}

impl InMemoryProjectStore {
    fn starting_at(next_id: u64) -> Self {
        InMemoryProjectStore {
            projects: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(next_id),
        }
    }

    fn seeded(ids: &[&str]) -> Self {
        let projects = ids
            .iter()
            .map(|id| Project {
                id: id.to_string(),
                name: id.to_string(),
                messages: vec![],
                data: FileSystemSnapshot::new(),
                created_at: Utc::now(),
                updated_at: Utc::now(),
            })
            .collect();
        InMemoryProjectStore {
            projects: Mutex::new(projects),
            next_id: AtomicU64::new(1),
        }
    }
}

#[async_trait]
impl ProjectStore for InMemoryProjectStore {
    async fn list_projects(&self) -> Result<Vec<Project>> {
        Ok(self.projects.lock().unwrap().clone())
    }

    async fn create_project(&self, new_project: NewProject) -> Result<Project> {
        let id = format!("p{}", self.next_id.fetch_add(1, Ordering::SeqCst));
        let project = Project {
            id,
            name: new_project.name,
            messages: new_project.messages,
            data: new_project.data,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        self.projects.lock().unwrap().insert(0, project.clone());
        Ok(project)
    }
}

#[derive(Default)]
struct RecordingNavigator {
    paths: Mutex<Vec<String>>,
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, path: &str) {
        self.paths.lock().unwrap().push(path.to_string());
    }
}

struct Harness {
    jar: Arc<InMemoryCookieJar>,
    issuer: SessionIssuer,
    anon: Arc<InMemoryAnonStore>,
    projects: Arc<InMemoryProjectStore>,
    navigator: Arc<RecordingNavigator>,
    orchestrator: AuthOrchestrator,
}

fn harness(projects: InMemoryProjectStore) -> Harness {
    init_tracing();

    let jar = Arc::new(InMemoryCookieJar::default());
    let config = SessionConfig::new("integration-secret", Environment::Development);
    let issuer = SessionIssuer::new(&config, jar.clone());

    let verifier = Arc::new(IssuingVerifier {
        issuer: issuer.clone(),
        user_id: "user-123".to_string(),
        email: "a@x.com".to_string(),
        password: "pw".to_string(),
    });
    let anon = Arc::new(InMemoryAnonStore::default());
    let projects = Arc::new(projects);
    let navigator = Arc::new(RecordingNavigator::default());
    let orchestrator = AuthOrchestrator::new(
        verifier,
        anon.clone(),
        projects.clone(),
        navigator.clone(),
    );

    Harness {
        jar,
        issuer,
        anon,
        projects,
        navigator,
        orchestrator,
    }
}

#[tokio::test]
async fn first_sign_in_creates_a_project_and_a_session() {
    let h = harness(InMemoryProjectStore::starting_at(9));

    let result = h.orchestrator.sign_in("a@x.com", "pw").await.unwrap();

    assert_eq!(result, AuthResult::Success);
    assert!(!h.orchestrator.is_loading());
    assert_eq!(*h.navigator.paths.lock().unwrap(), vec!["/p9"]);

    // The verifier issued the session before reconciliation ran.
    assert!(h.jar.value_of(SESSION_COOKIE).is_some());
    let claims = h.issuer.current_session().await.unwrap().unwrap();
    assert_eq!(claims.user_id, "user-123");
    assert_eq!(claims.email, "a@x.com");
}

#[tokio::test]
async fn rejected_credentials_leave_no_trace() {
    let h = harness(InMemoryProjectStore::seeded(&["p1"]));

    let result = h.orchestrator.sign_in("a@x.com", "wrong").await.unwrap();

    assert_eq!(result, AuthResult::failure("Invalid credentials"));
    assert!(h.jar.value_of(SESSION_COOKIE).is_none());
    assert!(h.navigator.paths.lock().unwrap().is_empty());
    assert!(!h.orchestrator.is_loading());
}

#[tokio::test]
async fn anonymous_work_survives_into_the_new_account() {
    let h = harness(InMemoryProjectStore::starting_at(1));

    let mut data = FileSystemSnapshot::new();
    data.insert(
        "/App.jsx".to_string(),
        serde_json::json!({"content": "export default function App() {}"}),
    );
    let messages = vec![
        ChatMessage::new(MessageRole::User, "build a pricing page"),
        ChatMessage::new(MessageRole::Assistant, "Done, take a look."),
    ];
    *h.anon.work.lock().unwrap() = Some(AnonWork {
        messages: messages.clone(),
        file_system_data: data.clone(),
    });

    let result = h.orchestrator.sign_up("new@x.com", "pw2").await.unwrap();

    assert_eq!(result, AuthResult::Success);
    let stored = h.projects.projects.lock().unwrap();
    assert_eq!(stored.len(), 1);
    assert!(stored[0].name.starts_with("Design from "));
    assert_eq!(stored[0].messages, messages);
    assert_eq!(stored[0].data, data);
    drop(stored);

    // Snapshot consumed, user landed on the promoted project.
    assert!(h.anon.work.lock().unwrap().is_none());
    assert_eq!(*h.navigator.paths.lock().unwrap(), vec!["/p1"]);
    assert!(h.jar.value_of(SESSION_COOKIE).is_some());
}

#[tokio::test]
async fn returning_user_lands_on_their_most_recent_project() {
    let h = harness(InMemoryProjectStore::seeded(&["recent", "older"]));

    h.orchestrator.sign_in("a@x.com", "pw").await.unwrap();

    assert_eq!(*h.navigator.paths.lock().unwrap(), vec!["/recent"]);
    // No new project was created on this path.
    assert_eq!(h.projects.projects.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn duplicate_sign_up_is_rejected_without_side_effects() {
    let h = harness(InMemoryProjectStore::starting_at(1));

    let result = h.orchestrator.sign_up("a@x.com", "pw").await.unwrap();

    assert_eq!(result, AuthResult::failure("Email already exists"));
    assert!(h.jar.value_of(SESSION_COOKIE).is_none());
    assert!(h.projects.projects.lock().unwrap().is_empty());
    assert!(h.navigator.paths.lock().unwrap().is_empty());
}
