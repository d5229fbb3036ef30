//! Post-authentication orchestration
//!
//! Drives a sign-in or sign-up attempt through credential verification and,
//! on success, the reconciliation that decides where the user lands: promote
//! anonymous work into a project, fall back to the most recent existing
//! project, or create a fresh one. Exactly one navigation target is emitted
//! per successful attempt.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use tracing::{error, info};

use crate::error::AuthError;
use crate::models::{AuthResult, NewProject};
use crate::stores::{AnonWorkStore, Clock, CredentialVerifier, Navigator, ProjectStore, SystemClock};

/// Which verification primitive an attempt goes through
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AuthKind {
    SignIn,
    SignUp,
}

impl AuthKind {
    fn label(&self) -> &'static str {
        match self {
            AuthKind::SignIn => "sign-in",
            AuthKind::SignUp => "sign-up",
        }
    }
}

/// Resets the loading flag when an attempt leaves the orchestrator, on
/// every exit path including propagated errors.
struct LoadingGuard<'a> {
    flag: &'a AtomicBool,
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

/// Orchestrates sign-in/sign-up attempts
///
/// All collaborators are injected at construction. The orchestrator does
/// not deduplicate concurrent submissions; the UI is expected to disable
/// its trigger while [`is_loading`](Self::is_loading) reports true.
#[derive(Clone)]
pub struct AuthOrchestrator {
    verifier: Arc<dyn CredentialVerifier>,
    anon_work: Arc<dyn AnonWorkStore>,
    projects: Arc<dyn ProjectStore>,
    navigator: Arc<dyn Navigator>,
    clock: Arc<dyn Clock>,
    loading: Arc<AtomicBool>,
    fallback_seq: Arc<AtomicU64>,
}

impl AuthOrchestrator {
    /// Create an orchestrator using the system clock
    pub fn new(
        verifier: Arc<dyn CredentialVerifier>,
        anon_work: Arc<dyn AnonWorkStore>,
        projects: Arc<dyn ProjectStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self::with_clock(verifier, anon_work, projects, navigator, Arc::new(SystemClock))
    }

    /// Create an orchestrator with an explicit clock
    pub fn with_clock(
        verifier: Arc<dyn CredentialVerifier>,
        anon_work: Arc<dyn AnonWorkStore>,
        projects: Arc<dyn ProjectStore>,
        navigator: Arc<dyn Navigator>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        // Seed the fallback-name counter from the clock so names stay
        // unique across orchestrator instances.
        let seed = clock.now().timestamp_millis().max(0) as u64;
        AuthOrchestrator {
            verifier,
            anon_work,
            projects,
            navigator,
            clock,
            loading: Arc::new(AtomicBool::new(false)),
            fallback_seq: Arc::new(AtomicU64::new(seed)),
        }
    }

    /// Whether an attempt is currently verifying or reconciling
    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst)
    }

    /// Run a sign-in attempt
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<AuthResult, AuthError> {
        self.authenticate(AuthKind::SignIn, email, password).await
    }

    /// Run a sign-up attempt
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<AuthResult, AuthError> {
        self.authenticate(AuthKind::SignUp, email, password).await
    }

    async fn authenticate(
        &self,
        kind: AuthKind,
        email: &str,
        password: &str,
    ) -> Result<AuthResult, AuthError> {
        info!("{} attempt for {}", kind.label(), email);

        self.loading.store(true, Ordering::SeqCst);
        let _loading = LoadingGuard {
            flag: &self.loading,
        };

        let result = match kind {
            AuthKind::SignIn => self.verifier.sign_in(email, password).await,
            AuthKind::SignUp => self.verifier.sign_up(email, password).await,
        }
        .map_err(|e| {
            error!("Credential verifier failed during {}: {}", kind.label(), e);
            AuthError::Store(e)
        })?;

        if !result.is_success() {
            // Expected outcome, returned to the caller unchanged. No store
            // is touched and nothing navigates.
            info!("{} rejected for {}", kind.label(), email);
            return Ok(result);
        }

        self.reconcile().await?;
        Ok(result)
    }

    /// Turn post-auth state into exactly one navigation target
    ///
    /// Steps run strictly in sequence: read the anonymous snapshot, promote
    /// it if it carries messages (create, then clear, then navigate);
    /// otherwise land on the most recent existing project; otherwise create
    /// a fresh one. A snapshot without messages is never promoted and never
    /// cleared.
    async fn reconcile(&self) -> Result<(), AuthError> {
        let anon = self.anon_work.get().await.map_err(AuthError::Store)?;

        if let Some(work) = anon {
            if work.has_messages() {
                let name = format!(
                    "Design from {}",
                    self.clock.now().format("%b %-d, %Y %H:%M")
                );
                info!("Promoting anonymous work into project \"{}\"", name);

                let project = self
                    .projects
                    .create_project(NewProject {
                        name,
                        messages: work.messages,
                        data: work.file_system_data,
                    })
                    .await
                    .map_err(|e| {
                        error!("Failed to promote anonymous work: {}", e);
                        AuthError::Store(e)
                    })?;

                self.anon_work.clear().await.map_err(AuthError::Store)?;
                self.navigator.navigate(&format!("/{}", project.id));
                return Ok(());
            }
        }

        let projects = self.projects.list_projects().await.map_err(AuthError::Store)?;
        if let Some(most_recent) = projects.first() {
            info!("Navigating to most recent project: {}", most_recent.id);
            self.navigator.navigate(&format!("/{}", most_recent.id));
            return Ok(());
        }

        let suffix = self.fallback_seq.fetch_add(1, Ordering::Relaxed);
        let name = format!("New Design #{}", suffix);
        info!("No projects yet, creating \"{}\"", name);

        let project = self
            .projects
            .create_project(NewProject::empty(name))
            .await
            .map_err(|e| {
                error!("Failed to create fallback project: {}", e);
                AuthError::Store(e)
            })?;

        self.navigator.navigate(&format!("/{}", project.id));
        Ok(())
    }
}
