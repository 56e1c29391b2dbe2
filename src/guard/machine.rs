//! The mount-time guard state machine.

use std::time::Duration;
use tokio::sync::watch;

use super::evidence::{Evidence, SessionEvidence};

/// Where the guard ends up for a page load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardState {
    /// Initial state; federated resolution may still be pending.
    Unknown,
    Authenticated(Evidence),
    Unauthenticated,
}

/// What the page should show for a given guard state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderDecision {
    Loading,
    Protected,
    RedirectToSignIn,
}

impl GuardState {
    /// `Unknown` must never render protected content.
    #[must_use]
    pub fn render(&self) -> RenderDecision {
        match self {
            Self::Unknown => RenderDecision::Loading,
            Self::Authenticated(_) => RenderDecision::Protected,
            Self::Unauthenticated => RenderDecision::RedirectToSignIn,
        }
    }
}

/// Externally resolved federated sign-in state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FederatedStatus {
    /// The identity provider has not answered yet.
    Resolving,
    /// A federated session exists; carries the same evidence shape as a
    /// local login.
    SignedIn(Evidence),
    SignedOut,
}

/// Best-effort hook to end the provider-side session on logout.
pub trait FederatedSignOut: Send + Sync {
    fn sign_out(&self);
}

/// Decides, once per page load, whether the protected view renders.
pub struct SessionGuard {
    evidence: SessionEvidence,
    federated_wait: Duration,
}

impl SessionGuard {
    #[must_use]
    pub fn new(evidence: SessionEvidence, federated_wait: Duration) -> Self {
        Self {
            evidence,
            federated_wait,
        }
    }

    #[must_use]
    pub fn evidence(&self) -> &SessionEvidence {
        &self.evidence
    }

    /// Resolve the mount-time state.
    ///
    /// While the federated signal is `Resolving` the guard stays `Unknown`
    /// (rendered as a loading state), up to the bounded wait. A federated
    /// session takes precedence over stored evidence and is written back
    /// durably, so later loads look exactly like a local login. When the
    /// signal says `SignedOut`, the wait elapses, or the signal source goes
    /// away, stored evidence decides; no evidence means `Unauthenticated`.
    pub async fn resolve(&self, federated: &mut watch::Receiver<FederatedStatus>) -> GuardState {
        let deadline = tokio::time::Instant::now() + self.federated_wait;
        loop {
            let status = federated.borrow_and_update().clone();
            match status {
                FederatedStatus::SignedIn(evidence) => {
                    self.evidence.store(&evidence, true);
                    return GuardState::Authenticated(evidence);
                }
                FederatedStatus::SignedOut => {
                    return self.from_stored_evidence();
                }
                FederatedStatus::Resolving => {
                    match tokio::time::timeout_at(deadline, federated.changed()).await {
                        Ok(Ok(())) => {}
                        // Sender dropped or wait exhausted.
                        Ok(Err(_)) | Err(_) => return self.from_stored_evidence(),
                    }
                }
            }
        }
    }

    fn from_stored_evidence(&self) -> GuardState {
        match self.evidence.load() {
            Some(evidence) => GuardState::Authenticated(evidence),
            None => GuardState::Unauthenticated,
        }
    }

    /// Clear client-held evidence and end the provider session best-effort.
    ///
    /// The server-side session record is left untouched and expires on its
    /// own schedule.
    pub fn logout(&self, federated: Option<&dyn FederatedSignOut>) -> GuardState {
        self.evidence.clear();
        if let Some(hook) = federated {
            hook.sign_out();
        }
        GuardState::Unauthenticated
    }
}
