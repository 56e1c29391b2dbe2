//! Client-side session guard: evidence storage and the mount-time state
//! machine.
//!
//! The guard is a UX gate, not a security boundary. It decides what a page
//! renders from client-held evidence and the asynchronously resolved
//! federated sign-in signal; it never re-validates server-side expiry.
//! Expiry is enforced only when the token is presented to a protected API.

pub mod evidence;
pub mod machine;

pub use evidence::{Evidence, EvidenceStore, MemoryEvidenceStore, SessionEvidence, StoredUser};
pub use machine::{FederatedSignOut, FederatedStatus, GuardState, RenderDecision, SessionGuard};
