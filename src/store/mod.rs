//! Storage seams for the login relay
//!
//! The relay, the resolver, and the provisioning layer all talk to storage
//! through the traits in this module, so the in-process [`MemoryStore`] can
//! be swapped for a real document store without touching the protocol code.
//! Every collaborator interface the core consumes lives here: session
//! records, partner registrations, the user's credential vault, and the
//! site-account verification source.

pub mod memory;

pub use memory::MemoryStore;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{LoginSession, StoredCredential};

#[derive(Debug, Error)]
pub enum StoreError {
    /// Insert hit the token uniqueness constraint. Practically improbable
    /// at the configured entropy, but never silently ignored.
    #[error("a session with this token already exists")]
    DuplicateToken,
    #[error("no session matches this token")]
    SessionNotFound,
    /// A concurrent resolver committed first; the session was not changed.
    #[error("the session was already resolved")]
    AlreadyResolved,
    #[error("no credential matches this id")]
    CredentialNotFound,
    /// Transient backend failure; surfaced to callers as a generic internal
    /// error, never retried blindly around the resolution write.
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
}

/// Everything the resolver needs to commit onto a pending session.
#[derive(Clone, Debug)]
pub struct SessionResolution {
    pub user_id: String,
    pub login_identifier: String,
    pub secret: String,
    pub credential_id: Uuid,
}

/// Login-session records, keyed by token.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Persist a new pending session.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DuplicateToken`] if a live session already
    /// holds this token.
    async fn insert(&self, session: LoginSession) -> Result<(), StoreError>;

    /// Point-in-time read of the latest committed session state.
    ///
    /// # Errors
    ///
    /// Returns an error only for backend failures; an unknown token is
    /// `Ok(None)`.
    async fn find_by_token(&self, token: &str) -> Result<Option<LoginSession>, StoreError>;

    /// Conditional write: commit `resolution` onto the session iff it is
    /// still unresolved. All resolved fields land in one atomic swap, so a
    /// poller never observes a half-updated record.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::SessionNotFound`] for an unknown token and
    /// [`StoreError::AlreadyResolved`] when losing a race against another
    /// resolver; the stored record is untouched in both cases.
    async fn resolve(
        &self,
        token: &str,
        resolution: SessionResolution,
    ) -> Result<LoginSession, StoreError>;

    /// Drop unresolved sessions older than `ttl_seconds`, returning how
    /// many were removed. A TTL of zero is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error only for backend failures.
    async fn purge_expired(&self, ttl_seconds: u64) -> Result<usize, StoreError>;
}

/// The static `(partner_key, site_identity)` lookup table, provisioned out
/// of band.
#[async_trait]
pub trait PartnerDirectory: Send + Sync {
    /// Whether this exact pairing is registered.
    ///
    /// # Errors
    ///
    /// Returns an error only for backend failures.
    async fn is_registered(&self, partner_key: &str, site_identity: &str)
        -> Result<bool, StoreError>;
}

/// The signed-in user's credential vault. Access is scoped to one user.
#[async_trait]
pub trait CredentialVault: Send + Sync {
    /// Find the user's stored credential for a site, if any.
    ///
    /// # Errors
    ///
    /// Returns an error only for backend failures.
    async fn find_by_site(
        &self,
        user_id: &str,
        site_identity: &str,
    ) -> Result<Option<StoredCredential>, StoreError>;

    /// Replace the credential's access token with a freshly generated value
    /// and return the new token. The previous value is invalid afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::CredentialNotFound`] for an unknown id.
    async fn rotate_access_token(&self, credential_id: Uuid) -> Result<String, StoreError>;
}

/// Verification source for third-party site-user records.
#[async_trait]
pub trait SiteAccountDirectory: Send + Sync {
    /// Whether a site-account record matches this identifier/secret pair
    /// for the given site.
    ///
    /// # Errors
    ///
    /// Returns an error only for backend failures.
    async fn verify(
        &self,
        login_identifier: &str,
        secret: &str,
        site_identity: &str,
    ) -> Result<bool, StoreError>;
}
