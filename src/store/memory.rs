//! In-process store backing all storage seams
//!
//! Suitable for a single relay instance: every map sits behind its own
//! `RwLock`, and the session-resolution compare-and-set runs under the
//! sessions write lock, which gives the at-most-once commit the protocol
//! requires.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use chrono::Utc;
use log::debug;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::{LoginSession, PartnerRegistration, SiteAccount, StoredCredential};
use crate::store::{
    CredentialVault, PartnerDirectory, SessionResolution, SessionStore, SiteAccountDirectory,
    StoreError,
};
use crate::token;

#[derive(Default)]
pub struct MemoryStore {
    sessions: RwLock<HashMap<String, LoginSession>>,
    partners: RwLock<HashSet<PartnerRegistration>>,
    credentials: RwLock<HashMap<Uuid, StoredCredential>>,
    site_accounts: RwLock<Vec<SiteAccount>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Provision a partner pairing. Registration is out of band for the
    /// protocol, so this is not exposed over HTTP.
    pub async fn register_partner(&self, registration: PartnerRegistration) {
        self.partners.write().await.insert(registration);
    }

    /// Add a credential to a user's vault, returning its id.
    pub async fn add_credential(&self, credential: StoredCredential) -> Uuid {
        let id = credential.id;
        self.credentials.write().await.insert(id, credential);
        id
    }

    /// Add a registered site-user record to the verification source.
    pub async fn add_site_account(&self, account: SiteAccount) {
        self.site_accounts.write().await.push(account);
    }

    /// Number of live sessions, counting both pending and resolved.
    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn insert(&self, session: LoginSession) -> Result<(), StoreError> {
        let mut sessions = self.sessions.write().await;
        if sessions.contains_key(&session.token) {
            return Err(StoreError::DuplicateToken);
        }
        sessions.insert(session.token.clone(), session);
        Ok(())
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<LoginSession>, StoreError> {
        Ok(self.sessions.read().await.get(token).cloned())
    }

    async fn resolve(
        &self,
        token: &str,
        resolution: SessionResolution,
    ) -> Result<LoginSession, StoreError> {
        let mut sessions = self.sessions.write().await;
        let session = sessions.get_mut(token).ok_or(StoreError::SessionNotFound)?;

        if session.is_resolved() {
            return Err(StoreError::AlreadyResolved);
        }

        session.resolved_by = Some(resolution.user_id);
        session.resolved_login = Some(resolution.login_identifier);
        session.resolved_secret = Some(resolution.secret);
        session.resolved_credential_id = Some(resolution.credential_id);
        session.resolved_at = Some(Utc::now());

        Ok(session.clone())
    }

    async fn purge_expired(&self, ttl_seconds: u64) -> Result<usize, StoreError> {
        if ttl_seconds == 0 {
            return Ok(0);
        }

        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| !session.is_expired(ttl_seconds));
        let removed = before - sessions.len();

        if removed > 0 {
            debug!("purged {removed} expired login sessions");
        }
        Ok(removed)
    }
}

#[async_trait]
impl PartnerDirectory for MemoryStore {
    async fn is_registered(
        &self,
        partner_key: &str,
        site_identity: &str,
    ) -> Result<bool, StoreError> {
        let lookup = PartnerRegistration {
            partner_key: partner_key.to_string(),
            site_identity: site_identity.to_string(),
        };
        Ok(self.partners.read().await.contains(&lookup))
    }
}

#[async_trait]
impl CredentialVault for MemoryStore {
    async fn find_by_site(
        &self,
        user_id: &str,
        site_identity: &str,
    ) -> Result<Option<StoredCredential>, StoreError> {
        let credentials = self.credentials.read().await;
        Ok(credentials
            .values()
            .find(|c| c.user_id == user_id && c.site_identity == site_identity)
            .cloned())
    }

    async fn rotate_access_token(&self, credential_id: Uuid) -> Result<String, StoreError> {
        let mut credentials = self.credentials.write().await;
        let credential = credentials
            .get_mut(&credential_id)
            .ok_or(StoreError::CredentialNotFound)?;

        let new_token = token::generate_default();
        credential.access_token = new_token.clone();
        Ok(new_token)
    }
}

#[async_trait]
impl SiteAccountDirectory for MemoryStore {
    async fn verify(
        &self,
        login_identifier: &str,
        secret: &str,
        site_identity: &str,
    ) -> Result<bool, StoreError> {
        let accounts = self.site_accounts.read().await;
        Ok(accounts.iter().any(|a| {
            a.login_identifier == login_identifier
                && a.secret == secret
                && a.site_identity == site_identity
        }))
    }
}
