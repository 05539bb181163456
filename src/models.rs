use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
}

/// Observable state of a login session, as reported to polling partners.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Pending,
    Authorized,
    NotFound,
}

/// A single login-handshake record, keyed by its high-entropy token.
///
/// Created by the partner gateway in the pending state and mutated exactly
/// once, by the mobile resolver, when the user approves the login. The
/// resolved fields stay `None` until that point.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct LoginSession {
    pub token: String,
    pub partner_key: String,
    pub site_identity: String,
    pub created_at: DateTime<Utc>,

    // Set together, by the resolver's conditional write
    pub resolved_by: Option<String>,
    pub resolved_login: Option<String>,
    pub resolved_secret: Option<String>,
    pub resolved_credential_id: Option<Uuid>,
    pub resolved_at: Option<DateTime<Utc>>,
}

impl LoginSession {
    /// Create a fresh pending session for a registered partner.
    #[must_use]
    pub fn new(partner_key: &str, site_identity: &str, token: String) -> Self {
        Self {
            token,
            partner_key: partner_key.to_string(),
            site_identity: site_identity.to_string(),
            created_at: Utc::now(),
            resolved_by: None,
            resolved_login: None,
            resolved_secret: None,
            resolved_credential_id: None,
            resolved_at: None,
        }
    }

    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.resolved_by.is_some()
    }

    #[must_use]
    pub fn status(&self) -> SessionStatus {
        if self.is_resolved() {
            SessionStatus::Authorized
        } else {
            SessionStatus::Pending
        }
    }

    /// Whether this session has outlived the configured TTL.
    ///
    /// A TTL of zero disables expiry entirely; resolved sessions never
    /// expire, so a partner that polls late still sees its authorization.
    #[must_use]
    pub fn is_expired(&self, ttl_seconds: u64) -> bool {
        if ttl_seconds == 0 || self.is_resolved() {
            return false;
        }
        let ttl = Duration::seconds(i64::try_from(ttl_seconds).unwrap_or(i64::MAX));
        Utc::now() >= self.created_at + ttl
    }
}

/// A pre-provisioned `(partner_key, site_identity)` pairing.
///
/// Read-only to the relay; both fields must match exactly for a session to
/// be created on the partner's behalf.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
pub struct PartnerRegistration {
    pub partner_key: String,
    pub site_identity: String,
}

/// A user's saved login for one external site, held in their personal vault.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct StoredCredential {
    pub id: Uuid,
    pub user_id: String,
    pub site_identity: String,
    pub login_identifier: String,
    pub secret: String,
    /// Rotated to a fresh high-entropy value on every successful resolution.
    pub access_token: String,
}

/// A registered site-user record the resolver verifies credentials against.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct SiteAccount {
    pub login_identifier: String,
    pub secret: String,
    pub site_identity: String,
}
