//! Fluent builders for test objects

use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::models::{LoginSession, StoredCredential};
use crate::token;

/// Builder for [`LoginSession`] test records
pub struct LoginSessionBuilder {
    token: String,
    partner_key: String,
    site_identity: String,
    age_seconds: i64,
    resolved_by: Option<String>,
}

impl Default for LoginSessionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl LoginSessionBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            token: token::generate_default(),
            partner_key: "abc".to_string(),
            site_identity: "example.com".to_string(),
            age_seconds: 0,
            resolved_by: None,
        }
    }

    #[must_use]
    pub fn with_token(mut self, token: &str) -> Self {
        self.token = token.to_string();
        self
    }

    #[must_use]
    pub fn for_site(mut self, site_identity: &str) -> Self {
        self.site_identity = site_identity.to_string();
        self
    }

    #[must_use]
    pub fn aged_seconds(mut self, age_seconds: i64) -> Self {
        self.age_seconds = age_seconds;
        self
    }

    #[must_use]
    pub fn resolved_by(mut self, uid: &str) -> Self {
        self.resolved_by = Some(uid.to_string());
        self
    }

    #[must_use]
    pub fn build(self) -> LoginSession {
        let mut session = LoginSession::new(&self.partner_key, &self.site_identity, self.token);
        session.created_at = Utc::now() - Duration::seconds(self.age_seconds);
        if let Some(uid) = self.resolved_by {
            session.resolved_by = Some(uid);
            session.resolved_at = Some(Utc::now());
        }
        session
    }
}

/// Builder for [`StoredCredential`] test records
pub struct StoredCredentialBuilder {
    user_id: String,
    site_identity: String,
    login_identifier: String,
    secret: String,
}

impl Default for StoredCredentialBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl StoredCredentialBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            user_id: "U1".to_string(),
            site_identity: "example.com".to_string(),
            login_identifier: "alice@example.com".to_string(),
            secret: "hunter2".to_string(),
        }
    }

    #[must_use]
    pub fn for_user(mut self, user_id: &str) -> Self {
        self.user_id = user_id.to_string();
        self
    }

    #[must_use]
    pub fn for_site(mut self, site_identity: &str) -> Self {
        self.site_identity = site_identity.to_string();
        self
    }

    #[must_use]
    pub fn with_login(mut self, login_identifier: &str, secret: &str) -> Self {
        self.login_identifier = login_identifier.to_string();
        self.secret = secret.to_string();
        self
    }

    #[must_use]
    pub fn build(self) -> StoredCredential {
        StoredCredential {
            id: Uuid::new_v4(),
            user_id: self.user_id,
            site_identity: self.site_identity,
            login_identifier: self.login_identifier,
            secret: self.secret,
            access_token: token::generate_default(),
        }
    }
}
