//! Mobile-side session resolution
//!
//! `ScanResolver` is the device half of the handshake: it turns a captured
//! camera frame into a decoded token, then drives the sequential
//! read → validate → read → validate → conditional-write pipeline that
//! finalizes the session. It runs inside the mobile application with
//! vault access scoped to the signed-in user; the relay binary never
//! constructs one.

mod outcome;

pub use outcome::ScanOutcome;

use std::sync::Arc;

use image::DynamicImage;
use log::{debug, info};
use tokio::sync::Mutex;

use crate::qr;
use crate::store::{
    CredentialVault, SessionResolution, SessionStore, SiteAccountDirectory, StoreError,
};

pub struct ScanResolver {
    sessions: Arc<dyn SessionStore>,
    vault: Arc<dyn CredentialVault>,
    site_accounts: Arc<dyn SiteAccountDirectory>,
    session_ttl_seconds: u64,
    // Serializes resolution attempts so overlapping frames from the camera
    // pipeline never race each other against the same session.
    frame_gate: Mutex<()>,
}

impl ScanResolver {
    #[must_use]
    pub fn new(
        sessions: Arc<dyn SessionStore>,
        vault: Arc<dyn CredentialVault>,
        site_accounts: Arc<dyn SiteAccountDirectory>,
        session_ttl_seconds: u64,
    ) -> Self {
        Self {
            sessions,
            vault,
            site_accounts,
            session_ttl_seconds,
            frame_gate: Mutex::new(()),
        }
    }

    /// Per-frame entry point for the camera pipeline.
    ///
    /// Returns `Ok(None)` when the frame holds no decodable QR code (the
    /// scanner keeps scanning) or when a previous frame's resolution is
    /// still in flight (the frame is dropped, not queued).
    ///
    /// # Errors
    ///
    /// Returns an error only for backend failures during resolution.
    pub async fn scan_frame(
        &self,
        frame: &DynamicImage,
        user_id: &str,
    ) -> Result<Option<ScanOutcome>, StoreError> {
        let Ok(_guard) = self.frame_gate.try_lock() else {
            debug!("dropping frame: resolution already in flight");
            return Ok(None);
        };

        let token = match qr::decode(frame) {
            Ok(token) => token,
            Err(err) => {
                debug!("frame skipped: {err}");
                return Ok(None);
            }
        };

        self.resolve(&token, user_id).await.map(Some)
    }

    /// Drive the resolution protocol for a decoded token.
    ///
    /// Steps that find no match terminate the attempt without mutating any
    /// state; only a fully validated attempt reaches the conditional write
    /// and the access-token rotation.
    ///
    /// # Errors
    ///
    /// Returns an error only for backend failures; every protocol-level
    /// miss is a [`ScanOutcome`] variant.
    pub async fn resolve(&self, token: &str, user_id: &str) -> Result<ScanOutcome, StoreError> {
        let Some(session) = self.sessions.find_by_token(token).await? else {
            return Ok(ScanOutcome::InvalidToken);
        };

        if session.is_resolved() {
            return Ok(ScanOutcome::AlreadyUsed);
        }
        if session.is_expired(self.session_ttl_seconds) {
            return Ok(ScanOutcome::InvalidToken);
        }

        let site_identity = session.site_identity;

        let Some(credential) = self.vault.find_by_site(user_id, &site_identity).await? else {
            return Ok(ScanOutcome::NoStoredCredential);
        };

        let account_exists = self
            .site_accounts
            .verify(&credential.login_identifier, &credential.secret, &site_identity)
            .await?;
        if !account_exists {
            return Ok(ScanOutcome::CredentialMismatch);
        }

        let resolution = SessionResolution {
            user_id: user_id.to_string(),
            login_identifier: credential.login_identifier.clone(),
            secret: credential.secret.clone(),
            credential_id: credential.id,
        };
        match self.sessions.resolve(token, resolution).await {
            Ok(_) => {}
            // Another device won the race; the session is theirs.
            Err(StoreError::AlreadyResolved) => return Ok(ScanOutcome::AlreadyUsed),
            Err(err) => return Err(err),
        }

        let access_token = self.vault.rotate_access_token(credential.id).await?;
        info!("resolved login session for site {site_identity}");

        Ok(ScanOutcome::Authorized {
            site_identity,
            access_token,
        })
    }
}
