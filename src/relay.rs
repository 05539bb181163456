//! Partner-facing login relay
//!
//! `LoginRelay` owns the gateway side of the handshake: it validates the
//! partner, mints the session token, persists the pending session, and
//! encodes the QR image. Polling is a pure read of the latest committed
//! session state. The HTTP handlers in [`crate::handlers`] stay thin and
//! delegate here.

use std::sync::Arc;

use log::{info, warn};
use thiserror::Error;

use crate::models::LoginSession;
use crate::store::{PartnerDirectory, SessionStore, StoreError};
use crate::{qr, token};

#[derive(Debug, Error)]
pub enum InitiateError {
    /// The `(partner_key, site_identity)` pairing is not registered.
    #[error("unknown partner key / site identity pairing")]
    UnknownPartner,
    #[error("failed to encode the session token as a QR image")]
    Encoding(#[from] qr::EncodingError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result of a successful initiation: the raw token and its QR rendering.
pub struct InitiatedLogin {
    pub token: String,
    pub qr_png: Vec<u8>,
}

/// Outcome of a status poll.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PollStatus {
    Pending,
    Authorized { uid: String },
    NotFound,
}

#[derive(Clone)]
pub struct LoginRelay {
    sessions: Arc<dyn SessionStore>,
    partners: Arc<dyn PartnerDirectory>,
    token_length: usize,
    session_ttl_seconds: u64,
}

impl LoginRelay {
    #[must_use]
    pub fn new(
        sessions: Arc<dyn SessionStore>,
        partners: Arc<dyn PartnerDirectory>,
        token_length: usize,
        session_ttl_seconds: u64,
    ) -> Self {
        Self {
            sessions,
            partners,
            token_length,
            session_ttl_seconds,
        }
    }

    /// Create a new pending login session for a registered partner.
    ///
    /// Every call creates an independent session, even for the same
    /// partner/site pair; concurrent calls never interfere because each
    /// gets its own token.
    ///
    /// # Errors
    ///
    /// Returns [`InitiateError::UnknownPartner`] for an unregistered
    /// pairing (no session row is created), a store error for insert
    /// failures including a duplicate token, or an encoding error if the
    /// token cannot be rendered as a QR image.
    pub async fn initiate(
        &self,
        partner_key: &str,
        site_identity: &str,
    ) -> Result<InitiatedLogin, InitiateError> {
        if !self.partners.is_registered(partner_key, site_identity).await? {
            warn!("rejected login initiation for unregistered partner pairing");
            return Err(InitiateError::UnknownPartner);
        }

        let token = token::generate(self.token_length);
        let session = LoginSession::new(partner_key, site_identity, token.clone());
        self.sessions.insert(session).await?;

        let qr_png = qr::encode(&token)?;
        info!("created pending login session for site {site_identity}");

        Ok(InitiatedLogin { token, qr_png })
    }

    /// Report the current state of a session. Pure read, safe to call
    /// repeatedly; reflects the latest committed store state.
    ///
    /// With a session TTL configured, an expired unresolved session reports
    /// `NotFound`, same as a token that was never issued.
    ///
    /// # Errors
    ///
    /// Returns an error only for backend failures.
    pub async fn poll(&self, token: &str) -> Result<PollStatus, StoreError> {
        let Some(session) = self.sessions.find_by_token(token).await? else {
            return Ok(PollStatus::NotFound);
        };

        if session.is_expired(self.session_ttl_seconds) {
            return Ok(PollStatus::NotFound);
        }

        Ok(match session.resolved_by {
            Some(uid) => PollStatus::Authorized { uid },
            None => PollStatus::Pending,
        })
    }
}
