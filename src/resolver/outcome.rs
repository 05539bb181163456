//! Terminal outcomes of a scan attempt, with their user-facing messages

/// What a single resolution attempt ended in.
///
/// Every variant maps to a short, non-technical message for the mobile UI.
/// Failure variants leave the session untouched; the user may simply scan
/// again.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScanOutcome {
    /// The session was committed for this user and the credential's access
    /// token was rotated.
    Authorized {
        site_identity: String,
        access_token: String,
    },
    /// No session matches the decoded token (never issued, or expired).
    InvalidToken,
    /// Another device committed this session first, or it was scanned twice.
    AlreadyUsed,
    /// The user has no stored credential for the session's site.
    NoStoredCredential,
    /// The stored credential does not match any registered site account.
    CredentialMismatch,
}

impl ScanOutcome {
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Authorized { .. })
    }

    /// Human-readable status message for the mobile UI.
    #[must_use]
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Authorized { .. } => "login approved",
            Self::InvalidToken => "invalid token",
            Self::AlreadyUsed => "this code has already been used",
            Self::NoStoredCredential => "no saved credential for this site",
            Self::CredentialMismatch => "credentials do not match",
        }
    }
}
