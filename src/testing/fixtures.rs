//! Pre-provisioned test data

use std::sync::Arc;

use crate::models::{PartnerRegistration, SiteAccount};
use crate::relay::LoginRelay;
use crate::resolver::ScanResolver;
use crate::settings::VaultlinkSettings;
use crate::store::{
    CredentialVault, MemoryStore, PartnerDirectory, SessionStore, SiteAccountDirectory,
};
use crate::testing::builders::StoredCredentialBuilder;
use crate::token;

/// Canonical test data: one registered partner, one user with a stored
/// credential for the partner's site, and a matching site account.
pub struct TestFixtures;

impl TestFixtures {
    /// Registered partner key
    pub const PARTNER_KEY: &str = "abc";

    /// Registered site identity
    pub const SITE: &str = "example.com";

    /// User who holds a credential for [`Self::SITE`]
    pub const UID: &str = "U1";

    /// User with an empty vault
    pub const UID_WITHOUT_CREDENTIAL: &str = "U2";

    /// Site login the credential and site account share
    pub const LOGIN: &str = "alice@example.com";

    /// Site password the credential and site account share
    pub const SECRET: &str = "hunter2";

    /// Default test settings (never loads files or the environment)
    #[must_use]
    pub fn settings() -> VaultlinkSettings {
        VaultlinkSettings::default()
    }

    /// A store provisioned with the canonical partner, credential, and
    /// site account.
    pub async fn store() -> Arc<MemoryStore> {
        let store = Arc::new(MemoryStore::new());
        store
            .register_partner(PartnerRegistration {
                partner_key: Self::PARTNER_KEY.to_string(),
                site_identity: Self::SITE.to_string(),
            })
            .await;
        store
            .add_credential(
                StoredCredentialBuilder::new()
                    .for_user(Self::UID)
                    .for_site(Self::SITE)
                    .with_login(Self::LOGIN, Self::SECRET)
                    .build(),
            )
            .await;
        store
            .add_site_account(SiteAccount {
                login_identifier: Self::LOGIN.to_string(),
                secret: Self::SECRET.to_string(),
                site_identity: Self::SITE.to_string(),
            })
            .await;
        store
    }

    /// A relay over a freshly provisioned store.
    pub async fn relay() -> (Arc<MemoryStore>, LoginRelay) {
        let store = Self::store().await;
        let relay = LoginRelay::new(
            Arc::clone(&store) as Arc<dyn SessionStore>,
            Arc::clone(&store) as Arc<dyn PartnerDirectory>,
            token::DEFAULT_TOKEN_LENGTH,
            0,
        );
        (store, relay)
    }

    /// A resolver over the given store, scoped like the one on a device.
    #[must_use]
    pub fn resolver(store: &Arc<MemoryStore>) -> ScanResolver {
        ScanResolver::new(
            Arc::clone(store) as Arc<dyn SessionStore>,
            Arc::clone(store) as Arc<dyn CredentialVault>,
            Arc::clone(store) as Arc<dyn SiteAccountDirectory>,
            0,
        )
    }
}
