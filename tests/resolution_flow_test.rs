// Resolution protocol tests: concurrency guard, retries, and expiry
use std::sync::Arc;

use vaultlink::models::{LoginSession, SiteAccount};
use vaultlink::resolver::{ScanOutcome, ScanResolver};
use vaultlink::store::{
    CredentialVault, MemoryStore, SessionStore, SiteAccountDirectory,
};
use vaultlink::testing::{LoginSessionBuilder, StoredCredentialBuilder, TestFixtures};

fn resolver_with_ttl(store: &Arc<MemoryStore>, ttl_seconds: u64) -> ScanResolver {
    ScanResolver::new(
        Arc::clone(store) as Arc<dyn SessionStore>,
        Arc::clone(store) as Arc<dyn CredentialVault>,
        Arc::clone(store) as Arc<dyn SiteAccountDirectory>,
        ttl_seconds,
    )
}

async fn insert_pending(store: &MemoryStore, token: &str) {
    store
        .insert(LoginSession::new(
            TestFixtures::PARTNER_KEY,
            TestFixtures::SITE,
            token.to_string(),
        ))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_concurrent_scans_commit_exactly_once() {
    let store = TestFixtures::store().await;
    insert_pending(&store, "T1").await;

    // A second user on another device, equally able to resolve the session
    store
        .add_credential(
            StoredCredentialBuilder::new()
                .for_user("U2")
                .with_login("bob@example.com", "swordfish")
                .build(),
        )
        .await;
    store
        .add_site_account(SiteAccount {
            login_identifier: "bob@example.com".to_string(),
            secret: "swordfish".to_string(),
            site_identity: TestFixtures::SITE.to_string(),
        })
        .await;

    let first = {
        let store = Arc::clone(&store);
        tokio::spawn(async move {
            let resolver = TestFixtures::resolver(&store);
            resolver.resolve("T1", TestFixtures::UID).await.unwrap()
        })
    };
    let second = {
        let store = Arc::clone(&store);
        tokio::spawn(async move {
            let resolver = TestFixtures::resolver(&store);
            resolver.resolve("T1", "U2").await.unwrap()
        })
    };

    let outcomes = [first.await.unwrap(), second.await.unwrap()];
    let successes = outcomes.iter().filter(|o| o.is_success()).count();
    let conflicts = outcomes
        .iter()
        .filter(|o| **o == ScanOutcome::AlreadyUsed)
        .count();
    assert_eq!(successes, 1);
    assert_eq!(conflicts, 1);

    // The committed record belongs to exactly one of the two users and was
    // not merged from both attempts
    let session = store.find_by_token("T1").await.unwrap().unwrap();
    let winner = session.resolved_by.clone().unwrap();
    if winner == TestFixtures::UID {
        assert_eq!(session.resolved_login.as_deref(), Some(TestFixtures::LOGIN));
    } else {
        assert_eq!(winner, "U2");
        assert_eq!(session.resolved_login.as_deref(), Some("bob@example.com"));
    }
}

#[tokio::test]
async fn test_failed_scan_can_be_retried() {
    let store = TestFixtures::store().await;
    insert_pending(&store, "T1").await;

    // First attempt comes from a user with an empty vault and fails
    let resolver = TestFixtures::resolver(&store);
    let outcome = resolver
        .resolve("T1", TestFixtures::UID_WITHOUT_CREDENTIAL)
        .await
        .unwrap();
    assert_eq!(outcome, ScanOutcome::NoStoredCredential);

    // The session stayed pending, so the right user can still resolve it
    let outcome = resolver.resolve("T1", TestFixtures::UID).await.unwrap();
    assert!(outcome.is_success());
}

#[tokio::test]
async fn test_rotation_only_happens_on_success() {
    let store = TestFixtures::store().await;
    insert_pending(&store, "T1").await;

    let before = store
        .find_by_site(TestFixtures::UID, TestFixtures::SITE)
        .await
        .unwrap()
        .unwrap()
        .access_token;

    // Scanning an unknown token must not touch the vault
    let resolver = TestFixtures::resolver(&store);
    let outcome = resolver
        .resolve("never-issued", TestFixtures::UID)
        .await
        .unwrap();
    assert_eq!(outcome, ScanOutcome::InvalidToken);

    let after = store
        .find_by_site(TestFixtures::UID, TestFixtures::SITE)
        .await
        .unwrap()
        .unwrap()
        .access_token;
    assert_eq!(before, after);
}

#[tokio::test]
async fn test_expired_session_is_gone_for_resolver_and_purge() {
    let store = TestFixtures::store().await;

    let stale = LoginSessionBuilder::new()
        .with_token("T1")
        .aged_seconds(120)
        .build();
    store.insert(stale).await.unwrap();

    let resolver = resolver_with_ttl(&store, 60);
    assert_eq!(
        resolver.resolve("T1", TestFixtures::UID).await.unwrap(),
        ScanOutcome::InvalidToken
    );

    assert_eq!(store.purge_expired(60).await.unwrap(), 1);
    assert!(store.find_by_token("T1").await.unwrap().is_none());
}

#[tokio::test]
async fn test_scan_frame_end_to_end() {
    let store = TestFixtures::store().await;
    insert_pending(&store, "T1").await;

    let png = vaultlink::qr::encode("T1").unwrap();
    let frame = image::load_from_memory(&png).unwrap();

    let resolver = TestFixtures::resolver(&store);
    let outcome = resolver
        .scan_frame(&frame, TestFixtures::UID)
        .await
        .unwrap()
        .expect("frame should decode");
    assert!(outcome.is_success());

    // A second scan of the same code is refused, not re-committed
    let outcome = resolver
        .scan_frame(&frame, TestFixtures::UID)
        .await
        .unwrap()
        .expect("frame should decode");
    assert_eq!(outcome, ScanOutcome::AlreadyUsed);
}
