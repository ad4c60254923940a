//! Integration tests for admin provisioning.
//!
//! Covers the credential gates, email normalization, and the guarantee
//! that an existing account is never modified.

use bson::doc;
use bson::oid::ObjectId;
use chrono::Utc;

use orebi_catalog::config::{AdminSettings, SeedSettings};
use orebi_catalog::db::memory::Operation;
use orebi_catalog::db::{CatalogStore, MemoryStore};
use orebi_catalog::models::UserDocument;
use orebi_catalog::password::verify_password;
use orebi_catalog::seed::admin::{ProvisionOptions, ProvisionOutcome, provision};
use orebi_catalog::seed::{self, SeedOptions};
use orebi_core::{Email, UserRole};
use orebi_integration_tests::{ADMIN_PASSWORD, admin, options_with_admin, small_catalog};

fn options() -> ProvisionOptions {
    ProvisionOptions::default()
}

fn settings_from(vars: &[(&str, &str)]) -> AdminSettings {
    SeedSettings::from_lookup(|key| {
        vars.iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| (*v).to_owned())
    })
    .expect("settings parse")
    .admin
}

// =============================================================================
// Idempotency
// =============================================================================

#[tokio::test]
async fn test_second_provision_leaves_account_untouched() {
    let store = MemoryStore::new();
    let settings = admin("owner@example.com");

    let first = provision(&store, &settings, &options()).await;
    let stored = store.users().await;

    let second = provision(&store, &settings, &options()).await;

    assert!(first.is_created());
    assert!(matches!(second, ProvisionOutcome::AlreadyExists { .. }));
    assert_eq!(store.users().await, stored);
}

#[tokio::test]
async fn test_existing_customer_is_not_promoted() {
    let store = MemoryStore::new();
    let now = Utc::now();
    store
        .insert_user(UserDocument {
            id: None,
            name: "Jane".to_owned(),
            email: Email::parse("jane@example.com").expect("valid email"),
            password: "$2b$10$existing".to_owned(),
            role: UserRole::Customer,
            is_active: true,
            created_at: now,
            updated_at: now,
        })
        .await
        .expect("insert customer");

    let outcome = provision(&store, &admin("Jane@Example.com"), &options()).await;

    assert!(matches!(outcome, ProvisionOutcome::AlreadyExists { .. }));
    let users = store.users().await;
    assert_eq!(users.len(), 1);
    let jane = users.first().expect("customer kept");
    assert_eq!(jane.role, UserRole::Customer);
    assert_eq!(jane.password, "$2b$10$existing");
}

#[tokio::test]
async fn test_account_from_another_schema_counts_as_existing() {
    let store = MemoryStore::new();
    let legacy = doc! {
        "_id": ObjectId::new(),
        "name": "Owner",
        "email": "owner@example.com",
        "password": "$2a$10$legacyhash",
        "role": "superuser",
    };
    store.insert_raw_user(legacy.clone()).await;

    let outcome = provision(&store, &admin("Owner@Example.com"), &options()).await;

    assert!(matches!(outcome, ProvisionOutcome::AlreadyExists { .. }));
    assert_eq!(store.raw_users().await, vec![legacy]);
}

// =============================================================================
// Stored hash
// =============================================================================

#[tokio::test]
async fn test_admin_password_stored_as_bcrypt_cost_10() {
    let store = MemoryStore::new();

    let outcome = provision(
        &store,
        &AdminSettings::new("admin@example.com", "Sup3rSecret"),
        &options(),
    )
    .await;

    assert!(outcome.is_created());
    let users = store.users().await;
    let hash = &users.first().expect("admin stored").password;
    assert!(hash.starts_with("$2b$10$"), "unexpected hash format: {hash}");
    assert!(verify_password("Sup3rSecret", hash));
    assert!(!verify_password("sup3rsecret", hash));
}

// =============================================================================
// Credential gates
// =============================================================================

#[tokio::test]
async fn test_short_password_rejected() {
    let store = MemoryStore::new();

    for password in ["short", "1234567"] {
        let settings = AdminSettings::new("owner@example.com", password);
        let outcome = provision(&store, &settings, &options()).await;
        assert!(
            matches!(outcome, ProvisionOutcome::Rejected { .. }),
            "{password:?} should be rejected"
        );
    }
    assert!(store.users().await.is_empty());

    let settings = AdminSettings::new("owner@example.com", "12345678");
    assert!(provision(&store, &settings, &options()).await.is_created());
}

#[tokio::test]
async fn test_missing_credentials_skip() {
    let store = MemoryStore::new();

    let cases = [
        settings_from(&[("ADMIN_EMAIL", "owner@example.com")]),
        settings_from(&[("ADMIN_PASSWORD", ADMIN_PASSWORD)]),
        settings_from(&[("ADMIN_EMAIL", ""), ("ADMIN_PASSWORD", ADMIN_PASSWORD)]),
        settings_from(&[]),
    ];

    for settings in &cases {
        assert_eq!(
            provision(&store, settings, &options()).await,
            ProvisionOutcome::Skipped
        );
    }
    assert!(store.users().await.is_empty());
}

#[tokio::test]
async fn test_settings_from_environment() {
    let store = MemoryStore::new();
    let settings = settings_from(&[
        ("ADMIN_EMAIL", "owner@example.com"),
        ("ADMIN_PASSWORD", ADMIN_PASSWORD),
        ("ADMIN_NAME", "  Store Owner  "),
    ]);

    assert!(provision(&store, &settings, &options()).await.is_created());
    let users = store.users().await;
    assert_eq!(users.first().expect("admin stored").name, "Store Owner");
}

// =============================================================================
// Email normalization
// =============================================================================

#[tokio::test]
async fn test_email_variants_resolve_to_one_account() {
    let store = MemoryStore::new();

    let first = provision(&store, &admin("  Admin@Example.COM  "), &options()).await;
    let second = provision(&store, &admin("admin@example.com"), &options()).await;

    match first {
        ProvisionOutcome::Created { email, .. } => assert_eq!(email.as_str(), "admin@example.com"),
        other => panic!("expected Created, got {other:?}"),
    }
    assert!(matches!(second, ProvisionOutcome::AlreadyExists { .. }));
    assert_eq!(store.users().await.len(), 1);
}

// =============================================================================
// Failures are non-fatal
// =============================================================================

#[tokio::test]
async fn test_store_failure_does_not_fail_seeding() {
    let store = MemoryStore::new();
    store.fail_on(Operation::InsertUser).await;

    let report = seed::run(
        &store,
        &small_catalog(),
        &options_with_admin(admin("owner@example.com")),
    )
    .await
    .expect("admin failure is not fatal");

    assert!(matches!(report.admin, ProvisionOutcome::Failed { .. }));
    assert_eq!(report.products, 3);
    assert!(store.users().await.is_empty());
}

#[tokio::test]
async fn test_rejected_admin_does_not_fail_seeding() {
    let store = MemoryStore::new();
    let options = SeedOptions {
        admin: AdminSettings::new("owner@example.com", "short"),
        ..SeedOptions::default()
    };

    let report = seed::run(&store, &small_catalog(), &options)
        .await
        .expect("rejected admin is not fatal");

    assert!(matches!(report.admin, ProvisionOutcome::Rejected { .. }));
    assert_eq!(report.products, 3);
}
