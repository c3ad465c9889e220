//! Admin mutations, checked from the storefront side.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use harafish_core::{BookId, BookStatus, ManualOrder};
use harafish_integration_tests::{
    ADMIN_EMAIL, ADMIN_PASSWORD, TempDir, admin_credentials, catalog_over, shelf,
};
use harafish_storefront::admin::{AdminCatalog, AdminError, AdminSession, BookFields};
use harafish_storefront::cart::{CartError, CartLedger};
use harafish_storefront::error::StorefrontError;
use harafish_storefront::images::NoImageHost;
use harafish_storefront::storage::{FileStorage, MemoryStorage};

fn id(raw: &str) -> BookId {
    BookId::parse(raw).unwrap()
}

fn form(title: &str, price: &str) -> BookFields {
    BookFields {
        title: title.into(),
        author: "طه حسين".into(),
        category: "ادب".into(),
        price: price.into(),
        ..BookFields::default()
    }
}

#[test]
fn test_session_persists_between_runs() {
    let dir = TempDir::new();
    {
        let session = AdminSession::new(FileStorage::new(dir.path()));
        session
            .login(ADMIN_EMAIL, ADMIN_PASSWORD, &admin_credentials())
            .unwrap();
    }
    let session = AdminSession::new(FileStorage::new(dir.path()));
    assert!(session.is_active());
    session.logout().unwrap();
    assert!(!AdminSession::new(FileStorage::new(dir.path())).is_active());
}

#[test]
fn test_mutations_need_a_session() {
    let (_, catalog) = catalog_over(shelf());
    let session = AdminSession::new(MemoryStorage::new());
    assert!(matches!(
        AdminCatalog::open(&session, catalog, NoImageHost),
        Err(AdminError::Unauthorized)
    ));
}

#[tokio::test]
async fn test_created_book_appears_in_storefront() {
    let (_, catalog) = catalog_over(shelf());
    let session = AdminSession::new(MemoryStorage::new());
    session
        .login(ADMIN_EMAIL, ADMIN_PASSWORD, &admin_credentials())
        .unwrap();
    let mut admin = AdminCatalog::open(&session, catalog.clone(), NoImageHost).unwrap();
    admin.refresh().await.unwrap();

    let created = admin.create(&form("الأيام", "80"), Vec::new()).await.unwrap();
    assert_eq!(admin.books()[0].id, created.id);
    assert_eq!(created.manual_order, ManualOrder::DEFAULT);

    let storefront = catalog.fetch_all().await.unwrap();
    assert!(storefront.iter().any(|b| b.id == created.id));
    let fetched = catalog
        .fetch_book(created.id.as_str())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(fetched.title, "الأيام");
    assert_eq!(fetched.price.display(), "80.00");
}

#[tokio::test]
async fn test_edits_invalidate_cached_detail() {
    let (_, catalog) = catalog_over(shelf());
    let session = AdminSession::new(MemoryStorage::new());
    session
        .login(ADMIN_EMAIL, ADMIN_PASSWORD, &admin_credentials())
        .unwrap();
    let mut admin = AdminCatalog::open(&session, catalog.clone(), NoImageHost).unwrap();
    admin.refresh().await.unwrap();

    // Warm the cache.
    catalog.fetch_book("-Nb1").await.unwrap().unwrap();

    admin.toggle_status(&id("-Nb1")).await.unwrap();
    let sold = catalog.fetch_book("-Nb1").await.unwrap().unwrap();
    assert_eq!(sold.status, BookStatus::Sold);
    // Toggling does not touch the manual order.
    assert_eq!(sold.manual_order, ManualOrder::MAX);

    let mut cart = CartLedger::load(MemoryStorage::new());
    assert!(matches!(cart.add(&sold), Err(CartError::SoldOut { .. })));

    let edited = admin
        .update(
            &id("-Nb1"),
            &BookFields {
                status: "sold".into(),
                ..form("الحرافيش", "50")
            },
            Vec::new(),
        )
        .await
        .unwrap();
    assert_eq!(edited.manual_order, ManualOrder::MIN);
    let reread = catalog.fetch_book("-Nb1").await.unwrap().unwrap();
    assert_eq!(reread.price.display(), "50.00");
    assert_eq!(reread.manual_order, ManualOrder::MIN);
}

#[tokio::test]
async fn test_delete_and_failed_delete() {
    let (store, catalog) = catalog_over(shelf());
    let session = AdminSession::new(MemoryStorage::new());
    session
        .login(ADMIN_EMAIL, ADMIN_PASSWORD, &admin_credentials())
        .unwrap();
    let mut admin = AdminCatalog::open(&session, catalog.clone(), NoImageHost).unwrap();
    admin.refresh().await.unwrap();

    store.set_writes_failing(true);
    let err = admin.delete(&id("-Nb4")).await.unwrap_err();
    assert!(err.is_remote());
    assert!(admin.find(&id("-Nb4")).is_some());

    store.set_writes_failing(false);
    admin.delete(&id("-Nb4")).await.unwrap();
    assert!(admin.find(&id("-Nb4")).is_none());
    assert!(catalog.fetch_book("-Nb4").await.unwrap().is_none());
}

#[tokio::test]
async fn test_invalid_form_is_rejected_locally() {
    let (store, catalog) = catalog_over(shelf());
    let session = AdminSession::new(MemoryStorage::new());
    session
        .login(ADMIN_EMAIL, ADMIN_PASSWORD, &admin_credentials())
        .unwrap();
    let mut admin = AdminCatalog::open(&session, catalog, NoImageHost).unwrap();
    admin.refresh().await.unwrap();

    // Writes would fail, so reaching the store would surface a remote error.
    store.set_writes_failing(true);
    let err = admin
        .create(&form("بلا سعر", ""), Vec::new())
        .await
        .unwrap_err();
    assert!(matches!(err, StorefrontError::Validation(_)));

    let bad_order = BookFields {
        order: "7".into(),
        ..form("ترتيب", "10")
    };
    assert!(matches!(
        admin.update(&id("-Nb1"), &bad_order, Vec::new()).await,
        Err(StorefrontError::Validation(_))
    ));
}
