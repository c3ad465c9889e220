//! Cart persistence and checkout.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use url::Url;

use harafish_core::{BookId, ValidationError};
use harafish_integration_tests::{TempDir, catalog_over, shelf};
use harafish_storefront::cart::{AddOutcome, CartError, CartLedger};
use harafish_storefront::checkout::ReservationDesk;
use harafish_storefront::storage::{CART_KEY, FileStorage, LocalStorage, MemoryStorage};

fn id(raw: &str) -> BookId {
    BookId::parse(raw).unwrap()
}

fn desk() -> ReservationDesk {
    ReservationDesk::new(Url::parse("https://harafish.example").unwrap(), "201034345458")
}

#[tokio::test]
async fn test_cart_survives_restart() {
    let dir = TempDir::new();
    let (_, catalog) = catalog_over(shelf());
    let harafish = catalog.fetch_book("-Nb1").await.unwrap().unwrap();
    let muqaddima = catalog.fetch_book("-Nb3").await.unwrap().unwrap();

    {
        let mut cart = CartLedger::load(FileStorage::new(dir.path()));
        assert_eq!(cart.add(&muqaddima).unwrap(), AddOutcome::Added);
        assert_eq!(cart.add(&harafish).unwrap(), AddOutcome::Added);
        cart.update_quantity(&id("-Nb3"), 2).unwrap();
    }

    let cart = CartLedger::load(FileStorage::new(dir.path()));
    let ids: Vec<&str> = cart.entries().iter().map(|e| e.book_id.as_str()).collect();
    assert_eq!(ids, vec!["-Nb3", "-Nb1"]);
    assert_eq!(cart.item_count(), 3);
    assert_eq!(cart.total().display(), "285.00");
}

#[tokio::test]
async fn test_sold_and_duplicate_adds() {
    let (_, catalog) = catalog_over(shelf());
    let sold = catalog.fetch_book("-Nb2").await.unwrap().unwrap();
    let available = catalog.fetch_book("-Nb1").await.unwrap().unwrap();

    let mut cart = CartLedger::load(MemoryStorage::new());
    assert!(matches!(cart.add(&sold), Err(CartError::SoldOut { .. })));
    assert!(cart.is_empty());

    cart.add(&available).unwrap();
    assert_eq!(cart.add(&available).unwrap(), AddOutcome::AlreadyPresent);
    assert_eq!(cart.entries().len(), 1);
    assert_eq!(cart.entries()[0].quantity, 1);
}

#[tokio::test]
async fn test_field_paths_do_not_resolve_to_books() {
    let (_, catalog) = catalog_over(shelf());
    // "-Nb2" is sold; its fields must not come back as an available book.
    for raw in ["-Nb2/title", "-Nb2/status", "-Nb2.json"] {
        assert!(catalog.fetch_book(raw).await.is_err(), "{raw:?}");
    }
    assert!(matches!(
        BookId::parse("-Nb2/title"),
        Err(ValidationError::MalformedId(_))
    ));
}

#[test]
fn test_zero_quantity_keeps_previous() {
    let storage = MemoryStorage::new();
    storage
        .set(
            CART_KEY,
            r#"{"-Nb1": {"bookId": "-Nb1", "quantity": 2, "title": "الحرافيش", "price": "45"}}"#,
        )
        .unwrap();

    let mut cart = CartLedger::load(&storage);
    assert_eq!(
        cart.update_quantity(&id("-Nb1"), 0),
        Err(ValidationError::InvalidQuantity(0))
    );
    assert_eq!(cart.get(&id("-Nb1")).unwrap().quantity, 2);
}

#[test]
fn test_legacy_and_corrupt_storage() {
    let storage = MemoryStorage::new();
    storage
        .set(
            CART_KEY,
            r#"[{"id": "-Nb1", "title": "الحرافيش", "author": "نجيب محفوظ", "price": 45, "quantity": 3}]"#,
        )
        .unwrap();
    let cart = CartLedger::load(&storage);
    assert_eq!(cart.item_count(), 3);
    assert_eq!(cart.total().display(), "135.00");

    storage.set(CART_KEY, "][").unwrap();
    assert!(CartLedger::load(&storage).is_empty());
}

#[tokio::test]
async fn test_checkout_link() {
    let (_, catalog) = catalog_over(shelf());
    let mut cart = CartLedger::load(MemoryStorage::new());
    cart.add(&catalog.fetch_book("-Nb1").await.unwrap().unwrap())
        .unwrap();

    let link = desk().cart_link(&cart).unwrap();
    assert_eq!(link.host_str(), Some("wa.me"));
    let text = link
        .query_pairs()
        .find(|(k, _)| k == "text")
        .map(|(_, v)| v.into_owned())
        .unwrap();
    assert!(text.contains("الحرافيش"));
    assert!(text.contains("https://harafish.example/book/-Nb1"));
    assert!(text.contains("*45.00 جنيه مصري*"));

    cart.clear();
    assert!(desk().cart_link(&cart).is_err());
}
