//! Cart encoding for local storage.
//!
//! Current layout: a JSON object of book id → [`CartEntry`], in insertion
//! order. Older clients stored an array of whole book records, each with a
//! `quantity`; those are still read.

use std::fmt;

use serde::de::{MapAccess, SeqAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use tracing::warn;

use harafish_core::CartEntry;

use crate::catalog::normalize_record;

/// Borrowed view used when writing.
pub struct StoredCartRef<'a>(pub &'a [CartEntry]);

impl Serialize for StoredCartRef<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for entry in self.0 {
            map.serialize_entry(entry.book_id.as_str(), entry)?;
        }
        map.end()
    }
}

/// Owned cart read back from storage, in stored order.
#[derive(Debug, Default)]
pub struct StoredCart(pub Vec<CartEntry>);

impl<'de> Deserialize<'de> for StoredCart {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(StoredCartVisitor)
    }
}

struct StoredCartVisitor;

impl<'de> Visitor<'de> for StoredCartVisitor {
    type Value = StoredCart;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of cart entries or a list of books")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut entries: Vec<CartEntry> = Vec::new();
        while let Some((key, value)) = access.next_entry::<String, Value>()? {
            if let Some(entry) = decode_entry(Some(&key), value) {
                push_unique(&mut entries, entry);
            }
        }
        Ok(StoredCart(entries))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut entries: Vec<CartEntry> = Vec::new();
        while let Some(value) = access.next_element::<Value>()? {
            if let Some(entry) = decode_entry(None, value) {
                push_unique(&mut entries, entry);
            }
        }
        Ok(StoredCart(entries))
    }

    fn visit_unit<E: serde::de::Error>(self) -> Result<Self::Value, E> {
        Ok(StoredCart::default())
    }
}

fn push_unique(entries: &mut Vec<CartEntry>, entry: CartEntry) {
    if entries.iter().any(|e| e.book_id == entry.book_id) {
        warn!(book_id = %entry.book_id, "Dropping duplicate stored cart entry");
        return;
    }
    entries.push(entry);
}

/// Decode one stored entry, current or legacy. Unusable entries are skipped.
fn decode_entry(key: Option<&str>, value: Value) -> Option<CartEntry> {
    if let Ok(mut entry) = serde_json::from_value::<CartEntry>(value.clone()) {
        entry.quantity = entry.quantity.max(1);
        return Some(entry);
    }

    // Legacy: a whole book record with `id` and `quantity`.
    let id = value
        .get("id")
        .and_then(Value::as_str)
        .or(key)
        .unwrap_or_default()
        .to_string();
    let book = normalize_record(&id, &value)?;
    let quantity = value
        .get("quantity")
        .and_then(Value::as_u64)
        .and_then(|q| u32::try_from(q).ok())
        .unwrap_or(1)
        .max(1);

    let mut entry = CartEntry::snapshot(&book);
    entry.quantity = quantity;
    Some(entry)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use harafish_core::{Book, BookId, Price};

    use super::*;

    fn entry(id: &str, price: &str) -> CartEntry {
        let book = Book {
            price: Price::parse(price).unwrap(),
            ..Book::new(BookId::parse(id).unwrap(), id)
        };
        CartEntry::snapshot(&book)
    }

    #[test]
    fn test_written_as_ordered_map() {
        let entries = vec![entry("z", "10"), entry("a", "20")];
        let json = serde_json::to_string(&StoredCartRef(&entries)).unwrap();
        assert!(json.starts_with(r#"{"z":"#));

        let StoredCart(read) = serde_json::from_str(&json).unwrap();
        assert_eq!(read, entries);
    }

    #[test]
    fn test_reads_legacy_list() {
        let json = r#"[
            {"id": "-Nb", "title": "الحرافيش", "price": "45", "quantity": 2, "images": {"0": "a.jpg"}},
            {"id": "-Na", "title": "Second", "price": 10}
        ]"#;
        let StoredCart(read) = serde_json::from_str(json).unwrap();
        assert_eq!(read.len(), 2);
        assert_eq!(read[0].book_id.as_str(), "-Nb");
        assert_eq!(read[0].quantity, 2);
        assert_eq!(read[0].images, vec!["a.jpg".to_string()]);
        assert_eq!(read[1].quantity, 1);
    }

    #[test]
    fn test_skips_unusable_entries() {
        let json = r#"[{"title": "no id"}, {"id": "ok", "title": "fine"}]"#;
        let StoredCart(read) = serde_json::from_str(json).unwrap();
        assert_eq!(read.len(), 1);
        assert_eq!(read[0].book_id.as_str(), "ok");
    }

    #[test]
    fn test_null_is_empty() {
        let StoredCart(read) = serde_json::from_str("null").unwrap();
        assert!(read.is_empty());
    }

    #[test]
    fn test_scalar_is_an_error() {
        assert!(serde_json::from_str::<StoredCart>("42").is_err());
    }
}
