//! Raw record normalization.
//!
//! The store has accumulated records in several shapes over time: `images`
//! as a list, a single string, or a map keyed by index; numbers written as
//! strings; missing `order` and `status`. Everything is mapped to a canonical
//! [`Book`] here so nothing downstream ever branches on record shape.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde_json::{Map, Value};
use tracing::warn;

use harafish_core::{
    Book, BookId, BookLanguage, BookStatus, Category, ManualOrder, Price, Timestamp,
};

/// Normalize one record. `None` (with a warning) when the id is unusable.
#[must_use]
pub fn normalize_record(id: &str, raw: &Value) -> Option<Book> {
    let id = match BookId::parse(id) {
        Ok(id) => id,
        Err(e) => {
            warn!(error = %e, "Discarding record without a usable id");
            return None;
        }
    };

    let empty = Map::new();
    let fields = raw.as_object().unwrap_or(&empty);

    Some(Book {
        title: text(fields.get("title")).unwrap_or_default(),
        author: text(fields.get("author")),
        translator: text(fields.get("transl")),
        language: text(fields.get("type"))
            .map(|t| BookLanguage::from_raw(&t))
            .unwrap_or_default(),
        category: text(fields.get("category")).and_then(|c| Category::from_label(&c)),
        price: price(fields.get("price")),
        page_count: text(fields.get("HPaper")),
        description: text(fields.get("description")),
        status: text(fields.get("status"))
            .map(|s| BookStatus::from_raw(&s))
            .unwrap_or_default(),
        manual_order: integer(fields.get("order")).map_or(ManualOrder::DEFAULT, ManualOrder::clamped),
        images: normalize_images(fields.get("images")),
        created_at: Timestamp::from_millis(integer(fields.get("createdAt")).unwrap_or(0)),
        updated_at: Timestamp::from_millis(integer(fields.get("updatedAt")).unwrap_or(0)),
        id,
    })
}

/// Normalize the `books` node: an object keyed by id, or absent.
#[must_use]
pub fn normalize_collection(raw: Option<&Value>) -> Vec<Book> {
    let Some(Value::Object(records)) = raw else {
        return Vec::new();
    };
    records
        .iter()
        .filter_map(|(id, record)| normalize_record(id, record))
        .collect()
}

/// Normalize any stored `images` shape to an ordered list of non-blank URLs.
///
/// Maps are ordered by key, numerically when every key is an integer.
#[must_use]
pub fn normalize_images(raw: Option<&Value>) -> Vec<String> {
    let values: Vec<&Value> = match raw {
        None | Some(Value::Null) => Vec::new(),
        Some(single @ Value::String(_)) => vec![single],
        Some(Value::Array(items)) => items.iter().collect(),
        Some(Value::Object(map)) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            if entries.iter().all(|(k, _)| k.parse::<u64>().is_ok()) {
                entries.sort_by_key(|(k, _)| k.parse::<u64>().unwrap_or(u64::MAX));
            }
            entries.into_iter().map(|(_, v)| v).collect()
        }
        Some(_) => Vec::new(),
    };

    values
        .into_iter()
        .filter_map(Value::as_str)
        .filter(|url| !url.trim().is_empty())
        .map(str::to_string)
        .collect()
}

/// Non-blank string, with numbers rendered as text.
fn text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Integer from a number (truncating floats) or a numeric string.
fn integer(value: Option<&Value>) -> Option<i64> {
    match value? {
        Value::Number(n) => n.as_i64().or_else(|| {
            // Stored by a JS client; fractional values do not occur in practice.
            #[allow(clippy::cast_possible_truncation)]
            n.as_f64().map(|f| f as i64)
        }),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>().ok().or_else(|| {
                #[allow(clippy::cast_possible_truncation)]
                s.parse::<f64>().ok().filter(|f| f.is_finite()).map(|f| f as i64)
            })
        }
        _ => None,
    }
}

/// Price from a number or numeric string; anything unusable is zero.
fn price(value: Option<&Value>) -> Price {
    let amount = match value {
        Some(Value::Number(n)) => Decimal::from_str(&n.to_string())
            .or_else(|_| Decimal::from_scientific(&n.to_string()))
            .ok(),
        Some(Value::String(s)) => Decimal::from_str(s.trim()).ok(),
        _ => None,
    };
    amount
        .and_then(|a| Price::new(a).ok())
        .unwrap_or(Price::ZERO)
}
