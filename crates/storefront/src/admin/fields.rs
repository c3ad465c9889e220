//! Admin book form.

use rust_decimal::prelude::ToPrimitive;
use serde_json::{Map, Number, Value};

use harafish_core::{
    BookLanguage, BookStatus, Category, ManualOrder, Price, Timestamp, ValidationError,
};

/// Raw form input, as typed.
#[derive(Debug, Clone, Default)]
pub struct BookFields {
    pub title: String,
    pub author: String,
    pub translator: String,
    pub language: String,
    pub category: String,
    pub price: String,
    pub page_count: String,
    pub description: String,
    pub status: String,
    /// Blank keeps the current order on edit and uses the default on create.
    pub order: String,
}

/// Form input that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidFields {
    pub title: String,
    pub author: String,
    pub translator: Option<String>,
    pub language: BookLanguage,
    pub category: Category,
    pub price: Price,
    pub page_count: Option<String>,
    pub description: Option<String>,
    pub status: BookStatus,
    pub manual_order: Option<ManualOrder>,
}

fn optional(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn required(raw: &str, field: &'static str) -> Result<String, ValidationError> {
    optional(raw).ok_or(ValidationError::MissingField(field))
}

impl BookFields {
    /// Check the form. Nothing is sent anywhere until this succeeds.
    ///
    /// # Errors
    ///
    /// Returns the first problem found: a missing title, author or price, a
    /// price that is not a non-negative number, an unknown category or status,
    /// or a manual order outside 0..=5.
    pub fn validate(&self) -> Result<ValidFields, ValidationError> {
        let title = required(&self.title, "title")?;
        let author = required(&self.author, "author")?;
        let price = Price::parse(&self.price)?;

        let category = match optional(&self.category) {
            None => Category::HistoryPolitics,
            Some(label) => {
                Category::from_label(&label).ok_or(ValidationError::InvalidCategory(label))?
            }
        };

        let status = match optional(&self.status) {
            None => BookStatus::Available,
            Some(raw) => raw
                .parse::<BookStatus>()
                .map_err(|_| ValidationError::InvalidStatus(raw))?,
        };

        let manual_order = match optional(&self.order) {
            None => None,
            Some(raw) => Some(ManualOrder::parse(&raw)?),
        };

        Ok(ValidFields {
            title,
            author,
            translator: optional(&self.translator),
            language: BookLanguage::from_raw(self.language.trim()),
            category,
            price,
            page_count: optional(&self.page_count),
            description: optional(&self.description),
            status,
            manual_order,
        })
    }
}

impl ValidFields {
    /// The order to store: sold listings drop to 0, otherwise the given
    /// order, then `current`, then the default.
    #[must_use]
    pub fn effective_order(&self, current: Option<ManualOrder>) -> ManualOrder {
        if self.status.is_sold() {
            return ManualOrder::MIN;
        }
        self.manual_order
            .or(current)
            .unwrap_or(ManualOrder::DEFAULT)
    }

    /// Full remote record. Optional fields that are empty are written as
    /// `null` so a shallow merge clears them.
    #[must_use]
    pub fn to_record(
        &self,
        order: ManualOrder,
        images: &[String],
        created_at: Timestamp,
        updated_at: Timestamp,
    ) -> Map<String, Value> {
        let price = self
            .price
            .amount()
            .to_f64()
            .and_then(Number::from_f64)
            .map_or_else(|| Value::String(self.price.to_string()), Value::Number);
        let text = |v: &Option<String>| v.clone().map_or(Value::Null, Value::String);

        let mut record = Map::new();
        record.insert("title".into(), Value::String(self.title.clone()));
        record.insert("author".into(), Value::String(self.author.clone()));
        record.insert("transl".into(), text(&self.translator));
        record.insert("type".into(), Value::String(self.language.as_str().into()));
        record.insert("category".into(), Value::String(self.category.label().into()));
        record.insert("price".into(), price);
        record.insert("HPaper".into(), text(&self.page_count));
        record.insert("description".into(), text(&self.description));
        record.insert("status".into(), Value::String(self.status.as_str().into()));
        record.insert("order".into(), Value::from(order.value()));
        record.insert(
            "images".into(),
            Value::Array(images.iter().cloned().map(Value::String).collect()),
        );
        record.insert("createdAt".into(), Value::from(created_at.as_millis()));
        record.insert("updatedAt".into(), Value::from(updated_at.as_millis()));
        record
    }
}
