//! The canonical book listing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::category::Category;
use super::id::BookId;
use super::price::Price;
use super::status::{BookLanguage, BookStatus};
use super::validation::ValidationError;

/// Shown when a listing has no author.
pub const UNKNOWN_AUTHOR: &str = "غير محدد";

/// Admin-assigned display priority, 0 (last) to 5 (first).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct ManualOrder(u8);

impl ManualOrder {
    /// Highest priority.
    pub const MAX: Self = Self(5);
    /// Lowest priority; sold books are pushed here on update.
    pub const MIN: Self = Self(0);
    /// Priority given to listings that never had one.
    pub const DEFAULT: Self = Self(3);

    /// Create a manual order from an integer in 0..=5.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidManualOrder`] if out of range.
    pub fn new(value: u8) -> Result<Self, ValidationError> {
        if value > Self::MAX.0 {
            return Err(ValidationError::InvalidManualOrder(value.to_string()));
        }
        Ok(Self(value))
    }

    /// Parse admin input. Blank input means the default.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidManualOrder`] for anything but 0..=5.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(Self::DEFAULT);
        }
        trimmed
            .parse::<u8>()
            .map_err(|_| ValidationError::InvalidManualOrder(trimmed.to_string()))
            .and_then(Self::new)
    }

    /// Clamp a stored value into range.
    #[must_use]
    pub fn clamped(value: i64) -> Self {
        // Range is checked by the clamp itself.
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let v = value.clamp(0, i64::from(Self::MAX.0)) as u8;
        Self(v)
    }

    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }
}

impl Default for ManualOrder {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<u8> for ManualOrder {
    type Error = ValidationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ManualOrder> for u8 {
    fn from(order: ManualOrder) -> Self {
        order.0
    }
}

impl std::fmt::Display for ManualOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Milliseconds since the Unix epoch, as stored remotely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(i64);

impl Timestamp {
    /// Current wall-clock time.
    #[must_use]
    pub fn now() -> Self {
        Self(Utc::now().timestamp_millis())
    }

    #[must_use]
    pub const fn from_millis(millis: i64) -> Self {
        Self(millis)
    }

    #[must_use]
    pub const fn as_millis(self) -> i64 {
        self.0
    }

    /// Convert for display. `None` for the zero "unknown" timestamp.
    #[must_use]
    pub fn to_datetime(self) -> Option<DateTime<Utc>> {
        if self.0 == 0 {
            return None;
        }
        DateTime::from_timestamp_millis(self.0)
    }
}

/// A canonical book listing.
///
/// Field names follow the remote record layout so a `Book` can be printed
/// or cached as the same JSON the store holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: BookId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, rename = "transl", skip_serializing_if = "Option::is_none")]
    pub translator: Option<String>,
    #[serde(default, rename = "type")]
    pub language: BookLanguage,
    /// `None` when the stored label is not one of the fixed categories.
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default)]
    pub price: Price,
    #[serde(default, rename = "HPaper", skip_serializing_if = "Option::is_none")]
    pub page_count: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub status: BookStatus,
    #[serde(default, rename = "order")]
    pub manual_order: ManualOrder,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub created_at: Timestamp,
    #[serde(default)]
    pub updated_at: Timestamp,
}

impl Book {
    /// Minimal listing with defaults for every optional field.
    #[must_use]
    pub fn new(id: BookId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            author: None,
            translator: None,
            language: BookLanguage::default(),
            category: None,
            price: Price::ZERO,
            page_count: None,
            description: None,
            status: BookStatus::default(),
            manual_order: ManualOrder::DEFAULT,
            images: Vec::new(),
            created_at: Timestamp::default(),
            updated_at: Timestamp::default(),
        }
    }

    /// Author for display, falling back to [`UNKNOWN_AUTHOR`].
    #[must_use]
    pub fn display_author(&self) -> &str {
        self.author
            .as_deref()
            .filter(|a| !a.trim().is_empty())
            .unwrap_or(UNKNOWN_AUTHOR)
    }

    #[must_use]
    pub const fn is_sold(&self) -> bool {
        self.status.is_sold()
    }

    /// First image, used as the cover.
    #[must_use]
    pub fn cover(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }
}
