//! Status enums for books.

use serde::{Deserialize, Serialize};

/// Whether a book can still be bought.
///
/// Stored remotely as `"available"` / `"sold"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BookStatus {
    #[default]
    Available,
    Sold,
}

impl BookStatus {
    /// Remote string value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Sold => "sold",
        }
    }

    /// Lenient parse used by the normalizer: anything but `"sold"` is available.
    #[must_use]
    pub fn from_raw(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("sold") {
            Self::Sold
        } else {
            Self::Available
        }
    }

    /// The other status.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Available => Self::Sold,
            Self::Sold => Self::Available,
        }
    }

    #[must_use]
    pub const fn is_sold(self) -> bool {
        matches!(self, Self::Sold)
    }
}

impl std::fmt::Display for BookStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for BookStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "available" => Ok(Self::Available),
            "sold" => Ok(Self::Sold),
            _ => Err(format!("invalid book status: {s}")),
        }
    }
}

/// Whether the book is an Arabic original or a translation.
///
/// Stored remotely under the `type` key as `"عربي"` / `"مترجم"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum BookLanguage {
    #[default]
    #[serde(rename = "عربي")]
    Original,
    #[serde(rename = "مترجم")]
    Translated,
}

impl BookLanguage {
    /// Remote string value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Original => "عربي",
            Self::Translated => "مترجم",
        }
    }

    /// Lenient parse: the Arabic label or the English name, original otherwise.
    #[must_use]
    pub fn from_raw(raw: &str) -> Self {
        match raw.trim() {
            "مترجم" | "translated" => Self::Translated,
            _ => Self::Original,
        }
    }
}

impl std::fmt::Display for BookLanguage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_toggle() {
        assert_eq!(BookStatus::Available.toggled(), BookStatus::Sold);
        assert_eq!(BookStatus::Sold.toggled(), BookStatus::Available);
    }

    #[test]
    fn test_status_from_raw_is_lenient() {
        assert_eq!(BookStatus::from_raw("sold"), BookStatus::Sold);
        assert_eq!(BookStatus::from_raw(" SOLD "), BookStatus::Sold);
        assert_eq!(BookStatus::from_raw("whatever"), BookStatus::Available);
    }

    #[test]
    fn test_status_from_str_is_strict() {
        assert_eq!("sold".parse::<BookStatus>(), Ok(BookStatus::Sold));
        assert!("Sold".parse::<BookStatus>().is_err());
    }

    #[test]
    fn test_language_roundtrip_labels() {
        assert_eq!(BookLanguage::from_raw("مترجم"), BookLanguage::Translated);
        assert_eq!(BookLanguage::from_raw("translated"), BookLanguage::Translated);
        assert_eq!(BookLanguage::from_raw(""), BookLanguage::Original);
        assert_eq!(
            serde_json::to_string(&BookLanguage::Translated).ok().as_deref(),
            Some("\"مترجم\"")
        );
    }
}
