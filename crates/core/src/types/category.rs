//! The shop's fixed category set.

use serde::{Deserialize, Serialize};

/// One of the four shelves the shop sorts books into.
///
/// The Arabic labels are the exact strings stored remotely and used in links.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "تاريخ وسياسة")]
    HistoryPolitics,
    #[serde(rename = "فلسفة وعلم نفس")]
    PhilosophyPsychology,
    #[serde(rename = "ادب")]
    Literature,
    #[serde(rename = "شعر ومسرح")]
    PoetryTheater,
}

impl Category {
    /// All categories in display order.
    pub const ALL: [Self; 4] = [
        Self::HistoryPolitics,
        Self::PhilosophyPsychology,
        Self::Literature,
        Self::PoetryTheater,
    ];

    /// Exact remote label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::HistoryPolitics => "تاريخ وسياسة",
            Self::PhilosophyPsychology => "فلسفة وعلم نفس",
            Self::Literature => "ادب",
            Self::PoetryTheater => "شعر ومسرح",
        }
    }

    /// Exact-match lookup by label. No trimming or fuzzy matching.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.label() == label)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Category filter selection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum CategorySelector {
    /// No filter (`"all"` or absent).
    #[default]
    All,
    /// One of the fixed categories.
    Only(Category),
    /// A label that names no category; matches nothing.
    Unknown(String),
}

impl CategorySelector {
    /// Sentinel meaning "no filter".
    pub const ALL_SENTINEL: &'static str = "all";

    /// Interpret a route/CLI value.
    #[must_use]
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            None => Self::All,
            Some(s) if s.is_empty() || s == Self::ALL_SENTINEL => Self::All,
            Some(s) => Category::from_label(s).map_or_else(|| Self::Unknown(s.to_string()), Self::Only),
        }
    }

    /// Whether a book with the given category passes this selector.
    #[must_use]
    pub fn matches(&self, category: Option<Category>) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => category == Some(*wanted),
            Self::Unknown(_) => false,
        }
    }
}

impl std::fmt::Display for CategorySelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::All => f.write_str(Self::ALL_SENTINEL),
            Self::Only(category) => f.write_str(category.label()),
            Self::Unknown(raw) => f.write_str(raw),
        }
    }
}
