//! City model for entries of the static dataset

use serde::{Deserialize, Serialize};

/// A municipality of the bundled dataset
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct City {
    /// Forecast area id understood by the weather service
    pub id: String,
    /// Display name
    pub name: String,
    /// Phonetic reading of the name
    pub kana: String,
    /// Prefecture the city belongs to
    #[serde(rename = "pref")]
    pub prefecture: String,
}

impl City {
    /// Create a new city
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        kana: impl Into<String>,
        prefecture: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kana: kana.into(),
            prefecture: prefecture.into(),
        }
    }

    /// Case-insensitive substring match against name, kana and prefecture
    #[must_use]
    pub fn matches(&self, query: &str) -> bool {
        self.contains_lowercase(&query.to_lowercase())
    }

    /// Same as [`City::matches`] for a needle that is already lowercased.
    pub(crate) fn contains_lowercase(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
            || self.kana.to_lowercase().contains(needle)
            || self.prefecture.to_lowercase().contains(needle)
    }

    /// One-line label for list rendering
    #[must_use]
    pub fn display_label(&self) -> String {
        format!("{} {} ({}, {})", self.id, self.name, self.kana, self.prefecture)
    }
}
