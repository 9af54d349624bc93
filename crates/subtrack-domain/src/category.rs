//! Fixed set of subscription categories.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Groups subscriptions for filtering and reporting.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Category {
    Entertainment,
    Music,
    Productivity,
    #[serde(rename = "Cloud Storage")]
    CloudStorage,
    Gaming,
    Software,
    News,
    Fitness,
    Utilities,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown category `{0}`")]
pub struct UnknownCategory(pub String);

impl Category {
    pub const ALL: [Category; 10] = [
        Category::Entertainment,
        Category::Music,
        Category::Productivity,
        Category::CloudStorage,
        Category::Gaming,
        Category::Software,
        Category::News,
        Category::Fitness,
        Category::Utilities,
        Category::Other,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Category::Entertainment => "Entertainment",
            Category::Music => "Music",
            Category::Productivity => "Productivity",
            Category::CloudStorage => "Cloud Storage",
            Category::Gaming => "Gaming",
            Category::Software => "Software",
            Category::News => "News",
            Category::Fitness => "Fitness",
            Category::Utilities => "Utilities",
            Category::Other => "Other",
        }
    }

    /// Parses an optional category; a blank value means "unset".
    pub fn parse_optional(value: &str) -> Result<Option<Category>, UnknownCategory> {
        if value.trim().is_empty() {
            return Ok(None);
        }
        value.parse().map(Some)
    }
}

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let wanted = normalize(value);
        Category::ALL
            .into_iter()
            .find(|category| normalize(category.label()) == wanted)
            .ok_or_else(|| UnknownCategory(value.trim().to_string()))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

fn normalize(value: &str) -> String {
    value
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}
