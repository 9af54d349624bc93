//! Orderings offered for the subscription list.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum SortOrder {
    /// Name A-Z, case-insensitive.
    #[default]
    NameAscending,
    /// Name Z-A, case-insensitive.
    NameDescending,
    PriceHighToLow,
    PriceLowToHigh,
    /// Earliest renewal date first.
    DueSoon,
    /// Latest renewal date first.
    DueLater,
    /// Newest `date_added` first.
    RecentlyAdded,
    /// Oldest `date_added` first.
    OldestAdded,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown sort order `{0}`")]
pub struct UnknownSortOrder(pub String);

impl SortOrder {
    pub const ALL: [SortOrder; 8] = [
        SortOrder::NameAscending,
        SortOrder::NameDescending,
        SortOrder::PriceHighToLow,
        SortOrder::PriceLowToHigh,
        SortOrder::DueSoon,
        SortOrder::DueLater,
        SortOrder::RecentlyAdded,
        SortOrder::OldestAdded,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SortOrder::NameAscending => "Name (A-Z)",
            SortOrder::NameDescending => "Name (Z-A)",
            SortOrder::PriceHighToLow => "Price (High-Low)",
            SortOrder::PriceLowToHigh => "Price (Low-High)",
            SortOrder::DueSoon => "Due Soon",
            SortOrder::DueLater => "Due Later",
            SortOrder::RecentlyAdded => "Recently Added",
            SortOrder::OldestAdded => "Oldest Added",
        }
    }
}

impl FromStr for SortOrder {
    type Err = UnknownSortOrder;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let wanted = value.trim();
        if let Some(order) = SortOrder::ALL
            .into_iter()
            .find(|order| order.label().eq_ignore_ascii_case(wanted))
        {
            return Ok(order);
        }
        // Older list labels for the renewal orderings.
        match wanted.to_ascii_lowercase().as_str() {
            "renewal (oldest-newest)" => Ok(SortOrder::DueSoon),
            "renewal (newest-oldest)" => Ok(SortOrder::DueLater),
            _ => Err(UnknownSortOrder(wanted.to_string())),
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
