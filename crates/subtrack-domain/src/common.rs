//! Shared traits and small enums used across the subscription model.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Exposes a stable identifier for entities stored in the ledger.
pub trait Identifiable {
    fn id(&self) -> Uuid;
}

/// Provides read-only access to an entity's display name.
pub trait NamedEntity {
    fn name(&self) -> &str;
}

/// Converts an entity into a user-facing display label.
pub trait Displayable {
    fn display_label(&self) -> String;
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
/// Where the currency symbol sits relative to the amount.
pub enum CurrencyPosition {
    #[default]
    #[serde(rename = "Before amount")]
    Before,
    #[serde(rename = "After amount")]
    After,
}

impl CurrencyPosition {
    pub fn label(self) -> &'static str {
        match self {
            CurrencyPosition::Before => "Before amount",
            CurrencyPosition::After => "After amount",
        }
    }
}

impl fmt::Display for CurrencyPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for CurrencyPosition {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "before amount" | "before" => Ok(CurrencyPosition::Before),
            "after amount" | "after" => Ok(CurrencyPosition::After),
            other => Err(format!("unknown currency position `{other}`")),
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
/// Horizon over which monthly costs are projected.
pub enum CostPeriod {
    #[default]
    Monthly,
    #[serde(rename = "3 Months")]
    ThreeMonths,
    #[serde(rename = "6 Months")]
    SixMonths,
    Yearly,
}

impl CostPeriod {
    pub fn months(self) -> u64 {
        match self {
            CostPeriod::Monthly => 1,
            CostPeriod::ThreeMonths => 3,
            CostPeriod::SixMonths => 6,
            CostPeriod::Yearly => 12,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CostPeriod::Monthly => "Monthly",
            CostPeriod::ThreeMonths => "3 Months",
            CostPeriod::SixMonths => "6 Months",
            CostPeriod::Yearly => "Yearly",
        }
    }
}

impl fmt::Display for CostPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for CostPeriod {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "monthly" => Ok(CostPeriod::Monthly),
            "3 months" => Ok(CostPeriod::ThreeMonths),
            "6 months" => Ok(CostPeriod::SixMonths),
            "yearly" => Ok(CostPeriod::Yearly),
            other => Err(format!("unknown cost period `{other}`")),
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
/// How often automatic ledger backups are taken.
pub enum BackupFrequency {
    Daily,
    #[default]
    Weekly,
    Monthly,
}

impl BackupFrequency {
    /// Nominal day-count between two backups.
    pub fn days(self) -> i64 {
        match self {
            BackupFrequency::Daily => 1,
            BackupFrequency::Weekly => 7,
            BackupFrequency::Monthly => 30,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            BackupFrequency::Daily => "Daily",
            BackupFrequency::Weekly => "Weekly",
            BackupFrequency::Monthly => "Monthly",
        }
    }
}

impl fmt::Display for BackupFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for BackupFrequency {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "daily" => Ok(BackupFrequency::Daily),
            "weekly" => Ok(BackupFrequency::Weekly),
            "monthly" => Ok(BackupFrequency::Monthly),
            other => Err(format!("unknown backup frequency `{other}`")),
        }
    }
}
