//! The subscription record and the draft used to create or replace one.

use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::{category::Category, common::*, money::Money};

/// Logo shown for subscriptions without one of their own.
pub const DEFAULT_LOGO: &str = "logos/default_logo.png";

/// Accent used when a record carries no colour.
pub const DEFAULT_COLOR: &str = "#4F46E5";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DraftError {
    #[error("name must not be empty")]
    EmptyName,
    #[error("cost must be greater than zero")]
    NonPositiveCost,
    #[error("invalid color code `{0}`")]
    InvalidColor(String),
}

/// Hex colour code in `#RGB` or `#RRGGBB` form, stored uppercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HexColor(String);

impl HexColor {
    pub fn parse(value: &str) -> Result<Self, DraftError> {
        let trimmed = value.trim();
        let digits = trimmed
            .strip_prefix('#')
            .ok_or_else(|| DraftError::InvalidColor(trimmed.to_string()))?;
        let valid_len = matches!(digits.len(), 3 | 6);
        if !valid_len || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(DraftError::InvalidColor(trimmed.to_string()));
        }
        Ok(Self(format!("#{}", digits.to_ascii_uppercase())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for HexColor {
    fn default() -> Self {
        Self(DEFAULT_COLOR.to_string())
    }
}

impl FromStr for HexColor {
    type Err = DraftError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
    }
}

impl TryFrom<String> for HexColor {
    type Error = DraftError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<HexColor> for String {
    fn from(value: HexColor) -> Self {
        value.0
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// User-editable fields of a subscription, before identity is assigned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionDraft {
    pub name: String,
    pub renewal_date: NaiveDate,
    pub cost: Money,
    pub color: HexColor,
    pub logo: Option<String>,
    pub category: Option<Category>,
}

impl SubscriptionDraft {
    pub fn new(name: impl Into<String>, renewal_date: NaiveDate, cost: Money) -> Self {
        Self {
            name: name.into(),
            renewal_date,
            cost,
            color: HexColor::default(),
            logo: None,
            category: None,
        }
    }

    pub fn with_color(mut self, color: HexColor) -> Self {
        self.color = color;
        self
    }

    pub fn with_logo(mut self, logo: impl Into<String>) -> Self {
        self.logo = Some(logo.into());
        self
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    /// Checks the record invariants: a non-blank name and a strictly positive cost.
    pub fn validate(&self) -> Result<(), DraftError> {
        if self.name.trim().is_empty() {
            return Err(DraftError::EmptyName);
        }
        if !self.cost.is_positive() {
            return Err(DraftError::NonPositiveCost);
        }
        Ok(())
    }
}

/// One tracked subscription. Instances only exist in a valid state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Subscription {
    id: Uuid,
    name: String,
    renewal_date: NaiveDate,
    cost: Money,
    color: HexColor,
    #[serde(skip_serializing_if = "Option::is_none")]
    logo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    category: Option<Category>,
    date_added: DateTime<Utc>,
}

impl Subscription {
    /// Creates a brand new record with a fresh identifier.
    pub fn create(draft: SubscriptionDraft, date_added: DateTime<Utc>) -> Result<Self, DraftError> {
        Self::restore(Uuid::new_v4(), draft, date_added)
    }

    /// Rebuilds a record whose identity already exists, e.g. when loading from disk.
    pub fn restore(
        id: Uuid,
        draft: SubscriptionDraft,
        date_added: DateTime<Utc>,
    ) -> Result<Self, DraftError> {
        draft.validate()?;
        Ok(Self {
            id,
            name: draft.name.trim().to_string(),
            renewal_date: draft.renewal_date,
            cost: draft.cost,
            color: draft.color,
            logo: draft.logo.filter(|logo| !logo.trim().is_empty()),
            category: draft.category,
            date_added,
        })
    }

    /// Returns a copy with every mutable field replaced. `id` and `date_added` are kept.
    pub fn replaced_with(&self, draft: SubscriptionDraft) -> Result<Self, DraftError> {
        Self::restore(self.id, draft, self.date_added)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn renewal_date(&self) -> NaiveDate {
        self.renewal_date
    }

    pub fn cost(&self) -> &Money {
        &self.cost
    }

    pub fn color(&self) -> &HexColor {
        &self.color
    }

    pub fn logo(&self) -> Option<&str> {
        self.logo.as_deref()
    }

    pub fn logo_or_default(&self) -> &str {
        self.logo().unwrap_or(DEFAULT_LOGO)
    }

    pub fn category(&self) -> Option<Category> {
        self.category
    }

    pub fn date_added(&self) -> DateTime<Utc> {
        self.date_added
    }

    /// Signed day count from `today` to the renewal date; negative once overdue.
    pub fn days_until_renewal(&self, today: NaiveDate) -> i64 {
        (self.renewal_date - today).num_days()
    }

    /// Converts the record back into an editable draft.
    pub fn to_draft(&self) -> SubscriptionDraft {
        SubscriptionDraft {
            name: self.name.clone(),
            renewal_date: self.renewal_date,
            cost: self.cost.clone(),
            color: self.color.clone(),
            logo: self.logo.clone(),
            category: self.category,
        }
    }
}

impl Identifiable for Subscription {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl NamedEntity for Subscription {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Displayable for Subscription {
    fn display_label(&self) -> String {
        format!("{} ({}, renews {})", self.name, self.cost, self.renewal_date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::CurrencyCode;

    fn cost(value: &str) -> Money {
        Money::parse(value, CurrencyCode::default()).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn create_rejects_blank_name_and_zero_cost() {
        let blank = SubscriptionDraft::new("   ", date(2025, 1, 1), cost("5.00"));
        assert_eq!(
            Subscription::create(blank, Utc::now()),
            Err(DraftError::EmptyName)
        );

        let free = SubscriptionDraft::new("Free tier", date(2025, 1, 1), cost("0"));
        assert_eq!(
            Subscription::create(free, Utc::now()),
            Err(DraftError::NonPositiveCost)
        );
    }

    #[test]
    fn replaced_with_keeps_identity() {
        let original = Subscription::create(
            SubscriptionDraft::new("Spotify", date(2025, 3, 1), cost("9.99")),
            Utc::now(),
        )
        .unwrap();
        let updated = original
            .replaced_with(
                SubscriptionDraft::new("Spotify Family", date(2025, 4, 1), cost("16.99"))
                    .with_category(Category::Music),
            )
            .unwrap();

        assert_eq!(updated.id(), original.id());
        assert_eq!(updated.date_added(), original.date_added());
        assert_eq!(updated.name(), "Spotify Family");
        assert_eq!(updated.category(), Some(Category::Music));
    }

    #[test]
    fn logo_falls_back_to_default() {
        let record = Subscription::create(
            SubscriptionDraft::new("Hulu", date(2025, 3, 1), cost("7.99")).with_logo(" "),
            Utc::now(),
        )
        .unwrap();
        assert_eq!(record.logo(), None);
        assert_eq!(record.logo_or_default(), DEFAULT_LOGO);
    }

    #[test]
    fn days_until_renewal_is_signed() {
        let record = Subscription::create(
            SubscriptionDraft::new("Netflix", date(2025, 3, 10), cost("15.49")),
            Utc::now(),
        )
        .unwrap();
        assert_eq!(record.days_until_renewal(date(2025, 3, 5)), 5);
        assert_eq!(record.days_until_renewal(date(2025, 3, 12)), -2);
    }

    #[test]
    fn hex_color_validation() {
        assert_eq!(HexColor::parse("#e50914").unwrap().as_str(), "#E50914");
        assert_eq!(HexColor::parse("#fff").unwrap().as_str(), "#FFF");
        assert!(HexColor::parse("E50914").is_err());
        assert!(HexColor::parse("#GGGGGG").is_err());
        assert!(HexColor::parse("#12345").is_err());
    }
}
