//! Boundary parsing: turns loosely typed form or file values into validated drafts.

use chrono::NaiveDate;
use subtrack_domain::{Category, CurrencyCode, HexColor, Money, SubscriptionDraft};

use crate::CoreError;

/// Calendar format used for renewal dates everywhere (`yyyy-MM-dd`).
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Raw field values as entered in the add/edit form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubscriptionInput {
    pub name: String,
    pub renewal_date: String,
    pub cost: String,
    pub color: String,
    pub logo: Option<String>,
    pub category: String,
}

impl SubscriptionInput {
    /// Parses and validates every field; the first failure is reported.
    pub fn into_draft(self, currency: &CurrencyCode) -> Result<SubscriptionDraft, CoreError> {
        let renewal_date = parse_renewal_date(&self.renewal_date)?;
        let cost = parse_cost(&self.cost, currency)?;
        let color = if self.color.trim().is_empty() {
            HexColor::default()
        } else {
            HexColor::parse(&self.color)?
        };
        let draft = SubscriptionDraft {
            name: self.name,
            renewal_date,
            cost,
            color,
            logo: self.logo,
            category: Category::parse_optional(&self.category)?,
        };
        draft.validate()?;
        Ok(draft)
    }
}

pub fn parse_renewal_date(value: &str) -> Result<NaiveDate, CoreError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .map_err(|_| CoreError::Validation(format!("invalid renewal date `{}`", value.trim())))
}

pub fn parse_cost(value: &str, currency: &CurrencyCode) -> Result<Money, CoreError> {
    Ok(Money::parse(value, currency.clone())?)
}

pub fn format_renewal_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> SubscriptionInput {
        SubscriptionInput {
            name: "Netflix".into(),
            renewal_date: "2025-03-10".into(),
            cost: "$15.49".into(),
            color: "#e50914".into(),
            logo: None,
            category: "entertainment".into(),
        }
    }

    #[test]
    fn parses_complete_form() {
        let draft = input().into_draft(&CurrencyCode::default()).unwrap();
        assert_eq!(draft.cost.minor_units(), 1549);
        assert_eq!(draft.color.as_str(), "#E50914");
        assert_eq!(draft.category, Some(Category::Entertainment));
        assert_eq!(format_renewal_date(draft.renewal_date), "2025-03-10");
    }

    #[test]
    fn each_bad_field_is_a_validation_error() {
        let currency = CurrencyCode::default();
        let cases = [
            SubscriptionInput {
                name: " ".into(),
                ..input()
            },
            SubscriptionInput {
                cost: "0.00".into(),
                ..input()
            },
            SubscriptionInput {
                cost: "-4".into(),
                ..input()
            },
            SubscriptionInput {
                renewal_date: "10/03/2025".into(),
                ..input()
            },
            SubscriptionInput {
                color: "red".into(),
                ..input()
            },
            SubscriptionInput {
                category: "Groceries".into(),
                ..input()
            },
        ];
        for case in cases {
            let err = case.clone().into_draft(&currency).unwrap_err();
            assert!(err.is_validation(), "{case:?} gave {err}");
        }
    }

    #[test]
    fn blank_color_and_category_use_defaults() {
        let draft = SubscriptionInput {
            color: String::new(),
            category: String::new(),
            ..input()
        }
        .into_draft(&CurrencyCode::default())
        .unwrap();
        assert_eq!(draft.color, HexColor::default());
        assert_eq!(draft.category, None);
    }

    #[test]
    fn decimal_comma_cost_is_rejected_not_scaled() {
        let err = parse_cost("15,49", &CurrencyCode::new("EUR")).unwrap_err();
        assert!(err.is_validation());
        assert!(parse_cost("5-", &CurrencyCode::default()).is_err());
        assert_eq!(
            parse_cost("1,299.00", &CurrencyCode::default())
                .unwrap()
                .minor_units(),
            129_900
        );
    }
}
