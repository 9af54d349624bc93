//! On-disk shape of one subscription entry.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use subtrack_core::input::{format_renewal_date, parse_cost, parse_renewal_date};
use subtrack_domain::{Category, CurrencyCode, HexColor, Subscription, SubscriptionDraft};
use tracing::warn;
use uuid::Uuid;

/// Entry as written to the ledger file.
#[derive(Debug, Serialize)]
pub(crate) struct StoredSubscription {
    id: Uuid,
    name: String,
    renewal_date: String,
    cost: String,
    color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    logo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    category: Option<&'static str>,
    date_added: DateTime<Utc>,
}

impl From<&Subscription> for StoredSubscription {
    fn from(record: &Subscription) -> Self {
        Self {
            id: record.id(),
            name: record.name().to_string(),
            renewal_date: format_renewal_date(record.renewal_date()),
            cost: record.cost().to_decimal().to_string(),
            color: record.color().as_str().to_string(),
            logo: record.logo().map(str::to_string),
            category: record.category().map(Category::label),
            date_added: record.date_added(),
        }
    }
}

/// Entry as read back. Every field is optional so older files still parse;
/// [`RawSubscription::into_subscription`] decides what is usable.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RawSubscription {
    id: Option<String>,
    name: Option<String>,
    renewal_date: Option<String>,
    cost: Option<Value>,
    color: Option<String>,
    logo: Option<String>,
    category: Option<String>,
    date_added: Option<String>,
}

impl RawSubscription {
    /// Validates the entry. `Err` carries the reason it was dropped.
    pub(crate) fn into_subscription(
        self,
        currency: &CurrencyCode,
        loaded_at: DateTime<Utc>,
    ) -> Result<Subscription, String> {
        let name = self.name.ok_or("missing name")?;
        let renewal_date = self
            .renewal_date
            .ok_or_else(|| "missing renewal_date".to_string())
            .and_then(|raw| parse_renewal_date(&raw).map_err(|err| err.to_string()))?;
        let cost = match self.cost {
            Some(Value::String(raw)) => raw,
            Some(Value::Number(number)) => number.to_string(),
            Some(other) => return Err(format!("unsupported cost `{other}`")),
            None => return Err("missing cost".into()),
        };
        let cost = parse_cost(&cost, currency).map_err(|err| err.to_string())?;

        let color = match self.color.as_deref().map(str::trim) {
            None | Some("") => HexColor::default(),
            Some(raw) => HexColor::parse(raw).unwrap_or_else(|err| {
                warn!(name = %name, error = %err, "invalid stored color, using default");
                HexColor::default()
            }),
        };
        let category = self
            .category
            .as_deref()
            .and_then(|raw| match Category::parse_optional(raw) {
                Ok(category) => category,
                Err(err) => {
                    warn!(name = %name, error = %err, "unknown stored category, leaving unset");
                    None
                }
            });
        let id = self
            .id
            .and_then(|raw| Uuid::parse_str(raw.trim()).ok())
            .unwrap_or_else(Uuid::new_v4);
        let date_added = self
            .date_added
            .and_then(|raw| DateTime::parse_from_rfc3339(raw.trim()).ok())
            .map(|stamp| stamp.with_timezone(&Utc))
            .unwrap_or(loaded_at);

        let draft = SubscriptionDraft {
            name,
            renewal_date,
            cost,
            color,
            logo: self.logo,
            category,
        };
        Subscription::restore(id, draft, date_added).map_err(|err| err.to_string())
    }
}
