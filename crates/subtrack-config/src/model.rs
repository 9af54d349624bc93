use serde::{de::Deserializer, Deserialize, Serialize};
use serde_json::{Map, Value};
use std::{fmt, ops::RangeInclusive, path::PathBuf, str::FromStr};
use subtrack_core::CurrencyFormat;
use subtrack_domain::{
    BackupFrequency, CostPeriod, CurrencyCode, CurrencyPosition, Money, MoneyError, SortOrder,
};
use tracing::warn;

pub const NOTIFICATION_DAYS_RANGE: RangeInclusive<u32> = 1..=30;
pub const DECIMAL_PLACES_RANGE: RangeInclusive<u32> = 0..=4;
pub const MONTHLY_BUDGET_RANGE: RangeInclusive<u32> = 0..=999_999;
pub const BUDGET_THRESHOLD_RANGE: RangeInclusive<u32> = 50..=100;
pub const EXPENSE_THRESHOLD_RANGE: RangeInclusive<u32> = 0..=1_000;

const BACKUP_DIR_NAME: &str = "SubscriptionBackups";

/// User preferences, persisted as a flat JSON object.
///
/// Every key defaults on its own when read through [`Settings::from_value`],
/// so partial, older or hand-edited files still load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub notifications_enabled: bool,
    #[serde(deserialize_with = "notification_days")]
    pub notification_days: u32,
    pub notification_sound: bool,
    pub desktop_notifications: bool,
    pub email_notifications: bool,
    pub email: String,

    pub currency_symbol: String,
    #[serde(deserialize_with = "lenient_label")]
    pub currency_position: CurrencyPosition,
    #[serde(deserialize_with = "decimal_places")]
    pub decimal_places: u32,

    /// Whole currency units; zero disables budget tracking.
    #[serde(deserialize_with = "monthly_budget")]
    pub monthly_budget: u32,
    pub budget_alert: bool,
    /// Percent of the budget at which the alert fires.
    #[serde(deserialize_with = "budget_threshold")]
    pub budget_threshold: u32,

    pub compact_view: bool,
    pub show_yearly_cost: bool,
    pub default_sort: DefaultSort,

    pub auto_backup: bool,
    #[serde(deserialize_with = "lenient_label")]
    pub backup_frequency: BackupFrequency,
    pub backup_location: PathBuf,

    pub show_all_periods: bool,
    pub highlight_expensive: bool,
    #[serde(deserialize_with = "expense_threshold")]
    pub expense_threshold: u32,
    #[serde(deserialize_with = "lenient_label")]
    pub cost_period: CostPeriod,

    pub theme: Theme,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            notifications_enabled: false,
            notification_days: 7,
            notification_sound: false,
            desktop_notifications: true,
            email_notifications: false,
            email: String::new(),
            currency_symbol: "$".into(),
            currency_position: CurrencyPosition::Before,
            decimal_places: 2,
            monthly_budget: 0,
            budget_alert: false,
            budget_threshold: 80,
            compact_view: false,
            show_yearly_cost: false,
            default_sort: DefaultSort::Name,
            auto_backup: false,
            backup_frequency: BackupFrequency::Weekly,
            backup_location: Self::default_backup_location(),
            show_all_periods: false,
            highlight_expensive: false,
            expense_threshold: 50,
            cost_period: CostPeriod::Monthly,
            theme: Theme::default(),
        }
    }
}

impl Settings {
    /// `<documents>/SubscriptionBackups`, falling back to the home directory.
    pub fn default_backup_location() -> PathBuf {
        let base = dirs::document_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."));

        base.join(BACKUP_DIR_NAME)
    }

    /// Builds a snapshot from a parsed settings file. Each key is checked on
    /// its own: a key whose value has the wrong type keeps its default while
    /// the rest of the file still applies.
    pub fn from_value(value: Value) -> Self {
        let entries = match value {
            Value::Object(entries) => entries,
            other => {
                warn!(found = %other, "settings file is not an object, using defaults");
                return Self::default();
            }
        };

        let mut accepted = Map::new();
        for (key, entry) in entries {
            let single = Value::Object(Map::from_iter([(key.clone(), entry.clone())]));
            match serde_json::from_value::<Self>(single) {
                Ok(_) => {
                    accepted.insert(key, entry);
                }
                Err(err) => warn!(%key, error = %err, "invalid setting, using default"),
            }
        }

        serde_json::from_value::<Self>(Value::Object(accepted))
            .unwrap_or_default()
            .normalized()
    }

    /// Copy with every numeric key clamped into its accepted range.
    pub fn normalized(mut self) -> Self {
        self.notification_days = clamp(self.notification_days, &NOTIFICATION_DAYS_RANGE);
        self.decimal_places = clamp(self.decimal_places, &DECIMAL_PLACES_RANGE);
        self.monthly_budget = clamp(self.monthly_budget, &MONTHLY_BUDGET_RANGE);
        self.budget_threshold = clamp(self.budget_threshold, &BUDGET_THRESHOLD_RANGE);
        self.expense_threshold = clamp(self.expense_threshold, &EXPENSE_THRESHOLD_RANGE);
        self
    }

    pub fn currency_format(&self) -> CurrencyFormat {
        CurrencyFormat {
            symbol: self.currency_symbol.clone(),
            position: self.currency_position,
            decimal_places: self.decimal_places,
        }
    }

    /// Reminder horizon in days, only while notifications are switched on.
    pub fn reminder_threshold(&self) -> Option<i64> {
        self.notifications_enabled
            .then_some(i64::from(self.notification_days))
    }

    pub fn default_sort_order(&self) -> SortOrder {
        self.default_sort.sort_order()
    }

    pub fn budget_money(&self, currency: &CurrencyCode) -> Result<Money, MoneyError> {
        Money::from_major(u64::from(self.monthly_budget), currency.clone())
    }

    pub fn expense_threshold_money(&self, currency: &CurrencyCode) -> Result<Money, MoneyError> {
        Money::from_major(u64::from(self.expense_threshold), currency.clone())
    }
}

/// Initial ordering of the subscription list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum DefaultSort {
    #[default]
    Name,
    Price,
    #[serde(rename = "Renewal Date")]
    RenewalDate,
}

impl DefaultSort {
    pub fn label(self) -> &'static str {
        match self {
            DefaultSort::Name => "Name",
            DefaultSort::Price => "Price",
            DefaultSort::RenewalDate => "Renewal Date",
        }
    }

    pub fn sort_order(self) -> SortOrder {
        match self {
            DefaultSort::Name => SortOrder::NameAscending,
            DefaultSort::Price => SortOrder::PriceHighToLow,
            DefaultSort::RenewalDate => SortOrder::DueSoon,
        }
    }
}

impl FromStr for DefaultSort {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "name" => Ok(DefaultSort::Name),
            "price" => Ok(DefaultSort::Price),
            "renewal date" | "renewal" => Ok(DefaultSort::RenewalDate),
            other => Err(format!("unknown default sort `{other}`")),
        }
    }
}

impl fmt::Display for DefaultSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl<'de> Deserialize<'de> for DefaultSort {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        lenient_label(deserializer)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    fn from_value(value: Option<String>) -> Self {
        value
            .map(|v| Theme::from_label(v.trim()))
            .unwrap_or_default()
    }

    /// Anything other than `dark` selects the light theme.
    pub fn from_label(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "dark" => Theme::Dark,
            _ => Theme::Light,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Theme::Light
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        };
        f.write_str(label)
    }
}

impl<'de> Deserialize<'de> for Theme {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(Theme::from_value(value.as_str().map(str::to_owned)))
    }
}

fn clamp(value: u32, range: &RangeInclusive<u32>) -> u32 {
    value.clamp(*range.start(), *range.end())
}

/// Parses a labelled enum, falling back to its default for unknown labels or
/// non-string values.
fn lenient_label<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr + Default,
    T::Err: fmt::Display,
{
    let value = Value::deserialize(deserializer)?;
    let parsed = match &value {
        Value::String(label) => label.parse::<T>().map_err(|err| err.to_string()),
        Value::Null => return Ok(T::default()),
        other => Err(format!("expected a label, found `{other}`")),
    };
    Ok(parsed.unwrap_or_else(|reason| {
        warn!(%reason, "unrecognised setting value, using default");
        T::default()
    }))
}

/// Reads a whole number in any JSON shape and clamps it into `range`.
/// Unreadable values yield `fallback`.
fn bounded<'de, D>(
    deserializer: D,
    range: RangeInclusive<u32>,
    fallback: u32,
) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let number = match &value {
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().map(|float| float.round() as i64)),
        Value::String(text) => text.trim().parse::<i64>().ok(),
        _ => None,
    };
    match number {
        Some(number) => {
            let clamped = number.clamp(i64::from(*range.start()), i64::from(*range.end()));
            if clamped != number {
                warn!(value = number, clamped, "setting out of range, clamped");
            }
            Ok(clamped as u32)
        }
        None => {
            warn!(value = %value, "unreadable numeric setting, using default");
            Ok(fallback)
        }
    }
}

fn notification_days<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    bounded(deserializer, NOTIFICATION_DAYS_RANGE, 7)
}

fn decimal_places<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    bounded(deserializer, DECIMAL_PLACES_RANGE, 2)
}

fn monthly_budget<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    bounded(deserializer, MONTHLY_BUDGET_RANGE, 0)
}

fn budget_threshold<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    bounded(deserializer, BUDGET_THRESHOLD_RANGE, 80)
}

fn expense_threshold<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    bounded(deserializer, EXPENSE_THRESHOLD_RANGE, 50)
}
