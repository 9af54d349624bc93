//! Application facade owning one ledger and one settings store.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use subtrack_config::{ConfigError, Settings, SettingsStore};
use subtrack_core::{
    BudgetService, BudgetStatus, Clock, CoreError, CurrencyFormatter, LoadReport, Reminder,
    ReminderService, SubscriptionLedger, SummaryService, SystemClock,
};
use subtrack_domain::{CurrencyCode, Money, Subscription, SubscriptionDraft};
use subtrack_storage_json::{JsonSubscriptionStorage, LEDGER_FILE};
use tracing::{info, warn};
use uuid::Uuid;

const APP_DIR: &str = "subtrack";
const SETTINGS_FILE: &str = "settings.json";

/// Where the ledger and settings files live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerPaths {
    pub ledger_file: PathBuf,
    pub settings_file: PathBuf,
}

impl TrackerPaths {
    /// Both files side by side in `dir`.
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            ledger_file: dir.join(LEDGER_FILE),
            settings_file: dir.join(SETTINGS_FILE),
        }
    }

    /// `<data dir>/subtrack`, falling back to the home directory.
    pub fn default_location() -> Self {
        let base = dirs::data_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."));

        Self::in_dir(&base.join(APP_DIR))
    }
}

/// Ledger plus preferences, with the preference-driven views layered on top.
///
/// Mutations made through the tracker also take an automatic backup when the
/// settings ask for one; mutations made through [`ledger_mut`](Self::ledger_mut)
/// do not.
pub struct SubscriptionTracker<C: Clock = SystemClock> {
    ledger: SubscriptionLedger<JsonSubscriptionStorage, C>,
    settings_store: SettingsStore,
    settings: Settings,
    load_report: LoadReport,
}

impl SubscriptionTracker<SystemClock> {
    pub fn open(paths: TrackerPaths) -> Self {
        Self::open_with_clock(paths, SystemClock)
    }
}

impl<C: Clock> SubscriptionTracker<C> {
    /// Loads settings and ledger. Never fails: unreadable files fall back to
    /// defaults and an empty ledger, with the problem kept in [`load_report`](Self::load_report).
    pub fn open_with_clock(paths: TrackerPaths, clock: C) -> Self {
        let settings_store = SettingsStore::new(paths.settings_file);
        let settings = settings_store.load();
        let currency = CurrencyCode::default();
        let storage = JsonSubscriptionStorage::new(paths.ledger_file, currency.clone());
        let (ledger, load_report) = SubscriptionLedger::open(storage, clock, currency);
        info!(
            subscriptions = ledger.len(),
            path = %ledger.storage().path().display(),
            "tracker opened"
        );
        Self {
            ledger,
            settings_store,
            settings,
            load_report,
        }
    }

    pub fn ledger(&self) -> &SubscriptionLedger<JsonSubscriptionStorage, C> {
        &self.ledger
    }

    pub fn ledger_mut(&mut self) -> &mut SubscriptionLedger<JsonSubscriptionStorage, C> {
        &mut self.ledger
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn load_report(&self) -> &LoadReport {
        &self.load_report
    }

    /// Persists `snapshot` and makes it current. On failure the previous
    /// settings stay in effect.
    pub fn save_settings(&mut self, snapshot: Settings) -> Result<(), ConfigError> {
        let snapshot = snapshot.normalized();
        self.settings_store.save(&snapshot)?;
        self.settings = snapshot;
        Ok(())
    }

    pub fn add(&mut self, draft: SubscriptionDraft) -> Result<Subscription, CoreError> {
        let record = self.ledger.add(draft)?;
        self.auto_backup();
        Ok(record)
    }

    pub fn update(&mut self, id: Uuid, draft: SubscriptionDraft) -> Result<Subscription, CoreError> {
        let record = self.ledger.update(id, draft)?;
        self.auto_backup();
        Ok(record)
    }

    pub fn remove(&mut self, id: Uuid) -> Result<Subscription, CoreError> {
        let record = self.ledger.remove(id)?;
        self.auto_backup();
        Ok(record)
    }

    /// Renders `money` with the configured symbol, position and precision.
    pub fn format(&self, money: &Money) -> String {
        self.settings.currency_format().format_money(money)
    }

    pub fn formatted_total(&self) -> String {
        self.format(&self.ledger.total_cost())
    }

    /// Total projected over the configured cost period.
    pub fn formatted_period_total(&self) -> String {
        let projected = SummaryService::project(&self.ledger.total_cost(), self.settings.cost_period);
        self.format(&projected)
    }

    /// Records in the configured default order.
    pub fn default_view(&self) -> Vec<&Subscription> {
        self.ledger.sort(self.settings.default_sort_order())
    }

    /// Reminders due today; empty while notifications are switched off.
    pub fn pending_reminders(&self, today: NaiveDate) -> Vec<Reminder> {
        match self.settings.reminder_threshold() {
            Some(threshold) => ReminderService::reminders(&self.ledger, today, threshold),
            None => Vec::new(),
        }
    }

    /// Monthly total against the configured budget.
    pub fn budget_status(&self) -> BudgetStatus {
        let currency = self.ledger.currency();
        let budget = self
            .settings
            .budget_money(currency)
            .unwrap_or_else(|_| Money::zero(currency.clone()));
        BudgetService::status(
            &self.ledger.total_cost(),
            &budget,
            self.settings.budget_alert,
            self.settings.budget_threshold,
        )
    }

    /// Records above the expense threshold while highlighting is on.
    pub fn highlighted(&self) -> Vec<&Subscription> {
        if !self.settings.highlight_expensive {
            return Vec::new();
        }
        match self.settings.expense_threshold_money(self.ledger.currency()) {
            Ok(threshold) => SummaryService::expensive(self.ledger.subscriptions(), &threshold),
            Err(_) => Vec::new(),
        }
    }

    fn auto_backup(&self) {
        if !self.settings.auto_backup {
            return;
        }
        let result = self.ledger.storage().backup_if_due(
            &self.settings.backup_location,
            self.settings.backup_frequency,
            self.ledger.clock().now(),
        );
        if let Err(err) = result {
            warn!(
                dir = %self.settings.backup_location.display(),
                error = %err,
                "automatic backup failed"
            );
        }
    }
}
