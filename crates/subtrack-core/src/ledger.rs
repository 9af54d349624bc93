//! The authoritative in-memory subscription collection and its derived views.

use std::{cmp::Ordering, collections::HashSet, path::PathBuf};

use chrono::NaiveDate;
use subtrack_domain::{
    Category, CurrencyCode, Money, SortOrder, Subscription, SubscriptionDraft, UrgencyTier,
};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    storage::SubscriptionStorage, summary_service::total_cost, time::Clock, CoreError,
};

/// Outcome of opening a ledger from its store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub loaded: usize,
    pub skipped: usize,
    /// Set when the store could not be read at all and the ledger opened empty.
    pub error: Option<String>,
    /// Where the unreadable store was preserved, if it could be moved aside.
    pub preserved_at: Option<PathBuf>,
}

/// Owns every subscription record and writes the full collection through its
/// storage on each mutation.
///
/// Mutations build a candidate collection, persist it, and only then replace
/// the in-memory state, so a failed write leaves the ledger exactly as it was.
pub struct SubscriptionLedger<S, C> {
    storage: S,
    clock: C,
    currency: CurrencyCode,
    subscriptions: Vec<Subscription>,
}

impl<S: SubscriptionStorage, C: Clock> SubscriptionLedger<S, C> {
    /// Creates an empty ledger without reading the store.
    pub fn new(storage: S, clock: C, currency: CurrencyCode) -> Self {
        Self {
            storage,
            clock,
            currency,
            subscriptions: Vec::new(),
        }
    }

    /// Loads the stored collection. Never fails: unreadable stores open empty and
    /// invalid or duplicate records are skipped and counted.
    pub fn open(storage: S, clock: C, currency: CurrencyCode) -> (Self, LoadReport) {
        let mut ledger = Self::new(storage, clock, currency);
        let mut report = LoadReport::default();

        match ledger.storage.load() {
            Ok(loaded) => {
                report.skipped = loaded.skipped;
                if let Some(quarantined) = loaded.quarantined {
                    warn!(
                        error = %quarantined.error,
                        preserved_at = %quarantined.preserved_at.display(),
                        "subscription store unreadable, preserved and opening empty ledger"
                    );
                    report.error = Some(quarantined.error);
                    report.preserved_at = Some(quarantined.preserved_at);
                }
                let mut seen = HashSet::new();
                for record in loaded.subscriptions {
                    if record.cost().currency() != &ledger.currency {
                        warn!(
                            id = %record.id(),
                            currency = %record.cost().currency(),
                            "skipping subscription stored in a foreign currency"
                        );
                        report.skipped += 1;
                        continue;
                    }
                    if !seen.insert(record.id()) {
                        warn!(id = %record.id(), "skipping duplicate subscription id");
                        report.skipped += 1;
                        continue;
                    }
                    ledger.subscriptions.push(record);
                }
            }
            Err(err) => {
                warn!(error = %err, "subscription store unreadable, opening empty ledger");
                report.error = Some(err.to_string());
            }
        }

        report.loaded = ledger.subscriptions.len();
        info!(
            loaded = report.loaded,
            skipped = report.skipped,
            "subscription ledger opened"
        );
        (ledger, report)
    }

    pub fn currency(&self) -> &CurrencyCode {
        &self.currency
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Records in insertion order.
    pub fn subscriptions(&self) -> &[Subscription] {
        &self.subscriptions
    }

    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }

    pub fn get(&self, id: Uuid) -> Option<&Subscription> {
        self.subscriptions.iter().find(|record| record.id() == id)
    }

    /// Validates the draft, assigns a fresh id and `date_added`, and persists.
    pub fn add(&mut self, draft: SubscriptionDraft) -> Result<Subscription, CoreError> {
        self.ensure_currency(&draft)?;
        let record = Subscription::create(draft, self.clock.now())?;
        let mut next = self.subscriptions.clone();
        next.push(record.clone());
        self.commit(next)?;
        info!(id = %record.id(), name = record.name(), "subscription added");
        Ok(record)
    }

    /// Replaces every mutable field of the record with `id`, then persists.
    pub fn update(&mut self, id: Uuid, draft: SubscriptionDraft) -> Result<Subscription, CoreError> {
        let index = self.position(id)?;
        self.ensure_currency(&draft)?;
        let updated = self.subscriptions[index].replaced_with(draft)?;
        let mut next = self.subscriptions.clone();
        next[index] = updated.clone();
        self.commit(next)?;
        info!(id = %id, name = updated.name(), "subscription updated");
        Ok(updated)
    }

    /// Removes the record with `id`, then persists. Returns the removed record.
    pub fn remove(&mut self, id: Uuid) -> Result<Subscription, CoreError> {
        let index = self.position(id)?;
        let mut next = self.subscriptions.clone();
        let removed = next.remove(index);
        self.commit(next)?;
        info!(id = %id, name = removed.name(), "subscription removed");
        Ok(removed)
    }

    /// Sum of all costs; zero for an empty ledger.
    pub fn total_cost(&self) -> Money {
        total_cost(&self.subscriptions, &self.currency)
    }

    /// Signed day count from `today` to the record's renewal date.
    pub fn days_until_renewal(&self, record: &Subscription, today: NaiveDate) -> i64 {
        record.days_until_renewal(today)
    }

    pub fn urgency_tier(&self, days: i64) -> UrgencyTier {
        UrgencyTier::from_days(days)
    }

    pub fn urgency_of(&self, record: &Subscription, today: NaiveDate) -> UrgencyTier {
        self.urgency_tier(self.days_until_renewal(record, today))
    }

    /// Records renewing within `threshold_days` of `today`, overdue ones included.
    pub fn due_for_reminder(&self, today: NaiveDate, threshold_days: i64) -> Vec<&Subscription> {
        self.subscriptions
            .iter()
            .filter(|record| self.days_until_renewal(record, today) <= threshold_days)
            .collect()
    }

    /// Stable, non-mutating ordered view.
    pub fn sort(&self, order: SortOrder) -> Vec<&Subscription> {
        let mut view: Vec<&Subscription> = self.subscriptions.iter().collect();
        view.sort_by(|a, b| compare(order, a, b));
        view
    }

    /// Case-insensitive substring match on the name; an empty query keeps everything.
    pub fn filter(&self, query: &str) -> Vec<&Subscription> {
        let needle = query.to_lowercase();
        if needle.is_empty() {
            return self.subscriptions.iter().collect();
        }
        self.filter_by(|record| record.name().to_lowercase().contains(&needle))
    }

    pub fn filter_by<P>(&self, predicate: P) -> Vec<&Subscription>
    where
        P: Fn(&Subscription) -> bool,
    {
        self.subscriptions
            .iter()
            .filter(|record| predicate(*record))
            .collect()
    }

    /// Records in `category`; `None` selects uncategorised records.
    pub fn in_category(&self, category: Option<Category>) -> Vec<&Subscription> {
        self.filter_by(|record| record.category() == category)
    }

    /// Records whose id is listed, in ledger order. Unknown ids are ignored.
    pub fn select_subset(&self, ids: &[Uuid]) -> Vec<&Subscription> {
        let wanted: HashSet<Uuid> = ids.iter().copied().collect();
        self.filter_by(|record| wanted.contains(&record.id()))
    }

    fn position(&self, id: Uuid) -> Result<usize, CoreError> {
        self.subscriptions
            .iter()
            .position(|record| record.id() == id)
            .ok_or(CoreError::NotFound(id))
    }

    fn ensure_currency(&self, draft: &SubscriptionDraft) -> Result<(), CoreError> {
        if draft.cost.currency() != &self.currency {
            return Err(CoreError::Validation(format!(
                "cost is in {} but the ledger tracks {}",
                draft.cost.currency(),
                self.currency
            )));
        }
        Ok(())
    }

    fn commit(&mut self, next: Vec<Subscription>) -> Result<(), CoreError> {
        if let Err(err) = self.storage.save(&next) {
            warn!(error = %err, "save failed, mutation rolled back");
            return Err(match err {
                CoreError::Persistence(_) => err,
                other => CoreError::Persistence(other.to_string()),
            });
        }
        debug!(count = next.len(), "subscription collection persisted");
        self.subscriptions = next;
        Ok(())
    }
}

/// Comparator behind [`SubscriptionLedger::sort`].
pub fn compare(order: SortOrder, a: &Subscription, b: &Subscription) -> Ordering {
    match order {
        SortOrder::NameAscending => name_key(a).cmp(&name_key(b)),
        SortOrder::NameDescending => name_key(b).cmp(&name_key(a)),
        SortOrder::PriceHighToLow => b.cost().minor_units().cmp(&a.cost().minor_units()),
        SortOrder::PriceLowToHigh => a.cost().minor_units().cmp(&b.cost().minor_units()),
        SortOrder::DueSoon => a.renewal_date().cmp(&b.renewal_date()),
        SortOrder::DueLater => b.renewal_date().cmp(&a.renewal_date()),
        SortOrder::RecentlyAdded => b.date_added().cmp(&a.date_added()),
        SortOrder::OldestAdded => a.date_added().cmp(&b.date_added()),
    }
}

fn name_key(record: &Subscription) -> String {
    record.name().to_lowercase()
}
