//! Renewal reminders derived from the ledger.

use chrono::NaiveDate;
use subtrack_domain::{Subscription, UrgencyTier};
use uuid::Uuid;

use crate::{ledger::SubscriptionLedger, storage::SubscriptionStorage, time::Clock};

pub const REMINDER_TITLE: &str = "Subscription Renewal Reminder";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reminder {
    pub id: Uuid,
    pub name: String,
    pub days_until: i64,
    pub tier: UrgencyTier,
}

impl Reminder {
    fn from_record(record: &Subscription, today: NaiveDate) -> Self {
        let days_until = record.days_until_renewal(today);
        Self {
            id: record.id(),
            name: record.name().to_string(),
            days_until,
            tier: UrgencyTier::from_days(days_until),
        }
    }

    /// Notification body. Records past their renewal date read as overdue.
    pub fn message(&self) -> String {
        match self.days_until {
            days if days < 0 => format!(
                "{} is overdue by {} {}.",
                self.name,
                -days,
                day_unit(-days)
            ),
            0 => format!("{} is due for renewal today.", self.name),
            days => format!(
                "{} is due for renewal in {} {}.",
                self.name,
                days,
                day_unit(days)
            ),
        }
    }
}

fn day_unit(days: i64) -> &'static str {
    if days == 1 {
        "day"
    } else {
        "days"
    }
}

pub struct ReminderService;

impl ReminderService {
    /// Reminders for every record due within `threshold_days`, soonest first.
    /// Callers track which reminders were already shown.
    pub fn reminders<S, C>(
        ledger: &SubscriptionLedger<S, C>,
        today: NaiveDate,
        threshold_days: i64,
    ) -> Vec<Reminder>
    where
        S: SubscriptionStorage,
        C: Clock,
    {
        let mut reminders: Vec<Reminder> = ledger
            .due_for_reminder(today, threshold_days)
            .into_iter()
            .map(|record| Reminder::from_record(record, today))
            .collect();
        reminders.sort_by_key(|reminder| reminder.days_until);
        reminders
    }
}
