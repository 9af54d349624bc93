use std::fs;

use chrono::{Duration, NaiveDate, TimeZone, Utc};
use subtrack::{
    subtrack_config::{DefaultSort, Settings},
    subtrack_core::{FixedClock, SubscriptionStorage},
    subtrack_domain::{CurrencyCode, CurrencyPosition, Money, SubscriptionDraft, UrgencyTier},
    SubscriptionTracker, TrackerPaths,
};
use tempfile::tempdir;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()
}

fn clock() -> FixedClock {
    FixedClock::new(Utc.with_ymd_and_hms(2025, 3, 1, 8, 0, 0).unwrap())
}

fn draft(name: &str, cost: &str, days_out: i64) -> SubscriptionDraft {
    SubscriptionDraft::new(
        name,
        today() + Duration::days(days_out),
        Money::parse(cost, CurrencyCode::default()).unwrap(),
    )
}

#[test]
fn fresh_directory_opens_with_defaults() {
    subtrack::init();
    let dir = tempdir().expect("tempdir");

    let tracker = SubscriptionTracker::open_with_clock(TrackerPaths::in_dir(dir.path()), clock());

    assert!(tracker.ledger().is_empty());
    assert_eq!(tracker.load_report().error, None);
    assert_eq!(tracker.formatted_total(), "$0.00");
    assert!(tracker.pending_reminders(today()).is_empty());
}

#[test]
fn mutations_survive_reopen() {
    let dir = tempdir().expect("tempdir");
    let paths = TrackerPaths::in_dir(dir.path());

    let mut tracker = SubscriptionTracker::open_with_clock(paths.clone(), clock());
    let netflix = tracker.add(draft("Netflix", "15.49", 5)).unwrap();
    let spotify = tracker.add(draft("Spotify", "9.99", 20)).unwrap();
    tracker.remove(spotify.id()).unwrap();

    let reopened = SubscriptionTracker::open_with_clock(paths, clock());

    assert_eq!(reopened.ledger().subscriptions(), &[netflix]);
    assert_eq!(reopened.formatted_total(), "$15.49");
}

#[test]
fn settings_drive_formatting_and_views() {
    let dir = tempdir().expect("tempdir");
    let paths = TrackerPaths::in_dir(dir.path());
    let mut tracker = SubscriptionTracker::open_with_clock(paths.clone(), clock());
    tracker.add(draft("Cheap", "1.005", 30)).unwrap();
    tracker.add(draft("Pricey", "20.00", 2)).unwrap();

    tracker
        .save_settings(Settings {
            currency_symbol: "€".into(),
            currency_position: CurrencyPosition::After,
            decimal_places: 1,
            default_sort: DefaultSort::Price,
            notifications_enabled: true,
            notification_days: 7,
            highlight_expensive: true,
            expense_threshold: 10,
            ..Settings::default()
        })
        .unwrap();

    assert_eq!(tracker.formatted_total(), "21.0 €");
    let names: Vec<_> = tracker.default_view().into_iter().map(|r| r.name()).collect();
    assert_eq!(names, vec!["Pricey", "Cheap"]);
    let highlighted: Vec<_> = tracker.highlighted().into_iter().map(|r| r.name()).collect();
    assert_eq!(highlighted, vec!["Pricey"]);

    let reminders = tracker.pending_reminders(today());
    assert_eq!(reminders.len(), 1);
    assert_eq!(reminders[0].tier, UrgencyTier::Critical);

    let reopened = SubscriptionTracker::open_with_clock(paths, clock());
    assert_eq!(reopened.settings().currency_symbol, "€");
    assert_eq!(reopened.formatted_total(), "21.0 €");
}

#[test]
fn budget_status_reflects_settings() {
    let dir = tempdir().expect("tempdir");
    let mut tracker =
        SubscriptionTracker::open_with_clock(TrackerPaths::in_dir(dir.path()), clock());
    tracker.add(draft("Adobe", "59.99", 10)).unwrap();
    tracker.add(draft("Microsoft 365", "25.00", 10)).unwrap();

    assert_eq!(tracker.budget_status().percent_used, None);

    tracker
        .save_settings(Settings {
            monthly_budget: 100,
            budget_alert: true,
            budget_threshold: 80,
            ..Settings::default()
        })
        .unwrap();
    let status = tracker.budget_status();

    assert_eq!(status.percent_used, Some(84));
    assert!(status.alert);
    assert!(!status.over_budget);
}

#[test]
fn auto_backup_runs_after_mutations() {
    let dir = tempdir().expect("tempdir");
    let backups = dir.path().join("backups");
    let mut tracker =
        SubscriptionTracker::open_with_clock(TrackerPaths::in_dir(dir.path()), clock());
    tracker
        .save_settings(Settings {
            auto_backup: true,
            backup_location: backups.clone(),
            ..Settings::default()
        })
        .unwrap();

    tracker.add(draft("Hulu", "7.99", 4)).unwrap();
    tracker.add(draft("Slack", "8.75", 4)).unwrap();

    let listed = tracker.ledger().storage().list_backups(&backups).unwrap();
    assert_eq!(listed.len(), 1);
    let copied = fs::read_to_string(&listed[0].path).unwrap();
    assert!(copied.contains("Hulu"));
    assert!(!copied.contains("Slack"));
}

#[test]
fn corrupt_ledger_reports_error_and_keeps_working() {
    let dir = tempdir().expect("tempdir");
    let paths = TrackerPaths::in_dir(dir.path());
    fs::write(&paths.ledger_file, "garbage").unwrap();

    let mut tracker = SubscriptionTracker::open_with_clock(paths, clock());

    assert!(tracker.load_report().error.is_some());
    assert!(tracker.ledger().is_empty());
    let preserved = tracker.load_report().preserved_at.clone().expect("bad file kept");
    tracker.add(draft("Fresh", "2.00", 3)).unwrap();
    let stored = tracker.ledger().storage().load().unwrap();
    assert_eq!(stored.subscriptions.len(), 1);
    assert_eq!(fs::read_to_string(preserved).unwrap(), "garbage");
}
