use std::fs;

use chrono::{Duration, NaiveDate, TimeZone, Utc};
use subtrack_core::{
    storage::SubscriptionStorage,
    time::{Clock, FixedClock},
    SubscriptionLedger,
};
use subtrack_domain::{
    BackupFrequency, Category, CurrencyCode, HexColor, Money, SubscriptionDraft,
};
use subtrack_storage_json::JsonSubscriptionStorage;
use tempfile::tempdir;
use uuid::Uuid;

fn clock() -> FixedClock {
    FixedClock::new(Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap())
}

fn draft(name: &str, cost: &str) -> SubscriptionDraft {
    SubscriptionDraft::new(
        name,
        NaiveDate::from_ymd_opt(2025, 3, 6).unwrap(),
        Money::parse(cost, CurrencyCode::default()).unwrap(),
    )
}

#[test]
fn ledger_round_trips_through_file() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("subscriptions.json");
    let storage = JsonSubscriptionStorage::new(path.clone(), CurrencyCode::default());
    let (mut ledger, _) = SubscriptionLedger::open(&storage, clock(), CurrencyCode::default());

    ledger
        .add(
            draft("Netflix", "15.49")
                .with_color(HexColor::parse("#e50914").unwrap())
                .with_logo("logos/netflix.png")
                .with_category(Category::Entertainment),
        )
        .expect("add netflix");
    ledger
        .add(draft("Dropbox", "11.99").with_category(Category::CloudStorage))
        .expect("add dropbox");
    ledger.add(draft("Misc", "3")).expect("add misc");

    let reopened = JsonSubscriptionStorage::new(path, CurrencyCode::default());
    let (loaded, report) =
        SubscriptionLedger::open(&reopened, clock(), CurrencyCode::default());

    assert_eq!(report.loaded, 3);
    assert_eq!(report.skipped, 0);
    assert_eq!(loaded.subscriptions(), ledger.subscriptions());
}

#[test]
fn file_uses_documented_field_shapes() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("subscriptions.json");
    let storage = JsonSubscriptionStorage::new(path.clone(), CurrencyCode::default());
    let (mut ledger, _) = SubscriptionLedger::open(&storage, clock(), CurrencyCode::default());
    ledger
        .add(draft("Dropbox", "11.9").with_category(Category::CloudStorage))
        .unwrap();

    let value: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    let entry = &value[0];

    assert_eq!(entry["name"], "Dropbox");
    assert_eq!(entry["renewal_date"], "2025-03-06");
    assert_eq!(entry["cost"], "11.90");
    assert_eq!(entry["color"], "#4F46E5");
    assert_eq!(entry["category"], "Cloud Storage");
    assert!(entry.get("logo").is_none());
    assert!(entry["id"].is_string());
    assert!(entry["date_added"].is_string());
}

#[test]
fn invalid_entries_are_skipped_and_counted() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("subscriptions.json");
    fs::write(
        &path,
        r#"[
            {"name": "Free", "renewal_date": "2025-03-10", "cost": "0.00"},
            {"renewal_date": "2025-03-10", "cost": "4.99"},
            {"name": "Spotify", "renewal_date": "2025-03-10", "cost": 9.99,
             "category": "Podcasts", "color": "not-a-color"}
        ]"#,
    )
    .unwrap();

    let storage = JsonSubscriptionStorage::new(path, CurrencyCode::default());
    let loaded = storage.load().expect("load");

    assert_eq!(loaded.skipped, 2);
    assert_eq!(loaded.subscriptions.len(), 1);
    let spotify = &loaded.subscriptions[0];
    assert_eq!(spotify.name(), "Spotify");
    assert_eq!(spotify.cost().minor_units(), 999);
    assert_eq!(spotify.category(), None);
    assert_eq!(spotify.color().as_str(), "#4F46E5");
}

#[test]
fn remove_of_unknown_id_leaves_file_unchanged() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("subscriptions.json");
    let storage = JsonSubscriptionStorage::new(path.clone(), CurrencyCode::default());
    let (mut ledger, _) = SubscriptionLedger::open(&storage, clock(), CurrencyCode::default());
    ledger.add(draft("Hulu", "7.99")).unwrap();
    let before = fs::read_to_string(&path).unwrap();

    let err = ledger.remove(Uuid::new_v4()).unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(fs::read_to_string(&path).unwrap(), before);
}

#[test]
fn failed_save_preserves_previous_file() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("subscriptions.json");
    let storage = JsonSubscriptionStorage::new(path.clone(), CurrencyCode::default());
    let (mut ledger, _) = SubscriptionLedger::open(&storage, clock(), CurrencyCode::default());
    let kept = ledger.add(draft("Hulu", "7.99")).unwrap();
    let before = fs::read_to_string(&path).unwrap();

    fs::create_dir(dir.path().join("subscriptions.json.tmp")).unwrap();
    let err = ledger.add(draft("Slack", "8.75")).unwrap_err();

    assert!(err.is_persistence());
    assert_eq!(ledger.subscriptions(), &[kept]);
    assert_eq!(fs::read_to_string(&path).unwrap(), before);
}

#[test]
fn corrupt_file_opens_empty_with_error() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("subscriptions.json");
    fs::write(&path, "{\"name\": \"not an array\"").unwrap();
    let storage = JsonSubscriptionStorage::new(path, CurrencyCode::default());

    let (ledger, report) = SubscriptionLedger::open(&storage, clock(), CurrencyCode::default());

    assert!(ledger.is_empty());
    assert_eq!(report.loaded, 0);
    assert!(report.error.is_some());
    assert!(report.preserved_at.is_some());
}

#[test]
fn corrupt_file_is_preserved_before_next_save() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("subscriptions.json");
    let damaged = r#"[{"name":"Netflix","renewal_date":"2025-03-10","cost":"15.49"},, ]"#;
    fs::write(&path, damaged).unwrap();
    let storage = JsonSubscriptionStorage::new(path.clone(), CurrencyCode::default());

    let (mut ledger, report) =
        SubscriptionLedger::open(&storage, clock(), CurrencyCode::default());

    assert!(report.error.is_some());
    let preserved = report.preserved_at.expect("damaged file moved aside");
    assert_eq!(preserved.parent(), path.parent());
    let name = preserved.file_name().unwrap().to_string_lossy().into_owned();
    assert!(name.starts_with("subscriptions.corrupt_"), "{name}");
    assert!(name.ends_with(".json"), "{name}");
    assert!(!path.exists());

    ledger.add(draft("Fresh", "2.00")).expect("add after corrupt open");

    assert_eq!(fs::read_to_string(&preserved).unwrap(), damaged);
    let current = fs::read_to_string(&path).unwrap();
    assert!(current.contains("Fresh"));
    assert!(!current.contains("Netflix"));
}

#[test]
fn missing_file_opens_empty_without_error() {
    let dir = tempdir().expect("tempdir");
    let storage =
        JsonSubscriptionStorage::new(dir.path().join("absent.json"), CurrencyCode::default());

    let (ledger, report) = SubscriptionLedger::open(&storage, clock(), CurrencyCode::default());

    assert!(ledger.is_empty());
    assert_eq!(report.error, None);
}

#[test]
fn backups_are_rotated_and_listed_newest_first() {
    let dir = tempdir().expect("tempdir");
    let backups = dir.path().join("backups");
    let storage = JsonSubscriptionStorage::with_retention(
        dir.path().join("subscriptions.json"),
        CurrencyCode::default(),
        3,
    );
    storage.save(&[]).unwrap();

    let start = clock().now();
    for hour in 0..5 {
        storage
            .backup(&backups, start + Duration::hours(hour))
            .expect("backup");
    }

    let listed = storage.list_backups(&backups).unwrap();
    assert_eq!(listed.len(), 3);
    assert_eq!(listed[0].created_at, start + Duration::hours(4));
    assert_eq!(listed[2].created_at, start + Duration::hours(2));
    assert!(listed[0].file_name.starts_with("subscriptions_20250301_"));
}

#[test]
fn backup_if_due_respects_frequency() {
    let dir = tempdir().expect("tempdir");
    let backups = dir.path().join("backups");
    let storage = JsonSubscriptionStorage::new(
        dir.path().join("subscriptions.json"),
        CurrencyCode::default(),
    );
    let start = clock().now();

    assert_eq!(
        storage
            .backup_if_due(&backups, BackupFrequency::Weekly, start)
            .unwrap(),
        None
    );

    storage.save(&[]).unwrap();
    let first = storage
        .backup_if_due(&backups, BackupFrequency::Weekly, start)
        .unwrap();
    let too_soon = storage
        .backup_if_due(&backups, BackupFrequency::Weekly, start + Duration::days(6))
        .unwrap();
    let due = storage
        .backup_if_due(&backups, BackupFrequency::Weekly, start + Duration::days(7))
        .unwrap();

    assert!(first.is_some());
    assert!(too_soon.is_none());
    assert!(due.is_some());
    assert_eq!(storage.list_backups(&backups).unwrap().len(), 2);
}
