//! subtrack-storage-json
//!
//! File-backed persistence for the subscription ledger: a single pretty-printed
//! JSON array plus timestamped backup copies.

mod backup;
mod record;

use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use chrono::Utc;
use serde_json::Value;
use subtrack_core::{
    storage::{LoadedSubscriptions, Quarantined, SubscriptionStorage},
    CoreError,
};
use subtrack_domain::{CurrencyCode, Subscription};
use tracing::{debug, warn};

pub use backup::{BackupInfo, DEFAULT_RETENTION};
use record::{RawSubscription, StoredSubscription};

pub const LEDGER_FILE: &str = "subscriptions.json";
const TMP_SUFFIX: &str = "tmp";
const QUARANTINE_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Stores the whole subscription collection in one JSON file.
#[derive(Debug, Clone)]
pub struct JsonSubscriptionStorage {
    path: PathBuf,
    currency: CurrencyCode,
    retention: usize,
}

impl JsonSubscriptionStorage {
    /// Costs read from `path` are interpreted in `currency`.
    pub fn new(path: PathBuf, currency: CurrencyCode) -> Self {
        Self::with_retention(path, currency, DEFAULT_RETENTION)
    }

    pub fn with_retention(path: PathBuf, currency: CurrencyCode, retention: usize) -> Self {
        Self {
            path,
            currency,
            retention: retention.max(1),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn currency(&self) -> &CurrencyCode {
        &self.currency
    }

    pub fn retention(&self) -> usize {
        self.retention
    }

    /// Renames an unparsable ledger file to `<stem>.corrupt_<stamp>.json`
    /// next to it and returns the new path.
    fn quarantine(&self) -> Result<PathBuf, CoreError> {
        let stem = self
            .path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or("subscriptions");
        let stamp = Utc::now().format(QUARANTINE_TIMESTAMP_FORMAT);
        let target = self
            .path
            .with_file_name(format!("{stem}.corrupt_{stamp}.json"));
        fs::rename(&self.path, &target).map_err(|err| {
            CoreError::Persistence(format!(
                "{} is unreadable and could not be moved aside: {}",
                self.path.display(),
                err
            ))
        })?;
        warn!(
            from = %self.path.display(),
            to = %target.display(),
            "unreadable ledger file preserved"
        );
        Ok(target)
    }
}

impl SubscriptionStorage for JsonSubscriptionStorage {
    /// A missing file is an empty ledger. Entries that fail validation are
    /// skipped and counted. A file that is not a JSON array is moved aside and
    /// reported through [`LoadedSubscriptions::quarantined`].
    fn load(&self) -> Result<LoadedSubscriptions, CoreError> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "no ledger file yet");
            return Ok(LoadedSubscriptions::default());
        }
        let data = fs::read_to_string(&self.path)?;
        let entries: Vec<Value> = match serde_json::from_str(&data) {
            Ok(entries) => entries,
            Err(err) => {
                let error = format!("{}: {}", self.path.display(), err);
                let preserved_at = self.quarantine()?;
                return Ok(LoadedSubscriptions {
                    quarantined: Some(Quarantined {
                        error,
                        preserved_at,
                    }),
                    ..LoadedSubscriptions::default()
                });
            }
        };

        let loaded_at = Utc::now();
        let mut loaded = LoadedSubscriptions::default();
        for (index, entry) in entries.into_iter().enumerate() {
            let parsed = serde_json::from_value::<RawSubscription>(entry)
                .map_err(|err| err.to_string())
                .and_then(|raw| raw.into_subscription(&self.currency, loaded_at));
            match parsed {
                Ok(record) => loaded.subscriptions.push(record),
                Err(reason) => {
                    warn!(index, %reason, "skipping invalid subscription entry");
                    loaded.skipped += 1;
                }
            }
        }
        Ok(loaded)
    }

    fn save(&self, subscriptions: &[Subscription]) -> Result<(), CoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let stored: Vec<StoredSubscription> =
            subscriptions.iter().map(StoredSubscription::from).collect();
        let json = serde_json::to_string_pretty(&stored)
            .map_err(|err| CoreError::Persistence(err.to_string()))?;
        let tmp = tmp_path(&self.path);
        write_atomic(&tmp, &json)?;
        if let Err(err) = fs::rename(&tmp, &self.path) {
            let _ = fs::remove_file(&tmp);
            return Err(err.into());
        }
        debug!(path = %self.path.display(), count = subscriptions.len(), "ledger file written");
        Ok(())
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<(), CoreError> {
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.sync_all()?;
    Ok(())
}
