use std::{
    cmp::Reverse,
    fs,
    path::{Path, PathBuf},
};

use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use subtrack_core::CoreError;
use subtrack_domain::BackupFrequency;
use tracing::{debug, info, warn};

use crate::JsonSubscriptionStorage;

/// Number of backup copies kept per ledger.
pub const DEFAULT_RETENTION: usize = 5;

const BACKUP_EXTENSION: &str = "json";
const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupInfo {
    pub file_name: String,
    pub path: PathBuf,
    pub created_at: DateTime<Utc>,
}

impl JsonSubscriptionStorage {
    /// Copies the ledger file to `<dir>/<stem>_YYYYmmdd_HHMM.json` and prunes
    /// all but the newest copies.
    pub fn backup(&self, dir: &Path, now: DateTime<Utc>) -> Result<BackupInfo, CoreError> {
        if !self.path().exists() {
            return Err(CoreError::Persistence(format!(
                "nothing to back up at {}",
                self.path().display()
            )));
        }
        fs::create_dir_all(dir)?;
        let file_name = format!(
            "{}_{}.{}",
            self.backup_stem(),
            now.format(BACKUP_TIMESTAMP_FORMAT),
            BACKUP_EXTENSION
        );
        let path = dir.join(&file_name);
        fs::copy(self.path(), &path)?;
        info!(path = %path.display(), "ledger backup written");
        self.prune_backups(dir)?;
        Ok(BackupInfo {
            created_at: parse_backup_timestamp(&file_name).unwrap_or(now),
            file_name,
            path,
        })
    }

    /// Backs up only when the newest copy in `dir` is at least one `frequency`
    /// old. Returns `None` when nothing was written.
    pub fn backup_if_due(
        &self,
        dir: &Path,
        frequency: BackupFrequency,
        now: DateTime<Utc>,
    ) -> Result<Option<BackupInfo>, CoreError> {
        if !self.path().exists() {
            return Ok(None);
        }
        let newest = self.list_backups(dir)?.into_iter().next();
        if let Some(latest) = newest {
            if now - latest.created_at < Duration::days(frequency.days()) {
                debug!(latest = %latest.file_name, %frequency, "backup not due yet");
                return Ok(None);
            }
        }
        self.backup(dir, now).map(Some)
    }

    /// Backups of this ledger in `dir`, newest first.
    pub fn list_backups(&self, dir: &Path) -> Result<Vec<BackupInfo>, CoreError> {
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let prefix = format!("{}_", self.backup_stem());
        let mut entries = Vec::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }
            let Some(file_name) = path.file_name().and_then(|name| name.to_str()) else {
                continue;
            };
            let Some(stamp) = file_name.strip_prefix(&prefix) else {
                continue;
            };
            if let Some(created_at) = parse_backup_timestamp(stamp) {
                entries.push(BackupInfo {
                    file_name: file_name.to_string(),
                    path: path.clone(),
                    created_at,
                });
            }
        }
        entries.sort_by_key(|info| Reverse(info.created_at));
        Ok(entries)
    }

    fn prune_backups(&self, dir: &Path) -> Result<(), CoreError> {
        for stale in self.list_backups(dir)?.into_iter().skip(self.retention()) {
            debug!(path = %stale.path.display(), "pruning old backup");
            remove_stale(&stale.path);
        }
        Ok(())
    }

    fn backup_stem(&self) -> &str {
        self.path()
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or("subscriptions")
    }
}

/// A backup that cannot be removed is left in place and logged; pruning goes on.
fn remove_stale(path: &Path) -> bool {
    match fs::remove_file(path) {
        Ok(()) => true,
        Err(err) => {
            warn!(path = %path.display(), error = %err, "failed to prune old backup");
            false
        }
    }
}

/// Reads the trailing `YYYYmmdd_HHMM` stamp of a backup file name.
fn parse_backup_timestamp(name: &str) -> Option<DateTime<Utc>> {
    let trimmed = name.strip_suffix(&format!(".{}", BACKUP_EXTENSION))?;
    let mut segments = trimmed.rsplit('_');
    let time = segments.next()?;
    let date = segments.next()?;
    if !is_digits(date, 8) || !is_digits(time, 4) {
        return None;
    }
    NaiveDateTime::parse_from_str(&format!("{}{}", date, time), "%Y%m%d%H%M")
        .ok()
        .map(|naive| DateTime::from_naive_utc_and_offset(naive, Utc))
}

fn is_digits(value: &str, len: usize) -> bool {
    value.len() == len && value.chars().all(|c| c.is_ascii_digit())
}
