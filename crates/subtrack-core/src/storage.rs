use std::{
    cell::{Cell, RefCell},
    path::PathBuf,
};

use subtrack_domain::Subscription;

use crate::CoreError;

/// Records recovered from a store, plus how many entries had to be dropped.
#[derive(Debug, Clone, Default)]
pub struct LoadedSubscriptions {
    pub subscriptions: Vec<Subscription>,
    pub skipped: usize,
    /// Set when the store was unreadable and was moved aside before starting empty.
    pub quarantined: Option<Quarantined>,
}

/// An unreadable store that was moved out of the way so the next save cannot
/// overwrite it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quarantined {
    pub error: String,
    pub preserved_at: PathBuf,
}

/// Abstraction over persistence backends holding the full subscription collection.
///
/// `save` always receives the complete collection and must replace the stored
/// snapshot as a whole; a failed save must leave the previous snapshot readable.
pub trait SubscriptionStorage {
    fn load(&self) -> Result<LoadedSubscriptions, CoreError>;
    fn save(&self, subscriptions: &[Subscription]) -> Result<(), CoreError>;
}

/// Volatile storage, used by tests and by callers that do not want a file.
#[derive(Debug, Default)]
pub struct InMemoryStorage {
    snapshot: RefCell<Vec<Subscription>>,
    fail_saves: Cell<bool>,
    save_count: Cell<usize>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<Subscription>) -> Self {
        Self {
            snapshot: RefCell::new(records),
            ..Self::default()
        }
    }

    /// Makes every following `save` fail until switched back off.
    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.set(fail);
    }

    pub fn snapshot(&self) -> Vec<Subscription> {
        self.snapshot.borrow().clone()
    }

    pub fn save_count(&self) -> usize {
        self.save_count.get()
    }
}

impl SubscriptionStorage for InMemoryStorage {
    fn load(&self) -> Result<LoadedSubscriptions, CoreError> {
        Ok(LoadedSubscriptions {
            subscriptions: self.snapshot(),
            ..LoadedSubscriptions::default()
        })
    }

    fn save(&self, subscriptions: &[Subscription]) -> Result<(), CoreError> {
        if self.fail_saves.get() {
            return Err(CoreError::Persistence("in-memory store is read-only".into()));
        }
        *self.snapshot.borrow_mut() = subscriptions.to_vec();
        self.save_count.set(self.save_count.get() + 1);
        Ok(())
    }
}

impl<T: SubscriptionStorage + ?Sized> SubscriptionStorage for &T {
    fn load(&self) -> Result<LoadedSubscriptions, CoreError> {
        (**self).load()
    }

    fn save(&self, subscriptions: &[Subscription]) -> Result<(), CoreError> {
        (**self).save(subscriptions)
    }
}
