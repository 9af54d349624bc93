#![doc(test(attr(deny(warnings))))]

//! Subtrack keeps a ledger of recurring subscriptions: what they cost, when
//! they renew, and how the total compares with a monthly budget.
//!
//! The [`SubscriptionTracker`] facade wires the JSON ledger file and the
//! settings file together; the member crates can also be used on their own.

pub mod tracker;
pub mod utils;

pub use subtrack_config;
pub use subtrack_core;
pub use subtrack_domain;
pub use subtrack_storage_json;

pub use tracker::{SubscriptionTracker, TrackerPaths};

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Subtrack tracing initialized.");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_is_idempotent() {
        super::init();
        super::init();
    }
}
