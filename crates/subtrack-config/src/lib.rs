//! subtrack-config
//!
//! Persistent user preferences for the subscription tracker.
//! Owns the Settings snapshot plus its tolerant load and atomic save.

pub mod error;
pub mod manager;
pub mod model;

pub use error::ConfigError;
pub use manager::SettingsStore;
pub use model::{DefaultSort, Settings, Theme};
