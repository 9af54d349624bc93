//! subtrack-core
//!
//! Business logic for the subscription ledger: validation at the boundary,
//! the ledger itself, formatting and derived statistics.
//! Depends on subtrack-domain. No terminal I/O, no concrete storage format.

pub mod budget_service;
pub mod error;
pub mod format;
pub mod input;
pub mod ledger;
pub mod reminder_service;
pub mod storage;
pub mod summary_service;
pub mod time;

pub use budget_service::*;
pub use error::CoreError;
pub use format::*;
pub use input::*;
pub use ledger::*;
pub use reminder_service::*;
pub use storage::*;
pub use summary_service::*;
pub use time::*;
