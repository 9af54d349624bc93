//! subtrack-domain
//!
//! Pure domain models (Money, Subscription, Category, urgency tiers, sort orders).
//! No I/O, no storage. Only data types, their invariants and core enums.

pub mod catalog;
pub mod category;
pub mod common;
pub mod money;
pub mod sort;
pub mod subscription;
pub mod urgency;

pub use catalog::*;
pub use category::*;
pub use common::*;
pub use money::*;
pub use sort::*;
pub use subscription::*;
pub use urgency::*;
