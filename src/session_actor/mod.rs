//! The actor that owns a [`PurchaseFlow`](crate::purchase_flow::PurchaseFlow)
//! and drives its timed phase transitions.

mod schedule;
pub mod service;

pub use schedule::PhaseTimings;
pub use service::PurchaseSession;
