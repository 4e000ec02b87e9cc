//! The purchase state machine: selection clamping, the purchase guard and the
//! timer-driven phase transitions, with no async or I/O concerns.

pub mod error;
pub mod flow;
pub mod notice;
pub mod snapshot;

pub use error::*;
pub use flow::*;
pub use notice::*;
pub use snapshot::*;
