//! Slot scheduling: time allocation within a slot and absolute
//! timestamping at the persistence boundary.

pub mod allocate;
pub mod stamp;

pub use allocate::{allocate, reflow_lunch, reflow_slot};
pub use stamp::{StampError, stamp};
