//! Editing core for wayfare itineraries.
//!
//! Everything with non-trivial invariants lives here: the time formatter,
//! the slot time allocator, the schedule stamper, the move validator, the
//! itinerary reducer, the hotel synchronizer, the edit session, and the
//! save reconciler. The storage layer (`wayfare-store`) supplies the
//! document types and the persistence collaborators.

pub mod hotel;
pub mod moves;
pub mod reduce;
pub mod save;
pub mod schedule;
pub mod session;
pub mod timefmt;
