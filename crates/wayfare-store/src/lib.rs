//! Storage layer for wayfare: the trip document model, the local draft
//! cache, the authoritative trip store contract, and provider payload
//! normalization.

pub mod config;
pub mod draft;
pub mod ids;
pub mod models;
pub mod normalize;
pub mod trips;
