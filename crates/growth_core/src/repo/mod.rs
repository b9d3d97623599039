//! Persistence for the journal item collection.
//!
//! # Responsibility
//! - Define the key-value slot medium contract and its implementations.
//! - Store the whole journal collection as one serialized slot value.
//!
//! # Invariants
//! - Callers only see `ItemStore`; slot media never interpret payloads.

pub mod item_store;
pub mod slot_store;
