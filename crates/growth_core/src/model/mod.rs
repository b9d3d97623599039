//! Journal domain model and staging rules.
//!
//! # Responsibility
//! - Define the journal item record shared by storage and services.
//! - Hold the pure temporal staging logic that gates reflections.
//!
//! # Invariants
//! - Every journal item is identified by a stable `ItemId`.
//! - Stage and eligibility are derived values, never persisted.

pub mod journal_item;
pub mod stage;
