//! Core domain logic for the growth journal.
//!
//! Owns the temporal staging rules that unlock reflections on journaled
//! experiences, and the persisted collection those experiences live in.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{ConfigError, CoreConfig};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::journal_item::{ItemId, JournalItem, JournalItemValidationError};
pub use model::stage::{
    available_action, benefit_unlocks_at, classify, is_ready_for_benefit, is_ready_for_lesson,
    lesson_unlocks_at, ReflectiveAction, Stage, BENEFIT_DELAY_MONTHS, LESSON_DELAY_DAYS,
};
pub use repo::item_store::{ItemStore, StoreError, StoreResult, STORAGE_KEY};
pub use repo::slot_store::{MemorySlotStore, SlotError, SlotResult, SlotStore, SqliteSlotStore};
pub use service::journal_service::{
    ActionableItem, Clock, JournalService, JournalServiceError, SystemClock,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
