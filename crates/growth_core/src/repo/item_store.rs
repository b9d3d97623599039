//! Whole-collection journal item store.
//!
//! # Responsibility
//! - Persist every journal item as one JSON array in a single slot.
//! - Offer upsert/list/get/delete/clear over that collection.
//!
//! # Invariants
//! - Every mutation is read whole collection -> modify -> write whole
//!   collection. Concurrent mutations are last-write-wins.
//! - Read failures (missing medium, bad JSON) surface as an empty
//!   collection and are only logged.
//! - Write failures are returned to the caller; nothing is retried.
//! - Write paths call `JournalItem::validate()` before touching storage.
//! - Storage order is first-insertion order; no sorting happens here.

use crate::model::journal_item::{ItemId, JournalItem, JournalItemValidationError};
use crate::repo::slot_store::{SlotError, SlotStore};
use log::{debug, error, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Slot key holding the serialized collection.
pub const STORAGE_KEY: &str = "growth_experiences";

pub type StoreResult<T> = Result<T, StoreError>;

/// Write-path failure of the item store.
#[derive(Debug)]
pub enum StoreError {
    Validation(JournalItemValidationError),
    Encode(serde_json::Error),
    Write(SlotError),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "invalid journal item: {err}"),
            Self::Encode(err) => write!(f, "failed to encode journal items: {err}"),
            Self::Write(err) => write!(f, "failed to write journal items: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Encode(err) => Some(err),
            Self::Write(err) => Some(err),
        }
    }
}

impl From<JournalItemValidationError> for StoreError {
    fn from(value: JournalItemValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<SlotError> for StoreError {
    fn from(value: SlotError) -> Self {
        Self::Write(value)
    }
}

/// Journal item collection persisted in one slot of a `SlotStore`.
///
/// Construct once at startup and hand it to consumers; there is no global
/// instance.
pub struct ItemStore<S: SlotStore> {
    slots: S,
    key: String,
}

impl<S: SlotStore> ItemStore<S> {
    /// Creates a store over `slots` using `STORAGE_KEY`.
    pub fn new(slots: S) -> Self {
        Self::with_key(slots, STORAGE_KEY)
    }

    /// Creates a store over `slots` using a custom slot key.
    pub fn with_key(slots: S, key: impl Into<String>) -> Self {
        Self {
            slots,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Underlying slot medium.
    pub fn slots(&self) -> &S {
        &self.slots
    }

    /// Inserts `item`, or replaces the stored item with the same id in place.
    pub fn upsert(&self, item: &JournalItem) -> StoreResult<()> {
        item.validate()?;

        let mut items = self.list();
        match items.iter_mut().find(|existing| existing.id == item.id) {
            Some(existing) => *existing = item.clone(),
            None => items.push(item.clone()),
        }

        self.write_collection(&items, "store_upsert")
    }

    /// Returns the full collection in storage order.
    ///
    /// Never fails: unreadable or corrupt storage yields an empty list.
    pub fn list(&self) -> Vec<JournalItem> {
        let payload = match self.slots.read_slot(&self.key) {
            Ok(Some(payload)) => payload,
            Ok(None) => return Vec::new(),
            Err(err) => {
                warn!(
                    "event=store_read module=store status=error error_code=slot_read_failed key={} error={err}",
                    self.key
                );
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<JournalItem>>(&payload) {
            Ok(items) => items,
            Err(err) => {
                // Only the serde position is logged; the payload holds journal text.
                warn!(
                    "event=store_read module=store status=error error_code=payload_decode_failed key={} line={} column={}",
                    self.key,
                    err.line(),
                    err.column()
                );
                Vec::new()
            }
        }
    }

    /// Finds one item by id.
    pub fn get_by_id(&self, id: &ItemId) -> Option<JournalItem> {
        self.list().into_iter().find(|item| &item.id == id)
    }

    /// Removes the item with `id`. Missing ids are a no-op.
    pub fn delete(&self, id: &ItemId) -> StoreResult<()> {
        let mut items = self.list();
        let before = items.len();
        items.retain(|item| &item.id != id);

        if items.len() == before {
            debug!("event=store_delete module=store status=skipped reason=not_found");
            return Ok(());
        }

        self.write_collection(&items, "store_delete")
    }

    /// Wipes the entire collection.
    pub fn clear_all(&self) -> StoreResult<()> {
        self.slots.remove_slot(&self.key).map_err(|err| {
            error!(
                "event=store_clear module=store status=error error_code=slot_remove_failed key={} error={err}",
                self.key
            );
            StoreError::Write(err)
        })?;
        debug!("event=store_clear module=store status=ok key={}", self.key);
        Ok(())
    }

    fn write_collection(&self, items: &[JournalItem], event: &str) -> StoreResult<()> {
        let payload = serde_json::to_string(items).map_err(StoreError::Encode)?;
        if let Err(err) = self.slots.write_slot(&self.key, &payload) {
            error!(
                "event={event} module=store status=error error_code=slot_write_failed key={} error={err}",
                self.key
            );
            return Err(err.into());
        }
        debug!(
            "event={event} module=store status=ok key={} items={}",
            self.key,
            items.len()
        );
        Ok(())
    }
}
