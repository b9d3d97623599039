//! Key-value slot media backing the item store.
//!
//! # Responsibility
//! - Provide named text slots with whole-value read/write/remove.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - A write replaces the full value of one slot atomically.
//! - Removing a missing slot is not an error.

use crate::db::DbError;
use rusqlite::{params, Connection, OptionalExtension};
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type SlotResult<T> = Result<T, SlotError>;

/// Failure reported by a slot medium.
#[derive(Debug)]
pub enum SlotError {
    Db(DbError),
    /// Medium refused the operation for a non-database reason.
    Unavailable(String),
}

impl Display for SlotError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Unavailable(message) => write!(f, "slot storage unavailable: {message}"),
        }
    }
}

impl Error for SlotError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Unavailable(_) => None,
        }
    }
}

impl From<DbError> for SlotError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for SlotError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Named-slot key-value medium.
pub trait SlotStore {
    fn read_slot(&self, key: &str) -> SlotResult<Option<String>>;
    fn write_slot(&self, key: &str, value: &str) -> SlotResult<()>;
    fn remove_slot(&self, key: &str) -> SlotResult<()>;
}

impl<T: SlotStore + ?Sized> SlotStore for &T {
    fn read_slot(&self, key: &str) -> SlotResult<Option<String>> {
        (**self).read_slot(key)
    }

    fn write_slot(&self, key: &str, value: &str) -> SlotResult<()> {
        (**self).write_slot(key, value)
    }

    fn remove_slot(&self, key: &str) -> SlotResult<()> {
        (**self).remove_slot(key)
    }
}

/// SQLite-backed slot medium over the `kv_slots` table.
pub struct SqliteSlotStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteSlotStore<'conn> {
    /// Wraps a connection returned by `open_db` / `open_db_in_memory`.
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl SlotStore for SqliteSlotStore<'_> {
    fn read_slot(&self, key: &str) -> SlotResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_slots WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn write_slot(&self, key: &str, value: &str) -> SlotResult<()> {
        self.conn.execute(
            "INSERT INTO kv_slots (key, value, updated_at)
             VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![key, value],
        )?;
        Ok(())
    }

    fn remove_slot(&self, key: &str) -> SlotResult<()> {
        self.conn
            .execute("DELETE FROM kv_slots WHERE key = ?1;", [key])?;
        Ok(())
    }
}

/// In-process slot medium.
///
/// Single-threaded; intended for tests and throwaway sessions. Writes can be
/// switched to fail with `set_fail_writes`.
#[derive(Debug, Default)]
pub struct MemorySlotStore {
    slots: RefCell<BTreeMap<String, String>>,
    fail_writes: Cell<bool>,
}

impl MemorySlotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent write/remove fail with `SlotError::Unavailable`.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.set(fail);
    }

    fn check_writable(&self) -> SlotResult<()> {
        if self.fail_writes.get() {
            return Err(SlotError::Unavailable("writes are disabled".to_string()));
        }
        Ok(())
    }
}

impl SlotStore for MemorySlotStore {
    fn read_slot(&self, key: &str) -> SlotResult<Option<String>> {
        Ok(self.slots.borrow().get(key).cloned())
    }

    fn write_slot(&self, key: &str, value: &str) -> SlotResult<()> {
        self.check_writable()?;
        self.slots
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_slot(&self, key: &str) -> SlotResult<()> {
        self.check_writable()?;
        self.slots.borrow_mut().remove(key);
        Ok(())
    }
}
