//! Journal use-case service.
//!
//! # Responsibility
//! - Record experiences and their gated lesson/benefit reflections.
//! - Provide history and actionable views over the item store.
//!
//! # Invariants
//! - Reflections are only written when the stage engine reports them
//!   unlocked at the clock's current instant.
//! - User text is trimmed; blank text is rejected before any write.
//! - The service never caches items; every call reads the store.

use crate::model::journal_item::{ItemId, JournalItem, JournalItemValidationError};
use crate::model::stage::{
    available_action, benefit_unlocks_at, is_ready_for_benefit, is_ready_for_lesson,
    lesson_unlocks_at, ReflectiveAction,
};
use crate::repo::item_store::{ItemStore, StoreError};
use crate::repo::slot_store::SlotStore;
use chrono::{DateTime, Utc};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Source of the current instant.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}

/// Service error for journal use-cases.
#[derive(Debug)]
pub enum JournalServiceError {
    /// Named text field was blank after trimming.
    EmptyText(&'static str),
    ItemNotFound(ItemId),
    /// Reflection is not unlocked yet (or no longer applicable).
    NotReady {
        action: ReflectiveAction,
        unlocks_at: Option<DateTime<Utc>>,
    },
    InvalidItem(JournalItemValidationError),
    Store(StoreError),
}

impl Display for JournalServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyText(field) => write!(f, "{field} must not be empty"),
            Self::ItemNotFound(id) => write!(f, "journal item not found: {id}"),
            Self::NotReady {
                action,
                unlocks_at: Some(at),
            } => write!(f, "{} is locked until {}", action.as_str(), at.to_rfc3339()),
            Self::NotReady {
                action,
                unlocks_at: None,
            } => write!(f, "{} is not available for this item", action.as_str()),
            Self::InvalidItem(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for JournalServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidItem(err) => Some(err),
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StoreError> for JournalServiceError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::Validation(err) => Self::InvalidItem(err),
            other => Self::Store(other),
        }
    }
}

impl From<JournalItemValidationError> for JournalServiceError {
    fn from(value: JournalItemValidationError) -> Self {
        Self::InvalidItem(value)
    }
}

/// Journal item paired with the reflection currently unlocked for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionableItem {
    pub item: JournalItem,
    pub action: ReflectiveAction,
}

/// Journal facade over an item store and a clock.
pub struct JournalService<S: SlotStore, C: Clock> {
    store: ItemStore<S>,
    clock: C,
}

impl<S: SlotStore> JournalService<S, SystemClock> {
    /// Creates a service reading wall-clock time.
    pub fn new(store: ItemStore<S>) -> Self {
        Self::with_clock(store, SystemClock)
    }
}

impl<S: SlotStore, C: Clock> JournalService<S, C> {
    pub fn with_clock(store: ItemStore<S>, clock: C) -> Self {
        Self { store, clock }
    }

    pub fn store(&self) -> &ItemStore<S> {
        &self.store
    }

    /// Records a new negative experience stamped with the current instant.
    pub fn record_experience(&self, content: &str) -> Result<JournalItem, JournalServiceError> {
        let content = non_blank(content, "experience")?;
        let item = JournalItem::new(content, self.clock.now());
        self.store.upsert(&item)?;
        info!("event=experience_recorded module=service status=ok");
        Ok(item)
    }

    /// Adds the lesson to an item whose lesson gate is open.
    pub fn add_lesson(
        &self,
        id: &ItemId,
        lesson: &str,
    ) -> Result<JournalItem, JournalServiceError> {
        let lesson = non_blank(lesson, "lesson")?;
        let mut item = self.require(id)?;
        let now = self.clock.now();

        if !is_ready_for_lesson(&item, now) {
            return Err(JournalServiceError::NotReady {
                action: ReflectiveAction::AddLesson,
                unlocks_at: (!item.has_lesson()).then(|| lesson_unlocks_at(&item)),
            });
        }

        item.record_lesson(lesson, now)?;
        self.store.upsert(&item)?;
        info!("event=lesson_recorded module=service status=ok");
        Ok(item)
    }

    /// Adds the benefit to an item whose benefit gate is open.
    pub fn add_benefit(
        &self,
        id: &ItemId,
        benefit: &str,
    ) -> Result<JournalItem, JournalServiceError> {
        let benefit = non_blank(benefit, "benefit")?;
        let mut item = self.require(id)?;
        let now = self.clock.now();

        if !is_ready_for_benefit(&item, now) {
            return Err(JournalServiceError::NotReady {
                action: ReflectiveAction::AddBenefit,
                unlocks_at: (!item.has_benefit())
                    .then(|| benefit_unlocks_at(&item))
                    .flatten(),
            });
        }

        item.record_benefit(benefit, now)?;
        self.store.upsert(&item)?;
        info!("event=benefit_recorded module=service status=ok");
        Ok(item)
    }

    pub fn get(&self, id: &ItemId) -> Option<JournalItem> {
        self.store.get_by_id(id)
    }

    pub fn delete(&self, id: &ItemId) -> Result<(), JournalServiceError> {
        self.store.delete(id)?;
        Ok(())
    }

    pub fn clear_all(&self) -> Result<(), JournalServiceError> {
        self.store.clear_all()?;
        Ok(())
    }

    /// All items, newest first by creation time (ties broken by id).
    pub fn history(&self) -> Vec<JournalItem> {
        let mut items = self.store.list();
        items.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        items
    }

    /// Items with a reflection unlocked right now, in storage order.
    pub fn actionable(&self) -> Vec<ActionableItem> {
        let now = self.clock.now();
        self.store
            .list()
            .into_iter()
            .filter_map(|item| {
                available_action(&item, now).map(|action| ActionableItem { item, action })
            })
            .collect()
    }

    fn require(&self, id: &ItemId) -> Result<JournalItem, JournalServiceError> {
        self.store
            .get_by_id(id)
            .ok_or_else(|| JournalServiceError::ItemNotFound(id.clone()))
    }
}

fn non_blank<'a>(value: &'a str, field: &'static str) -> Result<&'a str, JournalServiceError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(JournalServiceError::EmptyText(field));
    }
    Ok(trimmed)
}
