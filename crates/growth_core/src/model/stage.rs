//! Temporal staging rules for journal items.
//!
//! # Responsibility
//! - Classify an item into its reflective stage.
//! - Decide whether the lesson or benefit field is unlocked at `now`.
//!
//! # Invariants
//! - Every function here is pure: no I/O, no clock reads.
//! - Eligibility is monotonic in `now` for a fixed item state and is never
//!   true before the unlock instant.
//! - One calendar month is added by clamping to the last valid day of the
//!   target month (Jan 31 -> Feb 28/29), keeping time-of-day.

use crate::model::journal_item::JournalItem;
use chrono::{DateTime, Duration, Months, Utc};
use serde::{Deserialize, Serialize};

/// Days between recording an experience and unlocking its lesson.
pub const LESSON_DELAY_DAYS: i64 = 7;
/// Calendar months between recording a lesson and unlocking its benefit.
pub const BENEFIT_DELAY_MONTHS: u32 = 1;

/// Reflective progress of a journal item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// No lesson yet.
    Initial,
    /// Lesson recorded, benefit still open.
    LessonAdded,
    /// Kept in the vocabulary for compatibility; `classify` never returns it
    /// because a benefit always implies a lesson.
    BenefitAdded,
    /// Both reflections recorded.
    Completed,
}

impl Stage {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Initial => "initial",
            Self::LessonAdded => "lesson_added",
            Self::BenefitAdded => "benefit_added",
            Self::Completed => "completed",
        }
    }

    /// Short human-readable label for list views.
    pub fn label(self) -> &'static str {
        match self {
            Self::Initial => "Recorded",
            Self::LessonAdded => "Lesson Added",
            Self::BenefitAdded => "Benefit Added",
            Self::Completed => "Completed",
        }
    }
}

/// Reflective write that may currently be unlocked for an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReflectiveAction {
    AddLesson,
    AddBenefit,
}

impl ReflectiveAction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AddLesson => "add_lesson",
            Self::AddBenefit => "add_benefit",
        }
    }
}

/// Maps an item to its stage from reflection presence alone.
pub fn classify(item: &JournalItem) -> Stage {
    match (item.has_lesson(), item.has_benefit()) {
        (false, _) => Stage::Initial,
        (true, false) => Stage::LessonAdded,
        (true, true) => Stage::Completed,
    }
}

/// Instant at which the lesson field unlocks.
///
/// Saturates at the latest representable instant instead of overflowing.
pub fn lesson_unlocks_at(item: &JournalItem) -> DateTime<Utc> {
    item.created_at
        .checked_add_signed(Duration::days(LESSON_DELAY_DAYS))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// Instant at which the benefit field unlocks.
///
/// `None` without a lesson timestamp, or when the date would overflow.
pub fn benefit_unlocks_at(item: &JournalItem) -> Option<DateTime<Utc>> {
    item.lesson_at?.checked_add_months(Months::new(BENEFIT_DELAY_MONTHS))
}

pub fn is_ready_for_lesson(item: &JournalItem, now: DateTime<Utc>) -> bool {
    if item.has_lesson() {
        return false;
    }
    now >= lesson_unlocks_at(item)
}

pub fn is_ready_for_benefit(item: &JournalItem, now: DateTime<Utc>) -> bool {
    if !item.has_lesson() || item.has_benefit() {
        return false;
    }
    benefit_unlocks_at(item).is_some_and(|unlocks_at| now >= unlocks_at)
}

/// Returns the reflective action unlocked at `now`, if any.
pub fn available_action(item: &JournalItem, now: DateTime<Utc>) -> Option<ReflectiveAction> {
    if is_ready_for_lesson(item, now) {
        Some(ReflectiveAction::AddLesson)
    } else if is_ready_for_benefit(item, now) {
        Some(ReflectiveAction::AddBenefit)
    } else {
        None
    }
}
