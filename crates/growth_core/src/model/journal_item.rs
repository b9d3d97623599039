//! Journal item domain model.
//!
//! # Responsibility
//! - Define the canonical record for one journaled negative experience.
//! - Guard the write-once lifecycle of the lesson and benefit reflections.
//!
//! # Invariants
//! - `id` is stable and never reused for another item.
//! - `lesson` and `lesson_at` are present together or absent together.
//! - `benefit` and `benefit_at` are present together or absent together.
//! - `benefit` is never present without `lesson`.
//! - Reflections are written once and never cleared.
//! - Timestamp order is enforced when a reflection is recorded, not when a
//!   stored record is validated.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Opaque identifier of a journal item, also used as its storage key.
///
/// New items get a v4 UUID string, but any non-blank text read from storage
/// is accepted as-is.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    /// Generates a fresh random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl Display for ItemId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ItemId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<String> for ItemId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for ItemId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<Uuid> for ItemId {
    fn from(value: Uuid) -> Self {
        Self(value.to_string())
    }
}

/// Validation failures for journal item invariants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JournalItemValidationError {
    BlankId,
    EmptyContent,
    /// Exactly one of `lesson` / `lesson_at` is set.
    UnpairedLesson,
    /// Exactly one of `benefit` / `benefit_at` is set.
    UnpairedBenefit,
    BenefitWithoutLesson,
    LessonAlreadyRecorded,
    BenefitAlreadyRecorded,
    /// A reflection timestamp precedes the step it follows.
    OutOfOrder {
        field: &'static str,
        at: DateTime<Utc>,
        earliest: DateTime<Utc>,
    },
}

impl Display for JournalItemValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankId => write!(f, "journal item id must not be blank"),
            Self::EmptyContent => write!(f, "journal item content must not be empty"),
            Self::UnpairedLesson => write!(f, "lesson and lesson date must be set together"),
            Self::UnpairedBenefit => write!(f, "benefit and benefit date must be set together"),
            Self::BenefitWithoutLesson => write!(f, "benefit cannot be set before a lesson"),
            Self::LessonAlreadyRecorded => write!(f, "lesson has already been recorded"),
            Self::BenefitAlreadyRecorded => write!(f, "benefit has already been recorded"),
            Self::OutOfOrder {
                field,
                at,
                earliest,
            } => write!(
                f,
                "{field} ({}) must not precede {}",
                at.to_rfc3339(),
                earliest.to_rfc3339()
            ),
        }
    }
}

impl Error for JournalItemValidationError {}

/// One recorded negative experience plus its optional later reflections.
///
/// Field names on the wire follow the persisted collection format
/// (`date`, `negativeExperience`, `lessonDate`, `benefitDate`). Absent
/// reflections are omitted when written and read back as `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalItem {
    pub id: ItemId,
    #[serde(rename = "date")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "negativeExperience")]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lesson: Option<String>,
    #[serde(
        rename = "lessonDate",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub lesson_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub benefit: Option<String>,
    #[serde(
        rename = "benefitDate",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub benefit_at: Option<DateTime<Utc>>,
}

impl JournalItem {
    /// Creates a new item with a generated id and no reflections.
    pub fn new(content: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id: ItemId::generate(),
            created_at,
            content: content.into(),
            lesson: None,
            lesson_at: None,
            benefit: None,
            benefit_at: None,
        }
    }

    /// Creates a new item with a caller-provided id.
    ///
    /// # Errors
    /// - Returns `BlankId` when `id` is empty or whitespace.
    pub fn with_id(
        id: impl Into<ItemId>,
        content: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Result<Self, JournalItemValidationError> {
        let id = id.into();
        if id.is_blank() {
            return Err(JournalItemValidationError::BlankId);
        }
        let mut item = Self::new(content, created_at);
        item.id = id;
        Ok(item)
    }

    pub fn has_lesson(&self) -> bool {
        self.lesson.is_some()
    }

    pub fn has_benefit(&self) -> bool {
        self.benefit.is_some()
    }

    /// Sets the lesson reflection and its timestamp.
    ///
    /// A stray `lesson_at` without a lesson is replaced. Does not check the
    /// time gate; see `stage::is_ready_for_lesson`.
    pub fn record_lesson(
        &mut self,
        lesson: impl Into<String>,
        at: DateTime<Utc>,
    ) -> Result<(), JournalItemValidationError> {
        if self.lesson.is_some() {
            return Err(JournalItemValidationError::LessonAlreadyRecorded);
        }
        if at < self.created_at {
            return Err(JournalItemValidationError::OutOfOrder {
                field: "lesson date",
                at,
                earliest: self.created_at,
            });
        }
        self.lesson = Some(lesson.into());
        self.lesson_at = Some(at);
        Ok(())
    }

    /// Sets the benefit reflection and its timestamp.
    ///
    /// Requires an existing lesson. A stray `benefit_at` without a benefit is
    /// replaced. Does not check the time gate; see
    /// `stage::is_ready_for_benefit`.
    pub fn record_benefit(
        &mut self,
        benefit: impl Into<String>,
        at: DateTime<Utc>,
    ) -> Result<(), JournalItemValidationError> {
        let Some(lesson_at) = self.lesson_at.filter(|_| self.lesson.is_some()) else {
            return Err(JournalItemValidationError::BenefitWithoutLesson);
        };
        if self.benefit.is_some() {
            return Err(JournalItemValidationError::BenefitAlreadyRecorded);
        }
        if at < lesson_at {
            return Err(JournalItemValidationError::OutOfOrder {
                field: "benefit date",
                at,
                earliest: lesson_at,
            });
        }
        self.benefit = Some(benefit.into());
        self.benefit_at = Some(at);
        Ok(())
    }

    /// Checks the structural invariants of this item.
    ///
    /// Timestamp order is not checked here: stored records may carry skewed
    /// device clocks and must stay writable.
    pub fn validate(&self) -> Result<(), JournalItemValidationError> {
        if self.id.is_blank() {
            return Err(JournalItemValidationError::BlankId);
        }
        if self.content.trim().is_empty() {
            return Err(JournalItemValidationError::EmptyContent);
        }
        if self.lesson.is_some() != self.lesson_at.is_some() {
            return Err(JournalItemValidationError::UnpairedLesson);
        }
        if self.benefit.is_some() != self.benefit_at.is_some() {
            return Err(JournalItemValidationError::UnpairedBenefit);
        }
        if self.benefit.is_some() && self.lesson.is_none() {
            return Err(JournalItemValidationError::BenefitWithoutLesson);
        }
        Ok(())
    }
}
