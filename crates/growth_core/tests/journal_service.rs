use chrono::{DateTime, Duration, TimeZone, Utc};
use growth_core::{
    classify, Clock, ItemId, ItemStore, JournalItem, JournalService, JournalServiceError,
    MemorySlotStore, ReflectiveAction, Stage, StoreError,
};
use std::cell::Cell;

struct FixedClock {
    now: Cell<DateTime<Utc>>,
}

impl FixedClock {
    fn at(now: DateTime<Utc>) -> Self {
        Self {
            now: Cell::new(now),
        }
    }

    fn set(&self, now: DateTime<Utc>) {
        self.now.set(now);
    }

    fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.now.get()
    }
}

fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
}

#[test]
fn full_lifecycle_unlocks_lesson_then_benefit() {
    let clock = FixedClock::at(start());
    let service = JournalService::with_clock(ItemStore::new(MemorySlotStore::new()), &clock);

    let item = service.record_experience("  got laid off \n").unwrap();
    assert_eq!(item.content, "got laid off");
    assert_eq!(item.created_at, start());
    assert_eq!(classify(&item), Stage::Initial);

    clock.set(Utc.with_ymd_and_hms(2024, 1, 7, 23, 59, 59).unwrap());
    let err = service.add_lesson(&item.id, "network more").unwrap_err();
    match err {
        JournalServiceError::NotReady { action, unlocks_at } => {
            assert_eq!(action, ReflectiveAction::AddLesson);
            assert_eq!(
                unlocks_at,
                Some(Utc.with_ymd_and_hms(2024, 1, 8, 0, 0, 0).unwrap())
            );
        }
        other => panic!("unexpected error: {other}"),
    }

    clock.advance(Duration::seconds(1));
    let item = service.add_lesson(&item.id, "network more").unwrap();
    assert_eq!(item.lesson.as_deref(), Some("network more"));
    assert_eq!(item.lesson_at, Some(clock.now()));
    assert_eq!(classify(&item), Stage::LessonAdded);

    clock.set(Utc.with_ymd_and_hms(2024, 2, 7, 23, 59, 59).unwrap());
    assert!(matches!(
        service.add_benefit(&item.id, "better job").unwrap_err(),
        JournalServiceError::NotReady {
            action: ReflectiveAction::AddBenefit,
            ..
        }
    ));

    clock.set(Utc.with_ymd_and_hms(2024, 2, 8, 0, 0, 0).unwrap());
    let item = service.add_benefit(&item.id, "better job").unwrap();
    assert_eq!(classify(&item), Stage::Completed);

    assert_eq!(service.get(&item.id), Some(item));
}

#[test]
fn lesson_cannot_be_overwritten() {
    let clock = FixedClock::at(start());
    let service = JournalService::with_clock(ItemStore::new(MemorySlotStore::new()), &clock);
    let item = service.record_experience("bad haircut").unwrap();

    clock.advance(Duration::days(8));
    service.add_lesson(&item.id, "ask for photos").unwrap();

    let err = service.add_lesson(&item.id, "different lesson").unwrap_err();
    assert!(matches!(
        err,
        JournalServiceError::NotReady {
            action: ReflectiveAction::AddLesson,
            unlocks_at: None,
        }
    ));
    assert_eq!(
        service.get(&item.id).unwrap().lesson.as_deref(),
        Some("ask for photos")
    );
}

#[test]
fn benefit_requires_lesson() {
    let clock = FixedClock::at(start());
    let service = JournalService::with_clock(ItemStore::new(MemorySlotStore::new()), &clock);
    let item = service.record_experience("missed flight").unwrap();

    clock.advance(Duration::days(400));
    let err = service.add_benefit(&item.id, "slower travel").unwrap_err();
    assert!(matches!(
        err,
        JournalServiceError::NotReady {
            action: ReflectiveAction::AddBenefit,
            unlocks_at: None,
        }
    ));
}

#[test]
fn blank_text_is_rejected_before_any_write() {
    let clock = FixedClock::at(start());
    let service = JournalService::with_clock(ItemStore::new(MemorySlotStore::new()), &clock);

    assert!(matches!(
        service.record_experience("   ").unwrap_err(),
        JournalServiceError::EmptyText("experience")
    ));
    assert!(service.history().is_empty());

    let item = service.record_experience("late again").unwrap();
    clock.advance(Duration::days(7));
    assert!(matches!(
        service.add_lesson(&item.id, "\n\t").unwrap_err(),
        JournalServiceError::EmptyText("lesson")
    ));
    assert_eq!(service.get(&item.id).unwrap().lesson, None);
}

#[test]
fn unknown_item_is_reported() {
    let service = JournalService::with_clock(
        ItemStore::new(MemorySlotStore::new()),
        FixedClock::at(start()),
    );
    let missing = ItemId::from("exp-404");

    assert!(matches!(
        service.add_lesson(&missing, "x").unwrap_err(),
        JournalServiceError::ItemNotFound(id) if id == missing
    ));
}

#[test]
fn history_is_newest_first_and_actionable_keeps_storage_order() {
    let clock = FixedClock::at(start());
    let service = JournalService::with_clock(ItemStore::new(MemorySlotStore::new()), &clock);

    let oldest = service.record_experience("oldest").unwrap();
    clock.advance(Duration::days(2));
    let middle = service.record_experience("middle").unwrap();
    clock.advance(Duration::days(10));
    let newest = service.record_experience("newest").unwrap();

    let history: Vec<ItemId> = service.history().into_iter().map(|item| item.id).collect();
    assert_eq!(history, vec![newest.id, middle.id.clone(), oldest.id.clone()]);

    let actionable = service.actionable();
    for entry in &actionable {
        assert_eq!(entry.action, ReflectiveAction::AddLesson);
    }
    let ids: Vec<ItemId> = actionable.into_iter().map(|entry| entry.item.id).collect();
    assert_eq!(ids, vec![oldest.id, middle.id]);
}

#[test]
fn delete_and_clear_pass_through() {
    let clock = FixedClock::at(start());
    let service = JournalService::with_clock(ItemStore::new(MemorySlotStore::new()), &clock);
    let first = service.record_experience("one").unwrap();
    service.record_experience("two").unwrap();

    service.delete(&first.id).unwrap();
    service.delete(&first.id).unwrap();
    assert_eq!(service.history().len(), 1);

    service.clear_all().unwrap();
    assert!(service.history().is_empty());
}

#[test]
fn write_failure_surfaces_as_store_error() {
    let slots = MemorySlotStore::new();
    let service = JournalService::with_clock(ItemStore::new(&slots), FixedClock::at(start()));

    slots.set_fail_writes(true);
    let err = service.record_experience("cannot save").unwrap_err();
    assert!(matches!(err, JournalServiceError::Store(StoreError::Write(_))));
    assert!(service.history().is_empty());
}

#[test]
fn offered_benefit_is_writable_for_item_with_skewed_lesson_date() {
    let clock = FixedClock::at(Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap());
    let service = JournalService::with_clock(ItemStore::new(MemorySlotStore::new()), &clock);

    // Written by a device whose clock ran behind: lesson dated before creation.
    let created = Utc.with_ymd_and_hms(2024, 1, 10, 0, 0, 0).unwrap();
    let mut stored = JournalItem::new("clock drift", created);
    stored.lesson = Some("sync the clock".to_string());
    stored.lesson_at = Some(Utc.with_ymd_and_hms(2024, 1, 9, 0, 0, 0).unwrap());
    service.store().upsert(&stored).unwrap();

    let actionable = service.actionable();
    assert_eq!(actionable.len(), 1);
    assert_eq!(actionable[0].action, ReflectiveAction::AddBenefit);

    let item = service.add_benefit(&stored.id, "fewer surprises").unwrap();
    assert_eq!(item.benefit_at, Some(clock.now()));
    assert_eq!(classify(&item), Stage::Completed);
    assert_eq!(service.get(&stored.id), Some(item));
    assert!(service.actionable().is_empty());
}
