use chrono::{TimeZone, Utc};
use growth_core::{ItemId, JournalItem, JournalItemValidationError};
use uuid::Uuid;

#[test]
fn new_item_starts_without_reflections() {
    let created = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let item = JournalItem::new("harsh code review", created);

    assert!(Uuid::parse_str(item.id.as_str()).is_ok());
    assert_eq!(item.created_at, created);
    assert_eq!(item.content, "harsh code review");
    assert_eq!(item.lesson, None);
    assert_eq!(item.lesson_at, None);
    assert_eq!(item.benefit, None);
    assert_eq!(item.benefit_at, None);
    item.validate().unwrap();
}

#[test]
fn with_id_rejects_blank_id() {
    let created = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let err = JournalItem::with_id("  ", "x", created).unwrap_err();
    assert_eq!(err, JournalItemValidationError::BlankId);

    let item = JournalItem::with_id("exp-7", "x", created).unwrap();
    assert_eq!(item.id, ItemId::from("exp-7"));
}

#[test]
fn validate_rejects_blank_stored_id() {
    let created = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let mut item = JournalItem::new("x", created);
    item.id = ItemId::from("");

    assert_eq!(
        item.validate().unwrap_err(),
        JournalItemValidationError::BlankId
    );
}

#[test]
fn reflections_are_write_once_and_ordered() {
    let created = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let lesson_at = Utc.with_ymd_and_hms(2024, 1, 8, 0, 0, 0).unwrap();
    let benefit_at = Utc.with_ymd_and_hms(2024, 2, 8, 0, 0, 0).unwrap();
    let mut item = JournalItem::new("failed exam", created);

    assert_eq!(
        item.record_benefit("grit", benefit_at).unwrap_err(),
        JournalItemValidationError::BenefitWithoutLesson
    );

    item.record_lesson("study earlier", lesson_at).unwrap();
    assert_eq!(
        item.record_lesson("something else", benefit_at).unwrap_err(),
        JournalItemValidationError::LessonAlreadyRecorded
    );
    assert_eq!(item.lesson.as_deref(), Some("study earlier"));
    assert_eq!(item.lesson_at, Some(lesson_at));

    item.record_benefit("grit", benefit_at).unwrap();
    assert_eq!(
        item.record_benefit("more grit", benefit_at).unwrap_err(),
        JournalItemValidationError::BenefitAlreadyRecorded
    );
    assert_eq!(item.benefit.as_deref(), Some("grit"));
    item.validate().unwrap();
}

#[test]
fn validate_rejects_benefit_without_lesson() {
    let created = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let mut item = JournalItem::new("x", created);
    item.benefit = Some("b".to_string());
    item.benefit_at = Some(created);

    assert_eq!(
        item.validate().unwrap_err(),
        JournalItemValidationError::BenefitWithoutLesson
    );
}

#[test]
fn validate_rejects_blank_content() {
    let created = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let item = JournalItem::new("   ", created);
    assert_eq!(
        item.validate().unwrap_err(),
        JournalItemValidationError::EmptyContent
    );
}

#[test]
fn serialization_uses_persisted_wire_fields_and_omits_absent_reflections() {
    let id = "11111111-2222-4333-8444-555555555555";
    let created = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let mut item = JournalItem::with_id(id, "spilled coffee", created).unwrap();

    let json = serde_json::to_value(&item).unwrap();
    assert_eq!(json["id"], id);
    assert_eq!(json["date"], "2024-01-01T00:00:00Z");
    assert_eq!(json["negativeExperience"], "spilled coffee");
    let object = json.as_object().unwrap();
    assert!(!object.contains_key("lesson"));
    assert!(!object.contains_key("lessonDate"));
    assert!(!object.contains_key("benefit"));
    assert!(!object.contains_key("benefitDate"));

    let lesson_at = Utc.with_ymd_and_hms(2024, 1, 9, 10, 0, 0).unwrap();
    item.record_lesson("lids exist", lesson_at).unwrap();
    let json = serde_json::to_value(&item).unwrap();
    assert_eq!(json["lesson"], "lids exist");
    assert_eq!(json["lessonDate"], "2024-01-09T10:00:00Z");
}

#[test]
fn deserialize_accepts_millisecond_timestamps_and_missing_optionals() {
    let value = serde_json::json!({
        "id": "11111111-2222-4333-8444-555555555555",
        "date": "2024-01-01T00:00:00.000Z",
        "negativeExperience": "rained on the picnic"
    });

    let item: JournalItem = serde_json::from_value(value).unwrap();
    assert_eq!(
        item.created_at,
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    );
    assert_eq!(item.lesson, None);
    assert_eq!(item.benefit_at, None);
}

#[test]
fn deserialize_keeps_non_uuid_ids_verbatim() {
    let value = serde_json::json!({
        "id": "1704067200000",
        "date": "2024-01-01T00:00:00Z",
        "negativeExperience": "imported entry"
    });

    let item: JournalItem = serde_json::from_value(value).unwrap();
    assert_eq!(item.id.as_str(), "1704067200000");
    assert_eq!(serde_json::to_value(&item).unwrap()["id"], "1704067200000");
}
