//! Tests for the seat record store service.

use std::sync::Arc;

use mockall::predicate::eq;
use rstest::rstest;

use super::*;
use crate::domain::ErrorCode;
use crate::domain::ports::MockSeatRecordRepository;
use crate::domain::test_fixtures::seat_record;

fn store(repo: MockSeatRecordRepository) -> SeatRecordStore {
    SeatRecordStore::new(Arc::new(repo))
}

fn room(raw: &str) -> RoomNumber {
    RoomNumber::new(raw).expect("valid room")
}

fn roll(raw: &str) -> RollNumber {
    RollNumber::new(raw).expect("valid roll")
}

#[tokio::test]
async fn distinct_rooms_are_sorted_lexicographically() {
    let mut repo = MockSeatRecordRepository::new();
    repo.expect_select_room_numbers().times(1).return_once(|| {
        Ok(vec![room("B12"), room("101"), room("B12"), room("A3"), room("101")])
    });

    let rooms = store(repo).list_distinct_rooms().await.expect("rooms");

    let labels: Vec<_> = rooms.iter().map(RoomNumber::as_str).collect();
    assert_eq!(labels, ["101", "A3", "B12"]);
}

#[rstest]
#[case("mur2300307")]
#[case("MUR2300307")]
#[case("  Mur2300307 ")]
#[tokio::test]
async fn roll_lookup_normalises_before_querying(#[case] raw: &str) {
    let mut repo = MockSeatRecordRepository::new();
    repo.expect_select_by_roll()
        .with(eq(roll("MUR2300307")))
        .times(1)
        .return_once(|_| Ok(vec![seat_record("MUR2300307", "101", 5)]));

    let found = store(repo)
        .find_by_roll_number(raw)
        .await
        .expect("lookup succeeds");

    assert_eq!(found.map(|r| r.seat_number()), Some(5));
}

#[tokio::test]
async fn blank_roll_lookup_never_reaches_the_store() {
    let mut repo = MockSeatRecordRepository::new();
    repo.expect_select_by_roll().never();

    let err = store(repo)
        .find_by_roll_number("   ")
        .await
        .expect_err("blank input rejected");

    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    assert_eq!(err.message(), "Please enter a roll number");
}

#[tokio::test]
async fn missing_roll_is_none() {
    let mut repo = MockSeatRecordRepository::new();
    repo.expect_select_by_roll().return_once(|_| Ok(Vec::new()));

    let found = store(repo).find_by_roll_number("X9").await.expect("lookup");
    assert!(found.is_none());
}

#[tokio::test]
async fn duplicate_roll_matches_are_an_integrity_fault() {
    let mut repo = MockSeatRecordRepository::new();
    repo.expect_select_by_roll().return_once(|_| {
        Ok(vec![seat_record("A1", "101", 1), seat_record("A1", "102", 2)])
    });

    let err = store(repo)
        .find_by_roll_number("a1")
        .await
        .expect_err("ambiguous lookup");
    assert_eq!(err.code(), ErrorCode::StoreFailure);
}

#[tokio::test]
async fn read_failures_are_store_failures() {
    let mut repo = MockSeatRecordRepository::new();
    repo.expect_select_all()
        .return_once(|| Err(SeatRecordRepositoryError::connection("refused")));

    let err = store(repo).list_all().await.expect_err("read fails");
    assert_eq!(err.code(), ErrorCode::StoreFailure);
}

#[tokio::test]
async fn duplicate_insert_is_a_store_failure() {
    let mut repo = MockSeatRecordRepository::new();
    repo.expect_insert()
        .return_once(|_| Err(SeatRecordRepositoryError::rejected("duplicate key")));

    let err = store(repo)
        .insert_one(&seat_record("A1", "101", 1))
        .await
        .expect_err("duplicate rejected");
    assert_eq!(err.code(), ErrorCode::StoreFailure);
    assert!(err.message().starts_with("Error adding student"));
}

#[rstest]
#[case(SeatRecordRepositoryError::rejected("bad integer"), ErrorCode::ValidationGap)]
#[case(SeatRecordRepositoryError::query("timeout"), ErrorCode::StoreFailure)]
#[tokio::test]
async fn bulk_failures_are_classified(
    #[case] failure: SeatRecordRepositoryError,
    #[case] expected: ErrorCode,
) {
    let mut repo = MockSeatRecordRepository::new();
    repo.expect_upsert_rows().return_once(move |_| Err(failure));

    let rows = [RawSeatRow::from_pairs([("rollNumber", "A1")])];
    let err = store(repo).upsert_many(&rows).await.expect_err("batch fails");
    assert_eq!(err.code(), expected);
}

#[tokio::test]
async fn empty_batches_skip_the_store() {
    let mut repo = MockSeatRecordRepository::new();
    repo.expect_upsert_rows().never();

    let written = store(repo).upsert_many(&[]).await.expect("no-op");
    assert_eq!(written, 0);
}

#[rstest]
#[case(1, DeleteOutcome::Removed)]
#[case(0, DeleteOutcome::NoRecord)]
#[tokio::test]
async fn delete_reports_whether_a_record_went(#[case] removed: usize, #[case] expected: DeleteOutcome) {
    let mut repo = MockSeatRecordRepository::new();
    repo.expect_delete().return_once(move |_| Ok(removed));

    let outcome = store(repo).delete_one(&roll("A1")).await.expect("delete");
    assert_eq!(outcome, expected);
}

#[tokio::test]
async fn empty_patches_skip_the_store() {
    let mut repo = MockSeatRecordRepository::new();
    repo.expect_update().never();

    let outcome = store(repo)
        .update_one(&roll("A1"), &SeatRecordPatch::default())
        .await
        .expect("no-op");
    assert_eq!(outcome, UpdateOutcome::NothingToChange);
}

#[rstest]
#[case(1, UpdateOutcome::Updated)]
#[case(0, UpdateOutcome::NoRecord)]
#[tokio::test]
async fn update_reports_affected_rows(#[case] affected: usize, #[case] expected: UpdateOutcome) {
    let mut repo = MockSeatRecordRepository::new();
    repo.expect_update().return_once(move |_, _| Ok(affected));

    let patch = crate::domain::SeatRecordPatchDraft {
        room_number: Some("204".into()),
        ..Default::default()
    }
    .into_patch(&roll("A1"))
    .expect("valid patch");
    let outcome = store(repo).update_one(&roll("A1"), &patch).await.expect("update");
    assert_eq!(outcome, expected);
}
