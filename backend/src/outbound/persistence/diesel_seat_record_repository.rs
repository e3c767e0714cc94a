//! PostgreSQL-backed `SeatRecordRepository` implementation using Diesel ORM.
//!
//! Bulk upserts coerce every upload row before touching the database and are
//! sent as a single `INSERT ... ON CONFLICT ("rollNumber") DO UPDATE`, so a
//! batch either lands whole or not at all.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::upsert::excluded;
use diesel_async::RunQueryDsl;
use tracing::warn;

use crate::domain::ports::{SeatRecordRepository, SeatRecordRepositoryError};
use crate::domain::{
    RawSeatRow, RollNumber, RoomNumber, SeatRecord, SeatRecordDraft, SeatRecordPatch, fields,
};

use super::diesel_basic_error_mapping::{
    map_basic_diesel_error, map_basic_pool_error, map_write_diesel_error,
};
use super::models::{NewSeatRecordRow, SeatRecordChangeset, SeatRecordRow};
use super::pool::{DbPool, PoolError};
use super::schema::mock_exam_data;

/// Diesel-backed implementation of the `SeatRecordRepository` port.
#[derive(Clone)]
pub struct DieselSeatRecordRepository {
    pool: DbPool,
}

impl DieselSeatRecordRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> SeatRecordRepositoryError {
    map_basic_pool_error(error, SeatRecordRepositoryError::connection)
}

fn map_read_error(error: diesel::result::Error) -> SeatRecordRepositoryError {
    map_basic_diesel_error(
        error,
        SeatRecordRepositoryError::query,
        SeatRecordRepositoryError::connection,
    )
}

fn map_write_error(error: diesel::result::Error) -> SeatRecordRepositoryError {
    map_write_diesel_error(
        error,
        SeatRecordRepositoryError::query,
        SeatRecordRepositoryError::connection,
        SeatRecordRepositoryError::rejected,
    )
}

fn to_column(field: &'static str, value: u32) -> Result<i32, SeatRecordRepositoryError> {
    i32::try_from(value)
        .map_err(|_| SeatRecordRepositoryError::rejected(format!("{field} {value} is out of range")))
}

fn row_to_record(row: SeatRecordRow) -> Result<SeatRecord, SeatRecordRepositoryError> {
    let roll_number = row.roll_number.clone();
    SeatRecord::try_from(SeatRecordDraft {
        roll_number: row.roll_number,
        student_name: row.student_name,
        room_number: row.room_number,
        seat_number: i64::from(row.seat_number),
        row: i64::from(row.row),
        col: i64::from(row.col),
        exam_date: row.exam_date,
        exam_time: row.exam_time,
        floor: row.floor,
    })
    .map_err(|err| {
        warn!(%roll_number, %err, "stored seat record failed validation");
        SeatRecordRepositoryError::query(format!("stored record {roll_number} is invalid: {err}"))
    })
}

fn rows_to_records(rows: Vec<SeatRecordRow>) -> Result<Vec<SeatRecord>, SeatRecordRepositoryError> {
    rows.into_iter().map(row_to_record).collect()
}

fn new_row(record: &SeatRecord) -> Result<NewSeatRecordRow<'_>, SeatRecordRepositoryError> {
    Ok(NewSeatRecordRow {
        roll_number: record.roll_number().as_str(),
        student_name: record.student_name().as_str(),
        room_number: record.room_number().as_str(),
        seat_number: to_column(fields::SEAT_NUMBER, record.seat_number())?,
        row: to_column(fields::ROW, record.row())?,
        col: to_column(fields::COL, record.col())?,
        exam_date: record.exam_date(),
        exam_time: record.exam_time(),
        floor: record.floor(),
    })
}

fn changeset(patch: &SeatRecordPatch) -> Result<SeatRecordChangeset<'_>, SeatRecordRepositoryError> {
    let column = |field: &'static str, value: Option<u32>| value.map(|v| to_column(field, v)).transpose();
    Ok(SeatRecordChangeset {
        student_name: patch.student_name().map(|v| v.as_str()),
        room_number: patch.room_number().map(|v| v.as_str()),
        seat_number: column(fields::SEAT_NUMBER, patch.seat_number())?,
        row: column(fields::ROW, patch.row())?,
        col: column(fields::COL, patch.col())?,
        exam_date: patch.exam_date(),
        exam_time: patch.exam_time(),
        floor: patch.floor(),
    })
}

/// Apply column typing to a whole upload, failing on the first bad row.
fn coerce_rows(rows: &[RawSeatRow]) -> Result<Vec<SeatRecord>, SeatRecordRepositoryError> {
    rows.iter()
        .enumerate()
        .map(|(index, row)| {
            SeatRecord::try_from_raw(row).map_err(|err| {
                SeatRecordRepositoryError::rejected(format!("row {}: {err}", index + 1))
            })
        })
        .collect()
}

#[async_trait]
impl SeatRecordRepository for DieselSeatRecordRepository {
    async fn select_all(&self) -> Result<Vec<SeatRecord>, SeatRecordRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = mock_exam_data::table
            .select(SeatRecordRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_read_error)?;
        rows_to_records(rows)
    }

    async fn select_room_numbers(&self) -> Result<Vec<RoomNumber>, SeatRecordRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rooms: Vec<String> = mock_exam_data::table
            .select(mock_exam_data::room_number)
            .distinct()
            .load(&mut conn)
            .await
            .map_err(map_read_error)?;
        rooms
            .into_iter()
            .map(|room| {
                RoomNumber::new(&room).map_err(|err| {
                    SeatRecordRepositoryError::query(format!("stored room {room:?} is invalid: {err}"))
                })
            })
            .collect()
    }

    async fn select_by_room(
        &self,
        room: &RoomNumber,
    ) -> Result<Vec<SeatRecord>, SeatRecordRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = mock_exam_data::table
            .filter(mock_exam_data::room_number.eq(room.as_str()))
            .select(SeatRecordRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_read_error)?;
        rows_to_records(rows)
    }

    async fn select_by_roll(
        &self,
        roll: &RollNumber,
    ) -> Result<Vec<SeatRecord>, SeatRecordRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = mock_exam_data::table
            .filter(mock_exam_data::roll_number.eq(roll.as_str()))
            .select(SeatRecordRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_read_error)?;
        rows_to_records(rows)
    }

    async fn insert(&self, record: &SeatRecord) -> Result<(), SeatRecordRepositoryError> {
        let row = new_row(record)?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(mock_exam_data::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_write_error)
    }

    async fn upsert_rows(&self, rows: &[RawSeatRow]) -> Result<usize, SeatRecordRepositoryError> {
        let records = coerce_rows(rows)?;
        let new_rows = records
            .iter()
            .map(new_row)
            .collect::<Result<Vec<_>, _>>()?;
        if new_rows.is_empty() {
            return Ok(0);
        }

        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(mock_exam_data::table)
            .values(&new_rows)
            .on_conflict(mock_exam_data::roll_number)
            .do_update()
            .set((
                mock_exam_data::student_name.eq(excluded(mock_exam_data::student_name)),
                mock_exam_data::room_number.eq(excluded(mock_exam_data::room_number)),
                mock_exam_data::seat_number.eq(excluded(mock_exam_data::seat_number)),
                mock_exam_data::row.eq(excluded(mock_exam_data::row)),
                mock_exam_data::col.eq(excluded(mock_exam_data::col)),
                mock_exam_data::exam_date.eq(excluded(mock_exam_data::exam_date)),
                mock_exam_data::exam_time.eq(excluded(mock_exam_data::exam_time)),
                mock_exam_data::floor.eq(excluded(mock_exam_data::floor)),
            ))
            .execute(&mut conn)
            .await
            .map_err(map_write_error)
    }

    async fn update(
        &self,
        roll: &RollNumber,
        patch: &SeatRecordPatch,
    ) -> Result<usize, SeatRecordRepositoryError> {
        if patch.is_empty() {
            return Ok(0);
        }
        let changes = changeset(patch)?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::update(mock_exam_data::table.filter(mock_exam_data::roll_number.eq(roll.as_str())))
            .set(&changes)
            .execute(&mut conn)
            .await
            .map_err(map_write_error)
    }

    async fn delete(&self, roll: &RollNumber) -> Result<usize, SeatRecordRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::delete(mock_exam_data::table.filter(mock_exam_data::roll_number.eq(roll.as_str())))
            .execute(&mut conn)
            .await
            .map_err(map_write_error)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for the row conversions; queries are exercised
    //! against a live database only.
    use super::*;
    use rstest::rstest;

    fn stored(roll: &str, seat: i32) -> SeatRecordRow {
        SeatRecordRow {
            roll_number: roll.to_owned(),
            student_name: "Asha Rao".to_owned(),
            room_number: "101".to_owned(),
            seat_number: seat,
            row: 1,
            col: 1,
            exam_date: "2024-05-10".to_owned(),
            exam_time: "10:00".to_owned(),
            floor: None,
        }
    }

    #[rstest]
    fn stored_rows_become_records() {
        let record = row_to_record(stored("MUR2300307", 5)).expect("valid row");
        assert_eq!(record.roll_number().as_str(), "MUR2300307");
        assert_eq!(record.seat_number(), 5);
    }

    #[rstest]
    fn invalid_stored_rows_are_query_errors() {
        let err = row_to_record(stored("MUR2300307", 0)).expect_err("seat 0 is invalid");
        assert_eq!(err.kind(), "Query");
    }

    #[rstest]
    fn uploads_with_bad_cells_are_rejected_whole() {
        let rows = [
            RawSeatRow::from_pairs([
                ("rollNumber", "a1"),
                ("studentName", "Ann"),
                ("roomNumber", "101"),
                ("seatNumber", "1"),
                ("row", "1"),
                ("col", "1"),
            ]),
            RawSeatRow::from_pairs([("rollNumber", "b2"), ("seatNumber", "x")]),
        ];
        let err = coerce_rows(&rows).expect_err("second row is malformed");
        assert_eq!(err.kind(), "Rejected");
        assert!(err.to_string().contains("row 2"));
    }

    #[rstest]
    fn changesets_carry_only_patched_columns() {
        let key = RollNumber::new("A1").expect("valid roll");
        let patch = crate::domain::SeatRecordPatchDraft {
            seat_number: Some(9),
            floor: Some(String::new()),
            ..Default::default()
        }
        .into_patch(&key)
        .expect("valid patch");

        let changes = changeset(&patch).expect("in range");

        assert_eq!(changes.seat_number, Some(9));
        assert_eq!(changes.floor, Some(None));
        assert_eq!(changes.student_name, None);
    }
}
