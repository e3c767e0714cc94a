//! Seat record store service.
//!
//! Wraps the [`SeatRecordRepository`] port with the lookup and mutation
//! contracts the panels rely on: case-insensitive roll number lookups,
//! lexicographically sorted room lists, and explicit outcomes for edits of
//! keys that do not exist.

use std::collections::BTreeSet;
use std::sync::Arc;

use serde::Serialize;
use serde_json::json;
use tracing::error;

use crate::domain::ports::{SeatRecordRepository, SeatRecordRepositoryError};
use crate::domain::{Error, RawSeatRow, RollNumber, RoomNumber, SeatRecord, SeatRecordPatch};

/// Outcome of [`SeatRecordStore::update_one`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateOutcome {
    Updated,
    NoRecord,
    NothingToChange,
}

/// Outcome of [`SeatRecordStore::delete_one`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeleteOutcome {
    Removed,
    NoRecord,
}

/// Service over the seat record store.
#[derive(Clone)]
pub struct SeatRecordStore {
    repo: Arc<dyn SeatRecordRepository>,
}

impl SeatRecordStore {
    pub fn new(repo: Arc<dyn SeatRecordRepository>) -> Self {
        Self { repo }
    }

    fn map_read_error(error: SeatRecordRepositoryError) -> Error {
        Error::store_failure(format!("Error fetching data: {error}"))
    }

    fn map_write_error(error: SeatRecordRepositoryError) -> Error {
        Error::store_failure(error.to_string())
    }

    /// Every stored record.
    pub async fn list_all(&self) -> Result<Vec<SeatRecord>, Error> {
        self.repo.select_all().await.map_err(Self::map_read_error)
    }

    /// Distinct room numbers in ascending lexicographic order.
    pub async fn list_distinct_rooms(&self) -> Result<Vec<RoomNumber>, Error> {
        let rooms = self
            .repo
            .select_room_numbers()
            .await
            .map_err(Self::map_read_error)?;
        Ok(rooms
            .into_iter()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect())
    }

    /// Every record assigned to `room`.
    pub async fn find_by_room_number(&self, room: &RoomNumber) -> Result<Vec<SeatRecord>, Error> {
        self.repo
            .select_by_room(room)
            .await
            .map_err(Self::map_read_error)
    }

    /// Look up a record by roll number, ignoring case and surrounding space.
    ///
    /// Blank input is rejected before the store is consulted. More than one
    /// stored match means key uniqueness is broken and is reported as a store
    /// failure rather than picking one.
    pub async fn find_by_roll_number(&self, raw: &str) -> Result<Option<SeatRecord>, Error> {
        let roll = RollNumber::new(raw)
            .map_err(|_| Error::invalid_request("Please enter a roll number"))?;
        let mut matches = self
            .repo
            .select_by_roll(&roll)
            .await
            .map_err(Self::map_read_error)?;
        match matches.len() {
            0 => Ok(None),
            1 => Ok(matches.pop()),
            count => {
                error!(roll_number = %roll, count, "roll number matches more than one record");
                Err(Error::store_failure("roll number matches more than one record")
                    .with_details(json!({ "rollNumber": roll, "matches": count })))
            }
        }
    }

    /// Insert a single record. A duplicate key surfaces as a store failure.
    pub async fn insert_one(&self, record: &SeatRecord) -> Result<(), Error> {
        self.repo
            .insert(record)
            .await
            .map_err(|err| Error::store_failure(format!("Error adding student: {err}")))
    }

    /// Forward an already reconciled batch as one upsert.
    ///
    /// A batch the store refuses to coerce is a validation gap; any other
    /// failure is a store failure. Nothing is written in either case.
    pub async fn upsert_many(&self, rows: &[RawSeatRow]) -> Result<usize, Error> {
        if rows.is_empty() {
            return Ok(0);
        }
        self.repo.upsert_rows(rows).await.map_err(|err| match err {
            SeatRecordRepositoryError::Rejected { message } => {
                Error::validation_gap(format!("Upload failed: {message}"))
            }
            other => Error::store_failure(format!("Upload failed: {other}")),
        })
    }

    /// Apply `patch` to the record keyed by `roll`.
    pub async fn update_one(
        &self,
        roll: &RollNumber,
        patch: &SeatRecordPatch,
    ) -> Result<UpdateOutcome, Error> {
        if patch.is_empty() {
            return Ok(UpdateOutcome::NothingToChange);
        }
        let affected = self
            .repo
            .update(roll, patch)
            .await
            .map_err(Self::map_write_error)?;
        Ok(if affected == 0 {
            UpdateOutcome::NoRecord
        } else {
            UpdateOutcome::Updated
        })
    }

    /// Remove the record keyed by `roll`. A missing key is not an error.
    pub async fn delete_one(&self, roll: &RollNumber) -> Result<DeleteOutcome, Error> {
        let removed = self
            .repo
            .delete(roll)
            .await
            .map_err(Self::map_write_error)?;
        Ok(if removed == 0 {
            DeleteOutcome::NoRecord
        } else {
            DeleteOutcome::Removed
        })
    }
}

#[cfg(test)]
#[path = "seat_store_tests.rs"]
mod tests;
