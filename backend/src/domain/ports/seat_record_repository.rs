//! Port for seat record persistence.
//!
//! The [`SeatRecordRepository`] trait is the only path to stored seat
//! allocations. Adapters are keyed by roll number: inserts of an existing key
//! are rejected, and bulk upserts replace whole rows by key in one request.

use async_trait::async_trait;

use crate::domain::{RawSeatRow, RollNumber, RoomNumber, SeatRecord, SeatRecordPatch};

use super::define_port_error;

define_port_error! {
    /// Errors raised by seat record store adapters.
    pub enum SeatRecordRepositoryError {
        /// The store could not be reached.
        Connection { message: String } =>
            "seat record store connection failed: {message}",
        /// A read or write failed while executing.
        Query { message: String } =>
            "seat record store query failed: {message}",
        /// The store refused the write, for example a duplicate key or a
        /// value its column types cannot hold.
        Rejected { message: String } =>
            "seat record store rejected the write: {message}",
    }
}

/// Port for seat record storage and retrieval.
///
/// Roll numbers passed in are already normalised; adapters compare them
/// verbatim against stored keys.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SeatRecordRepository: Send + Sync {
    /// Every stored record, in the store's natural order.
    async fn select_all(&self) -> Result<Vec<SeatRecord>, SeatRecordRepositoryError>;

    /// Room numbers of every stored record. Duplicates are allowed.
    async fn select_room_numbers(&self) -> Result<Vec<RoomNumber>, SeatRecordRepositoryError>;

    /// Records assigned to `room`.
    async fn select_by_room(
        &self,
        room: &RoomNumber,
    ) -> Result<Vec<SeatRecord>, SeatRecordRepositoryError>;

    /// Records whose key equals `roll`.
    ///
    /// Returns every match so callers can detect broken key uniqueness.
    async fn select_by_roll(
        &self,
        roll: &RollNumber,
    ) -> Result<Vec<SeatRecord>, SeatRecordRepositoryError>;

    /// Insert a new record. An existing key yields
    /// [`SeatRecordRepositoryError::Rejected`].
    async fn insert(&self, record: &SeatRecord) -> Result<(), SeatRecordRepositoryError>;

    /// Insert or replace every row by key as one all-or-nothing request.
    ///
    /// Rows arrive as text and the adapter applies column typing; any row it
    /// cannot coerce rejects the whole batch. Returns the rows written.
    async fn upsert_rows(&self, rows: &[RawSeatRow]) -> Result<usize, SeatRecordRepositoryError>;

    /// Apply `patch` to the record keyed by `roll`. Returns rows affected.
    async fn update(
        &self,
        roll: &RollNumber,
        patch: &SeatRecordPatch,
    ) -> Result<usize, SeatRecordRepositoryError>;

    /// Remove the record keyed by `roll`. Returns rows removed.
    async fn delete(&self, roll: &RollNumber) -> Result<usize, SeatRecordRepositoryError>;
}
