//! In-memory `SeatRecordRepository`.

use std::collections::{BTreeSet, HashSet};
use std::sync::RwLock;

use async_trait::async_trait;

use super::{read, write};
use crate::domain::ports::{SeatRecordRepository, SeatRecordRepositoryError};
use crate::domain::{RawSeatRow, RollNumber, RoomNumber, SeatRecord, SeatRecordPatch};

/// Seat records held in insertion order, keyed by roll number.
#[derive(Debug, Default)]
pub struct InMemorySeatRecordRepository {
    records: RwLock<Vec<SeatRecord>>,
}

impl InMemorySeatRecordRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store; later records replace earlier ones with the same key.
    pub fn with_records(records: impl IntoIterator<Item = SeatRecord>) -> Self {
        let mut stored: Vec<SeatRecord> = Vec::new();
        for record in records {
            match stored
                .iter_mut()
                .find(|existing| existing.roll_number() == record.roll_number())
            {
                Some(slot) => *slot = record,
                None => stored.push(record),
            }
        }
        Self {
            records: RwLock::new(stored),
        }
    }

    /// Records currently held, in insertion order.
    pub fn snapshot(&self) -> Vec<SeatRecord> {
        read(&self.records).clone()
    }
}

fn coerce(rows: &[RawSeatRow]) -> Result<Vec<SeatRecord>, SeatRecordRepositoryError> {
    let mut seen = HashSet::new();
    rows.iter()
        .enumerate()
        .map(|(index, row)| {
            let record = SeatRecord::try_from_raw(row).map_err(|err| {
                SeatRecordRepositoryError::rejected(format!("row {}: {err}", index + 1))
            })?;
            // PostgreSQL refuses to touch one conflict key twice per statement.
            if !seen.insert(record.roll_number().clone()) {
                return Err(SeatRecordRepositoryError::rejected(format!(
                    "row {}: {} appears more than once in the batch",
                    index + 1,
                    record.roll_number()
                )));
            }
            Ok(record)
        })
        .collect()
}

#[async_trait]
impl SeatRecordRepository for InMemorySeatRecordRepository {
    async fn select_all(&self) -> Result<Vec<SeatRecord>, SeatRecordRepositoryError> {
        Ok(self.snapshot())
    }

    async fn select_room_numbers(&self) -> Result<Vec<RoomNumber>, SeatRecordRepositoryError> {
        let rooms: BTreeSet<RoomNumber> = read(&self.records)
            .iter()
            .map(|record| record.room_number().clone())
            .collect();
        Ok(rooms.into_iter().collect())
    }

    async fn select_by_room(
        &self,
        room: &RoomNumber,
    ) -> Result<Vec<SeatRecord>, SeatRecordRepositoryError> {
        Ok(read(&self.records)
            .iter()
            .filter(|record| record.room_number() == room)
            .cloned()
            .collect())
    }

    async fn select_by_roll(
        &self,
        roll: &RollNumber,
    ) -> Result<Vec<SeatRecord>, SeatRecordRepositoryError> {
        Ok(read(&self.records)
            .iter()
            .filter(|record| record.roll_number() == roll)
            .cloned()
            .collect())
    }

    async fn insert(&self, record: &SeatRecord) -> Result<(), SeatRecordRepositoryError> {
        let mut records = write(&self.records);
        if records
            .iter()
            .any(|existing| existing.roll_number() == record.roll_number())
        {
            return Err(SeatRecordRepositoryError::rejected(format!(
                "duplicate key value violates unique constraint on rollNumber ({})",
                record.roll_number()
            )));
        }
        records.push(record.clone());
        Ok(())
    }

    async fn upsert_rows(&self, rows: &[RawSeatRow]) -> Result<usize, SeatRecordRepositoryError> {
        let incoming = coerce(rows)?;
        let mut records = write(&self.records);
        let mut next = records.clone();
        for record in incoming.iter() {
            match next
                .iter_mut()
                .find(|existing| existing.roll_number() == record.roll_number())
            {
                Some(slot) => *slot = record.clone(),
                None => next.push(record.clone()),
            }
        }
        *records = next;
        Ok(incoming.len())
    }

    async fn update(
        &self,
        roll: &RollNumber,
        patch: &SeatRecordPatch,
    ) -> Result<usize, SeatRecordRepositoryError> {
        if patch.is_empty() {
            return Ok(0);
        }
        let mut records = write(&self.records);
        let mut touched = 0;
        for record in records.iter_mut().filter(|r| r.roll_number() == roll) {
            *record = patch.apply_to(record);
            touched += 1;
        }
        Ok(touched)
    }

    async fn delete(&self, roll: &RollNumber) -> Result<usize, SeatRecordRepositoryError> {
        let mut records = write(&self.records);
        let before = records.len();
        records.retain(|record| record.roll_number() != roll);
        Ok(before - records.len())
    }
}
