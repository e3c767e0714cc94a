//! Seat grid projections.
//!
//! Rooms are drawn as a fixed 8x6 grid of 48 seats. The room view maps
//! seat numbers to occupants; the personal view marks the student's own
//! `(row, col)` and numbers every other cell in row-major order.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::domain::{RollNumber, SeatRecord, StudentName};

/// Rows in every room grid.
pub const GRID_ROWS: u32 = 8;
/// Columns in every room grid.
pub const GRID_COLS: u32 = 6;
/// Seats in every room grid.
pub const ROOM_CAPACITY: u32 = GRID_ROWS * GRID_COLS;

/// Who sits in a seat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Occupant {
    pub student_name: StudentName,
    pub roll_number: RollNumber,
}

/// One seat in the room view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeatSlot {
    pub seat_number: u32,
    pub occupant: Option<Occupant>,
}

/// Project room records onto seats 1..=48.
///
/// When several records claim one seat the first in input order wins.
/// Records numbered outside the grid are not drawn.
pub fn project_room(records: &[SeatRecord]) -> Vec<SeatSlot> {
    (1..=ROOM_CAPACITY)
        .map(|seat_number| SeatSlot {
            seat_number,
            occupant: records
                .iter()
                .find(|record| record.seat_number() == seat_number)
                .map(|record| Occupant {
                    student_name: record.student_name().clone(),
                    roll_number: record.roll_number().clone(),
                }),
        })
        .collect()
}

/// One cell in the personal view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "number", rename_all = "snake_case")]
pub enum PersonalCell {
    /// The student's own seat.
    Own,
    /// Any other seat, labelled `(row - 1) * 6 + col`.
    Numbered(u32),
}

/// Project a record onto the 48-cell personal view, row-major.
///
/// A `(row, col)` outside the grid marks no cell.
pub fn project_personal(record: &SeatRecord) -> Vec<PersonalCell> {
    (1..=GRID_ROWS)
        .flat_map(|row| (1..=GRID_COLS).map(move |col| (row, col)))
        .map(|(row, col)| {
            if (row, col) == (record.row(), record.col()) {
                PersonalCell::Own
            } else {
                PersonalCell::Numbered((row - 1) * GRID_COLS + col)
            }
        })
        .collect()
}

/// Seat numbers claimed by more than one record in a room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeatConflict {
    pub seat_number: u32,
    pub roll_numbers: Vec<RollNumber>,
}

/// Report seats that more than one record claims, ordered by seat number.
///
/// Nothing enforces seat uniqueness; this only surfaces clashes so the room
/// view's first-record-wins rule does not hide them.
pub fn seat_conflicts(records: &[SeatRecord]) -> Vec<SeatConflict> {
    let mut by_seat: BTreeMap<u32, Vec<RollNumber>> = BTreeMap::new();
    for record in records {
        by_seat
            .entry(record.seat_number())
            .or_default()
            .push(record.roll_number().clone());
    }
    by_seat
        .into_iter()
        .filter(|(_, rolls)| rolls.len() > 1)
        .map(|(seat_number, roll_numbers)| SeatConflict {
            seat_number,
            roll_numbers,
        })
        .collect()
}
