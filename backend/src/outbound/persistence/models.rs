//! Internal Diesel row structs for database operations.
//!
//! These types never leave the persistence layer; repositories convert them
//! to and from domain types.

use diesel::prelude::*;

use super::schema::{mock_exam_data, profiles};

/// Row struct for reading from the seat record table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = mock_exam_data)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct SeatRecordRow {
    pub roll_number: String,
    pub student_name: String,
    pub room_number: String,
    pub seat_number: i32,
    pub row: i32,
    pub col: i32,
    pub exam_date: String,
    pub exam_time: String,
    pub floor: Option<String>,
}

/// Insertable struct for seat record inserts and upserts.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = mock_exam_data)]
pub(crate) struct NewSeatRecordRow<'a> {
    pub roll_number: &'a str,
    pub student_name: &'a str,
    pub room_number: &'a str,
    pub seat_number: i32,
    pub row: i32,
    pub col: i32,
    pub exam_date: &'a str,
    pub exam_time: &'a str,
    pub floor: Option<&'a str>,
}

/// Changeset for partial seat record updates; `None` leaves a column alone.
#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = mock_exam_data)]
pub(crate) struct SeatRecordChangeset<'a> {
    pub student_name: Option<&'a str>,
    pub room_number: Option<&'a str>,
    pub seat_number: Option<i32>,
    pub row: Option<i32>,
    pub col: Option<i32>,
    pub exam_date: Option<&'a str>,
    pub exam_time: Option<&'a str>,
    pub floor: Option<Option<&'a str>>,
}

/// Row struct for reading and inserting profiles.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = profiles)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ProfileRow {
    pub id: String,
    pub full_name: String,
    pub role: String,
}
