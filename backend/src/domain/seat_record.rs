//! Seat allocation records.
//!
//! A [`SeatRecord`] binds one student, keyed by roll number, to a seat in an
//! exam room. Roll numbers are normalised to upper case at construction so
//! lookups are case-insensitive by contract. [`RawSeatRow`] carries
//! header-keyed text from bulk uploads before any type coercion.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Field names shared by the wire format, bulk upload headers and storage.
pub mod fields {
    pub const ROLL_NUMBER: &str = "rollNumber";
    pub const STUDENT_NAME: &str = "studentName";
    pub const ROOM_NUMBER: &str = "roomNumber";
    pub const SEAT_NUMBER: &str = "seatNumber";
    pub const ROW: &str = "row";
    pub const COL: &str = "col";
    pub const EXAM_DATE: &str = "examDate";
    pub const EXAM_TIME: &str = "examTime";
    pub const FLOOR: &str = "floor";
}

/// Validation errors raised while building records and patches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeatRecordValidationError {
    EmptyField { field: &'static str },
    NotAnInteger { field: &'static str, value: String },
    NotPositive { field: &'static str },
    RollNumberChanged,
    UnknownField { field: String },
}

impl fmt::Display for SeatRecordValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyField { field } => write!(f, "{field} must not be empty"),
            Self::NotAnInteger { field, value } => {
                write!(f, "{field} must be an integer, got {value:?}")
            }
            Self::NotPositive { field } => write!(f, "{field} must be a positive integer"),
            Self::RollNumberChanged => write!(f, "rollNumber cannot be changed by an edit"),
            Self::UnknownField { field } => write!(f, "unknown field {field:?}"),
        }
    }
}

impl std::error::Error for SeatRecordValidationError {}

macro_rules! text_newtype {
    ($(#[$meta:meta])* $name:ident, $field:expr, $normalise:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Validate and normalise raw input.
            pub fn new(raw: impl AsRef<str>) -> Result<Self, SeatRecordValidationError> {
                let trimmed = raw.as_ref().trim();
                if trimmed.is_empty() {
                    return Err(SeatRecordValidationError::EmptyField { field: $field });
                }
                let normalise: fn(&str) -> String = $normalise;
                Ok(Self(normalise(trimmed)))
            }

            /// Borrow the normalised text.
            pub fn as_str(&self) -> &str {
                self.0.as_str()
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.as_str()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = SeatRecordValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }
    };
}

text_newtype!(
    /// Student roll number, trimmed and upper-cased.
    ///
    /// # Examples
    /// ```
    /// use seating::domain::RollNumber;
    ///
    /// let roll = RollNumber::new(" mur2300307 ").expect("valid roll");
    /// assert_eq!(roll.as_str(), "MUR2300307");
    /// ```
    RollNumber,
    fields::ROLL_NUMBER,
    str::to_uppercase
);

text_newtype!(
    /// Display name of a seated student.
    StudentName,
    fields::STUDENT_NAME,
    str::to_owned
);

text_newtype!(
    /// Exam room label, compared and sorted as text.
    RoomNumber,
    fields::ROOM_NUMBER,
    str::to_owned
);

fn positive(field: &'static str, value: i64) -> Result<u32, SeatRecordValidationError> {
    u32::try_from(value)
        .ok()
        .filter(|v| *v > 0)
        .ok_or(SeatRecordValidationError::NotPositive { field })
}

fn parse_integer(field: &'static str, raw: &str) -> Result<i64, SeatRecordValidationError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| SeatRecordValidationError::NotAnInteger {
            field,
            value: raw.to_owned(),
        })
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

/// A validated seat allocation.
///
/// ## Invariants
/// - `seat_number`, `row` and `col` are positive.
/// - `roll_number` is upper case and unique within the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "SeatRecordDraft", into = "SeatRecordDraft")]
pub struct SeatRecord {
    roll_number: RollNumber,
    student_name: StudentName,
    room_number: RoomNumber,
    seat_number: u32,
    row: u32,
    col: u32,
    exam_date: String,
    exam_time: String,
    floor: Option<String>,
}

impl SeatRecord {
    pub fn roll_number(&self) -> &RollNumber {
        &self.roll_number
    }

    pub fn student_name(&self) -> &StudentName {
        &self.student_name
    }

    pub fn room_number(&self) -> &RoomNumber {
        &self.room_number
    }

    pub fn seat_number(&self) -> u32 {
        self.seat_number
    }

    /// Row of the student's own seat in the personal grid, 1-based.
    pub fn row(&self) -> u32 {
        self.row
    }

    /// Column of the student's own seat in the personal grid, 1-based.
    pub fn col(&self) -> u32 {
        self.col
    }

    pub fn exam_date(&self) -> &str {
        &self.exam_date
    }

    pub fn exam_time(&self) -> &str {
        &self.exam_time
    }

    pub fn floor(&self) -> Option<&str> {
        self.floor.as_deref()
    }

    /// Coerce a header-keyed upload row into a record.
    ///
    /// Store adapters use this to apply column typing; the reconciliation
    /// engine itself never validates rows.
    pub fn try_from_raw(row: &RawSeatRow) -> Result<Self, SeatRecordValidationError> {
        let text = |field: &str| row.get(field).unwrap_or_default().to_owned();
        let int = |field: &'static str| parse_integer(field, row.get(field).unwrap_or_default());
        SeatRecordDraft {
            roll_number: text(fields::ROLL_NUMBER),
            student_name: text(fields::STUDENT_NAME),
            room_number: text(fields::ROOM_NUMBER),
            seat_number: int(fields::SEAT_NUMBER)?,
            row: int(fields::ROW)?,
            col: int(fields::COL)?,
            exam_date: text(fields::EXAM_DATE),
            exam_time: text(fields::EXAM_TIME),
            floor: row.get(fields::FLOOR).map(str::to_owned),
        }
        .try_into()
    }
}

/// Unvalidated record input as it appears on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeatRecordDraft {
    pub roll_number: String,
    pub student_name: String,
    pub room_number: String,
    pub seat_number: i64,
    pub row: i64,
    pub col: i64,
    #[serde(default)]
    pub exam_date: String,
    #[serde(default)]
    pub exam_time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub floor: Option<String>,
}

impl TryFrom<SeatRecordDraft> for SeatRecord {
    type Error = SeatRecordValidationError;

    fn try_from(draft: SeatRecordDraft) -> Result<Self, Self::Error> {
        Ok(Self {
            roll_number: RollNumber::new(&draft.roll_number)?,
            student_name: StudentName::new(&draft.student_name)?,
            room_number: RoomNumber::new(&draft.room_number)?,
            seat_number: positive(fields::SEAT_NUMBER, draft.seat_number)?,
            row: positive(fields::ROW, draft.row)?,
            col: positive(fields::COL, draft.col)?,
            exam_date: draft.exam_date.trim().to_owned(),
            exam_time: draft.exam_time.trim().to_owned(),
            floor: non_blank(draft.floor),
        })
    }
}

impl From<SeatRecord> for SeatRecordDraft {
    fn from(record: SeatRecord) -> Self {
        Self {
            roll_number: record.roll_number.into(),
            student_name: record.student_name.into(),
            room_number: record.room_number.into(),
            seat_number: i64::from(record.seat_number),
            row: i64::from(record.row),
            col: i64::from(record.col),
            exam_date: record.exam_date,
            exam_time: record.exam_time,
            floor: record.floor,
        }
    }
}

/// A validated partial update. The roll number is never part of a patch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeatRecordPatch {
    student_name: Option<StudentName>,
    room_number: Option<RoomNumber>,
    seat_number: Option<u32>,
    row: Option<u32>,
    col: Option<u32>,
    exam_date: Option<String>,
    exam_time: Option<String>,
    floor: Option<Option<String>>,
}

impl SeatRecordPatch {
    pub fn student_name(&self) -> Option<&StudentName> {
        self.student_name.as_ref()
    }

    pub fn room_number(&self) -> Option<&RoomNumber> {
        self.room_number.as_ref()
    }

    pub fn seat_number(&self) -> Option<u32> {
        self.seat_number
    }

    pub fn row(&self) -> Option<u32> {
        self.row
    }

    pub fn col(&self) -> Option<u32> {
        self.col
    }

    pub fn exam_date(&self) -> Option<&str> {
        self.exam_date.as_deref()
    }

    pub fn exam_time(&self) -> Option<&str> {
        self.exam_time.as_deref()
    }

    /// `Some(None)` clears the floor; `None` leaves it untouched.
    pub fn floor(&self) -> Option<Option<&str>> {
        self.floor.as_ref().map(Option::as_deref)
    }

    /// True when applying the patch would change nothing.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Produce the record that results from applying this patch.
    #[must_use]
    pub fn apply_to(&self, record: &SeatRecord) -> SeatRecord {
        let mut next = record.clone();
        if let Some(name) = &self.student_name {
            next.student_name = name.clone();
        }
        if let Some(room) = &self.room_number {
            next.room_number = room.clone();
        }
        next.seat_number = self.seat_number.unwrap_or(next.seat_number);
        next.row = self.row.unwrap_or(next.row);
        next.col = self.col.unwrap_or(next.col);
        if let Some(date) = &self.exam_date {
            next.exam_date = date.clone();
        }
        if let Some(time) = &self.exam_time {
            next.exam_time = time.clone();
        }
        if let Some(floor) = &self.floor {
            next.floor = floor.clone();
        }
        next
    }
}

/// Unvalidated edit input.
///
/// An edit form may echo the record's roll number back; it is accepted only
/// when it matches the record being edited. An empty `floor` clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeatRecordPatchDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roll_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub student_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seat_number: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub col: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exam_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exam_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub floor: Option<String>,
}

impl SeatRecordPatchDraft {
    /// Validate the draft as an edit of the record keyed by `key`.
    pub fn into_patch(self, key: &RollNumber) -> Result<SeatRecordPatch, SeatRecordValidationError> {
        if let Some(raw) = self.roll_number {
            if RollNumber::new(raw)? != *key {
                return Err(SeatRecordValidationError::RollNumberChanged);
            }
        }
        Ok(SeatRecordPatch {
            student_name: self.student_name.map(StudentName::new).transpose()?,
            room_number: self.room_number.map(RoomNumber::new).transpose()?,
            seat_number: self
                .seat_number
                .map(|v| positive(fields::SEAT_NUMBER, v))
                .transpose()?,
            row: self.row.map(|v| positive(fields::ROW, v)).transpose()?,
            col: self.col.map(|v| positive(fields::COL, v)).transpose()?,
            exam_date: self.exam_date.map(|v| v.trim().to_owned()),
            exam_time: self.exam_time.map(|v| v.trim().to_owned()),
            floor: self.floor.map(|v| non_blank(Some(v))),
        })
    }

    /// Set one field from form text, keyed by its wire name.
    pub fn set_field(&mut self, field: &str, value: String) -> Result<(), SeatRecordValidationError> {
        match field {
            fields::STUDENT_NAME => self.student_name = Some(value),
            fields::ROOM_NUMBER => self.room_number = Some(value),
            fields::SEAT_NUMBER => self.seat_number = Some(parse_integer(fields::SEAT_NUMBER, &value)?),
            fields::ROW => self.row = Some(parse_integer(fields::ROW, &value)?),
            fields::COL => self.col = Some(parse_integer(fields::COL, &value)?),
            fields::EXAM_DATE => self.exam_date = Some(value),
            fields::EXAM_TIME => self.exam_time = Some(value),
            fields::FLOOR => self.floor = Some(value),
            fields::ROLL_NUMBER => return Err(SeatRecordValidationError::RollNumberChanged),
            other => {
                return Err(SeatRecordValidationError::UnknownField {
                    field: other.to_owned(),
                });
            }
        }
        Ok(())
    }
}

impl From<&SeatRecord> for SeatRecordPatchDraft {
    fn from(record: &SeatRecord) -> Self {
        Self {
            roll_number: Some(record.roll_number.to_string()),
            student_name: Some(record.student_name.to_string()),
            room_number: Some(record.room_number.to_string()),
            seat_number: Some(i64::from(record.seat_number)),
            row: Some(i64::from(record.row)),
            col: Some(i64::from(record.col)),
            exam_date: Some(record.exam_date.clone()),
            exam_time: Some(record.exam_time.clone()),
            floor: Some(record.floor.clone().unwrap_or_default()),
        }
    }
}

/// One header-keyed row from a bulk upload, all values as text.
///
/// Non-string JSON scalars are stringified and `null` reads as an empty cell,
/// so rows produced by typed parsers still land here as text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, Value>", into = "BTreeMap<String, String>")]
pub struct RawSeatRow(BTreeMap<String, String>);

impl RawSeatRow {
    /// Build a row from header/value pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Cell text for a header, if the header is present.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    /// True when every cell is blank, as for an empty CSV line.
    pub fn is_blank(&self) -> bool {
        self.0.values().all(|v| v.trim().is_empty())
    }

    /// The normalised roll number key, or `None` when the cell is missing or blank.
    pub fn key(&self) -> Option<RollNumber> {
        self.get(fields::ROLL_NUMBER)
            .and_then(|raw| RollNumber::new(raw).ok())
    }

    /// Copy of the row with the roll number cell normalised for storage.
    #[must_use]
    pub fn with_normalised_key(&self) -> Self {
        let mut next = self.clone();
        if let Some(key) = self.key() {
            next.0.insert(fields::ROLL_NUMBER.to_owned(), key.into());
        }
        next
    }
}

impl From<BTreeMap<String, Value>> for RawSeatRow {
    fn from(cells: BTreeMap<String, Value>) -> Self {
        Self(
            cells
                .into_iter()
                .map(|(k, v)| {
                    let text = match v {
                        Value::String(s) => s,
                        Value::Null => String::new(),
                        other => other.to_string(),
                    };
                    (k, text)
                })
                .collect(),
        )
    }
}

impl From<RawSeatRow> for BTreeMap<String, String> {
    fn from(row: RawSeatRow) -> Self {
        row.0
    }
}
