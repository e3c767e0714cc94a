//! Shared record builders for domain unit tests.

use crate::domain::{Profile, Role, SeatRecord, SeatRecordDraft, Subject, SubjectId};

/// A valid record with the given key, room and seat; row/col derive from seat.
pub(crate) fn seat_record(roll: &str, room: &str, seat: u32) -> SeatRecord {
    let seat = i64::from(seat);
    SeatRecord::try_from(SeatRecordDraft {
        roll_number: roll.to_owned(),
        student_name: format!("Student {roll}"),
        room_number: room.to_owned(),
        seat_number: seat,
        row: (seat - 1) / 6 + 1,
        col: (seat - 1) % 6 + 1,
        exam_date: "2024-05-10".to_owned(),
        exam_time: "10:00".to_owned(),
        floor: None,
    })
    .expect("fixture record is valid")
}

/// A record with an explicit student name.
pub(crate) fn named_record(roll: &str, name: &str) -> SeatRecord {
    let mut draft = SeatRecordDraft::from(seat_record(roll, "101", 1));
    draft.student_name = name.to_owned();
    SeatRecord::try_from(draft).expect("fixture record is valid")
}

pub(crate) fn subject(id: &str) -> Subject {
    Subject {
        id: SubjectId::new(id).expect("fixture id is valid"),
        email: format!("{id}@example.edu"),
        full_name: Some(format!("Subject {id}")),
    }
}

pub(crate) fn profile(id: &str, role: Role) -> Profile {
    Profile {
        id: SubjectId::new(id).expect("fixture id is valid"),
        full_name: format!("Subject {id}"),
        role,
    }
}
