//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `migrations/` exactly. Seat record columns
//! keep their quoted camelCase SQL names; Rust-side names are snake_case.

diesel::table! {
    /// Seat allocations, one row per roll number.
    mock_exam_data (roll_number) {
        /// Primary key, stored upper case.
        #[sql_name = "rollNumber"]
        roll_number -> Text,
        #[sql_name = "studentName"]
        student_name -> Text,
        #[sql_name = "roomNumber"]
        room_number -> Text,
        #[sql_name = "seatNumber"]
        seat_number -> Int4,
        row -> Int4,
        col -> Int4,
        #[sql_name = "examDate"]
        exam_date -> Text,
        #[sql_name = "examTime"]
        exam_time -> Text,
        floor -> Nullable<Text>,
    }
}

diesel::table! {
    /// Role records keyed by identity provider subject id.
    profiles (id) {
        id -> Text,
        full_name -> Text,
        /// `admin` or `student`.
        role -> Text,
    }
}
