//! OpenAPI schema definitions for domain types.
//!
//! Domain types remain framework-agnostic by not deriving `ToSchema`. The
//! wrappers here mirror their wire shape so utoipa can document them without
//! the domain depending on it.

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request is malformed or fails validation.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// Credentials were rejected or no session is present.
    #[schema(rename = "auth_failure")]
    AuthFailure,
    /// Signed in, but no profile record exists.
    #[schema(rename = "profile_missing")]
    ProfileMissing,
    /// The caller's role does not permit this panel.
    #[schema(rename = "forbidden")]
    Forbidden,
    /// The requested record does not exist.
    #[schema(rename = "not_found")]
    NotFound,
    /// A bulk batch carried a malformed row.
    #[schema(rename = "validation_gap")]
    ValidationGap,
    /// The record store failed.
    #[schema(rename = "store_failure")]
    StoreFailure,
    /// The identity provider could not be reached.
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    /// An unexpected error occurred on the server.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Error, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorSchema {
    /// Stable machine-readable error code.
    #[schema(example = "invalid_request")]
    code: ErrorCodeSchema,
    /// Human-readable message returned to clients.
    #[schema(example = "Please enter a roll number")]
    message: String,
    /// Correlation identifier echoed in the `trace-id` header.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    /// Supplementary details, such as `redirect` for gated panels.
    details: Option<serde_json::Value>,
}

/// OpenAPI schema for [`crate::domain::SeatRecord`].
#[derive(ToSchema)]
#[schema(as = crate::domain::SeatRecord, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct SeatRecordSchema {
    #[schema(example = "MUR2300307")]
    roll_number: String,
    #[schema(example = "Asha Rao")]
    student_name: String,
    #[schema(example = "101")]
    room_number: String,
    #[schema(minimum = 1, example = 14)]
    seat_number: u32,
    #[schema(minimum = 1, example = 3)]
    row: u32,
    #[schema(minimum = 1, example = 2)]
    col: u32,
    #[schema(example = "2024-05-10")]
    exam_date: String,
    #[schema(example = "10:00")]
    exam_time: String,
    #[schema(example = "Ground")]
    floor: Option<String>,
}

/// OpenAPI schema for [`crate::domain::SeatSlot`].
#[derive(ToSchema)]
#[schema(as = crate::domain::SeatSlot, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct SeatSlotSchema {
    /// Seat number, 1 to 48.
    #[schema(minimum = 1, maximum = 48, example = 7)]
    seat_number: u32,
    /// `null` when the seat is empty.
    occupant: Option<OccupantSchema>,
}

/// OpenAPI schema for [`crate::domain::Occupant`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Occupant, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct OccupantSchema {
    #[schema(example = "Asha Rao")]
    student_name: String,
    #[schema(example = "MUR2300307")]
    roll_number: String,
}

/// OpenAPI schema for [`crate::domain::SeatConflict`].
#[derive(ToSchema)]
#[schema(as = crate::domain::SeatConflict, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct SeatConflictSchema {
    #[schema(example = 4)]
    seat_number: u32,
    /// Every record claiming the seat.
    roll_numbers: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use utoipa::PartialSchema;

    fn schema_to_json<T: PartialSchema>() -> String {
        serde_json::to_string(&T::schema()).expect("schema serialises to JSON")
    }

    #[test]
    fn error_code_schema_has_expected_name() {
        // utoipa replaces :: with . in schema names
        assert_eq!(ErrorCodeSchema::name(), "crate.domain.ErrorCode");
    }

    #[test]
    fn error_code_schema_variants_match_domain() {
        let schema_json = schema_to_json::<ErrorCodeSchema>();
        for code in [
            crate::domain::ErrorCode::InvalidRequest,
            crate::domain::ErrorCode::AuthFailure,
            crate::domain::ErrorCode::ProfileMissing,
            crate::domain::ErrorCode::Forbidden,
            crate::domain::ErrorCode::NotFound,
            crate::domain::ErrorCode::ValidationGap,
            crate::domain::ErrorCode::StoreFailure,
            crate::domain::ErrorCode::ServiceUnavailable,
            crate::domain::ErrorCode::InternalError,
        ] {
            let wire = serde_json::to_value(code).expect("code serialises");
            let wire = wire.as_str().expect("codes are strings");
            assert!(schema_json.contains(wire), "missing {wire}");
        }
    }

    #[test]
    fn error_schema_uses_wire_field_names() {
        let schema_json = schema_to_json::<ErrorSchema>();
        assert_eq!(ErrorSchema::name(), "crate.domain.Error");
        assert!(schema_json.contains("traceId"));
        assert!(schema_json.contains("message"));
    }

    #[test]
    fn seat_record_schema_uses_wire_field_names() {
        let schema_json = schema_to_json::<SeatRecordSchema>();
        for field in ["rollNumber", "studentName", "roomNumber", "seatNumber"] {
            assert!(schema_json.contains(field), "missing {field}");
        }
    }
}
