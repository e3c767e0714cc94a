//! Domain primitives, services and ports.
//!
//! Purpose: model seat allocations, profiles and sessions independently of
//! transport and storage. Adapters in `inbound` and `outbound` depend on this
//! module; nothing here depends on them.
//!
//! Public surface:
//! - Error, ErrorCode: transport-agnostic failure payload.
//! - SeatRecord and friends: validated seat allocations and upload rows.
//! - SessionRouter, AccountService: session gating and account flows.
//! - SeatRecordStore, BulkReconciliationEngine: record reads and writes.
//! - AdminPanel, StudentPanel: stateful panel controllers.

pub mod account_service;
pub mod auth;
pub mod bulk_import;
pub mod error;
pub mod layout;
pub mod panels;
pub mod ports;
pub mod profile;
pub mod search;
pub mod seat_record;
pub mod seat_store;
pub mod session_router;
pub mod trace_id;

#[cfg(test)]
pub(crate) mod test_fixtures;

pub use self::account_service::{
    AccountService, ProfileProvisioning, RoleSource, SignInOutcome, SignUpOutcome,
};
pub use self::auth::{
    AccessToken, AuthSession, Credentials, CredentialsValidationError, SignUpDetails, Subject,
};
pub use self::bulk_import::{
    BulkImportReport, BulkReconciliationEngine, CollapsedBatch, ImportPlan, RowDisposition,
    SupersededRow, collapse_batch, plan,
};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::layout::{
    GRID_COLS, GRID_ROWS, Occupant, PersonalCell, ROOM_CAPACITY, SeatConflict, SeatSlot,
    project_personal, project_room, seat_conflicts,
};
pub use self::panels::{AdminPanel, EditSession, StudentLookup, StudentPanel, Theme};
pub use self::profile::{Profile, ProfileValidationError, Role, SubjectId};
pub use self::search::filter_records;
pub use self::seat_record::{
    RawSeatRow, RollNumber, RoomNumber, SeatRecord, SeatRecordDraft, SeatRecordPatch,
    SeatRecordPatchDraft, SeatRecordValidationError, StudentName, fields,
};
pub use self::seat_store::{DeleteOutcome, SeatRecordStore, UpdateOutcome};
pub use self::session_router::{
    Access, DenialReason, Destination, Panel, Resolution, RouterState, SessionRouter, route,
};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
