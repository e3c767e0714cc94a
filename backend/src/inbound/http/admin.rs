//! Admin panel HTTP handlers.
//!
//! Each request opens a fresh [`AdminPanel`], which loads the record and room
//! lists, and drives it through the same transitions a panel user would.
//!
//! ```text
//! GET    /api/v1/admin/records?q=asha
//! POST   /api/v1/admin/records
//! PATCH  /api/v1/admin/records/{rollNumber}
//! DELETE /api/v1/admin/records/{rollNumber}
//! POST   /api/v1/admin/records/import
//! POST   /api/v1/admin/records/import/preview
//! GET    /api/v1/admin/rooms
//! GET    /api/v1/admin/rooms/{roomNumber}/layout
//! ```

use std::collections::BTreeMap;

use actix_web::{HttpResponse, delete, get, patch, post, web};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::{ParsedRowSource, SeatRowSource};
use crate::domain::{
    AdminPanel, BulkImportReport, DeleteOutcome, Error, ImportPlan, Panel, RawSeatRow, RollNumber,
    RoomNumber, SeatConflict, SeatRecord, SeatRecordDraft, SeatSlot, UpdateOutcome, fields,
    seat_conflicts,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::access::require_panel;
use crate::inbound::http::schemas::{
    ErrorSchema, SeatConflictSchema, SeatRecordSchema, SeatSlotSchema,
};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

async fn open_panel(state: &HttpState, session: &SessionContext) -> ApiResult<AdminPanel> {
    let access = require_panel(state, session, Panel::Admin).await?;
    AdminPanel::open(&access, state.store.clone(), state.importer.clone()).await
}

fn parse_roll(raw: &str) -> Result<RollNumber, Error> {
    RollNumber::new(raw).map_err(|err| Error::invalid_request(err.to_string()))
}

fn parse_room(raw: &str) -> Result<RoomNumber, Error> {
    RoomNumber::new(raw).map_err(|err| Error::invalid_request(err.to_string()))
}

/// Form text for a JSON cell: strings as-is, `null` as blank, other scalars
/// in their JSON spelling.
fn cell_text(value: Value) -> String {
    match value {
        Value::String(text) => text,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct RecordsQuery {
    /// Name fragment in any case, or roll number fragment as stored.
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecordsResponse {
    /// Records matching the query, in store order.
    #[schema(value_type = Vec<SeatRecordSchema>)]
    pub records: Vec<SeatRecord>,
    /// Number of records in the store, regardless of the query.
    pub total: usize,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResponse {
    /// `updated`, `no_record` or `nothing_to_change`.
    #[schema(value_type = String, example = "updated")]
    pub outcome: UpdateOutcome,
    #[schema(value_type = Option<SeatRecordSchema>)]
    pub record: Option<SeatRecord>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResponse {
    /// `removed` or `no_record`.
    #[schema(value_type = String, example = "removed")]
    pub outcome: DeleteOutcome,
    pub removed: bool,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImportResponse {
    /// How each row was classified before the upload was applied.
    #[schema(value_type = Object)]
    pub plan: ImportPlan,
    #[schema(value_type = Object)]
    pub report: BulkImportReport,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RoomsResponse {
    #[schema(value_type = Vec<String>, example = json!(["101", "204"]))]
    pub rooms: Vec<RoomNumber>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LayoutResponse {
    #[schema(value_type = String, example = "101")]
    pub room_number: RoomNumber,
    /// Seats 1 to 48; the first record wins a contested seat.
    #[schema(value_type = Vec<SeatSlotSchema>)]
    pub seats: Vec<SeatSlot>,
    /// Seats claimed by more than one record.
    #[schema(value_type = Vec<SeatConflictSchema>)]
    pub conflicts: Vec<SeatConflict>,
}

/// List seat records, optionally filtered.
#[utoipa::path(
    get,
    path = "/api/v1/admin/records",
    params(RecordsQuery),
    responses(
        (status = 200, description = "Matching records", body = RecordsResponse),
        (status = 401, description = "No session or no profile", body = ErrorSchema),
        (status = 403, description = "Caller is not an admin", body = ErrorSchema),
        (status = 502, description = "Record store failed", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "listRecords"
)]
#[get("/admin/records")]
pub async fn list_records(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<RecordsQuery>,
) -> ApiResult<web::Json<RecordsResponse>> {
    let mut panel = open_panel(&state, &session).await?;
    panel.set_search_query(query.into_inner().q);
    Ok(web::Json(RecordsResponse {
        records: panel.visible_records().into_iter().cloned().collect(),
        total: panel.records().len(),
    }))
}

/// Add a single seat record.
#[utoipa::path(
    post,
    path = "/api/v1/admin/records",
    request_body(content = SeatRecordSchema),
    responses(
        (status = 201, description = "Record added", body = SeatRecordSchema),
        (status = 400, description = "Invalid record", body = ErrorSchema),
        (status = 502, description = "Store refused the record", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "addRecord"
)]
#[post("/admin/records")]
pub async fn add_record(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<SeatRecordDraft>,
) -> ApiResult<HttpResponse> {
    let mut panel = open_panel(&state, &session).await?;
    let draft = payload.into_inner();
    let key = RollNumber::new(&draft.roll_number).ok();
    panel.add_record(draft).await?;
    let record = key.and_then(|key| {
        panel
            .records()
            .iter()
            .find(|record| *record.roll_number() == key)
            .cloned()
    });
    Ok(HttpResponse::Created().json(record))
}

/// Edit fields of one record. The body maps field names to new values.
#[utoipa::path(
    patch,
    path = "/api/v1/admin/records/{rollNumber}",
    params(("rollNumber" = String, Path, description = "Key of the record to edit")),
    request_body(content = BTreeMap<String, String>, example = json!({ "roomNumber": "204", "seatNumber": 9 })),
    responses(
        (status = 200, description = "Edit applied or nothing to change", body = UpdateResponse),
        (status = 400, description = "Invalid field or value", body = ErrorSchema),
        (status = 404, description = "No listed record", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "editRecord"
)]
#[patch("/admin/records/{roll_number}")]
pub async fn edit_record(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<BTreeMap<String, Value>>,
) -> ApiResult<web::Json<UpdateResponse>> {
    let key = parse_roll(&path.into_inner())?;
    let mut panel = open_panel(&state, &session).await?;
    panel.begin_edit(&key)?;
    for (field, value) in payload.into_inner() {
        let text = cell_text(value);
        // Echoing the key back is allowed; changing it is not.
        if field == fields::ROLL_NUMBER && RollNumber::new(&text).is_ok_and(|roll| roll == key) {
            continue;
        }
        panel.edit_field(&field, text)?;
    }
    let outcome = panel.save_edit().await?;
    let record = panel
        .records()
        .iter()
        .find(|record| *record.roll_number() == key)
        .cloned();
    Ok(web::Json(UpdateResponse { outcome, record }))
}

/// Delete one record. Deleting a missing key is not an error.
#[utoipa::path(
    delete,
    path = "/api/v1/admin/records/{rollNumber}",
    params(("rollNumber" = String, Path, description = "Key of the record to delete")),
    responses(
        (status = 200, description = "Delete outcome", body = DeleteResponse),
        (status = 400, description = "Blank roll number", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "deleteRecord"
)]
#[delete("/admin/records/{roll_number}")]
pub async fn delete_record(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<DeleteResponse>> {
    let key = parse_roll(&path.into_inner())?;
    let mut panel = open_panel(&state, &session).await?;
    let outcome = panel.delete(&key).await?;
    Ok(web::Json(DeleteResponse {
        removed: outcome == DeleteOutcome::Removed,
        outcome,
    }))
}

async fn upload_rows(rows: Vec<RawSeatRow>) -> ApiResult<(ParsedRowSource, Vec<RawSeatRow>)> {
    let source = ParsedRowSource::new(rows);
    let rows = source
        .read_rows()
        .await
        .map_err(|err| Error::invalid_request(err.to_string()))?;
    Ok((source, rows))
}

/// Classify an upload against the store without writing anything.
#[utoipa::path(
    post,
    path = "/api/v1/admin/records/import/preview",
    request_body(content = Vec<BTreeMap<String, String>>, description = "Header-keyed rows, one object per CSV line"),
    responses(
        (status = 200, description = "Per-row plan"),
        (status = 502, description = "Record store failed", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "previewImport"
)]
#[post("/admin/records/import/preview")]
pub async fn preview_import(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<Vec<RawSeatRow>>,
) -> ApiResult<web::Json<ImportPlan>> {
    require_panel(&state, &session, Panel::Admin).await?;
    let (_, rows) = upload_rows(payload.into_inner()).await?;
    Ok(web::Json(state.importer.preview(&rows).await?))
}

/// Apply an upload as one all-or-nothing upsert keyed by roll number.
#[utoipa::path(
    post,
    path = "/api/v1/admin/records/import",
    request_body(content = Vec<BTreeMap<String, String>>, description = "Header-keyed rows, one object per CSV line"),
    responses(
        (status = 200, description = "Upload applied", body = ImportResponse),
        (status = 422, description = "A row could not be stored; nothing was written", body = ErrorSchema),
        (status = 502, description = "Record store failed", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "importRecords"
)]
#[post("/admin/records/import")]
pub async fn import_records(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<Vec<RawSeatRow>>,
) -> ApiResult<web::Json<ImportResponse>> {
    let mut panel = open_panel(&state, &session).await?;
    let (source, rows) = upload_rows(payload.into_inner()).await?;
    let plan = state.importer.preview(&rows).await?;
    let report = panel.bulk_import(&source).await?;
    Ok(web::Json(ImportResponse { plan, report }))
}

/// List the distinct rooms that hold at least one record.
#[utoipa::path(
    get,
    path = "/api/v1/admin/rooms",
    responses(
        (status = 200, description = "Distinct rooms", body = RoomsResponse),
        (status = 403, description = "Caller is not an admin", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "listRooms"
)]
#[get("/admin/rooms")]
pub async fn list_rooms(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<RoomsResponse>> {
    let panel = open_panel(&state, &session).await?;
    Ok(web::Json(RoomsResponse {
        rooms: panel.rooms().to_vec(),
    }))
}

/// Seat grid for one room.
#[utoipa::path(
    get,
    path = "/api/v1/admin/rooms/{roomNumber}/layout",
    params(("roomNumber" = String, Path, description = "Room to draw")),
    responses(
        (status = 200, description = "Seat layout", body = LayoutResponse),
        (status = 400, description = "Blank room number", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "roomLayout"
)]
#[get("/admin/rooms/{room_number}/layout")]
pub async fn room_layout(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<LayoutResponse>> {
    let room = parse_room(&path.into_inner())?;
    let mut panel = open_panel(&state, &session).await?;
    panel.select_room(room.clone());
    let seats = panel.view_layout().await?.to_vec();
    let in_room: Vec<SeatRecord> = panel
        .records()
        .iter()
        .filter(|record| *record.room_number() == room)
        .cloned()
        .collect();
    Ok(web::Json(LayoutResponse {
        conflicts: seat_conflicts(&in_room),
        room_number: room,
        seats,
    }))
}

#[cfg(test)]
#[path = "admin_tests.rs"]
mod tests;
