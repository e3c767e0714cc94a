//! Student panel HTTP handler.
//!
//! ```text
//! GET /api/v1/student/seat?rollNumber=MUR2300307
//! ```

use actix_web::{get, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{Panel, PersonalCell, SeatRecord, StudentPanel};
use crate::inbound::http::ApiResult;
use crate::inbound::http::access::require_panel;
use crate::inbound::http::schemas::{ErrorSchema, SeatRecordSchema};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(rename_all = "camelCase")]
pub struct SeatQuery {
    /// Roll number to look up; case and surrounding space are ignored.
    #[serde(default)]
    pub roll_number: String,
}

/// A found seat and the student's personal grid.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SeatLookupResponse {
    #[schema(value_type = SeatRecordSchema)]
    pub record: SeatRecord,
    /// Six-column grid, row-major, marking the student's own seat.
    #[schema(value_type = Vec<Object>)]
    pub grid: Vec<PersonalCell>,
}

/// Look up a seat allocation by roll number.
#[utoipa::path(
    get,
    path = "/api/v1/student/seat",
    params(SeatQuery),
    responses(
        (status = 200, description = "Seat found", body = SeatLookupResponse),
        (status = 400, description = "Blank roll number", body = ErrorSchema),
        (status = 401, description = "No session or no profile", body = ErrorSchema),
        (status = 403, description = "Caller is not a student", body = ErrorSchema),
        (status = 404, description = "No allocation for this roll number", body = ErrorSchema)
    ),
    tags = ["student"],
    operation_id = "findSeat"
)]
#[get("/student/seat")]
pub async fn find_seat(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<SeatQuery>,
) -> ApiResult<web::Json<SeatLookupResponse>> {
    let access = require_panel(&state, &session, Panel::Student).await?;
    let mut panel = StudentPanel::open(&access, state.store.clone())?;
    let record = panel.find_seat(&query.roll_number).await?;
    let grid = panel.personal_grid().unwrap_or_default();
    Ok(web::Json(SeatLookupResponse { record, grid }))
}
