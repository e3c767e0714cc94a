//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every HTTP endpoint, the schema wrappers from
//! [`crate::inbound::http::schemas`] and the session cookie security scheme.
//! Swagger UI serves it in debug builds; `openapi-dump` prints it.

use crate::inbound::http::admin::{
    DeleteResponse, ImportResponse, LayoutResponse, RecordsResponse, RoomsResponse, UpdateResponse,
};
use crate::inbound::http::auth::{
    SessionResponse, SignInRequest, SignInResponse, SignUpRequest, SignUpResponse,
};
use crate::inbound::http::schemas::{
    ErrorCodeSchema, ErrorSchema, OccupantSchema, SeatConflictSchema, SeatRecordSchema,
    SeatSlotSchema,
};
use crate::inbound::http::student::SeatLookupResponse;
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/auth/signin.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Exam seating API",
        description = "Seat allocation lookup for students and record management for administrators."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::auth::sign_up,
        crate::inbound::http::auth::sign_in,
        crate::inbound::http::auth::sign_out,
        crate::inbound::http::auth::current_session,
        crate::inbound::http::student::find_seat,
        crate::inbound::http::admin::list_records,
        crate::inbound::http::admin::add_record,
        crate::inbound::http::admin::edit_record,
        crate::inbound::http::admin::delete_record,
        crate::inbound::http::admin::preview_import,
        crate::inbound::http::admin::import_records,
        crate::inbound::http::admin::list_rooms,
        crate::inbound::http::admin::room_layout,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        SeatRecordSchema,
        SeatSlotSchema,
        OccupantSchema,
        SeatConflictSchema,
        SignUpRequest,
        SignUpResponse,
        SignInRequest,
        SignInResponse,
        SessionResponse,
        SeatLookupResponse,
        RecordsResponse,
        UpdateResponse,
        DeleteResponse,
        ImportResponse,
        RoomsResponse,
        LayoutResponse,
    )),
    tags(
        (name = "auth", description = "Sign-up, sign-in and session routing"),
        (name = "student", description = "Seat lookup for students"),
        (name = "admin", description = "Seat record management"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
