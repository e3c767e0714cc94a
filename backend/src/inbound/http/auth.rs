//! Account and session HTTP handlers.
//!
//! ```text
//! POST /api/v1/auth/signup {"fullName":"Ada","email":"ada@example.edu","password":"pw"}
//! POST /api/v1/auth/signin {"email":"ada@example.edu","password":"pw"}
//! POST /api/v1/auth/signout
//! GET  /api/v1/session?panel=admin
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::{IntoParams, ToSchema};

use crate::domain::{
    Access, Credentials, CredentialsValidationError, DenialReason, Destination, Error, Panel,
    ProfileProvisioning, Role, RoleSource, RouterState, SignUpDetails,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::access::resolve;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Sign-up request body.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignUpRequest {
    pub full_name: String,
    pub email: String,
    pub password: String,
}

/// Sign-in request body.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignUpResponse {
    pub subject_id: String,
    pub email: String,
    /// `created`, `already_present` or `failed`; sign-up succeeds regardless.
    #[schema(value_type = String, example = "created")]
    pub profile: ProfileProvisioning,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignInResponse {
    pub subject_id: String,
    pub display_name: String,
    #[schema(value_type = String, example = "student")]
    pub role: Role,
    /// `profile`, `restored` or `defaulted`.
    #[schema(value_type = String, example = "profile")]
    pub role_source: RoleSource,
    /// Panel the client should open.
    #[schema(value_type = String, example = "student")]
    pub destination: Panel,
}

/// Router decision for `GET /session`.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    /// `granted`, `redirected` or `denied`.
    pub outcome: &'static str,
    #[schema(value_type = String, example = "admin")]
    pub destination: Destination,
    #[schema(value_type = Option<String>, example = "admin")]
    pub role: Option<Role>,
    #[schema(value_type = Option<String>, example = "profile_missing")]
    pub reason: Option<DenialReason>,
    pub display_name: Option<String>,
    /// States visited while resolving, in order.
    #[schema(value_type = Vec<Object>)]
    pub states: Vec<RouterState>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct SessionQuery {
    /// Panel the client wants to open.
    #[param(value_type = String, example = "student")]
    pub panel: Panel,
}

fn map_credentials_error(err: CredentialsValidationError) -> Error {
    let (field, code) = match err {
        CredentialsValidationError::EmptyEmail => ("email", "empty_email"),
        CredentialsValidationError::MalformedEmail => ("email", "malformed_email"),
        CredentialsValidationError::EmptyPassword => ("password", "empty_password"),
        CredentialsValidationError::EmptyFullName => ("fullName", "empty_full_name"),
    };
    Error::invalid_request(err.to_string()).with_details(json!({ "field": field, "code": code }))
}

/// Register an account and provision a student profile.
#[utoipa::path(
    post,
    path = "/api/v1/auth/signup",
    request_body = SignUpRequest,
    responses(
        (status = 201, description = "Account created", body = SignUpResponse),
        (status = 400, description = "Invalid or rejected registration", body = ErrorSchema),
        (status = 503, description = "Identity service unavailable", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "signUp",
    security([])
)]
#[post("/auth/signup")]
pub async fn sign_up(
    state: web::Data<HttpState>,
    payload: web::Json<SignUpRequest>,
) -> ApiResult<HttpResponse> {
    let SignUpRequest {
        full_name,
        email,
        password,
    } = payload.into_inner();
    let details =
        SignUpDetails::try_from_parts(&full_name, &email, &password).map_err(map_credentials_error)?;
    let outcome = state.accounts.sign_up(&details).await?;
    Ok(HttpResponse::Created().json(SignUpResponse {
        subject_id: outcome.subject.id.to_string(),
        email: outcome.subject.email,
        profile: outcome.profile,
    }))
}

/// Authenticate and establish a session.
#[utoipa::path(
    post,
    path = "/api/v1/auth/signin",
    request_body = SignInRequest,
    responses(
        (status = 200, description = "Signed in", body = SignInResponse,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Invalid credentials", body = ErrorSchema),
        (status = 503, description = "Identity service unavailable", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "signIn",
    security([])
)]
#[post("/auth/signin")]
pub async fn sign_in(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<SignInRequest>,
) -> ApiResult<HttpResponse> {
    let credentials = Credentials::try_from_parts(&payload.email, &payload.password)
        .map_err(map_credentials_error)?;
    let outcome = state.accounts.sign_in(&credentials).await?;
    session.persist_token(&outcome.session.access_token)?;
    let subject = &outcome.session.subject;
    Ok(HttpResponse::Ok().json(SignInResponse {
        subject_id: subject.id.to_string(),
        display_name: subject.display_name().to_owned(),
        role: outcome.role,
        role_source: outcome.role_source,
        destination: outcome.destination,
    }))
}

/// End the session. Always succeeds; the cookie is cleared either way.
#[utoipa::path(
    post,
    path = "/api/v1/auth/signout",
    responses((status = 204, description = "Signed out")),
    tags = ["auth"],
    operation_id = "signOut"
)]
#[post("/auth/signout")]
pub async fn sign_out(state: web::Data<HttpState>, session: SessionContext) -> HttpResponse {
    if let Some(token) = session.access_token() {
        state.accounts.sign_out(&token).await;
    }
    session.clear();
    HttpResponse::NoContent().finish()
}

/// Report where the session router would send this caller.
#[utoipa::path(
    get,
    path = "/api/v1/session",
    params(SessionQuery),
    responses((status = 200, description = "Router decision", body = SessionResponse)),
    tags = ["auth"],
    operation_id = "resolveSession"
)]
#[get("/session")]
pub async fn current_session(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<SessionQuery>,
) -> HttpResponse {
    let resolution = resolve(&state, &session, query.panel).await;
    let destination = resolution.access.destination();
    let (outcome, role, reason) = match &resolution.access {
        Access::Granted { profile, .. } => ("granted", Some(profile.role), None),
        Access::Redirected { profile, .. } => ("redirected", Some(profile.role), None),
        Access::Denied(reason) => ("denied", None, Some(*reason)),
    };
    HttpResponse::Ok()
        .insert_header(("Cache-Control", "no-store"))
        .json(SessionResponse {
            outcome,
            destination,
            role,
            reason,
            display_name: resolution
                .subject
                .as_ref()
                .map(|subject| subject.display_name().to_owned()),
            states: resolution.states,
        })
}

#[cfg(test)]
#[path = "auth_tests.rs"]
mod tests;
