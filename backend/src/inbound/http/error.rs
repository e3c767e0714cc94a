//! Domain errors rendered as HTTP responses.
//!
//! Each [`ErrorCode`] owns one status. Denials (`auth_failure`,
//! `profile_missing`, `forbidden`) keep their `details.redirect` so clients
//! know which panel to show instead. Internal errors are replaced by a fixed
//! message before they leave the process.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use tracing::{error, warn};

use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER};

/// Result alias used by every handler.
pub type ApiResult<T> = Result<T, Error>;

const REDACTED_MESSAGE: &str = "Internal server error";

const fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::AuthFailure | ErrorCode::ProfileMissing => StatusCode::UNAUTHORIZED,
        ErrorCode::Forbidden => StatusCode::FORBIDDEN,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::ValidationGap => StatusCode::UNPROCESSABLE_ENTITY,
        ErrorCode::StoreFailure => StatusCode::BAD_GATEWAY,
        ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// The payload a client is allowed to see for `error`.
fn client_payload(error: &Error) -> Error {
    match error.code() {
        ErrorCode::InternalError => {
            error!(
                message = error.message(),
                trace_id = error.trace_id(),
                "internal error redacted"
            );
            error
                .trace_id()
                .map_or_else(
                    || Error::internal(REDACTED_MESSAGE),
                    |id| Error::internal(REDACTED_MESSAGE).with_trace_id(id.to_owned()),
                )
        }
        ErrorCode::StoreFailure | ErrorCode::ServiceUnavailable => {
            warn!(
                code = ?error.code(),
                message = error.message(),
                trace_id = error.trace_id(),
                "upstream failure surfaced to client"
            );
            error.clone()
        }
        _ => error.clone(),
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        let payload = client_payload(self);
        let mut response = HttpResponse::build(self.status_code());
        if let Some(id) = payload.trace_id() {
            response.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }
        response.json(payload)
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        error!(error = %err, "actix error promoted to domain error");
        Self::internal(REDACTED_MESSAGE)
    }
}
