//! HTTP inbound adapter exposing REST endpoints.

pub mod access;
pub mod admin;
pub mod auth;
pub mod error;
pub mod health;
pub mod schemas;
pub mod session;
pub mod session_config;
pub mod state;
pub mod student;
#[cfg(test)]
pub mod test_utils;

use actix_web::web;

pub use error::ApiResult;

/// Register every session-scoped handler.
///
/// Mount under `/api/v1` behind the session middleware.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(auth::sign_up)
        .service(auth::sign_in)
        .service(auth::sign_out)
        .service(auth::current_session)
        .service(student::find_seat)
        .service(admin::list_records)
        .service(admin::add_record)
        .service(admin::preview_import)
        .service(admin::import_records)
        .service(admin::edit_record)
        .service(admin::delete_record)
        .service(admin::list_rooms)
        .service(admin::room_layout);
}
