//! Exam seating service: seat allocation lookup and record management.
//!
//! The domain lives in [`domain`]; [`inbound`] and [`outbound`] adapt it to
//! HTTP, PostgreSQL, a GoTrue-compatible identity service, or memory.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
