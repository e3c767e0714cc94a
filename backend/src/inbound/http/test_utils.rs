//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_http::Request;
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::body::MessageBody;
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use serde_json::json;

use crate::Trace;
use crate::domain::{Credentials, Profile, Role, SeatRecord, Subject};
use crate::inbound::http::configure_api;
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::outbound::memory::{
    InMemoryIdentityProvider, InMemoryProfileRepository, InMemorySeatRecordRepository,
};

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// In-memory adapters behind one [`HttpState`], reachable for seeding and
/// inspection.
#[derive(Clone, Default)]
pub struct TestWorld {
    pub seat_records: Arc<InMemorySeatRecordRepository>,
    pub profiles: Arc<InMemoryProfileRepository>,
    pub identity: Arc<InMemoryIdentityProvider>,
}

impl TestWorld {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: impl IntoIterator<Item = SeatRecord>) -> Self {
        Self {
            seat_records: Arc::new(InMemorySeatRecordRepository::with_records(records)),
            ..Self::default()
        }
    }

    pub fn state(&self) -> web::Data<HttpState> {
        web::Data::new(HttpState::new(HttpStatePorts {
            seat_records: self.seat_records.clone(),
            profiles: self.profiles.clone(),
            identity: self.identity.clone(),
        }))
    }

    /// Register an account; `role` of `None` leaves it without a profile.
    pub fn seed_account(&self, email: &str, password: &str, role: Option<Role>) -> Subject {
        let credentials = Credentials::try_from_parts(email, password).expect("valid credentials");
        let subject = self
            .identity
            .register(&credentials, Some("Seeded User"))
            .expect("account registers");
        if let Some(role) = role {
            self.profiles.put(Profile {
                id: subject.id.clone(),
                full_name: "Seeded User".to_owned(),
                role,
            });
        }
        subject
    }

    /// Initialise the `/api/v1` routes over this world's state.
    pub async fn app(
        &self,
    ) -> impl Service<Request, Response = ServiceResponse<impl MessageBody>, Error = actix_web::Error>
    {
        test::init_service(
            App::new().app_data(self.state()).wrap(Trace).service(
                web::scope("/api/v1")
                    .wrap(test_session_middleware())
                    .configure(configure_api),
            ),
        )
        .await
    }
}

/// Sign in through the API and return the session cookie.
pub async fn sign_in<S, B>(app: &S, email: &str, password: &str) -> Cookie<'static>
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/api/v1/auth/signin")
        .set_json(json!({ "email": email, "password": password }))
        .to_request();
    let res = test::call_service(app, req).await;
    assert_eq!(res.status(), StatusCode::OK, "sign-in should succeed");
    session_cookie(&res).expect("sign-in sets the session cookie")
}

/// The `session` cookie set on a response, if any.
pub fn session_cookie<B>(res: &ServiceResponse<B>) -> Option<Cookie<'static>> {
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned)
}
