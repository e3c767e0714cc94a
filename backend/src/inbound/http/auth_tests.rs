//! Tests for the account and session handlers.

use actix_web::http::StatusCode;
use actix_web::test;
use rstest::rstest;
use serde_json::{Value, json};

use super::*;
use crate::domain::{Role, SubjectId};
use crate::inbound::http::test_utils::{TestWorld, session_cookie, sign_in};

#[actix_web::test]
async fn sign_up_provisions_a_student_profile() {
    let world = TestWorld::new();
    let app = world.app().await;

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/signup")
        .set_json(json!({
            "fullName": "Ada Lovelace",
            "email": "ada@example.edu",
            "password": "hunter22"
        }))
        .to_request();
    let res = test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["profile"], "created");
    assert_eq!(body["email"], "ada@example.edu");
    let id = SubjectId::new(body["subjectId"].as_str().expect("subject id")).expect("valid id");
    let profile = world.profiles.get(&id).expect("profile stored");
    assert_eq!(profile.role, Role::Student);
    assert_eq!(profile.full_name, "Ada Lovelace");
}

#[rstest]
#[case(json!({ "fullName": "", "email": "a@example.edu", "password": "pw" }), "fullName")]
#[case(json!({ "fullName": "Ada", "email": "not-an-email", "password": "pw" }), "email")]
#[case(json!({ "fullName": "Ada", "email": "a@example.edu", "password": "" }), "password")]
#[actix_web::test]
async fn sign_up_rejects_incomplete_forms(#[case] body: Value, #[case] field: &str) {
    let world = TestWorld::new();
    let app = world.app().await;

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/signup")
        .set_json(body)
        .to_request();
    let res = test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["code"], "invalid_request");
    assert_eq!(body["details"]["field"], field);
}

#[actix_web::test]
async fn sign_in_sets_a_cookie_and_names_the_destination() {
    let world = TestWorld::new();
    world.seed_account("admin@example.edu", "s3cret", Some(Role::Admin));
    let app = world.app().await;

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/signin")
        .set_json(json!({ "email": "admin@example.edu", "password": "s3cret" }))
        .to_request();
    let res = test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::OK);
    assert!(session_cookie(&res).is_some());
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["role"], "admin");
    assert_eq!(body["roleSource"], "profile");
    assert_eq!(body["destination"], "admin");
}

#[actix_web::test]
async fn wrong_passwords_are_auth_failures() {
    let world = TestWorld::new();
    world.seed_account("ada@example.edu", "right", Some(Role::Student));
    let app = world.app().await;

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/signin")
        .set_json(json!({ "email": "ada@example.edu", "password": "wrong" }))
        .to_request();
    let res = test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert!(session_cookie(&res).is_none());
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["code"], "auth_failure");
}

#[actix_web::test]
async fn session_without_a_cookie_is_denied() {
    let world = TestWorld::new();
    let app = world.app().await;

    let req = test::TestRequest::get()
        .uri("/api/v1/session?panel=student")
        .to_request();
    let res = test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        res.headers()
            .get("Cache-Control")
            .and_then(|v| v.to_str().ok()),
        Some("no-store")
    );
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["outcome"], "denied");
    assert_eq!(body["reason"], "no_session");
    assert_eq!(body["destination"], "sign_in");
}

#[rstest]
#[case(Role::Admin, "admin", "granted", "admin")]
#[case(Role::Admin, "student", "redirected", "admin")]
#[case(Role::Student, "student", "granted", "student")]
#[case(Role::Student, "admin", "redirected", "student")]
#[actix_web::test]
async fn session_routes_by_role(
    #[case] role: Role,
    #[case] panel: &str,
    #[case] outcome: &str,
    #[case] destination: &str,
) {
    let world = TestWorld::new();
    world.seed_account("user@example.edu", "pw", Some(role));
    let app = world.app().await;
    let cookie = sign_in(&app, "user@example.edu", "pw").await;

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/session?panel={panel}"))
        .cookie(cookie)
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["outcome"], outcome);
    assert_eq!(body["destination"], destination);
    assert_eq!(body["displayName"], "Seeded User");
}

#[actix_web::test]
async fn profileless_sessions_are_denied_and_cleared() {
    let world = TestWorld::new();
    let subject = world.seed_account("ghost@example.edu", "pw", Some(Role::Student));
    let app = world.app().await;
    let cookie = sign_in(&app, "ghost@example.edu", "pw").await;
    world.profiles.remove(&subject.id);

    let req = test::TestRequest::get()
        .uri("/api/v1/session?panel=student")
        .cookie(cookie)
        .to_request();
    let res = test::call_service(&app, req).await;

    let cleared = session_cookie(&res).expect("cookie is rewritten");
    assert_eq!(cleared.value(), "");
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["outcome"], "denied");
    assert_eq!(body["reason"], "profile_missing");
}

#[actix_web::test]
async fn sign_out_revokes_the_token_and_clears_the_cookie() {
    let world = TestWorld::new();
    world.seed_account("ada@example.edu", "pw", Some(Role::Student));
    let app = world.app().await;
    let cookie = sign_in(&app, "ada@example.edu", "pw").await;
    assert_eq!(world.identity.live_sessions(), 1);

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/signout")
        .cookie(cookie.clone())
        .to_request();
    let res = test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    assert_eq!(world.identity.live_sessions(), 0);

    let req = test::TestRequest::get()
        .uri("/api/v1/session?panel=student")
        .cookie(cookie)
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["outcome"], "denied");
}

#[actix_web::test]
async fn sign_out_without_a_session_still_succeeds() {
    let world = TestWorld::new();
    let app = world.app().await;

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/signout")
        .to_request();
    let res = test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::NO_CONTENT);
}
