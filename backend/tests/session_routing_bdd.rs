//! Behaviour tests for session-gated panel routing.
//!
//! Accounts live in the in-memory identity provider and profile store; the
//! router decides which panel each signed-in subject may open.
//
// rstest-bdd generates guard variables with double underscores, which trips
// the non_snake_case lint under -D warnings.
#![allow(non_snake_case)]

use std::sync::Arc;

use rstest::fixture;
use rstest_bdd::Slot;
use rstest_bdd_macros::{ScenarioState, given, scenario, then, when};
use seating::domain::ports::IdentityProvider;
use seating::domain::{
    Access, AccessToken, Credentials, Panel, Profile, Resolution, Role, RouterState,
    SessionRouter,
};
use seating::outbound::memory::{InMemoryIdentityProvider, InMemoryProfileRepository};
use serde_json::Value;
use tokio::runtime::Runtime;

const PASSWORD: &str = "correct-horse";

#[derive(Clone)]
struct RuntimeHandle(Arc<Runtime>);

#[derive(Default, ScenarioState)]
struct RoutingWorld {
    runtime: Slot<RuntimeHandle>,
    identity: Slot<Arc<InMemoryIdentityProvider>>,
    profiles: Slot<Arc<InMemoryProfileRepository>>,
    token: Slot<AccessToken>,
    resolution: Slot<Resolution>,
}

impl RoutingWorld {
    fn runtime(&self) -> Arc<Runtime> {
        self.runtime.get().expect("runtime should be set").0
    }

    fn identity(&self) -> Arc<InMemoryIdentityProvider> {
        self.identity.get().expect("identity should be set")
    }

    fn profiles(&self) -> Arc<InMemoryProfileRepository> {
        self.profiles.get().expect("profiles should be set")
    }

    fn resolution(&self) -> Resolution {
        self.resolution.get().expect("a panel should have been requested")
    }

    fn register(&self, email: &str, role: Option<Role>) {
        let credentials = Credentials::try_from_parts(email, PASSWORD).expect("valid credentials");
        let subject = self
            .identity()
            .register(&credentials, Some("Routed User"))
            .expect("account registers");
        if let Some(role) = role {
            self.profiles().put(Profile {
                id: subject.id,
                full_name: "Routed User".to_owned(),
                role,
            });
        }
    }
}

fn parse_panel(raw: &str) -> Panel {
    match raw {
        "admin" => Panel::Admin,
        "student" => Panel::Student,
        other => panic!("unknown panel {other}"),
    }
}

#[fixture]
fn world() -> RoutingWorld {
    let world = RoutingWorld::default();
    world
        .runtime
        .set(RuntimeHandle(Arc::new(Runtime::new().expect("create runtime"))));
    world.identity.set(Arc::new(InMemoryIdentityProvider::new()));
    world.profiles.set(Arc::new(InMemoryProfileRepository::new()));
    world
}

#[given("an account for {email} with the {role} role")]
fn an_account_with_role(world: &RoutingWorld, email: String, role: String) {
    let role: Role = role.parse().expect("known role");
    world.register(&email, Some(role));
}

#[given("an account for {email} without a profile")]
fn an_account_without_a_profile(world: &RoutingWorld, email: String) {
    world.register(&email, None);
}

#[given("{email} has signed in")]
fn has_signed_in(world: &RoutingWorld, email: String) {
    let credentials = Credentials::try_from_parts(&email, PASSWORD).expect("valid credentials");
    let identity = world.identity();
    let session = world
        .runtime()
        .block_on(async { identity.sign_in_with_password(&credentials).await })
        .expect("sign-in succeeds");
    world.token.set(session.access_token);
}

#[when("the {panel} panel is requested")]
fn the_panel_is_requested(world: &RoutingWorld, panel: String) {
    let router = SessionRouter::new(world.identity(), world.profiles());
    let token = world.token.get();
    let resolution = world
        .runtime()
        .block_on(async { router.resolve(token.as_ref(), parse_panel(&panel)).await });
    world.resolution.set(resolution);
}

#[then("access is granted to the {panel} panel")]
fn access_is_granted(world: &RoutingWorld, panel: String) {
    match world.resolution().access {
        Access::Granted { panel: granted, .. } => assert_eq!(granted, parse_panel(&panel)),
        other => panic!("expected a grant, got {other:?}"),
    }
}

#[then("the router resolved the {role} role")]
fn the_router_resolved_the_role(world: &RoutingWorld, role: String) {
    let role: Role = role.parse().expect("known role");
    assert_eq!(
        world.resolution().states,
        [
            RouterState::Anonymous,
            RouterState::AwaitingProfile,
            RouterState::Resolved(role)
        ]
    );
}

#[then("the caller is redirected to the {panel} panel")]
fn the_caller_is_redirected(world: &RoutingWorld, panel: String) {
    match world.resolution().access {
        Access::Redirected { to, .. } => assert_eq!(to, parse_panel(&panel)),
        other => panic!("expected a redirect, got {other:?}"),
    }
}

#[then("access is denied with reason {reason}")]
fn access_is_denied(world: &RoutingWorld, reason: String) {
    match world.resolution().access {
        Access::Denied(actual) => {
            let actual = serde_json::to_value(actual).expect("reason serialises");
            assert_eq!(actual, Value::String(reason));
        }
        other => panic!("expected a denial, got {other:?}"),
    }
}

#[then("proceeding anyway fails with {code}")]
fn proceeding_anyway_fails(world: &RoutingWorld, code: String) {
    let error = world
        .resolution()
        .access
        .into_granted()
        .expect_err("access should not be granted");
    let actual = serde_json::to_value(error.code()).expect("code serialises");
    assert_eq!(actual, Value::String(code));
    assert!(
        error
            .details()
            .and_then(|details| details.get("redirect"))
            .is_some(),
        "errors carry a redirect"
    );
}

#[then("the session has been revoked")]
fn the_session_has_been_revoked(world: &RoutingWorld) {
    assert_eq!(world.identity().live_sessions(), 0);
}

#[scenario(
    path = "tests/features/session_routing.feature",
    name = "An admin opening the admin panel is granted"
)]
fn an_admin_opening_the_admin_panel_is_granted(world: RoutingWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/session_routing.feature",
    name = "A student asking for the admin panel is redirected"
)]
fn a_student_asking_for_the_admin_panel_is_redirected(world: RoutingWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/session_routing.feature",
    name = "A session without a profile is denied and revoked"
)]
fn a_session_without_a_profile_is_denied_and_revoked(world: RoutingWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/session_routing.feature",
    name = "A request without a session is denied"
)]
fn a_request_without_a_session_is_denied(world: RoutingWorld) {
    drop(world);
}
