//! Panel gating for HTTP handlers.
//!
//! Every panel endpoint resolves the session through the domain
//! [`SessionRouter`](crate::domain::SessionRouter) before doing anything else.

use tracing::debug;

use crate::domain::{Access, Panel, Resolution};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Resolve the caller against `panel` without enforcing the decision.
///
/// A denial means the identity provider no longer backs this cookie, so the
/// cookie is purged.
pub(crate) async fn resolve(
    state: &HttpState,
    session: &SessionContext,
    panel: Panel,
) -> Resolution {
    let token = session.access_token();
    let resolution = state.router.resolve(token.as_ref(), panel).await;
    if matches!(resolution.access, Access::Denied(_)) && token.is_some() {
        debug!(states = ?resolution.states, "clearing session after denial");
        session.clear();
    }
    resolution
}

/// Resolve the caller and fail unless `panel` is granted.
///
/// Redirects surface as 403 and denials as 401, both naming where the client
/// should go in `details.redirect`.
pub(crate) async fn require_panel(
    state: &HttpState,
    session: &SessionContext,
    panel: Panel,
) -> ApiResult<Access> {
    let access = resolve(state, session, panel).await.access;
    access.clone().into_granted()?;
    Ok(access)
}
