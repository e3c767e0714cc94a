//! Role-based routing of authenticated sessions to panels.
//!
//! Every protected request resolves the caller's token to a subject, loads
//! the subject's profile, and either grants the requested panel, redirects to
//! the panel the role allows, or denies access. A subject with no readable
//! profile is signed out so a half-provisioned account cannot linger.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::domain::ports::{IdentityProvider, ProfileRepository};
use crate::domain::{AccessToken, Error, Profile, Role, Subject};

/// The two gated views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Panel {
    Admin,
    Student,
}

impl Panel {
    /// The panel a role is allowed to open.
    pub fn for_role(role: Role) -> Self {
        match role {
            Role::Admin => Self::Admin,
            Role::Student => Self::Student,
        }
    }
}

impl fmt::Display for Panel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Admin => "admin",
            Self::Student => "student",
        })
    }
}

/// States visited while resolving a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "role", rename_all = "snake_case")]
pub enum RouterState {
    Anonymous,
    AwaitingProfile,
    Resolved(Role),
    Denied,
}

/// Why access was denied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DenialReason {
    /// No token, or the identity provider no longer recognises it.
    NoSession,
    /// The subject is authenticated but has no profile record.
    ProfileMissing,
    /// The profile could not be read.
    ProfileUnavailable,
}

/// Where the client should go after resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Destination {
    SignIn,
    Admin,
    Student,
}

impl From<Panel> for Destination {
    fn from(panel: Panel) -> Self {
        match panel {
            Panel::Admin => Self::Admin,
            Panel::Student => Self::Student,
        }
    }
}

/// Decision for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    Granted { panel: Panel, profile: Profile },
    Redirected { requested: Panel, to: Panel, profile: Profile },
    Denied(DenialReason),
}

impl Access {
    pub fn destination(&self) -> Destination {
        match self {
            Self::Granted { panel, .. } => (*panel).into(),
            Self::Redirected { to, .. } => (*to).into(),
            Self::Denied(_) => Destination::SignIn,
        }
    }

    /// The profile behind a granted request, or the error a caller should
    /// surface when the request may not proceed.
    pub fn into_granted(self) -> Result<Profile, Error> {
        match self {
            Self::Granted { profile, .. } => Ok(profile),
            Self::Redirected { requested, to, .. } => {
                Err(Error::forbidden(format!("the {requested} panel is not available to this account"))
                    .with_details(serde_json::json!({ "redirect": Destination::from(to) })))
            }
            Self::Denied(reason) => {
                let error = match reason {
                    DenialReason::NoSession => Error::auth_failure("sign in required"),
                    DenialReason::ProfileMissing => {
                        Error::profile_missing("Profile missing. Contact super-admin.")
                    }
                    DenialReason::ProfileUnavailable => {
                        Error::profile_missing("Profile could not be loaded. Sign in again.")
                    }
                };
                Err(error.with_details(serde_json::json!({ "redirect": Destination::SignIn })))
            }
        }
    }
}

/// Route a known role to a requested panel.
pub fn route(profile: Profile, requested: Panel) -> Access {
    let allowed = Panel::for_role(profile.role);
    if allowed == requested {
        Access::Granted {
            panel: requested,
            profile,
        }
    } else {
        Access::Redirected {
            requested,
            to: allowed,
            profile,
        }
    }
}

/// Full resolution of one request, including the states visited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub access: Access,
    pub subject: Option<Subject>,
    pub states: Vec<RouterState>,
}

/// Resolves tokens to panel access.
#[derive(Clone)]
pub struct SessionRouter {
    identity: Arc<dyn IdentityProvider>,
    profiles: Arc<dyn ProfileRepository>,
}

impl SessionRouter {
    pub fn new(identity: Arc<dyn IdentityProvider>, profiles: Arc<dyn ProfileRepository>) -> Self {
        Self { identity, profiles }
    }

    /// Resolve `token` against the panel the caller asked for.
    ///
    /// Denials for a missing or unreadable profile sign the subject out
    /// before returning; a failed sign-out is logged and otherwise ignored.
    pub async fn resolve(&self, token: Option<&AccessToken>, requested: Panel) -> Resolution {
        let mut states = vec![RouterState::Anonymous];

        let subject = match token {
            Some(token) => match self.identity.current_user(token).await {
                Ok(subject) => subject,
                Err(error) => {
                    warn!(kind = error.kind(), %error, "session lookup failed");
                    None
                }
            },
            None => None,
        };
        let Some(subject) = subject else {
            states.push(RouterState::Denied);
            return Resolution {
                access: Access::Denied(DenialReason::NoSession),
                subject: None,
                states,
            };
        };

        states.push(RouterState::AwaitingProfile);
        let reason = match self.profiles.find_by_subject(&subject.id).await {
            Ok(Some(profile)) => {
                states.push(RouterState::Resolved(profile.role));
                debug!(subject = %subject.id, role = %profile.role, %requested, "session resolved");
                return Resolution {
                    access: route(profile, requested),
                    subject: Some(subject),
                    states,
                };
            }
            Ok(None) => DenialReason::ProfileMissing,
            Err(error) => {
                warn!(kind = error.kind(), %error, subject = %subject.id, "profile lookup failed");
                DenialReason::ProfileUnavailable
            }
        };

        if let Some(token) = token {
            if let Err(error) = self.identity.sign_out(token).await {
                warn!(kind = error.kind(), %error, "sign-out after profile denial failed");
            }
        }
        states.push(RouterState::Denied);
        Resolution {
            access: Access::Denied(reason),
            subject: Some(subject),
            states,
        }
    }
}

#[cfg(test)]
#[path = "session_router_tests.rs"]
mod tests;
