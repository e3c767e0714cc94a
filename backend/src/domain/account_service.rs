//! Account flows: sign-up, sign-in and sign-out.
//!
//! Registration and authentication belong to the identity provider; this
//! service keeps the profile store in step. Profile writes made alongside
//! identity calls are best effort: a failure is logged and never undoes the
//! identity operation that preceded it.

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use crate::domain::ports::{
    IdentityProvider, IdentityProviderError, ProfileRepository, SubjectAttributes,
};
use crate::domain::{
    AccessToken, AuthSession, Credentials, Error, Panel, Profile, Role, SignUpDetails, Subject,
};

/// What happened to the profile during sign-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileProvisioning {
    Created,
    AlreadyPresent,
    Failed,
}

/// Result of a sign-up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignUpOutcome {
    pub subject: Subject,
    pub profile: ProfileProvisioning,
}

/// How the role reported by sign-in was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleSource {
    /// Read from the stored profile.
    Profile,
    /// No profile existed; a student profile was written and used.
    Restored,
    /// No profile could be read or written; the default role was assumed.
    Defaulted,
}

/// Result of a sign-in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignInOutcome {
    pub session: AuthSession,
    pub role: Role,
    pub role_source: RoleSource,
    pub destination: Panel,
}

/// Account operations over the identity provider and profile store.
#[derive(Clone)]
pub struct AccountService {
    identity: Arc<dyn IdentityProvider>,
    profiles: Arc<dyn ProfileRepository>,
}

impl AccountService {
    pub fn new(identity: Arc<dyn IdentityProvider>, profiles: Arc<dyn ProfileRepository>) -> Self {
        Self { identity, profiles }
    }

    fn map_identity_error(prefix: &str, error: IdentityProviderError) -> Error {
        match error {
            IdentityProviderError::InvalidCredentials { message } => {
                Error::auth_failure(format!("{prefix}: {message}"))
            }
            IdentityProviderError::Rejected { message } => {
                Error::invalid_request(format!("{prefix}: {message}"))
            }
            other @ (IdentityProviderError::Transport { .. }
            | IdentityProviderError::Decode { .. }) => {
                Error::service_unavailable(format!("{prefix}: {other}"))
            }
        }
    }

    async fn provision(&self, profile: &Profile) -> ProfileProvisioning {
        match self.profiles.create_if_absent(profile).await {
            Ok(true) => ProfileProvisioning::Created,
            Ok(false) => ProfileProvisioning::AlreadyPresent,
            Err(error) => {
                warn!(kind = error.kind(), %error, subject = %profile.id, "profile write failed");
                ProfileProvisioning::Failed
            }
        }
    }

    /// Register a subject and give it a student profile.
    pub async fn sign_up(&self, details: &SignUpDetails) -> Result<SignUpOutcome, Error> {
        let attributes = SubjectAttributes {
            full_name: details.full_name().to_owned(),
        };
        let subject = self
            .identity
            .sign_up(details.credentials(), &attributes)
            .await
            .map_err(|err| Self::map_identity_error("Sign up error", err))?;

        let profile = self
            .provision(&Profile::new_student(subject.id.clone(), details.full_name()))
            .await;
        info!(subject = %subject.id, ?profile, "subject signed up");
        Ok(SignUpOutcome { subject, profile })
    }

    /// Authenticate and work out which panel the subject belongs on.
    ///
    /// A subject with no profile is treated as a student and a student
    /// profile is written for it. A profile read failure also falls back to
    /// student but writes nothing.
    pub async fn sign_in(&self, credentials: &Credentials) -> Result<SignInOutcome, Error> {
        let session = self
            .identity
            .sign_in_with_password(credentials)
            .await
            .map_err(|err| Self::map_identity_error("Sign in error", err))?;
        let subject = &session.subject;

        let (role, role_source) = match self.profiles.find_by_subject(&subject.id).await {
            Ok(Some(profile)) => (profile.role, RoleSource::Profile),
            Ok(None) => {
                let restored = Profile::new_student(subject.id.clone(), subject.display_name());
                match self.provision(&restored).await {
                    ProfileProvisioning::Failed => (Role::default(), RoleSource::Defaulted),
                    _ => (restored.role, RoleSource::Restored),
                }
            }
            Err(error) => {
                warn!(kind = error.kind(), %error, subject = %subject.id, "profile read failed at sign-in");
                (Role::default(), RoleSource::Defaulted)
            }
        };

        info!(subject = %subject.id, %role, ?role_source, "subject signed in");
        Ok(SignInOutcome {
            destination: Panel::for_role(role),
            session,
            role,
            role_source,
        })
    }

    /// Revoke `token`. Failures are logged; the caller's session ends anyway.
    pub async fn sign_out(&self, token: &AccessToken) {
        if let Err(error) = self.identity.sign_out(token).await {
            warn!(kind = error.kind(), %error, "sign-out failed");
        }
    }
}

#[cfg(test)]
#[path = "account_service_tests.rs"]
mod tests;
