//! Port for the external identity provider.
//!
//! The provider owns credentials and issues bearer tokens. This service only
//! ever asks it to register, authenticate, revoke a token, or describe the
//! subject behind a token.

use async_trait::async_trait;

use crate::domain::{AccessToken, AuthSession, Credentials, Subject};

use super::define_port_error;

define_port_error! {
    /// Errors raised by identity provider adapters.
    pub enum IdentityProviderError {
        /// The email/password pair was not accepted.
        InvalidCredentials { message: String } =>
            "identity provider rejected the credentials: {message}",
        /// The provider refused a registration, e.g. an email already in use.
        Rejected { message: String } =>
            "identity provider rejected the request: {message}",
        /// The provider could not be reached or failed internally.
        Transport { message: String } =>
            "identity provider unavailable: {message}",
        /// The provider answered with a payload this adapter cannot read.
        Decode { message: String } =>
            "identity provider response was malformed: {message}",
    }
}

/// Attributes stored with a subject at registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectAttributes {
    pub full_name: String,
}

/// Port for registration, password sign-in and token introspection.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Register a new subject.
    async fn sign_up(
        &self,
        credentials: &Credentials,
        attributes: &SubjectAttributes,
    ) -> Result<Subject, IdentityProviderError>;

    /// Exchange credentials for a session.
    async fn sign_in_with_password(
        &self,
        credentials: &Credentials,
    ) -> Result<AuthSession, IdentityProviderError>;

    /// Revoke `token`. Revoking an unknown token is not an error.
    async fn sign_out(&self, token: &AccessToken) -> Result<(), IdentityProviderError>;

    /// Describe the subject behind `token`, or `None` when it is not valid.
    async fn current_user(
        &self,
        token: &AccessToken,
    ) -> Result<Option<Subject>, IdentityProviderError>;
}
