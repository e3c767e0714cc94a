//! Reqwest-backed adapter for a GoTrue-compatible auth service.
//!
//! The adapter owns transport details only: endpoint paths, the `apikey`
//! header, bearer authentication and HTTP status mapping. Account policy
//! (profiles, roles, fallbacks) stays in the domain services.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::dto::{
    ErrorBodyDto, PasswordGrantDto, SignUpRequestDto, SignUpResponseDto, TokenResponseDto,
    UserDto, UserMetadataDto,
};
use crate::domain::ports::{IdentityProvider, IdentityProviderError, SubjectAttributes};
use crate::domain::{AccessToken, AuthSession, Credentials, Subject};

const API_KEY_HEADER: &str = "apikey";

/// Which call produced an error status; the same code means different things
/// on different endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Endpoint {
    SignUp,
    Token,
    Logout,
    User,
}

/// Identity provider adapter for GoTrue's `/signup`, `/token`, `/logout` and
/// `/user` endpoints.
pub struct GoTrueIdentityProvider {
    client: Client,
    base: Url,
    api_key: String,
}

impl GoTrueIdentityProvider {
    /// Build an adapter for the auth service rooted at `base`.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(base: Url, api_key: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base,
            api_key: api_key.into(),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, IdentityProviderError> {
        let mut base = self.base.clone();
        if !base.path().ends_with('/') {
            let with_slash = format!("{}/", base.path());
            base.set_path(&with_slash);
        }
        base.join(path)
            .map_err(|err| IdentityProviderError::transport(format!("invalid endpoint {path}: {err}")))
    }

    fn authorised(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header(API_KEY_HEADER, self.api_key.as_str())
            .header(reqwest::header::ACCEPT, "application/json")
    }

    async fn send(
        &self,
        endpoint: Endpoint,
        request: RequestBuilder,
    ) -> Result<Response, IdentityProviderError> {
        let response = self
            .authorised(request)
            .send()
            .await
            .map_err(map_transport_error)?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.bytes().await.map_err(map_transport_error)?;
        Err(map_status_error(endpoint, status, body.as_ref()))
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, IdentityProviderError> {
    let body = response.bytes().await.map_err(map_transport_error)?;
    serde_json::from_slice(body.as_ref())
        .map_err(|err| IdentityProviderError::decode(format!("invalid auth payload: {err}")))
}

#[async_trait]
impl IdentityProvider for GoTrueIdentityProvider {
    async fn sign_up(
        &self,
        credentials: &Credentials,
        attributes: &SubjectAttributes,
    ) -> Result<Subject, IdentityProviderError> {
        let body = SignUpRequestDto {
            email: credentials.email(),
            password: credentials.password(),
            data: UserMetadataDto {
                full_name: Some(attributes.full_name.clone()),
            },
        };
        let request = self.client.post(self.endpoint("signup")?).json(&body);
        let response = self.send(Endpoint::SignUp, request).await?;
        decode::<SignUpResponseDto>(response)
            .await?
            .into_subject()
            .map_err(IdentityProviderError::decode)
    }

    async fn sign_in_with_password(
        &self,
        credentials: &Credentials,
    ) -> Result<AuthSession, IdentityProviderError> {
        let mut url = self.endpoint("token")?;
        url.query_pairs_mut().append_pair("grant_type", "password");
        let body = PasswordGrantDto {
            email: credentials.email(),
            password: credentials.password(),
        };
        let request = self.client.post(url).json(&body);
        let response = self.send(Endpoint::Token, request).await?;
        decode::<TokenResponseDto>(response)
            .await?
            .into_session()
            .map_err(IdentityProviderError::decode)
    }

    async fn sign_out(&self, token: &AccessToken) -> Result<(), IdentityProviderError> {
        let request = self
            .client
            .post(self.endpoint("logout")?)
            .bearer_auth(token.expose());
        match self.send(Endpoint::Logout, request).await {
            Ok(_) => Ok(()),
            // Expired or already revoked tokens count as signed out.
            Err(IdentityProviderError::InvalidCredentials { .. }) => Ok(()),
            Err(other) => Err(other),
        }
    }

    async fn current_user(
        &self,
        token: &AccessToken,
    ) -> Result<Option<Subject>, IdentityProviderError> {
        let request = self
            .client
            .get(self.endpoint("user")?)
            .bearer_auth(token.expose());
        let response = match self.send(Endpoint::User, request).await {
            Ok(response) => response,
            Err(IdentityProviderError::InvalidCredentials { .. }) => return Ok(None),
            Err(other) => return Err(other),
        };
        decode::<UserDto>(response)
            .await?
            .into_subject()
            .map(Some)
            .map_err(IdentityProviderError::decode)
    }
}

fn map_transport_error(error: reqwest::Error) -> IdentityProviderError {
    debug!(timeout = error.is_timeout(), %error, "identity request failed");
    IdentityProviderError::transport(error.to_string())
}

fn map_status_error(endpoint: Endpoint, status: StatusCode, body: &[u8]) -> IdentityProviderError {
    let parsed: ErrorBodyDto = serde_json::from_slice(body).unwrap_or_default();
    let message = match parsed.describe() {
        Some(text) => format!("status {}: {text}", status.as_u16()),
        None => format!("status {}", status.as_u16()),
    };
    debug!(?endpoint, status = status.as_u16(), %message, "identity provider refused request");

    match (endpoint, status) {
        (_, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) => {
            IdentityProviderError::invalid_credentials(message)
        }
        (Endpoint::Token, StatusCode::BAD_REQUEST) if parsed.is_invalid_grant() => {
            IdentityProviderError::invalid_credentials(message)
        }
        (Endpoint::Logout | Endpoint::User, StatusCode::NOT_FOUND) => {
            IdentityProviderError::invalid_credentials(message)
        }
        (_, status) if status.is_client_error() => IdentityProviderError::rejected(message),
        _ => IdentityProviderError::transport(message),
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for the non-network mapping helpers.
    use super::*;
    use rstest::rstest;

    fn provider(base: &str) -> GoTrueIdentityProvider {
        GoTrueIdentityProvider::new(
            Url::parse(base).expect("valid url"),
            "anon-key",
            Duration::from_secs(5),
        )
        .expect("client builds")
    }

    #[rstest]
    #[case("https://project.example.co/auth/v1", "https://project.example.co/auth/v1/token")]
    #[case("https://project.example.co/auth/v1/", "https://project.example.co/auth/v1/token")]
    #[case("http://localhost:9999", "http://localhost:9999/token")]
    fn endpoints_are_relative_to_the_base_path(#[case] base: &str, #[case] expected: &str) {
        let url = provider(base).endpoint("token").expect("joins");
        assert_eq!(url.as_str(), expected);
    }

    #[rstest]
    #[case::bad_password(Endpoint::Token, StatusCode::BAD_REQUEST, r#"{"error":"invalid_grant","error_description":"Invalid login credentials"}"#, "InvalidCredentials")]
    #[case::unconfirmed(Endpoint::Token, StatusCode::BAD_REQUEST, r#"{"error_code":"email_not_confirmed","msg":"Email not confirmed"}"#, "Rejected")]
    #[case::taken(Endpoint::SignUp, StatusCode::UNPROCESSABLE_ENTITY, r#"{"msg":"User already registered"}"#, "Rejected")]
    #[case::weak(Endpoint::SignUp, StatusCode::BAD_REQUEST, "", "Rejected")]
    #[case::expired(Endpoint::User, StatusCode::UNAUTHORIZED, "", "InvalidCredentials")]
    #[case::gone(Endpoint::Logout, StatusCode::NOT_FOUND, "", "InvalidCredentials")]
    #[case::down(Endpoint::Token, StatusCode::BAD_GATEWAY, "<html>", "Transport")]
    fn statuses_map_per_endpoint(
        #[case] endpoint: Endpoint,
        #[case] status: StatusCode,
        #[case] body: &str,
        #[case] expected: &str,
    ) {
        let error = map_status_error(endpoint, status, body.as_bytes());
        assert_eq!(error.kind(), expected);
    }

    #[rstest]
    fn status_messages_carry_the_provider_text() {
        let error = map_status_error(
            Endpoint::SignUp,
            StatusCode::UNPROCESSABLE_ENTITY,
            br#"{"msg":"User already registered"}"#,
        );
        assert_eq!(
            error.to_string(),
            "identity provider rejected the request: status 422: User already registered"
        );
    }
}
