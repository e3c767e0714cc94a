//! DTOs for the GoTrue-compatible auth API.
//!
//! Responses decode into these transport shapes first and then map into
//! domain `Subject`/`AuthSession` values in one pass.

use serde::{Deserialize, Serialize};

use crate::domain::{AccessToken, AuthSession, Subject, SubjectId};

#[derive(Debug, Serialize)]
pub(super) struct PasswordGrantDto<'a> {
    pub(super) email: &'a str,
    pub(super) password: &'a str,
}

#[derive(Debug, Serialize)]
pub(super) struct SignUpRequestDto<'a> {
    pub(super) email: &'a str,
    pub(super) password: &'a str,
    pub(super) data: UserMetadataDto,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub(super) struct UserMetadataDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(super) full_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct UserDto {
    pub(super) id: String,
    #[serde(default)]
    pub(super) email: Option<String>,
    #[serde(default)]
    pub(super) user_metadata: UserMetadataDto,
}

impl UserDto {
    pub(super) fn into_subject(self) -> Result<Subject, String> {
        let id = SubjectId::new(self.id).map_err(|err| format!("user id: {err}"))?;
        Ok(Subject {
            id,
            email: self.email.unwrap_or_default(),
            full_name: self.user_metadata.full_name,
        })
    }
}

/// `/signup` answers with the bare user, or with a session wrapping it when
/// email confirmation is disabled.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(super) enum SignUpResponseDto {
    Session { user: UserDto },
    User(UserDto),
}

impl SignUpResponseDto {
    pub(super) fn into_subject(self) -> Result<Subject, String> {
        match self {
            Self::Session { user } | Self::User(user) => user.into_subject(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct TokenResponseDto {
    pub(super) access_token: String,
    pub(super) user: UserDto,
}

impl TokenResponseDto {
    pub(super) fn into_session(self) -> Result<AuthSession, String> {
        if self.access_token.trim().is_empty() {
            return Err("access token was empty".to_owned());
        }
        Ok(AuthSession {
            subject: self.user.into_subject()?,
            access_token: AccessToken::new(self.access_token),
        })
    }
}

/// Error bodies differ between GoTrue releases; every field is optional.
#[derive(Debug, Default, Deserialize)]
pub(super) struct ErrorBodyDto {
    #[serde(default)]
    pub(super) error: Option<String>,
    #[serde(default)]
    pub(super) error_code: Option<String>,
    #[serde(default)]
    pub(super) error_description: Option<String>,
    #[serde(default)]
    pub(super) msg: Option<String>,
}

impl ErrorBodyDto {
    pub(super) fn is_invalid_grant(&self) -> bool {
        matches!(self.error.as_deref(), Some("invalid_grant"))
            || matches!(self.error_code.as_deref(), Some("invalid_credentials"))
    }

    pub(super) fn describe(&self) -> Option<&str> {
        self.msg
            .as_deref()
            .or(self.error_description.as_deref())
            .or(self.error.as_deref())
    }
}
