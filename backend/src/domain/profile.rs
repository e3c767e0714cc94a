//! Profiles attach a role to an authenticated subject.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Opaque identifier issued by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SubjectId(String);

/// Validation errors for profile fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileValidationError {
    EmptySubjectId,
    UnknownRole(String),
}

impl fmt::Display for ProfileValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptySubjectId => write!(f, "subject id must not be empty"),
            Self::UnknownRole(raw) => write!(f, "unknown role {raw:?}"),
        }
    }
}

impl std::error::Error for ProfileValidationError {}

impl SubjectId {
    pub fn new(raw: impl Into<String>) -> Result<Self, ProfileValidationError> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(ProfileValidationError::EmptySubjectId);
        }
        Ok(Self(raw))
    }
}

impl AsRef<str> for SubjectId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for SubjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<SubjectId> for String {
    fn from(value: SubjectId) -> Self {
        value.0
    }
}

impl TryFrom<String> for SubjectId {
    type Error = ProfileValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Access role. Unknown or missing roles fall back to [`Role::Student`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    #[default]
    Student,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Student => "student",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ProfileValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "admin" => Ok(Self::Admin),
            "student" => Ok(Self::Student),
            other => Err(ProfileValidationError::UnknownRole(other.to_owned())),
        }
    }
}

/// Role record keyed by subject id.
///
/// Created at sign-up with [`Role::Student`]; no flow in this service ever
/// changes the role afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: SubjectId,
    pub full_name: String,
    pub role: Role,
}

impl Profile {
    /// A fresh student profile, as created at sign-up.
    pub fn new_student(id: SubjectId, full_name: impl Into<String>) -> Self {
        Self {
            id,
            full_name: full_name.into(),
            role: Role::Student,
        }
    }
}
