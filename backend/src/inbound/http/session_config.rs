//! Session cookie configuration.
//!
//! Turns [`SeatingSettings`] into the key and cookie policy the session
//! middleware needs, enforcing stricter rules in release builds.

use std::path::PathBuf;

use actix_web::cookie::{Key, SameSite};
use sha2::{Digest, Sha256};
use tracing::warn;
use zeroize::Zeroize;

use crate::settings::SeatingSettings;

/// Shortest key file accepted. `Key::derive_from` needs at least 32 bytes;
/// release builds insist on more.
pub const SESSION_KEY_MIN_LEN: usize = 64;
const SAMESITE_EXPECTED: &str = "Strict|Lax|None";
const FINGERPRINT_BYTES: usize = 8;

/// Build mode for session configuration validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Debug builds tolerate defaults and fall back to a generated key.
    Debug,
    /// Release builds require a readable key file and a valid policy.
    Release,
}

impl BuildMode {
    /// Determine the build mode from `cfg!(debug_assertions)`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use seating::inbound::http::session_config::BuildMode;
    ///
    /// let mode = BuildMode::from_debug_assertions();
    /// assert_eq!(mode == BuildMode::Debug, cfg!(debug_assertions));
    /// ```
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }

    fn is_debug(self) -> bool {
        matches!(self, Self::Debug)
    }
}

/// Key and cookie policy for the session middleware.
pub struct SessionSettings {
    pub key: Key,
    pub cookie_secure: bool,
    pub same_site: SameSite,
    /// True when the key was generated for this process only; sessions
    /// will not survive a restart.
    pub ephemeral: bool,
}

impl SessionSettings {
    /// Truncated SHA-256 of the signing key, safe to log.
    ///
    /// ```rust
    /// use actix_web::cookie::{Key, SameSite};
    /// use seating::inbound::http::session_config::SessionSettings;
    ///
    /// let settings = SessionSettings {
    ///     key: Key::generate(),
    ///     cookie_secure: true,
    ///     same_site: SameSite::Lax,
    ///     ephemeral: true,
    /// };
    /// assert_eq!(settings.key_fingerprint().len(), 16);
    /// ```
    #[must_use]
    pub fn key_fingerprint(&self) -> String {
        let digest = Sha256::digest(self.key.signing());
        hex::encode(&digest[..FINGERPRINT_BYTES])
    }
}

/// Errors raised while validating session configuration.
#[derive(thiserror::Error, Debug)]
pub enum SessionConfigError {
    /// `same_site` is not a recognised policy.
    #[error("invalid same_site '{value}'; expected {expected}")]
    InvalidSameSite { value: String, expected: &'static str },
    /// Reading the session key file failed.
    #[error("failed to read session key at {path}: {source}")]
    KeyRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The key file is too short to derive a key from.
    #[error("session key at {path} too short: need >= {min_len} bytes, got {length}")]
    KeyTooShort {
        path: PathBuf,
        length: usize,
        min_len: usize,
    },
    /// `SameSite=None` without `Secure` is refused in release builds.
    #[error("same_site=None requires cookie_secure=true")]
    InsecureSameSiteNone,
}

/// Build the session policy from settings and build mode.
pub fn session_settings(
    settings: &SeatingSettings,
    mode: BuildMode,
) -> Result<SessionSettings, SessionConfigError> {
    let cookie_secure = settings.cookie_secure;
    let same_site = same_site(settings.same_site.as_deref(), mode, cookie_secure)?;
    let (key, ephemeral) = session_key(
        settings.session_key_file(),
        mode.is_debug() || settings.allow_ephemeral_key,
    )?;
    Ok(SessionSettings {
        key,
        cookie_secure,
        same_site,
        ephemeral,
    })
}

fn same_site(
    value: Option<&str>,
    mode: BuildMode,
    cookie_secure: bool,
) -> Result<SameSite, SessionConfigError> {
    let default_same_site = if mode.is_debug() {
        SameSite::Lax
    } else {
        SameSite::Strict
    };
    let Some(value) = value else {
        return Ok(default_same_site);
    };

    match value.to_ascii_lowercase().as_str() {
        "lax" => Ok(SameSite::Lax),
        "strict" => Ok(SameSite::Strict),
        "none" if cookie_secure => Ok(SameSite::None),
        "none" if mode.is_debug() => {
            warn!("same_site=None without a secure cookie; browsers may reject it");
            Ok(SameSite::None)
        }
        "none" => Err(SessionConfigError::InsecureSameSiteNone),
        _ if mode.is_debug() => {
            warn!(value, "invalid same_site, using default");
            Ok(default_same_site)
        }
        _ => Err(SessionConfigError::InvalidSameSite {
            value: value.to_owned(),
            expected: SAMESITE_EXPECTED,
        }),
    }
}

/// Read the key file, or generate a key when `allow_ephemeral` permits.
fn session_key(path: PathBuf, allow_ephemeral: bool) -> Result<(Key, bool), SessionConfigError> {
    let failure = match std::fs::read(&path) {
        Ok(mut bytes) => {
            let length = bytes.len();
            if length >= SESSION_KEY_MIN_LEN {
                let key = Key::derive_from(&bytes);
                bytes.zeroize();
                return Ok((key, false));
            }
            bytes.zeroize();
            SessionConfigError::KeyTooShort {
                path,
                length,
                min_len: SESSION_KEY_MIN_LEN,
            }
        }
        Err(source) => SessionConfigError::KeyRead { path, source },
    };

    if allow_ephemeral {
        warn!(error = %failure, "using temporary session key (dev only)");
        Ok((Key::generate(), true))
    } else {
        Err(failure)
    }
}

#[cfg(test)]
mod tests;
