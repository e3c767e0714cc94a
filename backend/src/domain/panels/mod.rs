//! Panel controllers.
//!
//! Each controller owns the view state of one panel and drives the domain
//! services on its behalf. Controllers open only for a granted [`Access`],
//! so every transition they expose already passed the session router.
//!
//! [`Access`]: crate::domain::Access

mod admin;
mod student;

use serde::{Deserialize, Serialize};

pub use admin::{AdminPanel, EditSession};
pub use student::{StudentLookup, StudentPanel};

use crate::domain::{Access, Error, Panel, Profile};

/// Colour scheme chosen by the viewer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

fn granted_profile(access: &Access, panel: Panel) -> Result<Profile, Error> {
    match access {
        Access::Granted {
            panel: granted,
            profile,
        } if *granted == panel => Ok(profile.clone()),
        other => other.clone().into_granted().and_then(|_| {
            Err(Error::forbidden(format!("access was granted for another panel than {panel}")))
        }),
    }
}
