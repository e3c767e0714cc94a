//! Student panel controller.

use super::{Theme, granted_profile};
use crate::domain::{
    Access, Error, Panel, PersonalCell, Profile, SeatRecord, SeatRecordStore, project_personal,
};

/// Last lookup shown on the student panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StudentLookup {
    Idle,
    Found(SeatRecord),
    NotFound,
}

/// State and transitions of the student panel.
pub struct StudentPanel {
    store: SeatRecordStore,
    profile: Profile,
    lookup: StudentLookup,
    theme: Theme,
}

impl StudentPanel {
    /// Open the panel for a granted student.
    pub fn open(access: &Access, store: SeatRecordStore) -> Result<Self, Error> {
        Ok(Self {
            store,
            profile: granted_profile(access, Panel::Student)?,
            lookup: StudentLookup::Idle,
            theme: Theme::default(),
        })
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn lookup(&self) -> &StudentLookup {
        &self.lookup
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn toggle_theme(&mut self) {
        self.theme = self.theme.toggled();
    }

    /// Look up a seat by roll number.
    ///
    /// Blank input fails without touching the store or the previous result.
    /// A miss clears the previous result and reports not found.
    pub async fn find_seat(&mut self, query: &str) -> Result<SeatRecord, Error> {
        if query.trim().is_empty() {
            return Err(Error::invalid_request("Please enter a roll number"));
        }
        match self.store.find_by_roll_number(query).await {
            Ok(Some(record)) => {
                self.lookup = StudentLookup::Found(record.clone());
                Ok(record)
            }
            Ok(None) => {
                self.lookup = StudentLookup::NotFound;
                Err(Error::not_found("No seat allocation found for this roll number"))
            }
            Err(error) => {
                self.lookup = StudentLookup::Idle;
                Err(error)
            }
        }
    }

    /// Personal grid for the current result, if a seat was found.
    pub fn personal_grid(&self) -> Option<Vec<PersonalCell>> {
        match &self.lookup {
            StudentLookup::Found(record) => Some(project_personal(record)),
            _ => None,
        }
    }

    pub fn clear(&mut self) {
        self.lookup = StudentLookup::Idle;
    }
}
