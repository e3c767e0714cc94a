//! In-memory `ProfileRepository`.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use super::{read, write};
use crate::domain::ports::{ProfileRepository, ProfileRepositoryError};
use crate::domain::{Profile, SubjectId};

/// Profiles keyed by subject id.
#[derive(Debug, Default)]
pub struct InMemoryProfileRepository {
    profiles: RwLock<HashMap<SubjectId, Profile>>,
}

impl InMemoryProfileRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `profile`, replacing any existing row. Seeding only; the port
    /// never overwrites a role.
    pub fn put(&self, profile: Profile) {
        write(&self.profiles).insert(profile.id.clone(), profile);
    }

    pub fn remove(&self, id: &SubjectId) -> Option<Profile> {
        write(&self.profiles).remove(id)
    }

    pub fn get(&self, id: &SubjectId) -> Option<Profile> {
        read(&self.profiles).get(id).cloned()
    }
}

#[async_trait]
impl ProfileRepository for InMemoryProfileRepository {
    async fn find_by_subject(
        &self,
        id: &SubjectId,
    ) -> Result<Option<Profile>, ProfileRepositoryError> {
        Ok(self.get(id))
    }

    async fn create_if_absent(&self, profile: &Profile) -> Result<bool, ProfileRepositoryError> {
        let mut profiles = write(&self.profiles);
        if profiles.contains_key(&profile.id) {
            return Ok(false);
        }
        profiles.insert(profile.id.clone(), profile.clone());
        Ok(true)
    }
}
