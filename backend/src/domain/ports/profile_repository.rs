//! Port for profile persistence.

use async_trait::async_trait;

use crate::domain::{Profile, SubjectId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by profile store adapters.
    pub enum ProfileRepositoryError {
        /// The store could not be reached.
        Connection { message: String } =>
            "profile store connection failed: {message}",
        /// A read or write failed while executing.
        Query { message: String } =>
            "profile store query failed: {message}",
    }
}

/// Port for profile lookup and creation.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Fetch the profile for `id`, or `None` when no record exists.
    async fn find_by_subject(
        &self,
        id: &SubjectId,
    ) -> Result<Option<Profile>, ProfileRepositoryError>;

    /// Store `profile` unless one already exists for its subject.
    ///
    /// Returns `true` when a record was written. An existing record is left
    /// untouched so roles never change through this path.
    async fn create_if_absent(&self, profile: &Profile) -> Result<bool, ProfileRepositoryError>;
}
