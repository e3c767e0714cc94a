//! PostgreSQL-backed `ProfileRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::warn;

use crate::domain::ports::{ProfileRepository, ProfileRepositoryError};
use crate::domain::{Profile, Role, SubjectId};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::ProfileRow;
use super::pool::{DbPool, PoolError};
use super::schema::profiles;

/// Diesel-backed implementation of the `ProfileRepository` port.
#[derive(Clone)]
pub struct DieselProfileRepository {
    pool: DbPool,
}

impl DieselProfileRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ProfileRepositoryError {
    map_basic_pool_error(error, ProfileRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> ProfileRepositoryError {
    map_basic_diesel_error(
        error,
        ProfileRepositoryError::query,
        ProfileRepositoryError::connection,
    )
}

fn row_to_profile(row: ProfileRow) -> Result<Profile, ProfileRepositoryError> {
    let id = SubjectId::new(row.id)
        .map_err(|err| ProfileRepositoryError::query(format!("stored profile id is invalid: {err}")))?;
    let role = row.role.parse::<Role>().unwrap_or_else(|err| {
        warn!(subject = %id, %err, "unrecognised role, treating as student");
        Role::default()
    });
    Ok(Profile {
        id,
        full_name: row.full_name,
        role,
    })
}

#[async_trait]
impl ProfileRepository for DieselProfileRepository {
    async fn find_by_subject(
        &self,
        id: &SubjectId,
    ) -> Result<Option<Profile>, ProfileRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = profiles::table
            .filter(profiles::id.eq(id.as_ref()))
            .select(ProfileRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_profile).transpose()
    }

    async fn create_if_absent(&self, profile: &Profile) -> Result<bool, ProfileRepositoryError> {
        let row = ProfileRow {
            id: profile.id.to_string(),
            full_name: profile.full_name.clone(),
            role: profile.role.as_str().to_owned(),
        };
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let written = diesel::insert_into(profiles::table)
            .values(&row)
            .on_conflict(profiles::id)
            .do_nothing()
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(written > 0)
    }
}
