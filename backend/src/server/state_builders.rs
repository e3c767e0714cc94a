//! Builders for the HTTP state ports.
//!
//! Each port picks its PostgreSQL or GoTrue adapter when the configuration
//! carries one and falls back to the in-memory adapter otherwise.

use std::sync::Arc;

use actix_web::web;
use tracing::{info, warn};

use seating::domain::ports::{IdentityProvider, ProfileRepository, SeatRecordRepository};
use seating::domain::{Credentials, Profile, Role};
use seating::inbound::http::state::{HttpState, HttpStatePorts};
use seating::outbound::memory::{
    InMemoryIdentityProvider, InMemoryProfileRepository, InMemorySeatRecordRepository,
};
use seating::outbound::persistence::{DbPool, DieselProfileRepository, DieselSeatRecordRepository};

use super::ServerConfig;
use super::config::DevAdmin;

fn build_stores(
    pool: Option<&DbPool>,
) -> (Arc<dyn SeatRecordRepository>, Arc<dyn ProfileRepository>) {
    match pool {
        Some(pool) => (
            Arc::new(DieselSeatRecordRepository::new(pool.clone())),
            Arc::new(DieselProfileRepository::new(pool.clone())),
        ),
        None => {
            warn!("no database configured; seat records and profiles are held in memory");
            (
                Arc::new(InMemorySeatRecordRepository::new()),
                Arc::new(InMemoryProfileRepository::new()),
            )
        }
    }
}

async fn seed_dev_admin(
    identity: &InMemoryIdentityProvider,
    profiles: &dyn ProfileRepository,
    admin: &DevAdmin,
) -> std::io::Result<()> {
    let credentials = Credentials::try_from_parts(&admin.email, &admin.password)
        .map_err(|err| std::io::Error::other(format!("invalid dev admin credentials: {err}")))?;
    let subject = identity
        .register(&credentials, Some("Administrator"))
        .map_err(|err| std::io::Error::other(format!("dev admin registration failed: {err}")))?;
    let created = profiles
        .create_if_absent(&Profile {
            id: subject.id.clone(),
            full_name: subject.display_name().to_owned(),
            role: Role::Admin,
        })
        .await
        .map_err(|err| std::io::Error::other(format!("dev admin profile failed: {err}")))?;
    info!(email = %subject.email, created, "seeded development administrator");
    Ok(())
}

async fn build_identity(
    config: &mut ServerConfig,
    profiles: &dyn ProfileRepository,
) -> std::io::Result<Arc<dyn IdentityProvider>> {
    if let Some(identity) = config.identity.take() {
        if config.dev_admin.is_some() {
            warn!("dev admin seeding ignored: identity is delegated to an external service");
        }
        return Ok(Arc::new(identity));
    }

    warn!("no identity service configured; accounts are held in memory");
    let identity = InMemoryIdentityProvider::new();
    if let Some(admin) = config.dev_admin.as_ref() {
        seed_dev_admin(&identity, profiles, admin).await?;
    }
    Ok(Arc::new(identity))
}

/// Build the shared HTTP state from the server configuration.
///
/// Consumes the configured identity adapter; the rest of `config` is left
/// for the listener.
///
/// # Errors
/// Returns [`std::io::Error`] when seeding the development administrator
/// fails.
pub(super) async fn build_http_state(
    config: &mut ServerConfig,
) -> std::io::Result<web::Data<HttpState>> {
    let (seat_records, profiles) = build_stores(config.db_pool.as_ref());
    let identity = build_identity(config, profiles.as_ref()).await?;
    Ok(web::Data::new(HttpState::new(HttpStatePorts {
        seat_records,
        profiles,
        identity,
    })))
}
