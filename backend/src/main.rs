//! Seating service entry-point: loads settings, resolves adapters and serves
//! the REST API with its OpenAPI docs.

mod server;

use std::ffi::OsString;
use std::time::Duration;

use actix_web::web;
use color_eyre::eyre::{Context, Result, eyre};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};
use url::Url;

use seating::inbound::http::health::HealthState;
use seating::inbound::http::session_config::{BuildMode, session_settings};
use seating::outbound::identity::GoTrueIdentityProvider;
use seating::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use seating::settings::SeatingSettings;
use server::{DevAdmin, ServerConfig, create_server};

const DB_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

fn load_settings<I, T>(args: I) -> Result<SeatingSettings>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    SeatingSettings::load_from_iter(args)
        .map_err(|err| eyre!("failed to load configuration: {err}"))
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = load_settings(std::env::args_os())?;
    let session = session_settings(&settings, BuildMode::from_debug_assertions())
        .wrap_err("invalid session configuration")?;
    if session.ephemeral {
        warn!("using temporary session key (dev only); sessions end on restart");
    }
    info!(
        fingerprint = %session.key_fingerprint(),
        cookie_secure = session.cookie_secure,
        "session key loaded"
    );

    let mut config = ServerConfig::new(
        session.key,
        session.cookie_secure,
        session.same_site,
        settings.bind_addr(),
    );

    if let Some(database_url) = settings.database_url.as_deref() {
        if settings.run_migrations {
            run_pending_migrations(database_url)
                .await
                .wrap_err("database migrations failed")?;
        }
        let pool = DbPool::new(
            PoolConfig::new(database_url)
                .with_max_size(settings.db_max_connections())
                .with_connection_timeout(DB_CONNECT_TIMEOUT),
        )
        .await
        .wrap_err("failed to connect to the database")?;
        config = config.with_db_pool(pool);
    }

    if let Some(identity_url) = settings.identity_url.as_deref() {
        let base = Url::parse(identity_url)
            .wrap_err_with(|| format!("invalid identity_url '{identity_url}'"))?;
        let identity = GoTrueIdentityProvider::new(
            base,
            settings.identity_api_key.clone().unwrap_or_default(),
            settings.identity_timeout(),
        )
        .wrap_err("failed to build identity client")?;
        config = config.with_identity(identity);
    }

    config = config.with_dev_admin(
        settings
            .dev_admin()
            .map(|(email, password)| DevAdmin::new(email, password)),
    );

    let bind_addr = config.bind_addr();
    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config)
        .await
        .wrap_err("failed to start HTTP server")?;
    info!(%bind_addr, "seating service listening");
    server.await.wrap_err("HTTP server stopped with an error")
}

#[cfg(test)]
mod tests {
    use super::*;
    use env_lock::lock_env;
    use rstest::rstest;

    #[rstest]
    fn command_line_arguments_reach_the_settings() {
        let _guard = lock_env([("SEATING_BIND_ADDR", None::<String>)]);

        let settings = load_settings(["seating", "--bind-addr", "127.0.0.1:6060"])
            .expect("settings load");

        assert_eq!(settings.bind_addr().port(), 6060);
    }

    #[rstest]
    fn unknown_flags_are_reported() {
        let err = load_settings(["seating", "--no-such-flag"]).expect_err("flag is rejected");

        assert!(err.to_string().contains("failed to load configuration"));
    }
}
