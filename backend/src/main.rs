//! Backend entry-point: loads settings, prepares storage, and serves the
//! Todo REST API.

mod server;

use std::ffi::OsString;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use server::{ServerConfig, StorageBackend, create_server};
use todo_backend::inbound::http::health::HealthState;
use todo_backend::outbound::memory::InMemoryUnitOfWork;
use todo_backend::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use todo_backend::settings::{DatabaseSettings, ServerSettings};

fn startup_error(context: &str, err: impl std::fmt::Display) -> std::io::Error {
    std::io::Error::other(format!("{context}: {err}"))
}

/// Settings are read from the environment and config files only, so both
/// settings structs see the same bare argument list.
fn settings_args() -> [OsString; 1] {
    [std::env::args_os()
        .next()
        .unwrap_or_else(|| OsString::from("todo-backend"))]
}

async fn prepare_storage(settings: &ServerSettings) -> std::io::Result<StorageBackend> {
    if settings.in_memory {
        info!("serving todos from the in-memory store");
        return Ok(StorageBackend::InMemory(InMemoryUnitOfWork::default()));
    }

    let database = DatabaseSettings::load_from_iter(settings_args())
        .map_err(|err| startup_error("failed to load database settings", err))?;
    let url = database
        .database_url()
        .map_err(|err| startup_error("failed to build database URL", err))?;

    if settings.skip_migrations {
        warn!("skipping database migrations");
    } else {
        let applied = run_pending_migrations(&url)
            .await
            .map_err(|err| startup_error("failed to apply migrations", err))?;
        info!(applied, "database schema is up to date");
    }

    let pool = DbPool::new(PoolConfig::new(url).with_max_size(database.max_connections()))
        .await
        .map_err(|err| startup_error("failed to create database pool", err))?;
    Ok(StorageBackend::Postgres(pool))
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let dotenv = dotenvy::dotenv();

    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    match dotenv {
        Ok(path) => info!(path = %path.display(), "loaded environment file"),
        Err(err) if err.not_found() => {}
        Err(err) => warn!(error = %err, "failed to read environment file"),
    }

    let settings = ServerSettings::load_from_iter(settings_args())
        .map_err(|err| startup_error("failed to load server settings", err))?;
    let bind_addr = settings
        .bind_addr()
        .map_err(|err| startup_error("invalid server settings", err))?;

    let storage = prepare_storage(&settings).await?;
    let config = ServerConfig::new(bind_addr, settings.api_prefix(), storage);
    #[cfg(feature = "metrics")]
    let config = config.with_metrics(Some(server::build_metrics()?));

    let health_state = web::Data::new(HealthState::new());
    create_server(health_state, config)?.await
}
