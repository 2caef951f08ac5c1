//! HomeCraft entry-point: loads configuration, seeds the store and serves the API.

mod server;

use std::ffi::OsString;
use std::sync::Arc;

use actix_web::web;
use color_eyre::eyre::{Result, WrapErr, eyre};
#[cfg(feature = "metrics")]
use actix_web_prom::PrometheusMetricsBuilder;
use mockable::{DefaultClock, DefaultEnv};
use ortho_config::OrthoConfig;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use homecraft::bootstrap::BootstrapSettings;
use homecraft::config::AppSettings;
use homecraft::inbound::http::health::HealthState;
use homecraft::inbound::http::session_config::{BuildMode, session_settings_from_env};
use homecraft::inbound::http::state::ServiceContext;
use homecraft::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use homecraft::outbound::security::Argon2PasswordHasher;
use server::{ServerConfig, create_server, run_bootstrap};

const PROGRAM_NAME: &str = "homecraft";

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if let Err(e) = fmt().with_env_filter(filter).json().try_init() {
        warn!(error = %e, "tracing init failed");
    }
}

#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    init_tracing();

    let settings = AppSettings::load_from_iter([OsString::from(PROGRAM_NAME)])
        .map_err(|e| eyre!("failed to load application settings: {e}"))?;
    let bootstrap = BootstrapSettings::load_from_iter([OsString::from(PROGRAM_NAME)])
        .map_err(|e| eyre!("failed to load bootstrap settings: {e}"))?;

    let session = session_settings_from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
        .wrap_err("invalid session configuration")?;
    let bind_addr = settings
        .bind_addr()
        .wrap_err("HOMECRAFT_BIND_ADDR is not a socket address")?;

    let context = ServiceContext {
        hasher: Arc::new(Argon2PasswordHasher::new()),
        clock: Arc::new(DefaultClock),
        description_limit: settings.short_description_limit(),
    };

    let mut config = ServerConfig::new(
        session.key,
        session.cookie_secure,
        session.same_site,
        bind_addr,
        context,
    );

    match settings.database_url() {
        Some(database_url) => {
            let applied = run_pending_migrations(database_url)
                .await
                .wrap_err("failed to apply migrations")?;
            info!(applied, "database migrations complete");
            let pool = DbPool::new(
                PoolConfig::new(database_url).with_max_size(settings.db_max_connections()),
            )
            .await
            .wrap_err("failed to build database pool")?;
            config = config.with_db_pool(pool);
        }
        None => warn!("HOMECRAFT_DATABASE_URL not set; using in-memory store"),
    }

    if let Err(e) = run_bootstrap(&config.store, &config.context, &bootstrap).await {
        error!(error = %e, "startup bootstrap failed");
    }

    #[cfg(feature = "metrics")]
    {
        let prometheus = PrometheusMetricsBuilder::new(PROGRAM_NAME)
            .endpoint("/metrics")
            .build()
            .map_err(|e| eyre!("failed to configure Prometheus metrics: {e}"))?;
        config = config.with_metrics(prometheus);
    }

    info!(addr = %config.bind_addr(), "starting server");
    let health_state = web::Data::new(HealthState::new());
    create_server(health_state, config)?.await?;
    Ok(())
}
