//! Backend entry-point: wires REST endpoints, persistence, the DNS provider
//! adapter, and OpenAPI docs.

mod server;

use std::time::Duration;

use actix_web::cookie::{Key, SameSite};
use actix_web::web;
use clap::Parser;
use tracing::warn;
use tracing_subscriber::{fmt, EnvFilter};
use url::Url;

use backend::inbound::http::health::HealthState;
use backend::outbound::persistence::{DbPool, PoolConfig};
use server::{ProviderChoice, ServerConfig};

const MIGRATIONS: diesel_migrations::EmbeddedMigrations =
    diesel_migrations::embed_migrations!();

/// Command-line and environment configuration.
#[derive(Debug, Parser)]
#[command(name = "backend", about = "Subhost backend server")]
struct Cli {
    /// Socket address to bind.
    #[arg(long, env = "BIND_ADDR", default_value = "0.0.0.0:8080")]
    bind_addr: std::net::SocketAddr,

    /// PostgreSQL connection string; fixtures are used when absent.
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    /// File holding the session key material.
    #[arg(long, env = "SESSION_KEY_FILE", default_value = "/var/run/secrets/session_key")]
    session_key_file: String,

    /// Allow a generated throwaway session key outside debug builds.
    #[arg(long, env = "SESSION_ALLOW_EPHEMERAL", default_value_t = false)]
    session_allow_ephemeral: bool,

    /// Mark the session cookie `Secure`.
    #[arg(
        long,
        env = "SESSION_COOKIE_SECURE",
        default_value_t = true,
        action = clap::ArgAction::Set
    )]
    cookie_secure: bool,

    /// Zone-management API base URL; the simulated provider is used when
    /// absent.
    #[arg(long, env = "DNS_PROVIDER_URL")]
    provider_url: Option<Url>,

    /// Deadline in seconds for each provider call.
    #[arg(long, env = "DNS_PROVIDER_TIMEOUT_SECS", default_value_t = 10)]
    provider_timeout_secs: u64,

    /// Artificial latency in milliseconds for the simulated provider.
    #[arg(long, env = "SIMULATED_PROVIDER_LATENCY_MS", default_value_t = 300)]
    simulated_latency_ms: u64,

    /// Seed the parent domain catalogue at startup.
    #[arg(
        long,
        env = "SEED_PARENT_DOMAINS",
        default_value_t = true,
        action = clap::ArgAction::Set
    )]
    seed_parent_domains: bool,
}

fn load_session_key(path: &str, allow_ephemeral: bool) -> std::io::Result<Key> {
    match std::fs::read(path) {
        Ok(bytes) => Ok(Key::derive_from(&bytes)),
        Err(error) => {
            if cfg!(debug_assertions) || allow_ephemeral {
                warn!(path = %path, error = %error, "using temporary session key (dev only)");
                Ok(Key::generate())
            } else {
                Err(std::io::Error::other(format!(
                    "failed to read session key at {path}: {error}"
                )))
            }
        }
    }
}

fn run_migrations(database_url: &str) -> std::io::Result<()> {
    use diesel::Connection;
    use diesel_migrations::MigrationHarness;

    let mut conn = diesel::pg::PgConnection::establish(database_url)
        .map_err(|error| std::io::Error::other(format!("database connection failed: {error}")))?;
    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|error| std::io::Error::other(format!("migrations failed: {error}")))?;
    Ok(())
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(error) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %error, "tracing init failed");
    }

    let cli = Cli::parse();
    let key = load_session_key(&cli.session_key_file, cli.session_allow_ephemeral)?;

    let db_pool = match &cli.database_url {
        Some(database_url) => {
            let url = database_url.clone();
            tokio::task::spawn_blocking(move || run_migrations(&url))
                .await
                .map_err(|error| {
                    std::io::Error::other(format!("migration task failed: {error}"))
                })??;

            let pool = DbPool::new(PoolConfig::new(database_url))
                .await
                .map_err(|error| std::io::Error::other(error.to_string()))?;
            Some(pool)
        }
        None => {
            warn!("no DATABASE_URL configured; serving fixture data only");
            None
        }
    };

    if cli.seed_parent_domains {
        if let Some(pool) = &db_pool {
            server::seed_parent_domains(pool)
                .await
                .map_err(|error| std::io::Error::other(error.to_string()))?;
        }
    }

    let provider = match cli.provider_url {
        Some(base) => ProviderChoice::Http { base },
        None => ProviderChoice::Simulated {
            latency: Duration::from_millis(cli.simulated_latency_ms),
        },
    };

    let mut config = ServerConfig::new(key, cli.cookie_secure, SameSite::Lax, cli.bind_addr)
        .with_provider(provider)
        .with_provider_timeout(Duration::from_secs(cli.provider_timeout_secs));
    if let Some(pool) = db_pool {
        config = config.with_db_pool(pool);
    }

    let health_state = web::Data::new(HealthState::new());
    let server = server::create_server(health_state.clone(), config)
        .map_err(|error| std::io::Error::other(error.to_string()))?;

    health_state.mark_ready();
    server.await
}
