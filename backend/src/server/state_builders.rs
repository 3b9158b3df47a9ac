//! Builders selecting port implementations for the HTTP state.
//!
//! With a database pool the driving ports are served by the real domain
//! services over Diesel repositories; without one everything falls back to
//! fixtures so the server still boots for smoke testing.

use std::sync::Arc;

use actix_web::web;

use backend::domain::ports::DnsProvider;
use backend::domain::{AccountService, RecordService, SubdomainService};
use backend::inbound::http::state::HttpState;
use backend::outbound::password::BcryptPasswordHasher;
use backend::outbound::persistence::{
    DbPool, DieselDnsRecordRepository, DieselParentDomainRepository, DieselSubdomainRepository,
    DieselUserRepository,
};
use backend::outbound::provider::{HttpDnsProvider, SimulatedDnsProvider};

use super::config::{ProviderChoice, ServerConfig};
use super::ServerError;

/// Instantiate the configured provider adapter.
pub(super) fn build_provider(config: &ServerConfig) -> Result<Arc<dyn DnsProvider>, ServerError> {
    match &config.provider {
        ProviderChoice::Simulated { latency } => {
            Ok(Arc::new(SimulatedDnsProvider::with_latency(*latency)))
        }
        ProviderChoice::Http { base } => {
            let adapter = HttpDnsProvider::new(base.clone(), config.provider_timeout)
                .map_err(|err| ServerError::Provider(err.to_string()))?;
            Ok(Arc::new(adapter))
        }
    }
}

fn build_pool_backed_state(
    config: &ServerConfig,
    pool: &DbPool,
    provider: Arc<dyn DnsProvider>,
) -> HttpState {
    let users = Arc::new(DieselUserRepository::new(pool.clone()));
    let domains = Arc::new(DieselParentDomainRepository::new(pool.clone()));
    let subdomains = Arc::new(DieselSubdomainRepository::new(pool.clone()));
    let records = Arc::new(DieselDnsRecordRepository::new(pool.clone()));
    let hasher = Arc::new(BcryptPasswordHasher::new());

    let accounts = Arc::new(AccountService::new(users, hasher));
    let subdomain_service = Arc::new(
        SubdomainService::new(
            subdomains.clone(),
            domains,
            records.clone(),
            provider.clone(),
        )
        .with_provider_timeout(config.provider_timeout),
    );
    let record_service = Arc::new(
        RecordService::new(records, subdomains, provider)
            .with_provider_timeout(config.provider_timeout),
    );

    HttpState {
        login: accounts.clone(),
        accounts,
        subdomains: subdomain_service.clone(),
        subdomains_query: subdomain_service.clone(),
        records: record_service.clone(),
        records_query: record_service,
        domains: subdomain_service,
    }
}

/// Build the shared HTTP state from configured ports and fixture fallbacks.
pub(super) fn build_http_state(
    config: &ServerConfig,
    provider: Arc<dyn DnsProvider>,
) -> web::Data<HttpState> {
    let state = match &config.db_pool {
        Some(pool) => build_pool_backed_state(config, pool, provider),
        None => HttpState::fixtures(),
    };
    web::Data::new(state)
}
