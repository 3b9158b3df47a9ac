//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    AccountCommand, FixtureAccountCommand, FixtureLoginService, FixtureParentDomainQuery,
    FixtureRecordCommand, FixtureRecordQuery, FixtureSubdomainCommand, FixtureSubdomainQuery,
    LoginService, ParentDomainQuery, RecordCommand, RecordQuery, SubdomainCommand, SubdomainQuery,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Authentication use-case.
    pub login: Arc<dyn LoginService>,
    /// Account registration use-case.
    pub accounts: Arc<dyn AccountCommand>,
    /// Subdomain mutations.
    pub subdomains: Arc<dyn SubdomainCommand>,
    /// Subdomain reads.
    pub subdomains_query: Arc<dyn SubdomainQuery>,
    /// Record mutations.
    pub records: Arc<dyn RecordCommand>,
    /// Record reads.
    pub records_query: Arc<dyn RecordQuery>,
    /// Public zone catalogue.
    pub domains: Arc<dyn ParentDomainQuery>,
}

impl HttpState {
    /// State backed entirely by fixtures, for handler tests.
    pub fn fixtures() -> Self {
        Self {
            login: Arc::new(FixtureLoginService),
            accounts: Arc::new(FixtureAccountCommand),
            subdomains: Arc::new(FixtureSubdomainCommand),
            subdomains_query: Arc::new(FixtureSubdomainQuery),
            records: Arc::new(FixtureRecordCommand),
            records_query: Arc::new(FixtureRecordQuery),
            domains: Arc::new(FixtureParentDomainQuery),
        }
    }
}
