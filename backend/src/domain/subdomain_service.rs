//! Subdomain registration, lookup, and deletion service.
//!
//! Deletion deprovisions every child DNS record at the remote provider
//! before the local row is removed, keeping both deletion paths (whole
//! subdomain, single record) consistent with the remote zone.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::error::Error;
use crate::domain::ports::{
    DnsProvider, DnsProviderError, DnsRecordRepository, DnsRecordRepositoryError, NewSubdomain,
    ParentDomainQuery, ParentDomainRepository, ParentDomainRepositoryError,
    ProviderRecordDeletion, RegisterSubdomainRequest, SubdomainCommand, SubdomainQuery,
    SubdomainRepository, SubdomainRepositoryError,
};
use crate::domain::subdomain::{Subdomain, SubdomainLabel, SubdomainWithDomain};
use crate::domain::user::UserId;
use crate::domain::zone::ParentDomain;

/// Default deadline for a single provider call.
pub const DEFAULT_PROVIDER_TIMEOUT: Duration = Duration::from_secs(10);

/// Subdomain service implementing the subdomain driving ports.
pub struct SubdomainService<S, D, R, P: ?Sized> {
    subdomains: Arc<S>,
    domains: Arc<D>,
    records: Arc<R>,
    provider: Arc<P>,
    provider_timeout: Duration,
}

impl<S, D, R, P: ?Sized> SubdomainService<S, D, R, P> {
    /// Create a new service with the default provider deadline.
    pub fn new(subdomains: Arc<S>, domains: Arc<D>, records: Arc<R>, provider: Arc<P>) -> Self {
        Self {
            subdomains,
            domains,
            records,
            provider,
            provider_timeout: DEFAULT_PROVIDER_TIMEOUT,
        }
    }

    /// Override the provider call deadline.
    pub fn with_provider_timeout(mut self, timeout: Duration) -> Self {
        self.provider_timeout = timeout;
        self
    }
}

impl<S, D, R, P> SubdomainService<S, D, R, P>
where
    S: SubdomainRepository,
    D: ParentDomainRepository,
    R: DnsRecordRepository,
    P: DnsProvider + ?Sized,
{
    fn map_subdomain_error(error: SubdomainRepositoryError) -> Error {
        match error {
            SubdomainRepositoryError::Connection { message } => {
                Error::service_unavailable(format!("subdomain repository unavailable: {message}"))
            }
            SubdomainRepositoryError::Query { message } => {
                Error::internal(format!("subdomain repository error: {message}"))
            }
            SubdomainRepositoryError::DuplicateLabel => Self::taken_error(),
        }
    }

    fn map_domain_error(error: ParentDomainRepositoryError) -> Error {
        match error {
            ParentDomainRepositoryError::Connection { message } => Error::service_unavailable(
                format!("parent domain repository unavailable: {message}"),
            ),
            ParentDomainRepositoryError::Query { message } => {
                Error::internal(format!("parent domain repository error: {message}"))
            }
        }
    }

    fn map_record_error(error: DnsRecordRepositoryError) -> Error {
        match error {
            DnsRecordRepositoryError::Connection { message } => {
                Error::service_unavailable(format!("dns record repository unavailable: {message}"))
            }
            DnsRecordRepositoryError::Query { message } => {
                Error::internal(format!("dns record repository error: {message}"))
            }
        }
    }

    fn map_provider_error(error: DnsProviderError) -> Error {
        Error::provider_failure(error.to_string())
    }

    fn taken_error() -> Error {
        Error::conflict("subdomain already taken").with_details(json!({
            "field": "subdomainName",
            "code": "subdomain_taken",
        }))
    }

    fn not_found() -> Error {
        Error::not_found("subdomain not found")
    }

    fn invalid_domain_error() -> Error {
        Error::invalid_request("invalid domain").with_details(json!({
            "field": "domainId",
            "code": "invalid_domain",
        }))
    }

    async fn active_parent_domain(&self, domain_id: Uuid) -> Result<ParentDomain, Error> {
        let domain = self
            .domains
            .find_by_id(domain_id)
            .await
            .map_err(Self::map_domain_error)?
            .ok_or_else(Self::invalid_domain_error)?;
        if !domain.is_active {
            return Err(Self::invalid_domain_error());
        }
        Ok(domain)
    }

    async fn deprovision_record(
        &self,
        owned: &SubdomainWithDomain,
        record_id: Uuid,
    ) -> Result<(), Error> {
        let deletion =
            ProviderRecordDeletion::for_local_record(owned.domain.zone_id.clone(), record_id);
        let change = tokio::time::timeout(
            self.provider_timeout,
            self.provider.delete_record(&deletion),
        )
        .await
        .map_err(|_| {
            Error::provider_failure(format!(
                "provider call timed out after {:?}",
                self.provider_timeout
            ))
        })?
        .map_err(Self::map_provider_error)?;

        info!(
            record_id = %record_id,
            change_id = %change.change_id,
            "record deprovisioned for subdomain deletion"
        );
        Ok(())
    }
}

#[async_trait]
impl<S, D, R, P> SubdomainCommand for SubdomainService<S, D, R, P>
where
    S: SubdomainRepository,
    D: ParentDomainRepository,
    R: DnsRecordRepository,
    P: DnsProvider + ?Sized,
{
    async fn register(&self, request: RegisterSubdomainRequest) -> Result<Subdomain, Error> {
        // Advisory pre-check; the unique constraint decides races at insert.
        if self
            .subdomains
            .label_taken(&request.label, request.domain_id)
            .await
            .map_err(Self::map_subdomain_error)?
        {
            return Err(Self::taken_error());
        }

        let domain = self.active_parent_domain(request.domain_id).await?;
        let full_domain = request.label.full_domain(&domain.domain_name);

        let subdomain = self
            .subdomains
            .insert(NewSubdomain {
                user_id: request.user_id,
                domain_id: request.domain_id,
                label: request.label,
                full_domain,
            })
            .await
            .map_err(Self::map_subdomain_error)?;

        info!(
            subdomain_id = %subdomain.id,
            full_domain = %subdomain.full_domain,
            "subdomain registered"
        );
        Ok(subdomain)
    }

    async fn delete(&self, user_id: &UserId, subdomain_id: Uuid) -> Result<(), Error> {
        let owned = self
            .subdomains
            .find_owned(user_id, subdomain_id)
            .await
            .map_err(Self::map_subdomain_error)?
            .ok_or_else(Self::not_found)?;

        let records = self
            .records
            .list_for_subdomain(subdomain_id)
            .await
            .map_err(Self::map_record_error)?;

        // Remote cleanup first; any failure leaves the local rows untouched
        // so the operation can be retried.
        for record in &records {
            self.deprovision_record(&owned, record.id).await.map_err(|err| {
                warn!(
                    subdomain_id = %subdomain_id,
                    record_id = %record.id,
                    error = %err,
                    "aborting subdomain deletion; remote deprovision failed"
                );
                err
            })?;
        }

        self.subdomains
            .delete(subdomain_id)
            .await
            .map_err(Self::map_subdomain_error)?;

        info!(
            subdomain_id = %subdomain_id,
            records = records.len(),
            "subdomain deleted"
        );
        Ok(())
    }
}

#[async_trait]
impl<S, D, R, P> SubdomainQuery for SubdomainService<S, D, R, P>
where
    S: SubdomainRepository,
    D: ParentDomainRepository,
    R: DnsRecordRepository,
    P: DnsProvider + ?Sized,
{
    async fn list(&self, user_id: &UserId) -> Result<Vec<SubdomainWithDomain>, Error> {
        self.subdomains
            .list_for_user(user_id)
            .await
            .map_err(Self::map_subdomain_error)
    }

    async fn get(
        &self,
        user_id: &UserId,
        subdomain_id: Uuid,
    ) -> Result<SubdomainWithDomain, Error> {
        self.subdomains
            .find_owned(user_id, subdomain_id)
            .await
            .map_err(Self::map_subdomain_error)?
            .ok_or_else(Self::not_found)
    }

    async fn check_availability(
        &self,
        label: &SubdomainLabel,
        domain_id: Uuid,
    ) -> Result<bool, Error> {
        let taken = self
            .subdomains
            .label_taken(label, domain_id)
            .await
            .map_err(Self::map_subdomain_error)?;
        Ok(!taken)
    }
}

#[async_trait]
impl<S, D, R, P> ParentDomainQuery for SubdomainService<S, D, R, P>
where
    S: SubdomainRepository,
    D: ParentDomainRepository,
    R: DnsRecordRepository,
    P: DnsProvider + ?Sized,
{
    async fn list_active(&self) -> Result<Vec<ParentDomain>, Error> {
        self.domains
            .list_active()
            .await
            .map_err(Self::map_domain_error)
    }
}
