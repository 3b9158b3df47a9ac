//! Driving ports for subdomain registration and lookup.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::error::Error;
use crate::domain::subdomain::{Subdomain, SubdomainLabel, SubdomainWithDomain};
use crate::domain::user::UserId;

/// Validated subdomain registration request.
#[derive(Debug, Clone)]
pub struct RegisterSubdomainRequest {
    /// Caller registering the subdomain.
    pub user_id: UserId,
    /// Requested label.
    pub label: SubdomainLabel,
    /// Parent zone to register under.
    pub domain_id: Uuid,
}

/// Domain use-case port for subdomain mutations.
#[async_trait]
pub trait SubdomainCommand: Send + Sync {
    /// Register a subdomain for the caller.
    async fn register(&self, request: RegisterSubdomainRequest) -> Result<Subdomain, Error>;

    /// Delete an owned subdomain, deprovisioning its records remotely first.
    async fn delete(&self, user_id: &UserId, subdomain_id: Uuid) -> Result<(), Error>;
}

/// Domain use-case port for subdomain reads.
#[async_trait]
pub trait SubdomainQuery: Send + Sync {
    /// List the caller's subdomains with their parent zones.
    async fn list(&self, user_id: &UserId) -> Result<Vec<SubdomainWithDomain>, Error>;

    /// Fetch one owned subdomain; absent and foreign look identical.
    async fn get(
        &self,
        user_id: &UserId,
        subdomain_id: Uuid,
    ) -> Result<SubdomainWithDomain, Error>;

    /// Advisory availability check for `(label, domain_id)`.
    ///
    /// The storage-level unique constraint remains the source of truth; a
    /// `true` here can still lose the race at registration time.
    async fn check_availability(
        &self,
        label: &SubdomainLabel,
        domain_id: Uuid,
    ) -> Result<bool, Error>;
}

/// Fixture command that accepts registrations and deletions.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureSubdomainCommand;

#[async_trait]
impl SubdomainCommand for FixtureSubdomainCommand {
    async fn register(&self, request: RegisterSubdomainRequest) -> Result<Subdomain, Error> {
        let now = chrono::Utc::now();
        let full_domain = format!("{}.example.com", request.label);
        Ok(Subdomain {
            id: Uuid::new_v4(),
            user_id: request.user_id,
            domain_id: request.domain_id,
            label: request.label,
            full_domain,
            is_active: true,
            created_at: now,
            updated_at: now,
        })
    }

    async fn delete(&self, _user_id: &UserId, _subdomain_id: Uuid) -> Result<(), Error> {
        Ok(())
    }
}

/// Fixture query with no subdomains.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureSubdomainQuery;

#[async_trait]
impl SubdomainQuery for FixtureSubdomainQuery {
    async fn list(&self, _user_id: &UserId) -> Result<Vec<SubdomainWithDomain>, Error> {
        Ok(Vec::new())
    }

    async fn get(
        &self,
        _user_id: &UserId,
        _subdomain_id: Uuid,
    ) -> Result<SubdomainWithDomain, Error> {
        Err(Error::not_found("subdomain not found"))
    }

    async fn check_availability(
        &self,
        _label: &SubdomainLabel,
        _domain_id: Uuid,
    ) -> Result<bool, Error> {
        Ok(true)
    }
}
