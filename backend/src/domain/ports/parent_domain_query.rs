//! Driving port for listing registrable parent domains.

use async_trait::async_trait;

use crate::domain::error::Error;
use crate::domain::zone::ParentDomain;

/// Domain use-case port for the public zone catalogue.
#[async_trait]
pub trait ParentDomainQuery: Send + Sync {
    /// List zones currently open for registration.
    async fn list_active(&self) -> Result<Vec<ParentDomain>, Error>;
}

/// Fixture query with a single active example zone.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureParentDomainQuery;

#[async_trait]
impl ParentDomainQuery for FixtureParentDomainQuery {
    async fn list_active(&self) -> Result<Vec<ParentDomain>, Error> {
        let domain_name = crate::domain::zone::DomainName::new("example.com")
            .map_err(|err| Error::internal(format!("invalid fixture domain: {err}")))?;
        let zone_id = crate::domain::zone::ZoneId::new("Z0000000000000")
            .map_err(|err| Error::internal(format!("invalid fixture zone id: {err}")))?;
        Ok(vec![ParentDomain {
            id: uuid::Uuid::nil(),
            domain_name,
            zone_id,
            is_active: true,
            created_at: chrono::Utc::now(),
        }])
    }
}
