//! Port for parent domain (zone) persistence.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::zone::{DomainName, ParentDomain, ZoneId};

/// Errors raised by parent domain repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParentDomainRepositoryError {
    /// Repository connection could not be established.
    #[error("parent domain repository connection failed: {message}")]
    Connection {
        /// Adapter-provided description.
        message: String,
    },
    /// Query or mutation failed during execution.
    #[error("parent domain repository query failed: {message}")]
    Query {
        /// Adapter-provided description.
        message: String,
    },
}

impl ParentDomainRepositoryError {
    /// Connection failure with the given message.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Query failure with the given message.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

/// Seedable parent domain row.
#[derive(Debug, Clone)]
pub struct NewParentDomain {
    /// Registrable name.
    pub domain_name: DomainName,
    /// Opaque provider zone handle.
    pub zone_id: ZoneId,
    /// Whether registrations are open.
    pub is_active: bool,
}

/// Port for zone lookup and idempotent seeding.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ParentDomainRepository: Send + Sync {
    /// List zones currently open for registration.
    async fn list_active(&self) -> Result<Vec<ParentDomain>, ParentDomainRepositoryError>;

    /// Fetch a zone by identifier regardless of its active flag.
    async fn find_by_id(
        &self,
        id: Uuid,
    ) -> Result<Option<ParentDomain>, ParentDomainRepositoryError>;

    /// Insert the given zones, skipping names already present.
    ///
    /// Returns the number of rows actually inserted. Used by startup seeding;
    /// must be idempotent.
    async fn seed(
        &self,
        domains: Vec<NewParentDomain>,
    ) -> Result<usize, ParentDomainRepositoryError>;
}

/// Fixture implementation with no zones.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureParentDomainRepository;

#[async_trait]
impl ParentDomainRepository for FixtureParentDomainRepository {
    async fn list_active(&self) -> Result<Vec<ParentDomain>, ParentDomainRepositoryError> {
        Ok(Vec::new())
    }

    async fn find_by_id(
        &self,
        _id: Uuid,
    ) -> Result<Option<ParentDomain>, ParentDomainRepositoryError> {
        Ok(None)
    }

    async fn seed(
        &self,
        _domains: Vec<NewParentDomain>,
    ) -> Result<usize, ParentDomainRepositoryError> {
        Ok(0)
    }
}
