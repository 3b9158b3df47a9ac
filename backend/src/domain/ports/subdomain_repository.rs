//! Port for subdomain persistence and ownership resolution.
//!
//! Ownership resolution is deliberately a single joined read:
//! [`SubdomainRepository::find_owned`] answers "does this subdomain exist AND
//! belong to this user" in one query, returning `None` for both absence and
//! foreign ownership so callers cannot distinguish the two.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::subdomain::{Subdomain, SubdomainLabel, SubdomainWithDomain};
use crate::domain::user::UserId;

/// Errors raised by subdomain repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubdomainRepositoryError {
    /// Repository connection could not be established.
    #[error("subdomain repository connection failed: {message}")]
    Connection {
        /// Adapter-provided description.
        message: String,
    },
    /// Query or mutation failed during execution.
    #[error("subdomain repository query failed: {message}")]
    Query {
        /// Adapter-provided description.
        message: String,
    },
    /// The `(label, domain)` pair is already registered.
    #[error("subdomain label is already registered under this domain")]
    DuplicateLabel,
}

impl SubdomainRepositoryError {
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

/// Insertable subdomain row; the adapter assigns identity and timestamps.
#[derive(Debug, Clone)]
pub struct NewSubdomain {
    /// Owning user.
    pub user_id: UserId,
    /// Parent zone.
    pub domain_id: Uuid,
    /// Registered label.
    pub label: SubdomainLabel,
    /// Denormalised `label.parent_domain_name`.
    pub full_domain: String,
}

/// Port for subdomain storage.
///
/// The `(label, domain_id)` unique constraint lives in the storage layer and
/// is the sole arbiter of availability races; adapters surface a violation as
/// [`SubdomainRepositoryError::DuplicateLabel`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubdomainRepository: Send + Sync {
    /// Insert a new subdomain and return the stored row.
    async fn insert(&self, subdomain: NewSubdomain) -> Result<Subdomain, SubdomainRepositoryError>;

    /// Resolve a subdomain together with its parent zone, scoped to `user_id`.
    async fn find_owned(
        &self,
        user_id: &UserId,
        subdomain_id: Uuid,
    ) -> Result<Option<SubdomainWithDomain>, SubdomainRepositoryError>;

    /// List the caller's subdomains joined with their parent zones.
    async fn list_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<SubdomainWithDomain>, SubdomainRepositoryError>;

    /// Advisory check whether `(label, domain_id)` is already registered.
    async fn label_taken(
        &self,
        label: &SubdomainLabel,
        domain_id: Uuid,
    ) -> Result<bool, SubdomainRepositoryError>;

    /// Delete a subdomain row; the database cascades to its DNS records.
    async fn delete(&self, subdomain_id: Uuid) -> Result<(), SubdomainRepositoryError>;
}

/// Fixture implementation for tests that do not exercise subdomain storage.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureSubdomainRepository;

#[async_trait]
impl SubdomainRepository for FixtureSubdomainRepository {
    async fn insert(&self, subdomain: NewSubdomain) -> Result<Subdomain, SubdomainRepositoryError> {
        let now = chrono::Utc::now();
        Ok(Subdomain {
            id: Uuid::new_v4(),
            user_id: subdomain.user_id,
            domain_id: subdomain.domain_id,
            label: subdomain.label,
            full_domain: subdomain.full_domain,
            is_active: true,
            created_at: now,
            updated_at: now,
        })
    }

    async fn find_owned(
        &self,
        _user_id: &UserId,
        _subdomain_id: Uuid,
    ) -> Result<Option<SubdomainWithDomain>, SubdomainRepositoryError> {
        Ok(None)
    }

    async fn list_for_user(
        &self,
        _user_id: &UserId,
    ) -> Result<Vec<SubdomainWithDomain>, SubdomainRepositoryError> {
        Ok(Vec::new())
    }

    async fn label_taken(
        &self,
        _label: &SubdomainLabel,
        _domain_id: Uuid,
    ) -> Result<bool, SubdomainRepositoryError> {
        Ok(false)
    }

    async fn delete(&self, _subdomain_id: Uuid) -> Result<(), SubdomainRepositoryError> {
        Ok(())
    }
}
