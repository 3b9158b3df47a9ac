//! Port for DNS record persistence.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::records::{DnsRecord, RecordSpec};
use crate::domain::subdomain::Subdomain;
use crate::domain::zone::ParentDomain;

/// Errors raised by DNS record repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DnsRecordRepositoryError {
    /// Repository connection could not be established.
    #[error("dns record repository connection failed: {message}")]
    Connection {
        /// Adapter-provided description.
        message: String,
    },
    /// Query or mutation failed during execution.
    #[error("dns record repository query failed: {message}")]
    Query {
        /// Adapter-provided description.
        message: String,
    },
}

impl DnsRecordRepositoryError {
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

/// Insertable record row; the adapter assigns identity and timestamps.
///
/// Callers must have validated the spec and provisioned the change remotely
/// before inserting.
#[derive(Debug, Clone)]
pub struct NewDnsRecord {
    /// Owning subdomain.
    pub subdomain_id: Uuid,
    /// Validated record content.
    pub spec: RecordSpec,
}

/// A record joined with its full ownership chain in one read.
#[derive(Debug, Clone)]
pub struct OwnedRecord {
    /// The stored record.
    pub record: DnsRecord,
    /// Its owning subdomain.
    pub subdomain: Subdomain,
    /// The subdomain's parent zone.
    pub domain: ParentDomain,
}

/// Port for DNS record storage scoped to a subdomain.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DnsRecordRepository: Send + Sync {
    /// Insert a validated, provisioned record and return the stored row.
    async fn insert(&self, record: NewDnsRecord) -> Result<DnsRecord, DnsRecordRepositoryError>;

    /// List all records for a subdomain, in no particular order.
    async fn list_for_subdomain(
        &self,
        subdomain_id: Uuid,
    ) -> Result<Vec<DnsRecord>, DnsRecordRepositoryError>;

    /// Fetch a record together with its subdomain and parent zone.
    async fn find_with_ownership(
        &self,
        record_id: Uuid,
    ) -> Result<Option<OwnedRecord>, DnsRecordRepositoryError>;

    /// Delete a record row; the caller must have deprovisioned it remotely.
    async fn delete(&self, record_id: Uuid) -> Result<(), DnsRecordRepositoryError>;
}

/// Fixture implementation for tests that do not exercise record storage.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureDnsRecordRepository;

#[async_trait]
impl DnsRecordRepository for FixtureDnsRecordRepository {
    async fn insert(&self, record: NewDnsRecord) -> Result<DnsRecord, DnsRecordRepositoryError> {
        let now = chrono::Utc::now();
        Ok(DnsRecord {
            id: Uuid::new_v4(),
            subdomain_id: record.subdomain_id,
            record_type: record.spec.record_type,
            value: record.spec.value,
            priority: record.spec.priority,
            ttl: record.spec.ttl,
            created_at: now,
            updated_at: now,
        })
    }

    async fn list_for_subdomain(
        &self,
        _subdomain_id: Uuid,
    ) -> Result<Vec<DnsRecord>, DnsRecordRepositoryError> {
        Ok(Vec::new())
    }

    async fn find_with_ownership(
        &self,
        _record_id: Uuid,
    ) -> Result<Option<OwnedRecord>, DnsRecordRepositoryError> {
        Ok(None)
    }

    async fn delete(&self, _record_id: Uuid) -> Result<(), DnsRecordRepositoryError> {
        Ok(())
    }
}
