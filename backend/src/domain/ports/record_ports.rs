//! Driving ports for DNS record workflows.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::error::Error;
use crate::domain::records::{DnsRecord, RecordDraft};
use crate::domain::user::UserId;

/// Record creation request carrying the untrusted draft.
#[derive(Debug, Clone)]
pub struct CreateRecordRequest {
    /// Caller creating the record.
    pub user_id: UserId,
    /// Target subdomain; ownership is verified before any side effect.
    pub subdomain_id: Uuid,
    /// Unvalidated record candidate.
    pub draft: RecordDraft,
}

/// Domain use-case port for record mutations.
#[async_trait]
pub trait RecordCommand: Send + Sync {
    /// Validate, provision remotely, and persist a record.
    async fn create(&self, request: CreateRecordRequest) -> Result<DnsRecord, Error>;

    /// Deprovision remotely and delete an owned record.
    async fn delete(&self, user_id: &UserId, record_id: Uuid) -> Result<(), Error>;
}

/// Domain use-case port for record reads.
#[async_trait]
pub trait RecordQuery: Send + Sync {
    /// List records for an owned subdomain.
    async fn list(&self, user_id: &UserId, subdomain_id: Uuid) -> Result<Vec<DnsRecord>, Error>;
}

/// Fixture command that refuses everything with `not_found`.
///
/// Record workflows always resolve ownership first, so an empty system
/// legitimately answers `not_found` for any target.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureRecordCommand;

#[async_trait]
impl RecordCommand for FixtureRecordCommand {
    async fn create(&self, _request: CreateRecordRequest) -> Result<DnsRecord, Error> {
        Err(Error::not_found("subdomain not found"))
    }

    async fn delete(&self, _user_id: &UserId, _record_id: Uuid) -> Result<(), Error> {
        Err(Error::not_found("DNS record not found"))
    }
}

/// Fixture query that refuses with `not_found`.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureRecordQuery;

#[async_trait]
impl RecordQuery for FixtureRecordQuery {
    async fn list(&self, _user_id: &UserId, _subdomain_id: Uuid) -> Result<Vec<DnsRecord>, Error> {
        Err(Error::not_found("subdomain not found"))
    }
}
