//! PostgreSQL-backed `DnsRecordRepository` implementation using Diesel ORM.

use std::str::FromStr;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::{
    DnsRecordRepository, DnsRecordRepositoryError, NewDnsRecord, OwnedRecord,
};
use crate::domain::{DnsRecord, RecordType};

use super::diesel_parent_domain_repository::row_to_parent_domain;
use super::diesel_subdomain_repository::row_to_subdomain;
use super::models::{DnsRecordRow, NewDnsRecordRow, ParentDomainRow, SubdomainRow};
use super::pool::{DbPool, PoolError};
use super::schema::{dns_records, parent_domains, subdomains};

/// Diesel-backed implementation of the `DnsRecordRepository` port.
#[derive(Clone)]
pub struct DieselDnsRecordRepository {
    pool: DbPool,
}

impl DieselDnsRecordRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> DnsRecordRepositoryError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            DnsRecordRepositoryError::connection(message)
        }
    }
}

fn map_diesel_error(error: diesel::result::Error) -> DnsRecordRepositoryError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    if let DieselError::DatabaseError(kind, info) = &error {
        debug!(?kind, message = info.message(), "diesel operation failed");
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            DnsRecordRepositoryError::connection("database connection error")
        }
        DieselError::NotFound => DnsRecordRepositoryError::query("record not found"),
        _ => DnsRecordRepositoryError::query("database error"),
    }
}

fn row_to_record(row: DnsRecordRow) -> Result<DnsRecord, DnsRecordRepositoryError> {
    let record_type = RecordType::from_str(&row.record_type).map_err(|err| {
        DnsRecordRepositoryError::query(format!("invalid record type in database: {err}"))
    })?;
    let priority = row
        .priority
        .map(u16::try_from)
        .transpose()
        .map_err(|_| DnsRecordRepositoryError::query("invalid priority in database"))?;
    let ttl = u32::try_from(row.ttl)
        .map_err(|_| DnsRecordRepositoryError::query("invalid ttl in database"))?;

    Ok(DnsRecord {
        id: row.id,
        subdomain_id: row.subdomain_id,
        record_type,
        value: row.record_value,
        priority,
        ttl,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

#[async_trait]
impl DnsRecordRepository for DieselDnsRecordRepository {
    async fn insert(&self, record: NewDnsRecord) -> Result<DnsRecord, DnsRecordRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let priority = record.spec.priority.map(i32::from);
        let ttl = i32::try_from(record.spec.ttl)
            .map_err(|_| DnsRecordRepositoryError::query("ttl exceeds column range"))?;
        let new_row = NewDnsRecordRow {
            subdomain_id: record.subdomain_id,
            record_type: record.spec.record_type.as_str(),
            record_value: &record.spec.value,
            priority,
            ttl,
        };

        let row: DnsRecordRow = diesel::insert_into(dns_records::table)
            .values(&new_row)
            .returning(DnsRecordRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        row_to_record(row)
    }

    async fn list_for_subdomain(
        &self,
        subdomain_id: Uuid,
    ) -> Result<Vec<DnsRecord>, DnsRecordRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<DnsRecordRow> = dns_records::table
            .filter(dns_records::subdomain_id.eq(subdomain_id))
            .select(DnsRecordRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_record).collect()
    }

    async fn find_with_ownership(
        &self,
        record_id: Uuid,
    ) -> Result<Option<OwnedRecord>, DnsRecordRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<(DnsRecordRow, SubdomainRow, ParentDomainRow)> = dns_records::table
            .inner_join(subdomains::table.inner_join(parent_domains::table))
            .filter(dns_records::id.eq(record_id))
            .select((
                DnsRecordRow::as_select(),
                SubdomainRow::as_select(),
                ParentDomainRow::as_select(),
            ))
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(|(record, subdomain, domain)| {
            Ok(OwnedRecord {
                record: row_to_record(record)?,
                subdomain: row_to_subdomain(subdomain)
                    .map_err(|err| DnsRecordRepositoryError::query(err.to_string()))?,
                domain: row_to_parent_domain(domain)
                    .map_err(|err| DnsRecordRepositoryError::query(err.to_string()))?,
            })
        })
        .transpose()
    }

    async fn delete(&self, record_id: Uuid) -> Result<(), DnsRecordRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::delete(dns_records::table.filter(dns_records::id.eq(record_id)))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }
}
