//! PostgreSQL-backed `SubdomainRepository` implementation using Diesel ORM.
//!
//! Ownership resolution is one joined query: filtering on both the subdomain
//! id and the owning user id keeps absent and foreign rows indistinguishable.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::{NewSubdomain, SubdomainRepository, SubdomainRepositoryError};
use crate::domain::{ParentDomain, Subdomain, SubdomainLabel, SubdomainWithDomain, UserId};

use super::diesel_parent_domain_repository::row_to_parent_domain;
use super::models::{NewSubdomainRow, ParentDomainRow, SubdomainRow};
use super::pool::{DbPool, PoolError};
use super::schema::{parent_domains, subdomains};

/// Diesel-backed implementation of the `SubdomainRepository` port.
#[derive(Clone)]
pub struct DieselSubdomainRepository {
    pool: DbPool,
}

impl DieselSubdomainRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> SubdomainRepositoryError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            SubdomainRepositoryError::connection(message)
        }
    }
}

fn map_diesel_error(error: diesel::result::Error) -> SubdomainRepositoryError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    if let DieselError::DatabaseError(kind, info) = &error {
        debug!(?kind, message = info.message(), "diesel operation failed");
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            SubdomainRepositoryError::DuplicateLabel
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            SubdomainRepositoryError::connection("database connection error")
        }
        DieselError::NotFound => SubdomainRepositoryError::query("record not found"),
        _ => SubdomainRepositoryError::query("database error"),
    }
}

pub(super) fn row_to_subdomain(row: SubdomainRow) -> Result<Subdomain, SubdomainRepositoryError> {
    let label = SubdomainLabel::new(&row.label).map_err(|err| {
        SubdomainRepositoryError::query(format!("invalid label in database: {err}"))
    })?;
    Ok(Subdomain {
        id: row.id,
        user_id: UserId::from_uuid(row.user_id),
        domain_id: row.domain_id,
        label,
        full_domain: row.full_domain,
        is_active: row.is_active,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

fn parent_row(row: ParentDomainRow) -> Result<ParentDomain, SubdomainRepositoryError> {
    row_to_parent_domain(row).map_err(|err| SubdomainRepositoryError::query(err.to_string()))
}

fn join_to_domain(
    (subdomain, domain): (SubdomainRow, ParentDomainRow),
) -> Result<SubdomainWithDomain, SubdomainRepositoryError> {
    Ok(SubdomainWithDomain {
        subdomain: row_to_subdomain(subdomain)?,
        domain: parent_row(domain)?,
    })
}

#[async_trait]
impl SubdomainRepository for DieselSubdomainRepository {
    async fn insert(&self, subdomain: NewSubdomain) -> Result<Subdomain, SubdomainRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let new_row = NewSubdomainRow {
            user_id: *subdomain.user_id.as_uuid(),
            domain_id: subdomain.domain_id,
            label: subdomain.label.as_ref(),
            full_domain: &subdomain.full_domain,
        };

        let row: SubdomainRow = diesel::insert_into(subdomains::table)
            .values(&new_row)
            .returning(SubdomainRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        row_to_subdomain(row)
    }

    async fn find_owned(
        &self,
        user_id: &UserId,
        subdomain_id: Uuid,
    ) -> Result<Option<SubdomainWithDomain>, SubdomainRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<(SubdomainRow, ParentDomainRow)> = subdomains::table
            .inner_join(parent_domains::table)
            .filter(subdomains::id.eq(subdomain_id))
            .filter(subdomains::user_id.eq(user_id.as_uuid()))
            .select((SubdomainRow::as_select(), ParentDomainRow::as_select()))
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(join_to_domain).transpose()
    }

    async fn list_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<SubdomainWithDomain>, SubdomainRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<(SubdomainRow, ParentDomainRow)> = subdomains::table
            .inner_join(parent_domains::table)
            .filter(subdomains::user_id.eq(user_id.as_uuid()))
            .order(subdomains::created_at.desc())
            .select((SubdomainRow::as_select(), ParentDomainRow::as_select()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(join_to_domain).collect()
    }

    async fn label_taken(
        &self,
        label: &SubdomainLabel,
        domain_id: Uuid,
    ) -> Result<bool, SubdomainRepositoryError> {
        use diesel::dsl::{exists, select};

        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        select(exists(
            subdomains::table
                .filter(subdomains::label.eq(label.as_ref()))
                .filter(subdomains::domain_id.eq(domain_id)),
        ))
        .get_result(&mut conn)
        .await
        .map_err(map_diesel_error)
    }

    async fn delete(&self, subdomain_id: Uuid) -> Result<(), SubdomainRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::delete(subdomains::table.filter(subdomains::id.eq(subdomain_id)))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }
}
