//! PostgreSQL-backed `ParentDomainRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::{
    NewParentDomain, ParentDomainRepository, ParentDomainRepositoryError,
};
use crate::domain::{DomainName, ParentDomain, ZoneId};

use super::models::{NewParentDomainRow, ParentDomainRow};
use super::pool::{DbPool, PoolError};
use super::schema::parent_domains;

/// Diesel-backed implementation of the `ParentDomainRepository` port.
#[derive(Clone)]
pub struct DieselParentDomainRepository {
    pool: DbPool,
}

impl DieselParentDomainRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ParentDomainRepositoryError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            ParentDomainRepositoryError::connection(message)
        }
    }
}

fn map_diesel_error(error: diesel::result::Error) -> ParentDomainRepositoryError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    if let DieselError::DatabaseError(kind, info) = &error {
        debug!(?kind, message = info.message(), "diesel operation failed");
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            ParentDomainRepositoryError::connection("database connection error")
        }
        DieselError::NotFound => ParentDomainRepositoryError::query("record not found"),
        _ => ParentDomainRepositoryError::query("database error"),
    }
}

pub(super) fn row_to_parent_domain(
    row: ParentDomainRow,
) -> Result<ParentDomain, ParentDomainRepositoryError> {
    let domain_name = DomainName::new(&row.domain_name).map_err(|err| {
        ParentDomainRepositoryError::query(format!("invalid domain name in database: {err}"))
    })?;
    let zone_id = ZoneId::new(row.zone_id).map_err(|err| {
        ParentDomainRepositoryError::query(format!("invalid zone id in database: {err}"))
    })?;
    Ok(ParentDomain {
        id: row.id,
        domain_name,
        zone_id,
        is_active: row.is_active,
        created_at: row.created_at,
    })
}

#[async_trait]
impl ParentDomainRepository for DieselParentDomainRepository {
    async fn list_active(&self) -> Result<Vec<ParentDomain>, ParentDomainRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<ParentDomainRow> = parent_domains::table
            .filter(parent_domains::is_active.eq(true))
            .select(ParentDomainRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_parent_domain).collect()
    }

    async fn find_by_id(
        &self,
        id: Uuid,
    ) -> Result<Option<ParentDomain>, ParentDomainRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<ParentDomainRow> = parent_domains::table
            .filter(parent_domains::id.eq(id))
            .select(ParentDomainRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_parent_domain).transpose()
    }

    async fn seed(
        &self,
        domains: Vec<NewParentDomain>,
    ) -> Result<usize, ParentDomainRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<NewParentDomainRow<'_>> = domains
            .iter()
            .map(|domain| NewParentDomainRow {
                domain_name: domain.domain_name.as_ref(),
                zone_id: domain.zone_id.as_ref(),
                is_active: domain.is_active,
            })
            .collect();

        let inserted = diesel::insert_into(parent_domains::table)
            .values(&rows)
            .on_conflict_do_nothing()
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(inserted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rstest::rstest;

    #[rstest]
    fn row_to_parent_domain_converts_valid_rows() {
        let row = ParentDomainRow {
            id: Uuid::new_v4(),
            domain_name: "example1.com".to_owned(),
            zone_id: "Z1234567890ABC".to_owned(),
            is_active: true,
            created_at: Utc::now(),
        };
        let domain = row_to_parent_domain(row).expect("valid row converts");
        assert_eq!(domain.domain_name.as_ref(), "example1.com");
        assert_eq!(domain.zone_id.as_ref(), "Z1234567890ABC");
    }

    #[rstest]
    fn row_to_parent_domain_rejects_corrupt_names() {
        let row = ParentDomainRow {
            id: Uuid::new_v4(),
            domain_name: "not a domain".to_owned(),
            zone_id: "Z1".to_owned(),
            is_active: true,
            created_at: Utc::now(),
        };
        let err = row_to_parent_domain(row).expect_err("corrupt row rejected");
        assert!(matches!(err, ParentDomainRepositoryError::Query { .. }));
    }
}
