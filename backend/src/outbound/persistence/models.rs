//! Diesel row structs mirroring the PostgreSQL schema.
//!
//! These are internal to the persistence layer; repositories convert them to
//! and from domain types at the adapter boundary.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{dns_records, parent_domains, subdomains, users};

/// Selectable account row.
#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insertable account row; identity and timestamps are database defaults.
#[derive(Debug, Insertable)]
#[diesel(table_name = users)]
pub struct NewUserRow<'a> {
    pub email: &'a str,
    pub password_hash: &'a str,
}

/// Selectable parent zone row.
#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = parent_domains)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ParentDomainRow {
    pub id: Uuid,
    pub domain_name: String,
    pub zone_id: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Insertable parent zone row.
#[derive(Debug, Insertable)]
#[diesel(table_name = parent_domains)]
pub struct NewParentDomainRow<'a> {
    pub domain_name: &'a str,
    pub zone_id: &'a str,
    pub is_active: bool,
}

/// Selectable subdomain row.
#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = subdomains)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct SubdomainRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub domain_id: Uuid,
    pub label: String,
    pub full_domain: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insertable subdomain row.
#[derive(Debug, Insertable)]
#[diesel(table_name = subdomains)]
pub struct NewSubdomainRow<'a> {
    pub user_id: Uuid,
    pub domain_id: Uuid,
    pub label: &'a str,
    pub full_domain: &'a str,
}

/// Selectable DNS record row.
#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = dns_records)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct DnsRecordRow {
    pub id: Uuid,
    pub subdomain_id: Uuid,
    pub record_type: String,
    pub record_value: String,
    pub priority: Option<i32>,
    pub ttl: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insertable DNS record row.
#[derive(Debug, Insertable)]
#[diesel(table_name = dns_records)]
pub struct NewDnsRecordRow<'a> {
    pub subdomain_id: Uuid,
    pub record_type: &'a str,
    pub record_value: &'a str,
    pub priority: Option<i32>,
    pub ttl: i32,
}
