//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the database migrations exactly. They are used
//! by Diesel for compile-time query validation and type-safe SQL generation.
//!
//! # Maintenance
//!
//! When migrations change the schema, this file should be regenerated or
//! manually updated to reflect those changes. The `diesel print-schema`
//! command can generate these definitions from a live database.

diesel::table! {
    /// Registered accounts.
    users (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Unique lowercased address (max 254 characters).
        #[max_length = 254]
        email -> Varchar,
        /// bcrypt digest of the account password.
        password_hash -> Text,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Registrable parent zones, seeded by operators.
    parent_domains (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Unique registrable name (max 253 characters).
        #[max_length = 253]
        domain_name -> Varchar,
        /// Unique opaque provider zone handle.
        #[max_length = 64]
        zone_id -> Varchar,
        /// Whether registrations are open.
        is_active -> Bool,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// User-registered subdomains; `(label, domain_id)` is unique.
    subdomains (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Owning user (FK, cascade).
        user_id -> Uuid,
        /// Parent zone (FK, cascade).
        domain_id -> Uuid,
        /// Registered label (max 63 characters).
        #[max_length = 63]
        label -> Varchar,
        /// Denormalised `label.parent_domain_name`.
        #[max_length = 253]
        full_domain -> Varchar,
        /// Whether the subdomain is live.
        is_active -> Bool,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// DNS records attached to subdomains (FK, cascade).
    dns_records (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Owning subdomain (FK, cascade).
        subdomain_id -> Uuid,
        /// Wire form of the record type: A, CNAME, MX.
        #[max_length = 8]
        record_type -> Varchar,
        /// Record value (max 253 characters).
        #[max_length = 253]
        record_value -> Varchar,
        /// Mail-exchange priority; NULL except for MX.
        priority -> Nullable<Int4>,
        /// Time-to-live in seconds.
        ttl -> Int4,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(subdomains -> users (user_id));
diesel::joinable!(subdomains -> parent_domains (domain_id));
diesel::joinable!(dns_records -> subdomains (subdomain_id));

diesel::allow_tables_to_appear_in_same_query!(users, parent_domains, subdomains, dns_records);
