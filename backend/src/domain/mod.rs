//! Domain primitives, aggregates, ports, and services.
//!
//! Purpose: Define strongly typed domain entities used by the inbound and
//! outbound layers, the ports forming the hexagonal boundary, and the
//! services orchestrating the registration and provisioning workflows. Keep
//! types immutable and document invariants in each type's Rustdoc.

mod account_service;
pub mod auth;
pub mod error;
mod name;
pub mod ports;
mod record_service;
pub mod records;
pub mod subdomain;
mod subdomain_service;
pub mod user;
pub mod zone;

pub use self::account_service::AccountService;
pub use self::auth::{LoginCredentials, LoginValidationError};
pub use self::error::{Error, ErrorCode};
pub use self::record_service::RecordService;
pub use self::records::validation::{is_valid_ipv4, validate_record, RecordValidationError};
pub use self::records::{DnsRecord, RecordDraft, RecordSpec, RecordType};
pub use self::subdomain::{
    LabelValidationError, Subdomain, SubdomainLabel, SubdomainWithDomain,
};
pub use self::subdomain_service::SubdomainService;
pub use self::user::{
    EmailAddress, Password, PasswordHash, User, UserId, UserValidationError,
};
pub use self::zone::{DomainName, ParentDomain, ZoneId, ZoneValidationError};

/// Convenient result alias for domain use-cases.
pub type DomainResult<T> = Result<T, Error>;
