//! Parent domain (zone) entities.
//!
//! A parent domain is a registrable zone seeded by operators. Users attach
//! subdomains to it; the provider addresses it through an opaque zone
//! identifier.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::name::is_valid_dns_name;

/// Validation errors raised by the zone newtypes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ZoneValidationError {
    /// Domain name fails DNS syntax.
    InvalidDomainName,
    /// Zone identifier was blank.
    EmptyZoneId,
}

impl fmt::Display for ZoneValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDomainName => write!(f, "domain name must be a valid DNS name"),
            Self::EmptyZoneId => write!(f, "zone id must not be empty"),
        }
    }
}

impl std::error::Error for ZoneValidationError {}

/// Validated, lowercased registrable domain name such as `example.com`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DomainName(String);

impl DomainName {
    /// Validate and construct a [`DomainName`].
    pub fn new(raw: impl AsRef<str>) -> Result<Self, ZoneValidationError> {
        let trimmed = raw.as_ref().trim();
        if !is_valid_dns_name(trimmed) {
            return Err(ZoneValidationError::InvalidDomainName);
        }
        Ok(Self(trimmed.to_ascii_lowercase()))
    }
}

impl AsRef<str> for DomainName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for DomainName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<DomainName> for String {
    fn from(value: DomainName) -> Self {
        value.0
    }
}

impl TryFrom<String> for DomainName {
    type Error = ZoneValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Opaque handle the remote provider uses to address a zone.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ZoneId(String);

impl ZoneId {
    /// Validate and construct a [`ZoneId`].
    pub fn new(raw: impl Into<String>) -> Result<Self, ZoneValidationError> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(ZoneValidationError::EmptyZoneId);
        }
        Ok(Self(raw))
    }
}

impl AsRef<str> for ZoneId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for ZoneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<ZoneId> for String {
    fn from(value: ZoneId) -> Self {
        value.0
    }
}

impl TryFrom<String> for ZoneId {
    type Error = ZoneValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Registrable zone users may attach subdomains to.
///
/// ## Invariants
/// - `domain_name` and `zone_id` are unique across the system (database
///   constraints).
/// - Rows are immutable after seeding except for `is_active`.
#[derive(Debug, Clone, PartialEq)]
pub struct ParentDomain {
    /// Stable identifier.
    pub id: Uuid,
    /// Registrable name, e.g. `example.com`.
    pub domain_name: DomainName,
    /// Opaque provider zone handle.
    pub zone_id: ZoneId,
    /// Whether new subdomains may be registered under this zone.
    pub is_active: bool,
    /// Row creation timestamp.
    pub created_at: DateTime<Utc>,
}
