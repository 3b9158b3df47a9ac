//! DNS record types and validation.
//!
//! A record arrives as an untrusted [`RecordDraft`], passes through
//! [`validation::validate_record`], and only then becomes a [`RecordSpec`]
//! suitable for provisioning and persistence.

pub mod validation;

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Smallest time-to-live accepted, in seconds.
pub const TTL_MIN: i64 = 60;
/// Largest time-to-live accepted, in seconds.
pub const TTL_MAX: i64 = 86_400;
/// Largest mail-exchange priority accepted.
pub const MX_PRIORITY_MAX: i64 = 65_535;

/// Supported DNS record types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordType {
    /// IPv4 address record.
    A,
    /// Canonical name record.
    #[serde(rename = "CNAME")]
    Cname,
    /// Mail exchange record.
    #[serde(rename = "MX")]
    Mx,
}

impl RecordType {
    /// Wire representation used by the provider and the database.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::Cname => "CNAME",
            Self::Mx => "MX",
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing a record type from its wire form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRecordType(pub String);

impl fmt::Display for UnknownRecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown record type: {}", self.0)
    }
}

impl std::error::Error for UnknownRecordType {}

impl std::str::FromStr for RecordType {
    type Err = UnknownRecordType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "A" => Ok(Self::A),
            "CNAME" => Ok(Self::Cname),
            "MX" => Ok(Self::Mx),
            other => Err(UnknownRecordType(other.to_owned())),
        }
    }
}

/// Untrusted record candidate as submitted by a caller.
///
/// Numeric fields are wide enough to hold anything JSON can carry so range
/// failures surface as structured validation errors rather than
/// deserialisation noise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordDraft {
    /// Requested record type.
    pub record_type: RecordType,
    /// Candidate value (address or target name).
    pub value: String,
    /// Candidate mail-exchange priority.
    pub priority: Option<i64>,
    /// Candidate time-to-live in seconds.
    pub ttl: i64,
}

/// Validated, normalised record ready for provisioning and persistence.
///
/// ## Invariants
/// - `value` satisfies the syntax for `record_type` and is lowercased for
///   name-valued records.
/// - `priority` is `Some` exactly when `record_type` is MX.
/// - `ttl` lies in `[TTL_MIN, TTL_MAX]`.
///
/// Construct via [`validation::validate_record`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordSpec {
    /// Record type.
    pub record_type: RecordType,
    /// Normalised value.
    pub value: String,
    /// Mail-exchange priority, MX only.
    pub priority: Option<u16>,
    /// Time-to-live in seconds.
    pub ttl: u32,
}

/// Stored DNS record belonging to a subdomain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnsRecord {
    /// Stable identifier.
    pub id: Uuid,
    /// Owning subdomain.
    pub subdomain_id: Uuid,
    /// Record type.
    pub record_type: RecordType,
    /// Record value.
    pub value: String,
    /// Mail-exchange priority, MX only.
    pub priority: Option<u16>,
    /// Time-to-live in seconds.
    pub ttl: u32,
    /// Row creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(RecordType::A, "A")]
    #[case(RecordType::Cname, "CNAME")]
    #[case(RecordType::Mx, "MX")]
    fn record_types_round_trip_wire_form(#[case] record_type: RecordType, #[case] wire: &str) {
        assert_eq!(record_type.as_str(), wire);
        assert_eq!(wire.parse::<RecordType>().expect("parse"), record_type);
        let json = serde_json::to_value(record_type).expect("serialise");
        assert_eq!(json, serde_json::json!(wire));
    }

    #[rstest]
    fn unknown_record_types_are_rejected() {
        let err = "TXT".parse::<RecordType>().expect_err("unsupported type");
        assert_eq!(err.0, "TXT");
    }
}
