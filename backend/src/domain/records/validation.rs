//! Pure validation of candidate DNS records.
//!
//! These functions have no side effects and reject exactly the inputs the
//! record contracts describe; everything else is accepted and normalised.

use std::fmt;

use crate::domain::name::is_valid_dns_name;
use crate::domain::records::{
    RecordDraft, RecordSpec, RecordType, MX_PRIORITY_MAX, TTL_MAX, TTL_MIN,
};

/// Structured validation failure naming the offending field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordValidationError {
    /// A-record value is not a dotted-quad IPv4 address.
    InvalidIpv4Address {
        /// Rejected value.
        value: String,
    },
    /// CNAME/MX value is not a valid DNS name.
    InvalidDomainName {
        /// Rejected value.
        value: String,
    },
    /// MX record submitted without a priority.
    MissingPriority,
    /// Priority outside `[0, 65535]`.
    PriorityOutOfRange {
        /// Rejected priority.
        priority: i64,
    },
    /// Priority supplied for a record type that has none.
    UnexpectedPriority,
    /// Time-to-live outside `[60, 86400]`.
    TtlOutOfRange {
        /// Rejected ttl.
        ttl: i64,
    },
}

impl RecordValidationError {
    /// Name of the request field the failure concerns.
    pub fn field(&self) -> &'static str {
        match self {
            Self::InvalidIpv4Address { .. } | Self::InvalidDomainName { .. } => "recordValue",
            Self::MissingPriority | Self::PriorityOutOfRange { .. } | Self::UnexpectedPriority => {
                "priority"
            }
            Self::TtlOutOfRange { .. } => "ttl",
        }
    }
}

impl fmt::Display for RecordValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidIpv4Address { value } => {
                write!(f, "record value must be a valid IPv4 address, got {value:?}")
            }
            Self::InvalidDomainName { value } => {
                write!(f, "record value must be a valid domain name, got {value:?}")
            }
            Self::MissingPriority => write!(f, "MX records require a priority"),
            Self::PriorityOutOfRange { priority } => write!(
                f,
                "priority must be between 0 and {MX_PRIORITY_MAX}, got {priority}"
            ),
            Self::UnexpectedPriority => {
                write!(f, "priority is only meaningful for MX records")
            }
            Self::TtlOutOfRange { ttl } => write!(
                f,
                "ttl must be between {TTL_MIN} and {TTL_MAX} seconds, got {ttl}"
            ),
        }
    }
}

impl std::error::Error for RecordValidationError {}

/// Return `true` when `value` is a dotted-quad IPv4 address.
///
/// Exactly four octets, each 0-255, with no leading zeros (`0` itself is
/// fine). `192.168.1.1` is accepted; `256.1.1.1`, `1.2.3` and `01.2.3.4`
/// are not.
pub fn is_valid_ipv4(value: &str) -> bool {
    let mut octets = 0usize;
    for part in value.split('.') {
        octets += 1;
        if octets > 4 {
            return false;
        }
        if part.is_empty() || part.len() > 3 || !part.bytes().all(|b| b.is_ascii_digit()) {
            return false;
        }
        if part.len() > 1 && part.starts_with('0') {
            return false;
        }
        match part.parse::<u16>() {
            Ok(octet) if octet <= 255 => {}
            _ => return false,
        }
    }
    octets == 4
}

fn validate_ttl(ttl: i64) -> Result<u32, RecordValidationError> {
    if !(TTL_MIN..=TTL_MAX).contains(&ttl) {
        return Err(RecordValidationError::TtlOutOfRange { ttl });
    }
    u32::try_from(ttl).map_err(|_| RecordValidationError::TtlOutOfRange { ttl })
}

fn validate_priority(priority: Option<i64>) -> Result<u16, RecordValidationError> {
    let priority = priority.ok_or(RecordValidationError::MissingPriority)?;
    if !(0..=MX_PRIORITY_MAX).contains(&priority) {
        return Err(RecordValidationError::PriorityOutOfRange { priority });
    }
    u16::try_from(priority).map_err(|_| RecordValidationError::PriorityOutOfRange { priority })
}

fn validate_name_value(value: &str) -> Result<String, RecordValidationError> {
    if !is_valid_dns_name(value) {
        return Err(RecordValidationError::InvalidDomainName {
            value: value.to_owned(),
        });
    }
    Ok(value.to_ascii_lowercase())
}

/// Validate a candidate record, returning the normalised [`RecordSpec`].
///
/// Pure: no I/O, no clock, no randomness.
pub fn validate_record(draft: &RecordDraft) -> Result<RecordSpec, RecordValidationError> {
    let ttl = validate_ttl(draft.ttl)?;

    let (value, priority) = match draft.record_type {
        RecordType::A => {
            if !is_valid_ipv4(&draft.value) {
                return Err(RecordValidationError::InvalidIpv4Address {
                    value: draft.value.clone(),
                });
            }
            if draft.priority.is_some() {
                return Err(RecordValidationError::UnexpectedPriority);
            }
            (draft.value.clone(), None)
        }
        RecordType::Cname => {
            if draft.priority.is_some() {
                return Err(RecordValidationError::UnexpectedPriority);
            }
            (validate_name_value(&draft.value)?, None)
        }
        RecordType::Mx => {
            let priority = validate_priority(draft.priority)?;
            (validate_name_value(&draft.value)?, Some(priority))
        }
    };

    Ok(RecordSpec {
        record_type: draft.record_type,
        value,
        priority,
        ttl,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn draft(record_type: RecordType, value: &str, priority: Option<i64>, ttl: i64) -> RecordDraft {
        RecordDraft {
            record_type,
            value: value.to_owned(),
            priority,
            ttl,
        }
    }

    #[rstest]
    #[case("0.0.0.0")]
    #[case("1.2.3.4")]
    #[case("192.168.1.1")]
    #[case("255.255.255.255")]
    #[case("10.0.200.9")]
    fn ipv4_accepts_valid_addresses(#[case] value: &str) {
        assert!(is_valid_ipv4(value), "{value} should be accepted");
    }

    #[rstest]
    #[case("")]
    #[case("1.2.3")]
    #[case("1.2.3.4.5")]
    #[case("256.1.1.1")]
    #[case("1.2.3.256")]
    #[case("01.2.3.4")]
    #[case("1.2.3.04")]
    #[case("a.b.c.d")]
    #[case("1.2.3.-4")]
    #[case("1.2.3.4 ")]
    #[case("1..3.4")]
    #[case("1234.1.1.1")]
    fn ipv4_rejects_invalid_addresses(#[case] value: &str) {
        assert!(!is_valid_ipv4(value), "{value} should be rejected");
    }

    #[rstest]
    fn a_record_with_valid_address_passes() {
        let spec = validate_record(&draft(RecordType::A, "192.168.1.1", None, 3600))
            .expect("valid A record");
        assert_eq!(spec.value, "192.168.1.1");
        assert_eq!(spec.priority, None);
        assert_eq!(spec.ttl, 3600);
    }

    #[rstest]
    fn a_record_with_bad_address_names_record_value() {
        let err = validate_record(&draft(RecordType::A, "256.1.1.1", None, 3600))
            .expect_err("octet out of range");
        assert_eq!(err.field(), "recordValue");
        assert!(matches!(err, RecordValidationError::InvalidIpv4Address { .. }));
    }

    #[rstest]
    fn cname_value_is_lowercased() {
        let spec = validate_record(&draft(RecordType::Cname, "Target.Example.COM", None, 300))
            .expect("valid CNAME");
        assert_eq!(spec.value, "target.example.com");
    }

    #[rstest]
    fn cname_with_bare_hostname_is_rejected() {
        let err = validate_record(&draft(RecordType::Cname, "localhost", None, 300))
            .expect_err("missing top label");
        assert!(matches!(err, RecordValidationError::InvalidDomainName { .. }));
    }

    #[rstest]
    fn mx_requires_priority() {
        let err = validate_record(&draft(RecordType::Mx, "mail.example.com", None, 3600))
            .expect_err("priority mandatory");
        assert_eq!(err, RecordValidationError::MissingPriority);
        assert_eq!(err.field(), "priority");
    }

    #[rstest]
    #[case(0)]
    #[case(10)]
    #[case(65_535)]
    fn mx_accepts_priority_bounds(#[case] priority: i64) {
        let spec = validate_record(&draft(RecordType::Mx, "mail.example.com", Some(priority), 3600))
            .expect("valid MX");
        let expected = u16::try_from(priority).expect("case priority fits");
        assert_eq!(spec.priority, Some(expected));
    }

    #[rstest]
    #[case(-1)]
    #[case(65_536)]
    fn mx_rejects_priority_out_of_range(#[case] priority: i64) {
        let err = validate_record(&draft(RecordType::Mx, "mail.example.com", Some(priority), 3600))
            .expect_err("out of range");
        assert_eq!(err, RecordValidationError::PriorityOutOfRange { priority });
    }

    #[rstest]
    fn priority_on_non_mx_records_is_rejected() {
        let err = validate_record(&draft(RecordType::A, "1.2.3.4", Some(10), 3600))
            .expect_err("priority only for MX");
        assert_eq!(err, RecordValidationError::UnexpectedPriority);
    }

    #[rstest]
    #[case(60)]
    #[case(86_400)]
    fn ttl_bounds_are_inclusive(#[case] ttl: i64) {
        let spec =
            validate_record(&draft(RecordType::A, "1.2.3.4", None, ttl)).expect("ttl in range");
        let expected = u32::try_from(ttl).expect("case ttl fits");
        assert_eq!(spec.ttl, expected);
    }

    #[rstest]
    #[case(59)]
    #[case(86_401)]
    #[case(-60)]
    fn ttl_out_of_range_is_rejected(#[case] ttl: i64) {
        let err = validate_record(&draft(RecordType::A, "1.2.3.4", None, ttl))
            .expect_err("ttl out of range");
        assert_eq!(err, RecordValidationError::TtlOutOfRange { ttl });
        assert_eq!(err.field(), "ttl");
    }
}
