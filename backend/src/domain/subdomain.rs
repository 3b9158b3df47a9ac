//! Subdomain entities and label validation.

use std::fmt;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::user::UserId;
use crate::domain::zone::{DomainName, ParentDomain};

/// Maximum length of a subdomain label.
pub const LABEL_MAX: usize = 63;

/// Validation errors raised by [`SubdomainLabel`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LabelValidationError {
    /// Label was missing or blank.
    Empty,
    /// Label exceeds [`LABEL_MAX`] characters.
    TooLong {
        /// Maximum accepted length in characters.
        max: usize,
    },
    /// Label contains characters outside `[a-z0-9-]` or has a hyphen at
    /// either boundary.
    InvalidFormat,
}

impl fmt::Display for LabelValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "subdomain name must not be empty"),
            Self::TooLong { max } => {
                write!(f, "subdomain name must be at most {max} characters")
            }
            Self::InvalidFormat => write!(
                f,
                "subdomain name may only contain lowercase letters, digits, and hyphens, \
                 and cannot start or end with a hyphen",
            ),
        }
    }
}

impl std::error::Error for LabelValidationError {}

static LABEL_RE: OnceLock<Regex> = OnceLock::new();

fn label_regex() -> &'static Regex {
    LABEL_RE.get_or_init(|| {
        // Length is enforced separately; this regex constrains shape.
        let pattern = r"^[a-z0-9]([a-z0-9-]{0,61}[a-z0-9])?$";
        Regex::new(pattern)
            .unwrap_or_else(|error| panic!("label regex failed to compile: {error}"))
    })
}

/// Validated subdomain label such as `foo` in `foo.example.com`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SubdomainLabel(String);

impl SubdomainLabel {
    /// Validate and construct a [`SubdomainLabel`].
    pub fn new(raw: impl AsRef<str>) -> Result<Self, LabelValidationError> {
        let raw = raw.as_ref();
        if raw.is_empty() {
            return Err(LabelValidationError::Empty);
        }
        if raw.chars().count() > LABEL_MAX {
            return Err(LabelValidationError::TooLong { max: LABEL_MAX });
        }
        if !label_regex().is_match(raw) {
            return Err(LabelValidationError::InvalidFormat);
        }
        Ok(Self(raw.to_owned()))
    }

    /// Compute the denormalised full domain under `parent`.
    pub fn full_domain(&self, parent: &DomainName) -> String {
        format!("{}.{}", self.0, parent)
    }
}

impl AsRef<str> for SubdomainLabel {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for SubdomainLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<SubdomainLabel> for String {
    fn from(value: SubdomainLabel) -> Self {
        value.0
    }
}

impl TryFrom<String> for SubdomainLabel {
    type Error = LabelValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

/// Registered subdomain owned by a user.
///
/// ## Invariants
/// - `(label, domain_id)` is unique across the system (database constraint).
/// - `full_domain` equals `label.parent_domain_name` at registration time.
#[derive(Debug, Clone, PartialEq)]
pub struct Subdomain {
    /// Stable identifier.
    pub id: Uuid,
    /// Owning user.
    pub user_id: UserId,
    /// Parent zone.
    pub domain_id: Uuid,
    /// Registered label.
    pub label: SubdomainLabel,
    /// Denormalised `label.parent_domain_name`.
    pub full_domain: String,
    /// Whether the subdomain is live.
    pub is_active: bool,
    /// Row creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

/// A subdomain joined with its parent zone, as ownership resolution returns it.
#[derive(Debug, Clone, PartialEq)]
pub struct SubdomainWithDomain {
    /// The owned subdomain.
    pub subdomain: Subdomain,
    /// Its parent zone.
    pub domain: ParentDomain,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("foo")]
    #[case("a")]
    #[case("0")]
    #[case("foo-bar")]
    #[case("a1-b2-c3")]
    fn accepts_valid_labels(#[case] raw: &str) {
        assert!(SubdomainLabel::new(raw).is_ok(), "{raw} should be accepted");
    }

    #[rstest]
    #[case("", LabelValidationError::Empty)]
    #[case("-foo", LabelValidationError::InvalidFormat)]
    #[case("foo-", LabelValidationError::InvalidFormat)]
    #[case("Foo", LabelValidationError::InvalidFormat)]
    #[case("foo.bar", LabelValidationError::InvalidFormat)]
    #[case("foo_bar", LabelValidationError::InvalidFormat)]
    fn rejects_invalid_labels(#[case] raw: &str, #[case] expected: LabelValidationError) {
        let err = SubdomainLabel::new(raw).expect_err("invalid label");
        assert_eq!(err, expected);
    }

    #[rstest]
    fn accepts_63_character_labels_and_rejects_64() {
        assert!(SubdomainLabel::new("a".repeat(63)).is_ok());
        let err = SubdomainLabel::new("a".repeat(64)).expect_err("too long");
        assert_eq!(err, LabelValidationError::TooLong { max: LABEL_MAX });
    }

    #[rstest]
    fn full_domain_concatenates_label_and_parent() {
        let label = SubdomainLabel::new("foo").expect("valid label");
        let parent = crate::domain::zone::DomainName::new("example.com").expect("valid name");
        assert_eq!(label.full_domain(&parent), "foo.example.com");
    }
}
