//! Shared DNS name syntax predicates for domain entities and record values.
//!
//! A DNS name is one or more dot-separated labels of letters, digits, and
//! hyphens (1-63 characters each, never starting or ending with a hyphen)
//! ending in an alphabetic top label of at least two characters. Matching is
//! case-insensitive.

use std::sync::OnceLock;

use regex::Regex;

static DNS_NAME_RE: OnceLock<Regex> = OnceLock::new();

fn dns_name_regex() -> &'static Regex {
    DNS_NAME_RE.get_or_init(|| {
        let pattern = r"(?i)^([a-z0-9]([a-z0-9-]{0,61}[a-z0-9])?\.)+[a-z]{2,}$";
        Regex::new(pattern)
            .unwrap_or_else(|error| panic!("DNS name regex failed to compile: {error}"))
    })
}

/// Return `true` when `value` is a syntactically valid DNS name.
pub(crate) fn is_valid_dns_name(value: &str) -> bool {
    // 253 characters is the presentation-format ceiling for a full name.
    value.len() <= 253 && dns_name_regex().is_match(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("example.com")]
    #[case("mail.example.com")]
    #[case("a.co")]
    #[case("xn--bcher-kva.example")]
    #[case("MAIL.Example.COM")]
    #[case("a-b.c-d.org")]
    fn accepts_valid_names(#[case] value: &str) {
        assert!(is_valid_dns_name(value), "{value} should be accepted");
    }

    #[rstest]
    #[case("")]
    #[case("example")]
    #[case(".example.com")]
    #[case("example..com")]
    #[case("-bad.example.com")]
    #[case("bad-.example.com")]
    #[case("example.c")]
    #[case("example.123")]
    #[case("exa mple.com")]
    fn rejects_invalid_names(#[case] value: &str) {
        assert!(!is_valid_dns_name(value), "{value} should be rejected");
    }

    #[rstest]
    fn rejects_labels_longer_than_63_characters() {
        let value = format!("{}.example.com", "a".repeat(64));
        assert!(!is_valid_dns_name(&value));
    }

    #[rstest]
    fn accepts_63_character_labels() {
        let value = format!("{}.example.com", "a".repeat(63));
        assert!(is_valid_dns_name(&value));
    }

    #[rstest]
    fn rejects_names_longer_than_253_characters() {
        let label = "a".repeat(63);
        let value = format!("{label}.{label}.{label}.{label}.com");
        assert!(value.len() > 253);
        assert!(!is_valid_dns_name(&value));
    }
}
