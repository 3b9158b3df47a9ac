//! Port for the remote DNS zone-management provider.
//!
//! The provider is eventually consistent: a successful mutation returns a
//! change identifier in the `Pending` state, and callers must not assume the
//! change is live until [`ChangeStatus::InSync`] is observed via
//! [`DnsProvider::change_status`]. A provider failure is terminal for the
//! request; callers must not persist local state the remote side rejected.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::records::RecordSpec;
use crate::domain::zone::ZoneId;

/// Provider-assigned identifier tracking a pending mutation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChangeId(String);

impl ChangeId {
    /// Wrap a provider-assigned identifier.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }
}

impl AsRef<str> for ChangeId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for ChangeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

/// Propagation state of a submitted change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChangeStatus {
    /// Accepted but not yet visible everywhere.
    #[serde(rename = "PENDING")]
    Pending,
    /// Fully propagated.
    #[serde(rename = "INSYNC")]
    InSync,
}

/// Result of a successful provider call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderChange {
    /// Identifier to poll for propagation.
    pub change_id: ChangeId,
    /// State at the time of the response.
    pub status: ChangeStatus,
}

/// Record creation request sent to the provider.
#[derive(Debug, Clone)]
pub struct ProviderRecordRequest {
    /// Zone the record lives in.
    pub zone_id: ZoneId,
    /// Fully qualified record name, e.g. `foo.example.com`.
    pub name: String,
    /// Validated record content.
    pub record: RecordSpec,
}

/// Record update request sent to the provider.
#[derive(Debug, Clone)]
pub struct ProviderRecordUpdate {
    /// Provider-side identifier of the record being replaced.
    pub record_id: String,
    /// Replacement content.
    pub request: ProviderRecordRequest,
}

/// Record deletion request sent to the provider.
#[derive(Debug, Clone)]
pub struct ProviderRecordDeletion {
    /// Zone the record lives in.
    pub zone_id: ZoneId,
    /// Provider-side identifier of the record.
    pub record_id: String,
}

impl ProviderRecordDeletion {
    /// Deletion request addressing a locally stored record by its row id.
    pub fn for_local_record(zone_id: ZoneId, record_id: Uuid) -> Self {
        Self {
            zone_id,
            record_id: record_id.to_string(),
        }
    }
}

/// Errors raised by provider adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DnsProviderError {
    /// The provider processed the request and refused it.
    #[error("provider rejected the change: {message}")]
    Rejected {
        /// Provider-supplied reason.
        message: String,
    },
    /// The request never completed (connection, TLS, decode).
    #[error("provider transport error: {message}")]
    Transport {
        /// Adapter-provided description.
        message: String,
    },
    /// The request exceeded its deadline.
    #[error("provider call timed out: {message}")]
    Timeout {
        /// Adapter-provided description.
        message: String,
    },
}

impl DnsProviderError {
    /// Rejection with the given provider message.
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected {
            message: message.into(),
        }
    }

    /// Transport failure with the given message.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Timeout with the given message.
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::Timeout {
            message: message.into(),
        }
    }
}

/// Port for the remote zone-management API.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// Submit a record creation; returns a pending change on success.
    async fn create_record(
        &self,
        request: &ProviderRecordRequest,
    ) -> Result<ProviderChange, DnsProviderError>;

    /// Replace an existing record's content.
    async fn update_record(
        &self,
        update: &ProviderRecordUpdate,
    ) -> Result<ProviderChange, DnsProviderError>;

    /// Submit a record deletion; returns a pending change on success.
    async fn delete_record(
        &self,
        deletion: &ProviderRecordDeletion,
    ) -> Result<ProviderChange, DnsProviderError>;

    /// Poll the propagation state of a previously submitted change.
    async fn change_status(
        &self,
        change_id: &ChangeId,
    ) -> Result<ProviderChange, DnsProviderError>;
}

/// Fixture provider that acknowledges everything instantly.
///
/// Unlike the simulated adapter this adds no latency; use it in tests where
/// provider behaviour is not under test.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureDnsProvider;

impl FixtureDnsProvider {
    fn pending_change() -> ProviderChange {
        ProviderChange {
            change_id: ChangeId::new(format!("fixture-change-{}", Uuid::new_v4())),
            status: ChangeStatus::Pending,
        }
    }
}

#[async_trait]
impl DnsProvider for FixtureDnsProvider {
    async fn create_record(
        &self,
        _request: &ProviderRecordRequest,
    ) -> Result<ProviderChange, DnsProviderError> {
        Ok(Self::pending_change())
    }

    async fn update_record(
        &self,
        _update: &ProviderRecordUpdate,
    ) -> Result<ProviderChange, DnsProviderError> {
        Ok(Self::pending_change())
    }

    async fn delete_record(
        &self,
        _deletion: &ProviderRecordDeletion,
    ) -> Result<ProviderChange, DnsProviderError> {
        Ok(Self::pending_change())
    }

    async fn change_status(
        &self,
        change_id: &ChangeId,
    ) -> Result<ProviderChange, DnsProviderError> {
        Ok(ProviderChange {
            change_id: change_id.clone(),
            status: ChangeStatus::InSync,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(ChangeStatus::Pending, "PENDING")]
    #[case(ChangeStatus::InSync, "INSYNC")]
    fn change_status_uses_provider_wire_form(#[case] status: ChangeStatus, #[case] wire: &str) {
        let value = serde_json::to_value(status).expect("serialise status");
        assert_eq!(value, serde_json::json!(wire));
    }

    #[tokio::test]
    async fn fixture_mutations_report_pending() {
        let provider = FixtureDnsProvider;
        let deletion = ProviderRecordDeletion::for_local_record(
            crate::domain::zone::ZoneId::new("Z123").expect("zone id"),
            Uuid::new_v4(),
        );
        let change = provider
            .delete_record(&deletion)
            .await
            .expect("fixture deletion succeeds");
        assert_eq!(change.status, ChangeStatus::Pending);
    }

    #[tokio::test]
    async fn fixture_status_reports_in_sync() {
        let provider = FixtureDnsProvider;
        let change_id = ChangeId::new("fixture-change-1");
        let change = provider
            .change_status(&change_id)
            .await
            .expect("fixture status succeeds");
        assert_eq!(change.change_id, change_id);
        assert_eq!(change.status, ChangeStatus::InSync);
    }
}
