//! Wire types for the zone-management REST API.
//!
//! Decoding into domain types happens here so the transport adapter only
//! deals with bytes and statuses.

use serde::{Deserialize, Serialize};

use crate::domain::ports::{ChangeId, ChangeStatus, ProviderChange};
use crate::domain::records::RecordSpec;

/// Outbound record payload.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct RecordPayloadDto<'a> {
    /// Fully qualified record name.
    pub name: &'a str,
    /// Wire form of the record type.
    #[serde(rename = "type")]
    pub record_type: &'a str,
    /// Record value.
    pub value: &'a str,
    /// Time-to-live in seconds.
    pub ttl: u32,
    /// Mail-exchange priority, MX only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<u16>,
}

impl<'a> RecordPayloadDto<'a> {
    pub(super) fn new(name: &'a str, record: &'a RecordSpec) -> Self {
        Self {
            name,
            record_type: record.record_type.as_str(),
            value: &record.value,
            ttl: record.ttl,
            priority: record.priority,
        }
    }
}

/// Inbound change envelope.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ChangeDto {
    change_id: String,
    status: String,
}

impl ChangeDto {
    /// Convert the wire envelope into the domain change, rejecting unknown
    /// states.
    pub(super) fn into_domain(self) -> Result<ProviderChange, String> {
        let status = match self.status.as_str() {
            "PENDING" => ChangeStatus::Pending,
            "INSYNC" => ChangeStatus::InSync,
            other => return Err(format!("unknown change status: {other}")),
        };
        Ok(ProviderChange {
            change_id: ChangeId::new(self.change_id),
            status,
        })
    }
}
