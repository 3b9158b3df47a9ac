//! Reqwest-backed zone-management API adapter.
//!
//! This adapter owns transport details only: request serialisation, timeout
//! and HTTP error mapping, and JSON decoding into domain change envelopes.
//! The remote contract is a small REST surface:
//!
//! ```text
//! POST   {base}/zones/{zoneId}/records                -> change envelope
//! PUT    {base}/zones/{zoneId}/records/{recordId}     -> change envelope
//! DELETE {base}/zones/{zoneId}/records/{recordId}     -> change envelope
//! GET    {base}/changes/{changeId}                    -> change envelope
//! ```

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, StatusCode, Url};

use super::dto::{ChangeDto, RecordPayloadDto};
use crate::domain::ports::{
    ChangeId, DnsProvider, DnsProviderError, ProviderChange, ProviderRecordDeletion,
    ProviderRecordRequest, ProviderRecordUpdate,
};

/// Zone API adapter performing HTTP requests against one endpoint.
pub struct HttpDnsProvider {
    client: Client,
    base: Url,
}

impl HttpDnsProvider {
    /// Build an adapter using a reqwest client with an explicit request
    /// timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(base: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base })
    }

    fn endpoint(&self, path: &str) -> Result<Url, DnsProviderError> {
        let raw = format!("{}/{path}", self.base.as_str().trim_end_matches('/'));
        Url::parse(&raw)
            .map_err(|err| DnsProviderError::transport(format!("invalid endpoint url: {err}")))
    }

    async fn send_for_change(
        &self,
        method: Method,
        url: Url,
        body: Option<&RecordPayloadDto<'_>>,
    ) -> Result<ProviderChange, DnsProviderError> {
        let mut request = self
            .client
            .request(method, url)
            .header(reqwest::header::ACCEPT, "application/json");
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(map_transport_error)?;
        let status = response.status();
        let bytes = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, bytes.as_ref()));
        }

        let dto: ChangeDto = serde_json::from_slice(bytes.as_ref()).map_err(|err| {
            DnsProviderError::transport(format!("invalid change envelope: {err}"))
        })?;
        dto.into_domain().map_err(DnsProviderError::transport)
    }
}

fn map_transport_error(error: reqwest::Error) -> DnsProviderError {
    if error.is_timeout() {
        DnsProviderError::timeout(error.to_string())
    } else {
        DnsProviderError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> DnsProviderError {
    let preview = body_preview(body);
    let message = if preview.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {}", status.as_u16(), preview)
    };

    match status {
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            DnsProviderError::timeout(message)
        }
        _ if status.is_client_error() => DnsProviderError::rejected(message),
        _ => DnsProviderError::transport(message),
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}

#[async_trait]
impl DnsProvider for HttpDnsProvider {
    async fn create_record(
        &self,
        request: &ProviderRecordRequest,
    ) -> Result<ProviderChange, DnsProviderError> {
        let url = self.endpoint(&format!("zones/{}/records", request.zone_id))?;
        let payload = RecordPayloadDto::new(&request.name, &request.record);
        self.send_for_change(Method::POST, url, Some(&payload)).await
    }

    async fn update_record(
        &self,
        update: &ProviderRecordUpdate,
    ) -> Result<ProviderChange, DnsProviderError> {
        let url = self.endpoint(&format!(
            "zones/{}/records/{}",
            update.request.zone_id, update.record_id
        ))?;
        let payload = RecordPayloadDto::new(&update.request.name, &update.request.record);
        self.send_for_change(Method::PUT, url, Some(&payload)).await
    }

    async fn delete_record(
        &self,
        deletion: &ProviderRecordDeletion,
    ) -> Result<ProviderChange, DnsProviderError> {
        let url = self.endpoint(&format!(
            "zones/{}/records/{}",
            deletion.zone_id, deletion.record_id
        ))?;
        self.send_for_change(Method::DELETE, url, None).await
    }

    async fn change_status(
        &self,
        change_id: &ChangeId,
    ) -> Result<ProviderChange, DnsProviderError> {
        let url = self.endpoint(&format!("changes/{change_id}"))?;
        self.send_for_change(Method::GET, url, None).await
    }
}
