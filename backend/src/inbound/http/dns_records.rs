//! DNS record handlers.
//!
//! ```text
//! GET    /dns-records?subdomainId=...
//! POST   /dns-records
//! DELETE /dns-records/{id}
//! ```

use std::str::FromStr;

use actix_web::{delete, get, post, web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::ports::CreateRecordRequest;
use crate::domain::{DnsRecord, Error, RecordDraft, RecordType, UserId};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    field_error, missing_field_error, missing_param_error, parse_uuid,
};
use crate::inbound::http::ApiResult;

/// Request payload for record creation.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateRecordBody {
    /// Target subdomain identifier.
    pub subdomain_id: Option<String>,
    /// Record type: `A`, `CNAME`, or `MX`.
    pub record_type: Option<String>,
    /// Record value.
    pub record_value: Option<String>,
    /// Mail-exchange priority, MX only.
    pub priority: Option<i64>,
    /// Time-to-live in seconds.
    pub ttl: Option<i64>,
}

/// Public view of a stored record.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecordResponse {
    /// Record identifier.
    pub id: String,
    /// Owning subdomain identifier.
    pub subdomain_id: String,
    /// Record type.
    pub record_type: String,
    /// Record value.
    pub record_value: String,
    /// Mail-exchange priority, MX only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<u16>,
    /// Time-to-live in seconds.
    pub ttl: u32,
    /// Creation timestamp, RFC 3339.
    pub created_at: String,
    /// Last modification timestamp, RFC 3339.
    pub updated_at: String,
}

impl From<DnsRecord> for RecordResponse {
    fn from(value: DnsRecord) -> Self {
        Self {
            id: value.id.to_string(),
            subdomain_id: value.subdomain_id.to_string(),
            record_type: value.record_type.to_string(),
            record_value: value.value,
            priority: value.priority,
            ttl: value.ttl,
            created_at: value.created_at.to_rfc3339(),
            updated_at: value.updated_at.to_rfc3339(),
        }
    }
}

/// Envelope for a record listing.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecordsResponse {
    /// Records for the requested subdomain.
    pub records: Vec<RecordResponse>,
}

/// Envelope for successful creation.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateRecordResponse {
    /// Human-readable confirmation.
    pub message: String,
    /// The stored record.
    pub record: RecordResponse,
}

/// Query parameters for the record listing.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListRecordsParams {
    /// Subdomain to list records for.
    pub subdomain_id: Option<String>,
}

fn parse_create_body(user_id: UserId, body: CreateRecordBody) -> Result<CreateRecordRequest, Error> {
    let subdomain_id = body
        .subdomain_id
        .ok_or_else(|| missing_field_error("subdomainId"))?;
    let record_type = body
        .record_type
        .ok_or_else(|| missing_field_error("recordType"))?;
    let record_value = body
        .record_value
        .ok_or_else(|| missing_field_error("recordValue"))?;
    let ttl = body.ttl.ok_or_else(|| missing_field_error("ttl"))?;

    let subdomain_id = parse_uuid(&subdomain_id, "subdomainId")?;
    let record_type = RecordType::from_str(&record_type).map_err(|err| {
        field_error(
            "recordType",
            "unknown_record_type",
            format!("{err}; expected A, CNAME, or MX"),
        )
    })?;

    Ok(CreateRecordRequest {
        user_id,
        subdomain_id,
        draft: RecordDraft {
            record_type,
            value: record_value,
            priority: body.priority,
            ttl,
        },
    })
}

/// List records for an owned subdomain.
#[utoipa::path(
    get,
    path = "/dns-records",
    params(
        ("subdomainId" = Option<String>, Query, description = "Subdomain identifier"),
    ),
    responses(
        (status = 200, description = "Records for the subdomain", body = RecordsResponse),
        (status = 400, description = "Missing parameter", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Subdomain not found", body = ErrorSchema),
    ),
    tags = ["dns-records"],
    operation_id = "listDnsRecords"
)]
#[get("/dns-records")]
pub async fn list_records(
    state: web::Data<HttpState>,
    session: SessionContext,
    params: web::Query<ListRecordsParams>,
) -> ApiResult<web::Json<RecordsResponse>> {
    let user_id = session.require_user_id()?;
    let subdomain_id = params
        .into_inner()
        .subdomain_id
        .ok_or_else(|| missing_param_error("subdomainId"))?;
    let subdomain_id = parse_uuid(&subdomain_id, "subdomainId")?;

    let records = state.records_query.list(&user_id, subdomain_id).await?;
    Ok(web::Json(RecordsResponse {
        records: records.into_iter().map(RecordResponse::from).collect(),
    }))
}

/// Create a DNS record: resolve ownership, validate, provision remotely,
/// persist.
#[utoipa::path(
    post,
    path = "/dns-records",
    request_body = CreateRecordBody,
    responses(
        (status = 201, description = "Record created", body = CreateRecordResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Subdomain not found", body = ErrorSchema),
        (status = 500, description = "Provider failure", body = ErrorSchema),
    ),
    tags = ["dns-records"],
    operation_id = "createDnsRecord"
)]
#[post("/dns-records")]
pub async fn create_record(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateRecordBody>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let request = parse_create_body(user_id, payload.into_inner())?;
    let record = state.records.create(request).await?;
    Ok(HttpResponse::Created().json(CreateRecordResponse {
        message: "DNS record created successfully".to_owned(),
        record: RecordResponse::from(record),
    }))
}

/// Delete an owned record; remote deprovisioning precedes local removal.
#[utoipa::path(
    delete,
    path = "/dns-records/{id}",
    params(("id" = String, Path, description = "Record identifier")),
    responses(
        (status = 200, description = "Record deleted"),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Record not found", body = ErrorSchema),
        (status = 500, description = "Provider failure", body = ErrorSchema),
    ),
    tags = ["dns-records"],
    operation_id = "deleteDnsRecord"
)]
#[delete("/dns-records/{id}")]
pub async fn delete_record(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let record_id = Uuid::parse_str(&path.into_inner())
        .map_err(|_| Error::not_found("DNS record not found"))?;
    state.records.delete(&user_id, record_id).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "DNS record deleted successfully",
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;
    use serde_json::Value;

    fn body(record_type: &str, value: &str, priority: Option<i64>, ttl: Option<i64>) -> CreateRecordBody {
        CreateRecordBody {
            subdomain_id: Some(Uuid::new_v4().to_string()),
            record_type: Some(record_type.to_owned()),
            record_value: Some(value.to_owned()),
            priority,
            ttl,
        }
    }

    #[rstest]
    fn parse_create_body_accepts_an_mx_draft() {
        let request =
            parse_create_body(UserId::random(), body("MX", "mail.example.com", Some(10), Some(3600)))
                .expect("valid body");
        assert_eq!(request.draft.record_type, RecordType::Mx);
        assert_eq!(request.draft.priority, Some(10));
    }

    #[rstest]
    fn parse_create_body_rejects_unknown_types() {
        let err = parse_create_body(UserId::random(), body("TXT", "hello", None, Some(3600)))
            .expect_err("unsupported type");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        let details = err.details().and_then(Value::as_object).expect("details");
        assert_eq!(
            details.get("field").and_then(Value::as_str),
            Some("recordType")
        );
    }

    #[rstest]
    fn parse_create_body_requires_ttl() {
        let err = parse_create_body(UserId::random(), body("A", "1.2.3.4", None, None))
            .expect_err("ttl required");
        let details = err.details().and_then(Value::as_object).expect("details");
        assert_eq!(details.get("field").and_then(Value::as_str), Some("ttl"));
    }

    #[rstest]
    fn parse_create_body_passes_range_checks_to_domain_validation() {
        // Shape parsing succeeds; range enforcement belongs to the domain.
        let request = parse_create_body(UserId::random(), body("A", "1.2.3.4", None, Some(5)))
            .expect("shape is fine");
        assert_eq!(request.draft.ttl, 5);
    }
}
