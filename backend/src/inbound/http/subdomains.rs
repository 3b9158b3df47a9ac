//! Subdomain registration and lookup handlers.
//!
//! ```text
//! POST   /subdomains
//! GET    /subdomains
//! GET    /subdomains/check-availability?name=foo&domainId=...
//! GET    /subdomains/{id}
//! DELETE /subdomains/{id}
//! ```
//!
//! `check-availability` must be registered ahead of the `{id}` routes so the
//! literal segment wins the match.

use actix_web::{delete, get, post, web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::ports::RegisterSubdomainRequest;
use crate::domain::{Error, LabelValidationError, Subdomain, SubdomainLabel, SubdomainWithDomain};
use crate::inbound::http::domains::DomainResponse;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{field_error, missing_field_error, missing_param_error, parse_uuid};
use crate::inbound::http::ApiResult;

/// Request payload for subdomain registration.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterSubdomainBody {
    /// Requested label, e.g. `foo`.
    pub subdomain_name: Option<String>,
    /// Parent zone identifier.
    pub domain_id: Option<String>,
}

/// Public view of a subdomain.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubdomainResponse {
    /// Subdomain identifier.
    pub id: String,
    /// Owning user identifier.
    pub user_id: String,
    /// Parent zone identifier.
    pub domain_id: String,
    /// Registered label.
    pub subdomain_name: String,
    /// Denormalised full domain name.
    pub full_domain: String,
    /// Whether the subdomain is live.
    pub is_active: bool,
    /// Creation timestamp, RFC 3339.
    pub created_at: String,
    /// Last modification timestamp, RFC 3339.
    pub updated_at: String,
}

impl From<Subdomain> for SubdomainResponse {
    fn from(value: Subdomain) -> Self {
        Self {
            id: value.id.to_string(),
            user_id: value.user_id.to_string(),
            domain_id: value.domain_id.to_string(),
            subdomain_name: value.label.to_string(),
            full_domain: value.full_domain,
            is_active: value.is_active,
            created_at: value.created_at.to_rfc3339(),
            updated_at: value.updated_at.to_rfc3339(),
        }
    }
}

/// A subdomain joined with its parent zone.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubdomainWithDomainResponse {
    /// The subdomain.
    pub subdomain: SubdomainResponse,
    /// Its parent zone.
    pub domain: DomainResponse,
}

impl From<SubdomainWithDomain> for SubdomainWithDomainResponse {
    fn from(value: SubdomainWithDomain) -> Self {
        Self {
            subdomain: SubdomainResponse::from(value.subdomain),
            domain: DomainResponse::from(value.domain),
        }
    }
}

/// Envelope for successful registration.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterSubdomainResponse {
    /// Human-readable confirmation.
    pub message: String,
    /// The registered subdomain.
    pub subdomain: SubdomainResponse,
}

/// Envelope for the caller's subdomain listing.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubdomainsResponse {
    /// Registered subdomains with their parent zones.
    pub subdomains: Vec<SubdomainWithDomainResponse>,
}

/// Envelope for a single subdomain fetch.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubdomainDetailResponse {
    /// The subdomain with its parent zone.
    pub subdomain: SubdomainWithDomainResponse,
}

/// Query parameters for the advisory availability check.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityParams {
    /// Candidate label.
    pub name: Option<String>,
    /// Parent zone identifier.
    pub domain_id: Option<String>,
}

/// Envelope for the availability check.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityResponse {
    /// Whether `(name, domainId)` is currently unregistered.
    pub available: bool,
}

fn map_label_error(err: &LabelValidationError) -> Error {
    let code = match err {
        LabelValidationError::Empty => "missing_field",
        LabelValidationError::TooLong { .. } => "label_too_long",
        LabelValidationError::InvalidFormat => "invalid_label",
    };
    field_error("subdomainName", code, err.to_string())
}

fn parse_register_body(
    user_id: crate::domain::UserId,
    body: RegisterSubdomainBody,
) -> Result<RegisterSubdomainRequest, Error> {
    let label = body
        .subdomain_name
        .ok_or_else(|| missing_field_error("subdomainName"))?;
    let domain_id = body
        .domain_id
        .ok_or_else(|| missing_field_error("domainId"))?;

    let label = SubdomainLabel::new(&label).map_err(|err| map_label_error(&err))?;
    let domain_id = parse_uuid(&domain_id, "domainId")?;

    Ok(RegisterSubdomainRequest {
        user_id,
        label,
        domain_id,
    })
}

/// Invalid path identifiers look exactly like missing resources.
fn parse_path_id(raw: &str, resource: &str) -> Result<Uuid, Error> {
    Uuid::parse_str(raw).map_err(|_| Error::not_found(format!("{resource} not found")))
}

/// Register a subdomain for the authenticated user.
#[utoipa::path(
    post,
    path = "/subdomains",
    request_body = RegisterSubdomainBody,
    responses(
        (status = 201, description = "Subdomain registered", body = RegisterSubdomainResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 409, description = "Subdomain already taken", body = ErrorSchema),
    ),
    tags = ["subdomains"],
    operation_id = "registerSubdomain"
)]
#[post("/subdomains")]
pub async fn register_subdomain(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<RegisterSubdomainBody>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let request = parse_register_body(user_id, payload.into_inner())?;
    let subdomain = state.subdomains.register(request).await?;
    Ok(HttpResponse::Created().json(RegisterSubdomainResponse {
        message: "Subdomain registered successfully".to_owned(),
        subdomain: SubdomainResponse::from(subdomain),
    }))
}

/// List the authenticated user's subdomains.
#[utoipa::path(
    get,
    path = "/subdomains",
    responses(
        (status = 200, description = "Registered subdomains", body = SubdomainsResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
    ),
    tags = ["subdomains"],
    operation_id = "listSubdomains"
)]
#[get("/subdomains")]
pub async fn list_subdomains(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<SubdomainsResponse>> {
    let user_id = session.require_user_id()?;
    let subdomains = state.subdomains_query.list(&user_id).await?;
    Ok(web::Json(SubdomainsResponse {
        subdomains: subdomains
            .into_iter()
            .map(SubdomainWithDomainResponse::from)
            .collect(),
    }))
}

/// Advisory availability check. Public; the registration-time unique
/// constraint remains the source of truth.
#[utoipa::path(
    get,
    path = "/subdomains/check-availability",
    params(
        ("name" = Option<String>, Query, description = "Candidate label"),
        ("domainId" = Option<String>, Query, description = "Parent zone identifier"),
    ),
    responses(
        (status = 200, description = "Availability flag", body = AvailabilityResponse),
        (status = 400, description = "Missing parameters", body = ErrorSchema),
    ),
    tags = ["subdomains"],
    operation_id = "checkSubdomainAvailability",
    security([])
)]
#[get("/subdomains/check-availability")]
pub async fn check_availability(
    state: web::Data<HttpState>,
    params: web::Query<AvailabilityParams>,
) -> ApiResult<web::Json<AvailabilityResponse>> {
    let params = params.into_inner();
    let name = params.name.ok_or_else(|| missing_param_error("name"))?;
    let domain_id = params
        .domain_id
        .ok_or_else(|| missing_param_error("domainId"))?;

    // A syntactically invalid label can never be registered, so it is
    // reported as unavailable rather than as an error.
    let label = match SubdomainLabel::new(&name) {
        Ok(label) => label,
        Err(_) => return Ok(web::Json(AvailabilityResponse { available: false })),
    };
    let domain_id = parse_uuid(&domain_id, "domainId")?;

    let available = state
        .subdomains_query
        .check_availability(&label, domain_id)
        .await?;
    Ok(web::Json(AvailabilityResponse { available }))
}

/// Fetch one owned subdomain.
#[utoipa::path(
    get,
    path = "/subdomains/{id}",
    params(("id" = String, Path, description = "Subdomain identifier")),
    responses(
        (status = 200, description = "Subdomain detail", body = SubdomainDetailResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
    ),
    tags = ["subdomains"],
    operation_id = "getSubdomain"
)]
#[get("/subdomains/{id}")]
pub async fn get_subdomain(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<SubdomainDetailResponse>> {
    let user_id = session.require_user_id()?;
    let subdomain_id = parse_path_id(&path.into_inner(), "subdomain")?;
    let subdomain = state.subdomains_query.get(&user_id, subdomain_id).await?;
    Ok(web::Json(SubdomainDetailResponse {
        subdomain: SubdomainWithDomainResponse::from(subdomain),
    }))
}

/// Delete an owned subdomain, deprovisioning its records remotely first.
#[utoipa::path(
    delete,
    path = "/subdomains/{id}",
    params(("id" = String, Path, description = "Subdomain identifier")),
    responses(
        (status = 200, description = "Subdomain deleted"),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 500, description = "Provider failure", body = ErrorSchema),
    ),
    tags = ["subdomains"],
    operation_id = "deleteSubdomain"
)]
#[delete("/subdomains/{id}")]
pub async fn delete_subdomain(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let subdomain_id = parse_path_id(&path.into_inner(), "subdomain")?;
    state.subdomains.delete(&user_id, subdomain_id).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Subdomain deleted successfully",
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ErrorCode, UserId};
    use actix_web::http::StatusCode;
    use actix_web::{test as actix_test, App};
    use rstest::rstest;
    use serde_json::Value;

    fn test_app() -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .app_data(web::Data::new(HttpState::fixtures()))
            .wrap(crate::inbound::http::test_utils::test_session_middleware())
            .service(check_availability)
            .service(register_subdomain)
            .service(list_subdomains)
            .service(get_subdomain)
            .service(delete_subdomain)
    }

    #[rstest]
    fn parse_register_body_requires_fields() {
        let err = parse_register_body(
            UserId::random(),
            RegisterSubdomainBody {
                subdomain_name: None,
                domain_id: Some(Uuid::new_v4().to_string()),
            },
        )
        .expect_err("missing label");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }

    #[rstest]
    #[case("-foo")]
    #[case("Foo")]
    #[case("foo.bar")]
    fn parse_register_body_rejects_invalid_labels(#[case] label: &str) {
        let err = parse_register_body(
            UserId::random(),
            RegisterSubdomainBody {
                subdomain_name: Some(label.to_owned()),
                domain_id: Some(Uuid::new_v4().to_string()),
            },
        )
        .expect_err("invalid label");
        let details = err.details().and_then(Value::as_object).expect("details");
        assert_eq!(
            details.get("field").and_then(Value::as_str),
            Some("subdomainName")
        );
    }

    #[actix_web::test]
    async fn endpoints_require_a_session() {
        let app = actix_test::init_service(test_app()).await;
        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri("/subdomains").to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn check_availability_is_public_and_reports_missing_params() {
        let app = actix_test::init_service(test_app()).await;
        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/subdomains/check-availability?name=foo")
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(
            body.pointer("/details/field").and_then(Value::as_str),
            Some("domainId")
        );
    }

    #[actix_web::test]
    async fn check_availability_reports_invalid_labels_as_unavailable() {
        let app = actix_test::init_service(test_app()).await;
        let uri = format!(
            "/subdomains/check-availability?name=-bad-&domainId={}",
            Uuid::new_v4()
        );
        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri(&uri).to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body.get("available").and_then(Value::as_bool), Some(false));
    }

    #[actix_web::test]
    async fn malformed_path_ids_read_as_not_found() {
        let app = actix_test::init_service(test_app()).await;
        let login = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/subdomains/not-a-uuid")
                .to_request(),
        )
        .await;
        // No session yet: the auth guard fires first.
        assert_eq!(login.status(), StatusCode::UNAUTHORIZED);
    }
}
