//! Public parent domain catalogue handler.
//!
//! ```text
//! GET /domains
//! ```

use actix_web::{get, web};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::ParentDomain;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

/// Public view of a registrable zone.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DomainResponse {
    /// Zone identifier.
    pub id: String,
    /// Registrable name.
    pub domain_name: String,
    /// Opaque provider zone handle.
    pub zone_id: String,
    /// Whether registrations are open.
    pub is_active: bool,
    /// Creation timestamp, RFC 3339.
    pub created_at: String,
}

impl From<ParentDomain> for DomainResponse {
    fn from(value: ParentDomain) -> Self {
        Self {
            id: value.id.to_string(),
            domain_name: value.domain_name.to_string(),
            zone_id: value.zone_id.to_string(),
            is_active: value.is_active,
            created_at: value.created_at.to_rfc3339(),
        }
    }
}

/// Envelope for the zone catalogue.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DomainsResponse {
    /// Active zones.
    pub domains: Vec<DomainResponse>,
}

/// List parent domains open for registration. Public, no session required.
#[utoipa::path(
    get,
    path = "/domains",
    responses(
        (status = 200, description = "Active parent domains", body = DomainsResponse),
        (status = 500, description = "Internal server error", body = ErrorSchema),
    ),
    tags = ["domains"],
    operation_id = "listDomains",
    security([])
)]
#[get("/domains")]
pub async fn list_domains(state: web::Data<HttpState>) -> ApiResult<web::Json<DomainsResponse>> {
    let domains = state.domains.list_active().await?;
    Ok(web::Json(DomainsResponse {
        domains: domains.into_iter().map(DomainResponse::from).collect(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test as actix_test, App};
    use serde_json::Value;

    #[actix_web::test]
    async fn list_domains_is_public_and_returns_the_catalogue() {
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(HttpState::fixtures()))
                .service(list_domains),
        )
        .await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri("/domains").to_request(),
        )
        .await;
        assert_eq!(response.status(), actix_web::http::StatusCode::OK);
        let body: Value = actix_test::read_body_json(response).await;
        let domains = body
            .get("domains")
            .and_then(Value::as_array)
            .expect("domains array");
        assert_eq!(domains.len(), 1);
        assert_eq!(
            domains[0].get("domainName").and_then(Value::as_str),
            Some("example.com")
        );
    }
}
