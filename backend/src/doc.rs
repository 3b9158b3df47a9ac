//! OpenAPI documentation configuration.
//!
//! Defines the [`ApiDoc`] struct generating the OpenAPI specification for the
//! REST API: all HTTP endpoints from the inbound layer, the schema wrappers
//! that keep domain types free of utoipa derives, and the session cookie
//! security scheme. Swagger UI serves the document in debug builds.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Subhost backend API",
        description = "Subdomain registration and DNS record management."
    ),
    paths(
        crate::inbound::http::users::register,
        crate::inbound::http::users::login,
        crate::inbound::http::domains::list_domains,
        crate::inbound::http::subdomains::register_subdomain,
        crate::inbound::http::subdomains::list_subdomains,
        crate::inbound::http::subdomains::check_availability,
        crate::inbound::http::subdomains::get_subdomain,
        crate::inbound::http::subdomains::delete_subdomain,
        crate::inbound::http::dns_records::list_records,
        crate::inbound::http::dns_records::create_record,
        crate::inbound::http::dns_records::delete_record,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        crate::inbound::http::users::RegisterRequest,
        crate::inbound::http::users::LoginRequest,
        crate::inbound::http::users::UserResponse,
        crate::inbound::http::users::RegisterResponse,
        crate::inbound::http::domains::DomainResponse,
        crate::inbound::http::domains::DomainsResponse,
        crate::inbound::http::subdomains::RegisterSubdomainBody,
        crate::inbound::http::subdomains::SubdomainResponse,
        crate::inbound::http::subdomains::SubdomainWithDomainResponse,
        crate::inbound::http::subdomains::RegisterSubdomainResponse,
        crate::inbound::http::subdomains::SubdomainsResponse,
        crate::inbound::http::subdomains::SubdomainDetailResponse,
        crate::inbound::http::subdomains::AvailabilityResponse,
        crate::inbound::http::dns_records::CreateRecordBody,
        crate::inbound::http::dns_records::RecordResponse,
        crate::inbound::http::dns_records::RecordsResponse,
        crate::inbound::http::dns_records::CreateRecordResponse,
    )),
    tags(
        (name = "users", description = "Account registration and login"),
        (name = "domains", description = "Registrable parent domains"),
        (name = "subdomains", description = "Subdomain registration"),
        (name = "dns-records", description = "DNS record management"),
        (name = "health", description = "Probes"),
    )
)]
pub struct ApiDoc;
