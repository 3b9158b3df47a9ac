//! Server construction and middleware wiring.

mod config;
mod seed;
mod state_builders;

pub use config::{ProviderChoice, ServerConfig};
pub use seed::seed_parent_domains;

use state_builders::{build_http_state, build_provider};

use actix_session::{
    config::{CookieContentSecurity, PersistentSession},
    storage::CookieSessionStore,
    SessionMiddleware,
};
use actix_web::cookie::{Key, SameSite};
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{web, App, HttpServer};

#[cfg(debug_assertions)]
use backend::doc::ApiDoc;
use backend::inbound::http::dns_records::{create_record, delete_record, list_records};
use backend::inbound::http::domains::list_domains;
use backend::inbound::http::health::{live, ready, HealthState};
use backend::inbound::http::state::HttpState;
use backend::inbound::http::subdomains::{
    check_availability, delete_subdomain, get_subdomain, list_subdomains, register_subdomain,
};
use backend::inbound::http::users::{login, register};
use backend::Trace;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

/// Failures while assembling the server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// The provider adapter could not be constructed.
    #[error("provider adapter construction failed: {0}")]
    Provider(String),
    /// Parent domain seeding failed.
    #[error("parent domain seeding failed: {0}")]
    Seed(String),
    /// Prometheus middleware construction failed.
    #[cfg(feature = "metrics")]
    #[error("metrics middleware construction failed: {0}")]
    Metrics(String),
    /// Socket binding or server start failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    key: Key,
    cookie_secure: bool,
    same_site: SameSite,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        key,
        cookie_secure,
        same_site,
    } = deps;

    let session = SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name("session".into())
        .cookie_path("/".into())
        .cookie_secure(cookie_secure)
        .cookie_http_only(true)
        .cookie_content_security(CookieContentSecurity::Private)
        .cookie_same_site(same_site)
        .session_lifecycle(
            PersistentSession::default().session_ttl(actix_web::cookie::time::Duration::hours(2)),
        )
        .build();

    // check-availability precedes the `{id}` routes so the literal segment
    // wins the match.
    let api = web::scope("")
        .wrap(session)
        .service(register)
        .service(login)
        .service(list_domains)
        .service(check_availability)
        .service(register_subdomain)
        .service(list_subdomains)
        .service(get_subdomain)
        .service(delete_subdomain)
        .service(list_records)
        .service(create_record)
        .service(delete_record);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace)
        .service(ready)
        .service(live)
        .service(api);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));
    #[cfg(not(debug_assertions))]
    let app = app;

    app
}

/// Construct an Actix HTTP server using the provided health state and
/// configuration.
///
/// # Errors
///
/// Returns [`ServerError`] when the provider adapter cannot be built or the
/// socket cannot be bound.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> Result<Server, ServerError> {
    let provider = build_provider(&config)?;
    let http_state = build_http_state(&config, provider);
    let ServerConfig {
        key,
        cookie_secure,
        same_site,
        bind_addr,
        db_pool: _,
        provider: _,
        provider_timeout: _,
    } = config;

    #[cfg(feature = "metrics")]
    let metrics = actix_web_prom::PrometheusMetricsBuilder::new("backend")
        .endpoint("/metrics")
        .build()
        .map_err(|err| ServerError::Metrics(err.to_string()))?;

    let server = HttpServer::new(move || {
        let app = build_app(AppDependencies {
            health_state: health_state.clone(),
            http_state: http_state.clone(),
            key: key.clone(),
            cookie_secure,
            same_site,
        });

        #[cfg(feature = "metrics")]
        let app = app.wrap(metrics.clone());

        app
    })
    .bind(bind_addr)?
    .run();

    Ok(server)
}
