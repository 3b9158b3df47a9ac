//! HTTP surface coverage over in-memory wiring.
//!
//! Boots the real handlers with the real domain services, in-memory
//! repositories, and the scripted provider, then drives the documented
//! endpoints through the Actix test harness, session cookie included.

use std::sync::Arc;

use actix_session::storage::CookieSessionStore;
use actix_session::SessionMiddleware;
use actix_web::cookie::{Cookie, Key};
use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use serde_json::{json, Value};
use uuid::Uuid;

use backend::domain::ports::{DnsProviderError, NewParentDomain};
use backend::domain::{
    AccountService, DomainName, RecordService, SubdomainService, ZoneId,
};
use backend::domain::ports::FixturePasswordHasher;
use backend::inbound::http::dns_records::{create_record, delete_record, list_records};
use backend::inbound::http::domains::list_domains;
use backend::inbound::http::state::HttpState;
use backend::inbound::http::subdomains::{
    check_availability, delete_subdomain, get_subdomain, list_subdomains, register_subdomain,
};
use backend::inbound::http::users::{login, register};
use backend::test_support::{
    InMemoryDnsRecordRepository, InMemoryParentDomainRepository, InMemoryStore,
    InMemorySubdomainRepository, InMemoryUserRepository, ScriptedDnsProvider,
};

struct TestBackend {
    store: Arc<InMemoryStore>,
    provider: Arc<ScriptedDnsProvider>,
    state: HttpState,
}

fn test_backend() -> TestBackend {
    let store = InMemoryStore::new();
    let provider = ScriptedDnsProvider::new();

    let users = Arc::new(InMemoryUserRepository::new(store.clone()));
    let domains = Arc::new(InMemoryParentDomainRepository::new(store.clone()));
    let subdomain_repo = Arc::new(InMemorySubdomainRepository::new(store.clone()));
    let record_repo = Arc::new(InMemoryDnsRecordRepository::new(store.clone()));

    let accounts = Arc::new(AccountService::new(users, Arc::new(FixturePasswordHasher)));
    let subdomain_service = Arc::new(SubdomainService::new(
        subdomain_repo.clone(),
        domains,
        record_repo.clone(),
        provider.clone(),
    ));
    let record_service = Arc::new(RecordService::new(
        record_repo,
        subdomain_repo,
        provider.clone(),
    ));

    TestBackend {
        state: HttpState {
            login: accounts.clone(),
            accounts,
            subdomains: subdomain_service.clone(),
            subdomains_query: subdomain_service.clone(),
            records: record_service.clone(),
            records_query: record_service,
            domains: subdomain_service,
        },
        store,
        provider,
    }
}

fn seed_zone(store: &InMemoryStore, name: &str, zone: &str) -> Uuid {
    store.add_parent_domain(NewParentDomain {
        domain_name: DomainName::new(name).expect("valid seed domain"),
        zone_id: ZoneId::new(zone).expect("valid seed zone"),
        is_active: true,
    })
}

macro_rules! test_app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($state))
                .wrap(
                    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
                        .cookie_name("session".into())
                        .cookie_secure(false)
                        .build(),
                )
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
                .service(delete_record),
        )
        .await
    };
}

async fn register_and_login<S, B>(app: &S) -> Cookie<'static>
where
    S: actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse<B>,
        Error = actix_web::Error,
    >,
    B: actix_web::body::MessageBody,
{
    let response = test::call_service(
        app,
        test::TestRequest::post()
            .uri("/register")
            .set_json(json!({
                "email": "user@example.com",
                "password": "password123",
            }))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = test::call_service(
        app,
        test::TestRequest::post()
            .uri("/login")
            .set_json(json!({
                "email": "user@example.com",
                "password": "password123",
            }))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie set")
        .into_owned()
}

#[actix_web::test]
async fn documented_happy_path_through_the_http_surface() {
    let backend = test_backend();
    let domain_id = seed_zone(&backend.store, "example.com", "Z1234567890ABC");
    let app = test_app!(backend.state.clone());
    let session = register_and_login(&app).await;

    // The public catalogue lists the seeded zone.
    let response = test::call_service(
        &app,
        test::TestRequest::get().uri("/domains").to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = test::read_body_json(response).await;
    assert_eq!(
        body.pointer("/domains/0/domainName").and_then(Value::as_str),
        Some("example.com")
    );

    // Advisory check says `foo` is free.
    let response = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!(
                "/subdomains/check-availability?name=foo&domainId={domain_id}"
            ))
            .to_request(),
    )
    .await;
    let body: Value = test::read_body_json(response).await;
    assert_eq!(body.get("available").and_then(Value::as_bool), Some(true));

    // Register `foo.example.com`.
    let response = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/subdomains")
            .cookie(session.clone())
            .set_json(json!({
                "subdomainName": "foo",
                "domainId": domain_id.to_string(),
            }))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(response).await;
    assert_eq!(
        body.pointer("/subdomain/fullDomain").and_then(Value::as_str),
        Some("foo.example.com")
    );
    let subdomain_id = body
        .pointer("/subdomain/id")
        .and_then(Value::as_str)
        .expect("subdomain id")
        .to_owned();

    // Add the MX record from the documented scenario.
    let response = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/dns-records")
            .cookie(session.clone())
            .set_json(json!({
                "subdomainId": subdomain_id,
                "recordType": "MX",
                "recordValue": "mail.example.com",
                "priority": 10,
                "ttl": 3600,
            }))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(response).await;
    assert_eq!(
        body.pointer("/record/recordType").and_then(Value::as_str),
        Some("MX")
    );
    assert_eq!(
        body.pointer("/record/priority").and_then(Value::as_i64),
        Some(10)
    );

    // The record shows up in the listing.
    let response = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/dns-records?subdomainId={subdomain_id}"))
            .cookie(session.clone())
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = test::read_body_json(response).await;
    assert_eq!(
        body.get("records").and_then(Value::as_array).map(Vec::len),
        Some(1)
    );

    // A second `foo` under the same parent conflicts.
    let response = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/subdomains")
            .cookie(session.clone())
            .set_json(json!({
                "subdomainName": "foo",
                "domainId": domain_id.to_string(),
            }))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body: Value = test::read_body_json(response).await;
    assert_eq!(body.get("code").and_then(Value::as_str), Some("conflict"));

    // Deleting the subdomain cascades away its records.
    let response = test::call_service(
        &app,
        test::TestRequest::delete()
            .uri(&format!("/subdomains/{subdomain_id}"))
            .cookie(session.clone())
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(backend.store.subdomain_count(), 0);
    assert_eq!(backend.store.record_count(), 0);
}

#[actix_web::test]
async fn authenticated_endpoints_reject_anonymous_callers() {
    let backend = test_backend();
    let app = test_app!(backend.state.clone());

    for (method, uri) in [
        ("GET", "/subdomains"),
        ("POST", "/subdomains"),
        ("GET", "/dns-records?subdomainId=00000000-0000-0000-0000-000000000000"),
        ("POST", "/dns-records"),
    ] {
        let request = match method {
            "GET" => test::TestRequest::get().uri(uri),
            "POST" => test::TestRequest::post().uri(uri).set_json(json!({})),
            _ => unreachable!(),
        }
        .to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(
            response.status(),
            StatusCode::UNAUTHORIZED,
            "{method} {uri} should require a session"
        );
    }
}

#[actix_web::test]
async fn invalid_record_payload_names_the_offending_field() {
    let backend = test_backend();
    let domain_id = seed_zone(&backend.store, "example.com", "Z1234567890ABC");
    let app = test_app!(backend.state.clone());
    let session = register_and_login(&app).await;

    let response = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/subdomains")
            .cookie(session.clone())
            .set_json(json!({
                "subdomainName": "foo",
                "domainId": domain_id.to_string(),
            }))
            .to_request(),
    )
    .await;
    let body: Value = test::read_body_json(response).await;
    let subdomain_id = body
        .pointer("/subdomain/id")
        .and_then(Value::as_str)
        .expect("subdomain id")
        .to_owned();

    let response = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/dns-records")
            .cookie(session.clone())
            .set_json(json!({
                "subdomainId": subdomain_id,
                "recordType": "A",
                "recordValue": "256.1.1.1",
                "ttl": 3600,
            }))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(response).await;
    assert_eq!(
        body.pointer("/details/field").and_then(Value::as_str),
        Some("recordValue")
    );
    assert_eq!(backend.store.record_count(), 0);
}

#[actix_web::test]
async fn provider_failure_surfaces_as_500_with_no_local_write() {
    let backend = test_backend();
    let domain_id = seed_zone(&backend.store, "example.com", "Z1234567890ABC");
    let app = test_app!(backend.state.clone());
    let session = register_and_login(&app).await;

    let response = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/subdomains")
            .cookie(session.clone())
            .set_json(json!({
                "subdomainName": "foo",
                "domainId": domain_id.to_string(),
            }))
            .to_request(),
    )
    .await;
    let body: Value = test::read_body_json(response).await;
    let subdomain_id = body
        .pointer("/subdomain/id")
        .and_then(Value::as_str)
        .expect("subdomain id")
        .to_owned();

    backend
        .provider
        .fail_with(DnsProviderError::rejected("zone is locked"));
    let response = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/dns-records")
            .cookie(session.clone())
            .set_json(json!({
                "subdomainId": subdomain_id,
                "recordType": "A",
                "recordValue": "192.168.1.1",
                "ttl": 3600,
            }))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = test::read_body_json(response).await;
    assert_eq!(
        body.get("code").and_then(Value::as_str),
        Some("provider_failure")
    );
    assert_eq!(backend.store.record_count(), 0);
}
