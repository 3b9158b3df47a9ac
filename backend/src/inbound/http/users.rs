//! Account registration and login handlers.
//!
//! ```text
//! POST /register {"email":"user@example.com","password":"..."}
//! POST /login    {"email":"user@example.com","password":"..."}
//! ```

use actix_web::{post, web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::RegisterAccountRequest;
use crate::domain::{
    EmailAddress, Error, LoginCredentials, LoginValidationError, Password, User,
    UserValidationError,
};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{field_error, missing_field_error};
use crate::inbound::http::ApiResult;

/// Request payload for account registration.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    /// Address to register.
    pub email: Option<String>,
    /// Plaintext password.
    pub password: Option<String>,
}

/// Request payload for login.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    /// Account address.
    pub email: String,
    /// Account password.
    pub password: String,
}

/// Public view of an account.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    /// Account identifier.
    pub id: String,
    /// Account address.
    pub email: String,
}

impl From<User> for UserResponse {
    fn from(value: User) -> Self {
        Self {
            id: value.id.to_string(),
            email: value.email.to_string(),
        }
    }
}

/// Envelope for successful registration.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    /// Human-readable confirmation.
    pub message: String,
    /// The created account.
    pub user: UserResponse,
}

fn map_user_validation_error(field: &str, err: &UserValidationError) -> Error {
    let code = match err {
        UserValidationError::EmptyEmail => "missing_field",
        UserValidationError::InvalidEmail => "invalid_email",
        UserValidationError::EmailTooLong { .. } => "email_too_long",
        UserValidationError::PasswordTooShort { .. } => "password_too_short",
    };
    field_error(field, code, err.to_string())
}

fn parse_register_request(payload: RegisterRequest) -> Result<RegisterAccountRequest, Error> {
    let email = payload.email.ok_or_else(|| missing_field_error("email"))?;
    let password = payload
        .password
        .ok_or_else(|| missing_field_error("password"))?;

    let email =
        EmailAddress::new(&email).map_err(|err| map_user_validation_error("email", &err))?;
    let password =
        Password::new(password).map_err(|err| map_user_validation_error("password", &err))?;

    Ok(RegisterAccountRequest { email, password })
}

/// Create a user account.
#[utoipa::path(
    post,
    path = "/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = RegisterResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 409, description = "Email already registered", body = ErrorSchema),
    ),
    tags = ["users"],
    operation_id = "registerUser",
    security([])
)]
#[post("/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let request = parse_register_request(payload.into_inner())?;
    let user = state.accounts.register(request).await?;
    Ok(HttpResponse::Created().json(RegisterResponse {
        message: "User registered successfully".to_owned(),
        user: UserResponse::from(user),
    }))
}

fn map_login_validation_error(err: &LoginValidationError) -> Error {
    match err {
        LoginValidationError::InvalidEmail => {
            field_error("email", "invalid_email", err.to_string())
        }
        LoginValidationError::EmptyPassword => {
            field_error("password", "empty_password", err.to_string())
        }
    }
}

/// Authenticate a user and establish a session.
#[utoipa::path(
    post,
    path = "/login",
    request_body = LoginRequest,
    responses(
        (
            status = 200,
            description = "Login success",
            headers(("Set-Cookie" = String, description = "Session cookie"))
        ),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Invalid credentials", body = ErrorSchema),
    ),
    tags = ["users"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let credentials = LoginCredentials::try_from_parts(&payload.email, &payload.password)
        .map_err(|err| map_login_validation_error(&err))?;
    let user_id = state.login.authenticate(&credentials).await?;
    session.persist_user(&user_id)?;
    Ok(HttpResponse::Ok().finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
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
            .service(register)
            .service(login)
    }

    #[rstest]
    fn parse_register_request_requires_both_fields() {
        let err = parse_register_request(RegisterRequest {
            email: Some("user@example.com".to_owned()),
            password: None,
        })
        .expect_err("missing password");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        let details = err.details().and_then(Value::as_object).expect("details");
        assert_eq!(
            details.get("field").and_then(Value::as_str),
            Some("password")
        );
    }

    #[rstest]
    #[case("bad-email", "password123", "email")]
    #[case("user@example.com", "short", "password")]
    fn parse_register_request_names_the_bad_field(
        #[case] email: &str,
        #[case] password: &str,
        #[case] expected_field: &str,
    ) {
        let err = parse_register_request(RegisterRequest {
            email: Some(email.to_owned()),
            password: Some(password.to_owned()),
        })
        .expect_err("invalid field");
        let details = err.details().and_then(Value::as_object).expect("details");
        assert_eq!(
            details.get("field").and_then(Value::as_str),
            Some(expected_field)
        );
    }

    #[actix_web::test]
    async fn register_returns_created_with_user_payload() {
        let app = actix_test::init_service(test_app()).await;
        let request = actix_test::TestRequest::post()
            .uri("/register")
            .set_json(&RegisterRequest {
                email: Some("user@example.com".to_owned()),
                password: Some("password123".to_owned()),
            })
            .to_request();

        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(
            body.pointer("/user/email").and_then(Value::as_str),
            Some("user@example.com")
        );
    }

    #[actix_web::test]
    async fn login_sets_a_session_cookie_on_success() {
        let app = actix_test::init_service(test_app()).await;
        let request = actix_test::TestRequest::post()
            .uri("/login")
            .set_json(&LoginRequest {
                email: "user@example.com".to_owned(),
                password: "password123".to_owned(),
            })
            .to_request();

        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response
            .response()
            .cookies()
            .any(|cookie| cookie.name() == "session"));
    }

    #[actix_web::test]
    async fn login_with_wrong_password_is_unauthorised() {
        let app = actix_test::init_service(test_app()).await;
        let request = actix_test::TestRequest::post()
            .uri("/login")
            .set_json(&LoginRequest {
                email: "user@example.com".to_owned(),
                password: "wrong".to_owned(),
            })
            .to_request();

        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
