//! Account registration and authentication service.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::domain::auth::LoginCredentials;
use crate::domain::error::Error;
use crate::domain::ports::{
    AccountCommand, LoginService, NewUser, PasswordHasher, PasswordHasherError,
    RegisterAccountRequest, UserRepository, UserRepositoryError,
};
use crate::domain::user::{User, UserId};

/// Account service implementing the registration and login driving ports.
#[derive(Clone)]
pub struct AccountService<U, H> {
    users: Arc<U>,
    hasher: Arc<H>,
}

impl<U, H> AccountService<U, H> {
    /// Create a new service over a user repository and a password hasher.
    pub fn new(users: Arc<U>, hasher: Arc<H>) -> Self {
        Self { users, hasher }
    }
}

impl<U, H> AccountService<U, H>
where
    U: UserRepository,
    H: PasswordHasher,
{
    fn map_repository_error(error: UserRepositoryError) -> Error {
        match error {
            UserRepositoryError::Connection { message } => {
                Error::service_unavailable(format!("user repository unavailable: {message}"))
            }
            UserRepositoryError::Query { message } => {
                Error::internal(format!("user repository error: {message}"))
            }
            UserRepositoryError::DuplicateEmail => {
                Error::conflict("a user with this email already exists")
            }
        }
    }

    fn map_hasher_error(error: PasswordHasherError) -> Error {
        let PasswordHasherError::Hashing { message } = error;
        Error::internal(format!("password hashing failed: {message}"))
    }

    /// Identical answer for unknown email and bad password.
    fn invalid_credentials() -> Error {
        Error::unauthorized("invalid email or password")
    }
}

#[async_trait]
impl<U, H> AccountCommand for AccountService<U, H>
where
    U: UserRepository,
    H: PasswordHasher,
{
    async fn register(&self, request: RegisterAccountRequest) -> Result<User, Error> {
        // The unique index is the arbiter; this early lookup only produces a
        // friendlier error for the common case.
        if self
            .users
            .find_by_email(&request.email)
            .await
            .map_err(Self::map_repository_error)?
            .is_some()
        {
            return Err(Error::conflict("a user with this email already exists"));
        }

        let password_hash = self
            .hasher
            .hash(&request.password)
            .await
            .map_err(Self::map_hasher_error)?;

        let user = self
            .users
            .insert(NewUser {
                email: request.email,
                password_hash,
            })
            .await
            .map_err(Self::map_repository_error)?;

        info!(user_id = %user.id, "account registered");
        Ok(user)
    }
}

#[async_trait]
impl<U, H> LoginService for AccountService<U, H>
where
    U: UserRepository,
    H: PasswordHasher,
{
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserId, Error> {
        let user = self
            .users
            .find_by_email(credentials.email())
            .await
            .map_err(Self::map_repository_error)?
            .ok_or_else(Self::invalid_credentials)?;

        let matches = self
            .hasher
            .verify(credentials.password(), &user.password_hash)
            .await
            .map_err(Self::map_hasher_error)?;

        if matches {
            Ok(user.id)
        } else {
            Err(Self::invalid_credentials())
        }
    }
}
