//! Driving port for account registration.

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::error::Error;
use crate::domain::user::{EmailAddress, Password, PasswordHash, User, UserId};

/// Validated registration request.
#[derive(Debug, Clone)]
pub struct RegisterAccountRequest {
    /// Address to register.
    pub email: EmailAddress,
    /// Plaintext password; hashed before storage.
    pub password: Password,
}

/// Domain use-case port for account registration.
#[async_trait]
pub trait AccountCommand: Send + Sync {
    /// Create an account, failing with `conflict` when the email is taken.
    async fn register(&self, request: RegisterAccountRequest) -> Result<User, Error>;
}

/// Fixture implementation that registers every request.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureAccountCommand;

#[async_trait]
impl AccountCommand for FixtureAccountCommand {
    async fn register(&self, request: RegisterAccountRequest) -> Result<User, Error> {
        let now = Utc::now();
        Ok(User {
            id: UserId::random(),
            email: request.email,
            password_hash: PasswordHash::new("fixture"),
            created_at: now,
            updated_at: now,
        })
    }
}
