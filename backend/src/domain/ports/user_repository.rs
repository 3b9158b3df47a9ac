//! Port for account persistence.

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::user::{EmailAddress, PasswordHash, User, UserId};

/// Errors raised by user repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserRepositoryError {
    /// Repository connection could not be established.
    #[error("user repository connection failed: {message}")]
    Connection {
        /// Adapter-provided description.
        message: String,
    },
    /// Query or mutation failed during execution.
    #[error("user repository query failed: {message}")]
    Query {
        /// Adapter-provided description.
        message: String,
    },
    /// The email address is already registered.
    #[error("email address is already registered")]
    DuplicateEmail,
}

impl UserRepositoryError {
    /// Connection failure with the given message.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Query failure with the given message.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

/// Insertable account row; the adapter assigns identity and timestamps.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Unique, lowercased address.
    pub email: EmailAddress,
    /// Stored credential digest.
    pub password_hash: PasswordHash,
}

/// Port for account storage and lookup.
///
/// The unique email constraint lives in the storage layer; adapters surface a
/// violation as [`UserRepositoryError::DuplicateEmail`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new account and return the stored row.
    async fn insert(&self, user: NewUser) -> Result<User, UserRepositoryError>;

    /// Fetch an account by its unique email.
    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserRepositoryError>;

    /// Fetch an account by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError>;
}

/// Fixture implementation for tests that do not exercise account storage.
///
/// Inserts succeed with a freshly minted identity; lookups find nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureUserRepository;

#[async_trait]
impl UserRepository for FixtureUserRepository {
    async fn insert(&self, user: NewUser) -> Result<User, UserRepositoryError> {
        let now = Utc::now();
        Ok(User {
            id: UserId::random(),
            email: user.email,
            password_hash: user.password_hash,
            created_at: now,
            updated_at: now,
        })
    }

    async fn find_by_email(
        &self,
        _email: &EmailAddress,
    ) -> Result<Option<User>, UserRepositoryError> {
        Ok(None)
    }

    async fn find_by_id(&self, _id: &UserId) -> Result<Option<User>, UserRepositoryError> {
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[tokio::test]
    async fn fixture_insert_assigns_identity() {
        let repo = FixtureUserRepository;
        let email = EmailAddress::new("user@example.com").expect("valid email");
        let stored = repo
            .insert(NewUser {
                email: email.clone(),
                password_hash: PasswordHash::new("digest"),
            })
            .await
            .expect("fixture insert succeeds");
        assert_eq!(stored.email, email);
    }

    #[rstest]
    fn error_constructors_carry_messages() {
        let err = UserRepositoryError::connection("refused");
        assert!(err.to_string().contains("refused"));
        let err = UserRepositoryError::query("syntax");
        assert!(err.to_string().contains("syntax"));
    }
}
