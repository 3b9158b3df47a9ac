//! Port for password hashing and verification.

use async_trait::async_trait;

use crate::domain::user::{Password, PasswordHash};

/// Errors raised by password hashing adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PasswordHasherError {
    /// Hashing or verification failed inside the adapter.
    #[error("password hashing failed: {message}")]
    Hashing {
        /// Adapter-provided description.
        message: String,
    },
}

impl PasswordHasherError {
    /// Hashing failure with the given message.
    pub fn hashing(message: impl Into<String>) -> Self {
        Self::Hashing {
            message: message.into(),
        }
    }
}

/// Port for credential digest computation.
///
/// Hashing is CPU-bound; adapters are expected to move the work off the
/// async runtime (e.g. `spawn_blocking`).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PasswordHasher: Send + Sync {
    /// Digest a plaintext password for storage.
    async fn hash(&self, password: &Password) -> Result<PasswordHash, PasswordHasherError>;

    /// Check a plaintext password against a stored digest.
    async fn verify(
        &self,
        password: &Password,
        hash: &PasswordHash,
    ) -> Result<bool, PasswordHasherError>;
}

/// Fixture hasher with a transparent, reversible digest.
///
/// Only for tests; the "digest" is the plaintext behind a fixed prefix so
/// assertions stay readable.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixturePasswordHasher;

const FIXTURE_PREFIX: &str = "plain:";

#[async_trait]
impl PasswordHasher for FixturePasswordHasher {
    async fn hash(&self, password: &Password) -> Result<PasswordHash, PasswordHasherError> {
        Ok(PasswordHash::new(format!(
            "{FIXTURE_PREFIX}{}",
            password.reveal()
        )))
    }

    async fn verify(
        &self,
        password: &Password,
        hash: &PasswordHash,
    ) -> Result<bool, PasswordHasherError> {
        Ok(hash.expose() == format!("{FIXTURE_PREFIX}{}", password.reveal()))
    }
}
