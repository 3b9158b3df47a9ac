//! bcrypt-backed password hashing adapter.
//!
//! bcrypt is CPU-bound, so both operations run on the blocking thread pool
//! rather than stalling the async runtime.

use async_trait::async_trait;
use bcrypt::DEFAULT_COST;

use crate::domain::ports::{PasswordHasher, PasswordHasherError};
use crate::domain::{Password, PasswordHash};

/// bcrypt implementation of the `PasswordHasher` port.
#[derive(Debug, Clone, Copy)]
pub struct BcryptPasswordHasher {
    cost: u32,
}

impl Default for BcryptPasswordHasher {
    fn default() -> Self {
        Self { cost: DEFAULT_COST }
    }
}

impl BcryptPasswordHasher {
    /// Create a hasher with the library default cost.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a hasher with an explicit cost factor.
    ///
    /// Lower costs are only appropriate in tests.
    pub fn with_cost(cost: u32) -> Self {
        Self { cost }
    }
}

#[async_trait]
impl PasswordHasher for BcryptPasswordHasher {
    async fn hash(&self, password: &Password) -> Result<PasswordHash, PasswordHasherError> {
        let cost = self.cost;
        let plaintext = password.reveal().to_owned();
        let digest = tokio::task::spawn_blocking(move || bcrypt::hash(plaintext, cost))
            .await
            .map_err(|err| PasswordHasherError::hashing(format!("hashing task failed: {err}")))?
            .map_err(|err| PasswordHasherError::hashing(err.to_string()))?;
        Ok(PasswordHash::new(digest))
    }

    async fn verify(
        &self,
        password: &Password,
        hash: &PasswordHash,
    ) -> Result<bool, PasswordHasherError> {
        let plaintext = password.reveal().to_owned();
        let digest = hash.expose().to_owned();
        tokio::task::spawn_blocking(move || bcrypt::verify(plaintext, &digest))
            .await
            .map_err(|err| PasswordHasherError::hashing(format!("verify task failed: {err}")))?
            .map_err(|err| PasswordHasherError::hashing(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Minimum bcrypt cost keeps these tests fast.
    const TEST_COST: u32 = 4;

    #[tokio::test]
    async fn hash_then_verify_round_trips() {
        let hasher = BcryptPasswordHasher::with_cost(TEST_COST);
        let password = Password::new("correct horse battery staple").expect("valid password");
        let hash = hasher.hash(&password).await.expect("hashing succeeds");
        assert!(hash.expose().starts_with("$2"));
        assert!(hasher
            .verify(&password, &hash)
            .await
            .expect("verification succeeds"));
    }

    #[tokio::test]
    async fn verify_rejects_a_different_password() {
        let hasher = BcryptPasswordHasher::with_cost(TEST_COST);
        let password = Password::new("correct horse battery staple").expect("valid password");
        let other = Password::new("incorrect horse").expect("valid password");
        let hash = hasher.hash(&password).await.expect("hashing succeeds");
        assert!(!hasher
            .verify(&other, &hash)
            .await
            .expect("verification succeeds"));
    }

    #[tokio::test]
    async fn verify_rejects_garbage_digests() {
        let hasher = BcryptPasswordHasher::with_cost(TEST_COST);
        let password = Password::new("correct horse battery staple").expect("valid password");
        let err = hasher
            .verify(&password, &PasswordHash::new("not-a-bcrypt-digest"))
            .await
            .expect_err("garbage digest fails");
        assert!(matches!(err, PasswordHasherError::Hashing { .. }));
    }
}
