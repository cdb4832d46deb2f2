//! Operator account repository trait

use async_trait::async_trait;
use std::fmt::Debug;

use super::entity::Account;
use crate::domain::DomainError;

/// Repository trait for operator account storage
#[async_trait]
pub trait AccountRepository: Send + Sync + Debug {
    /// Get an account by username
    async fn get(&self, username: &str) -> Result<Option<Account>, DomainError>;

    /// Create a new account; fails with a conflict if the username is taken
    async fn create(&self, account: Account) -> Result<Account, DomainError>;

    /// Record a login for an account
    async fn record_login(&self, username: &str) -> Result<(), DomainError>;

    /// Count accounts
    async fn count(&self) -> Result<usize, DomainError>;

    /// Check if a username exists
    async fn exists(&self, username: &str) -> Result<bool, DomainError> {
        Ok(self.get(username).await?.is_some())
    }
}
