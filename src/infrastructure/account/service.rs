//! Operator account service for authentication

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::account::{Account, AccountRepository};
use crate::domain::DomainError;

use super::password::PasswordHasher;

const MIN_PASSWORD_LENGTH: usize = 8;
const MAX_PASSWORD_LENGTH: usize = 128;

/// Account service for login and account creation
#[derive(Debug)]
pub struct AccountService<R: AccountRepository, H: PasswordHasher> {
    repository: Arc<R>,
    hasher: Arc<H>,
}

impl<R: AccountRepository, H: PasswordHasher> AccountService<R, H> {
    /// Create a new account service
    pub fn new(repository: Arc<R>, hasher: Arc<H>) -> Self {
        Self { repository, hasher }
    }

    /// Create a new operator account
    pub async fn create(&self, username: &str, password: &str) -> Result<Account, DomainError> {
        if username.trim().is_empty() {
            return Err(DomainError::validation("Username cannot be empty"));
        }

        if password.len() < MIN_PASSWORD_LENGTH {
            return Err(DomainError::validation(format!(
                "Password must be at least {} characters long",
                MIN_PASSWORD_LENGTH
            )));
        }

        if password.len() > MAX_PASSWORD_LENGTH {
            return Err(DomainError::validation(format!(
                "Password exceeds maximum length of {} characters",
                MAX_PASSWORD_LENGTH
            )));
        }

        let password_hash = self.hasher.hash(password)?;
        let account = Account::new(username.trim(), password_hash);

        let created = self.repository.create(account).await?;

        info!(username = created.username(), "Operator account created");
        Ok(created)
    }

    /// Authenticate with username and password
    ///
    /// Returns `None` for unknown usernames and wrong passwords alike, so
    /// the caller cannot distinguish the two.
    pub async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<Account>, DomainError> {
        let account = match self.repository.get(username).await? {
            Some(a) => a,
            None => {
                warn!(username, "Login attempt for unknown account");
                return Ok(None);
            }
        };

        if !self.hasher.verify(password, account.password_hash()) {
            warn!(username, "Login attempt with wrong password");
            return Ok(None);
        }

        self.repository.record_login(username).await?;

        self.repository.get(username).await
    }

    /// Get an account by username
    pub async fn get(&self, username: &str) -> Result<Option<Account>, DomainError> {
        self.repository.get(username).await
    }

    /// Count accounts
    pub async fn count(&self) -> Result<usize, DomainError> {
        self.repository.count().await
    }
}
