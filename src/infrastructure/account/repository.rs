//! In-memory operator account repository

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::account::{Account, AccountRepository};
use crate::domain::DomainError;

/// In-memory implementation of AccountRepository
///
/// Operator accounts are few and recreated at startup, so a map behind a
/// lock is all the persistence they need.
#[derive(Debug, Default)]
pub struct InMemoryAccountRepository {
    accounts: Arc<RwLock<HashMap<String, Account>>>,
}

impl InMemoryAccountRepository {
    /// Create a new empty repository
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    async fn get(&self, username: &str) -> Result<Option<Account>, DomainError> {
        let accounts = self.accounts.read().await;
        Ok(accounts.get(username).cloned())
    }

    async fn create(&self, account: Account) -> Result<Account, DomainError> {
        let mut accounts = self.accounts.write().await;
        let username = account.username().to_string();

        if accounts.contains_key(&username) {
            return Err(DomainError::conflict(format!(
                "Account '{}' already exists",
                username
            )));
        }

        accounts.insert(username, account.clone());
        Ok(account)
    }

    async fn record_login(&self, username: &str) -> Result<(), DomainError> {
        let mut accounts = self.accounts.write().await;

        if let Some(account) = accounts.get_mut(username) {
            account.record_login();
            Ok(())
        } else {
            Err(DomainError::not_found(format!(
                "Account '{}' not found",
                username
            )))
        }
    }

    async fn count(&self) -> Result<usize, DomainError> {
        let accounts = self.accounts.read().await;
        Ok(accounts.len())
    }
}
