//! In-memory user repository implementation

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::user::{NationalId, User, UserPage, UserQuery, UserRepository};
use crate::domain::DomainError;

/// In-memory implementation of UserRepository
///
/// The default backend. Listings are returned in creation order to match
/// the SQL implementation.
#[derive(Debug)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<String, User>>>,
}

impl InMemoryUserRepository {
    /// Create a new empty repository
    pub fn new() -> Self {
        Self {
            users: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Create a repository with initial users
    pub fn with_users(users: Vec<User>) -> Self {
        let map = users
            .into_iter()
            .map(|u| (u.id().as_str().to_string(), u))
            .collect();

        Self {
            users: Arc::new(RwLock::new(map)),
        }
    }

    fn sorted_by_creation(users: &HashMap<String, User>) -> Vec<User> {
        let mut all: Vec<User> = users.values().cloned().collect();
        all.sort_by(|a, b| {
            a.created_at()
                .cmp(&b.created_at())
                .then_with(|| a.id().as_str().cmp(b.id().as_str()))
        });
        all
    }
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn get(&self, id: &NationalId) -> Result<Option<User>, DomainError> {
        let users = self.users.read().await;
        Ok(users.get(id.as_str()).cloned())
    }

    async fn create(&self, user: User) -> Result<User, DomainError> {
        let mut users = self.users.write().await;
        let id = user.id().as_str().to_string();

        if users.contains_key(&id) {
            return Err(DomainError::conflict(format!(
                "User with ID '{}' already exists",
                id
            )));
        }

        users.insert(id, user.clone());

        Ok(user)
    }

    async fn update(&self, user: &User) -> Result<User, DomainError> {
        let mut users = self.users.write().await;
        let id = user.id().as_str().to_string();

        if !users.contains_key(&id) {
            return Err(DomainError::not_found(format!("User '{}' not found", id)));
        }

        users.insert(id, user.clone());

        Ok(user.clone())
    }

    async fn delete(&self, id: &NationalId) -> Result<bool, DomainError> {
        let mut users = self.users.write().await;
        Ok(users.remove(id.as_str()).is_some())
    }

    async fn list_ids(&self) -> Result<Vec<NationalId>, DomainError> {
        let users = self.users.read().await;

        Ok(Self::sorted_by_creation(&users)
            .iter()
            .map(|u| u.id().clone())
            .collect())
    }

    async fn search(&self, query: &UserQuery) -> Result<UserPage, DomainError> {
        let users = self.users.read().await;

        let needle = query.search.as_ref().map(|s| s.to_lowercase());

        let matched: Vec<User> = Self::sorted_by_creation(&users)
            .into_iter()
            .filter(|u| match &needle {
                Some(n) => {
                    u.name().to_lowercase().contains(n) || u.address().to_lowercase().contains(n)
                }
                None => true,
            })
            .collect();

        let total = matched.len();
        let offset = query.page.saturating_sub(1) * query.per_page;
        let page: Vec<User> = matched
            .into_iter()
            .skip(offset)
            .take(query.per_page)
            .collect();

        Ok(UserPage { users: page, total })
    }

    async fn count(&self) -> Result<usize, DomainError> {
        let users = self.users.read().await;
        Ok(users.len())
    }
}
