//! User repository trait

use async_trait::async_trait;
use std::fmt::Debug;

use super::entity::User;
use super::validation::NationalId;
use crate::domain::DomainError;

/// One page of user records plus the total match count
#[derive(Debug, Clone)]
pub struct UserPage {
    pub users: Vec<User>,
    pub total: usize,
}

/// Pagination and filtering options for user listings
#[derive(Debug, Clone)]
pub struct UserQuery {
    /// 1-based page number
    pub page: usize,
    /// Page size
    pub per_page: usize,
    /// Case-insensitive substring match against name or address
    pub search: Option<String>,
}

impl Default for UserQuery {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: 10,
            search: None,
        }
    }
}

/// Repository trait for user record storage
#[async_trait]
pub trait UserRepository: Send + Sync + Debug {
    /// Get a user by national ID
    async fn get(&self, id: &NationalId) -> Result<Option<User>, DomainError>;

    /// Create a new user; fails with a conflict if the ID is taken
    async fn create(&self, user: User) -> Result<User, DomainError>;

    /// Update an existing user
    async fn update(&self, user: &User) -> Result<User, DomainError>;

    /// Delete a user, returning whether a record existed
    async fn delete(&self, id: &NationalId) -> Result<bool, DomainError>;

    /// List all user IDs in creation order
    async fn list_ids(&self) -> Result<Vec<NationalId>, DomainError>;

    /// Fetch a page of users matching the query, in creation order
    async fn search(&self, query: &UserQuery) -> Result<UserPage, DomainError>;

    /// Count all users
    async fn count(&self) -> Result<usize, DomainError>;

    /// Check if a user ID exists
    async fn exists(&self, id: &NationalId) -> Result<bool, DomainError> {
        Ok(self.get(id).await?.is_some())
    }
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::RwLock;

    /// Mock user repository for testing, with a failure switch
    #[derive(Debug, Default)]
    pub struct MockUserRepository {
        users: Arc<RwLock<HashMap<String, User>>>,
        should_fail: Arc<RwLock<bool>>,
    }

    impl MockUserRepository {
        pub fn new() -> Self {
            Self::default()
        }

        /// Set whether operations should fail
        pub async fn set_should_fail(&self, fail: bool) {
            *self.should_fail.write().await = fail;
        }

        async fn check_should_fail(&self) -> Result<(), DomainError> {
            if *self.should_fail.read().await {
                return Err(DomainError::storage("Mock repository configured to fail"));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl UserRepository for MockUserRepository {
        async fn get(&self, id: &NationalId) -> Result<Option<User>, DomainError> {
            self.check_should_fail().await?;
            let users = self.users.read().await;
            Ok(users.get(id.as_str()).cloned())
        }

        async fn create(&self, user: User) -> Result<User, DomainError> {
            self.check_should_fail().await?;
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
            self.check_should_fail().await?;
            let mut users = self.users.write().await;
            let id = user.id().as_str().to_string();

            if !users.contains_key(&id) {
                return Err(DomainError::not_found(format!("User '{}' not found", id)));
            }

            users.insert(id, user.clone());
            Ok(user.clone())
        }

        async fn delete(&self, id: &NationalId) -> Result<bool, DomainError> {
            self.check_should_fail().await?;
            let mut users = self.users.write().await;
            Ok(users.remove(id.as_str()).is_some())
        }

        async fn list_ids(&self) -> Result<Vec<NationalId>, DomainError> {
            self.check_should_fail().await?;
            let users = self.users.read().await;

            let mut all: Vec<&User> = users.values().collect();
            all.sort_by_key(|u| u.created_at());

            Ok(all.iter().map(|u| u.id().clone()).collect())
        }

        async fn search(&self, query: &UserQuery) -> Result<UserPage, DomainError> {
            self.check_should_fail().await?;
            let users = self.users.read().await;

            let needle = query.search.as_ref().map(|s| s.to_lowercase());

            let mut matched: Vec<User> = users
                .values()
                .filter(|u| match &needle {
                    Some(n) => {
                        u.name().to_lowercase().contains(n)
                            || u.address().to_lowercase().contains(n)
                    }
                    None => true,
                })
                .cloned()
                .collect();

            matched.sort_by_key(|u| u.created_at());

            let total = matched.len();
            let offset = (query.page - 1) * query.per_page;
            let page: Vec<User> = matched
                .into_iter()
                .skip(offset)
                .take(query.per_page)
                .collect();

            Ok(UserPage { users: page, total })
        }

        async fn count(&self) -> Result<usize, DomainError> {
            self.check_should_fail().await?;
            let users = self.users.read().await;
            Ok(users.len())
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use crate::domain::user::{validate_id, validate_phone};

        fn create_test_user(id: &str, name: &str) -> User {
            User::new(
                validate_id(id).unwrap(),
                name,
                validate_phone("0501234567").unwrap(),
                "123 Main St, Tel Aviv",
            )
        }

        #[tokio::test]
        async fn test_create_and_get() {
            let repo = MockUserRepository::new();
            let user = create_test_user("123456782", "John Doe");

            repo.create(user.clone()).await.unwrap();

            let retrieved = repo.get(user.id()).await.unwrap();
            assert!(retrieved.is_some());
            assert_eq!(retrieved.unwrap().name(), "John Doe");
        }

        #[tokio::test]
        async fn test_duplicate_id() {
            let repo = MockUserRepository::new();

            repo.create(create_test_user("123456782", "John Doe"))
                .await
                .unwrap();

            let result = repo.create(create_test_user("123456782", "Other")).await;
            assert!(matches!(result, Err(DomainError::Conflict { .. })));
        }

        #[tokio::test]
        async fn test_failure_switch() {
            let repo = MockUserRepository::new();
            repo.set_should_fail(true).await;

            let result = repo.count().await;
            assert!(matches!(result, Err(DomainError::Storage { .. })));
        }

        #[tokio::test]
        async fn test_search_filters_by_name() {
            let repo = MockUserRepository::new();

            repo.create(create_test_user("123456782", "John Doe"))
                .await
                .unwrap();
            repo.create(create_test_user("055555551", "Jane Smith"))
                .await
                .unwrap();

            let page = repo
                .search(&UserQuery {
                    search: Some("jane".to_string()),
                    ..Default::default()
                })
                .await
                .unwrap();

            assert_eq!(page.total, 1);
            assert_eq!(page.users[0].name(), "Jane Smith");
        }
    }
}
