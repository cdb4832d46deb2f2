//! PostgreSQL user repository implementation

use async_trait::async_trait;
use sqlx::{postgres::PgRow, PgPool, Row};

use crate::domain::user::{NationalId, PhoneNumber, User, UserPage, UserQuery, UserRepository};
use crate::domain::DomainError;

/// PostgreSQL implementation of UserRepository
///
/// Expects a `users` table with columns
/// `(id, name, phone_number, address, created_at, updated_at)` and a
/// primary key on `id`.
#[derive(Debug, Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the backing table if it does not exist yet
    pub async fn ensure_schema(&self) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id           TEXT PRIMARY KEY,
                name         TEXT NOT NULL,
                phone_number TEXT NOT NULL,
                address      TEXT NOT NULL,
                created_at   TIMESTAMPTZ NOT NULL,
                updated_at   TIMESTAMPTZ NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to create users table: {}", e)))?;

        Ok(())
    }
}

fn row_to_user(row: &PgRow) -> Result<User, DomainError> {
    let id: String = row
        .try_get("id")
        .map_err(|e| DomainError::storage(format!("Failed to read user row: {}", e)))?;
    let name: String = row
        .try_get("name")
        .map_err(|e| DomainError::storage(format!("Failed to read user row: {}", e)))?;
    let phone: String = row
        .try_get("phone_number")
        .map_err(|e| DomainError::storage(format!("Failed to read user row: {}", e)))?;
    let address: String = row
        .try_get("address")
        .map_err(|e| DomainError::storage(format!("Failed to read user row: {}", e)))?;
    let created_at = row
        .try_get("created_at")
        .map_err(|e| DomainError::storage(format!("Failed to read user row: {}", e)))?;
    let updated_at = row
        .try_get("updated_at")
        .map_err(|e| DomainError::storage(format!("Failed to read user row: {}", e)))?;

    // Stored values are canonical; a failure here means the row was written
    // by something other than this service
    let id = NationalId::new(&id)
        .map_err(|e| DomainError::storage(format!("Corrupt user id '{}': {}", id, e)))?;
    let phone = PhoneNumber::new(&phone)
        .map_err(|e| DomainError::storage(format!("Corrupt phone number '{}': {}", phone, e)))?;

    Ok(User::from_parts(
        id, name, phone, address, created_at, updated_at,
    ))
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn get(&self, id: &NationalId) -> Result<Option<User>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id, name, phone_number, address, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get user: {}", e)))?;

        match row {
            Some(row) => Ok(Some(row_to_user(&row)?)),
            None => Ok(None),
        }
    }

    async fn create(&self, user: User) -> Result<User, DomainError> {
        sqlx::query(
            r#"
            INSERT INTO users (id, name, phone_number, address, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(user.id().as_str())
        .bind(user.name())
        .bind(user.phone_number().as_str())
        .bind(user.address())
        .bind(user.created_at())
        .bind(user.updated_at())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            let msg = e.to_string();

            if msg.contains("duplicate key") || msg.contains("unique constraint") {
                DomainError::conflict(format!(
                    "User with ID '{}' already exists",
                    user.id().as_str()
                ))
            } else {
                DomainError::storage(format!("Failed to create user: {}", e))
            }
        })?;

        Ok(user)
    }

    async fn update(&self, user: &User) -> Result<User, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET name = $2, phone_number = $3, address = $4, updated_at = $5
            WHERE id = $1
            "#,
        )
        .bind(user.id().as_str())
        .bind(user.name())
        .bind(user.phone_number().as_str())
        .bind(user.address())
        .bind(user.updated_at())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to update user: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(format!(
                "User '{}' not found",
                user.id().as_str()
            )));
        }

        Ok(user.clone())
    }

    async fn delete(&self, id: &NationalId) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to delete user: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_ids(&self) -> Result<Vec<NationalId>, DomainError> {
        let ids: Vec<String> = sqlx::query_scalar("SELECT id FROM users ORDER BY created_at, id")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to list user IDs: {}", e)))?;

        ids.into_iter()
            .map(|id| {
                NationalId::new(&id)
                    .map_err(|e| DomainError::storage(format!("Corrupt user id '{}': {}", id, e)))
            })
            .collect()
    }

    async fn search(&self, query: &UserQuery) -> Result<UserPage, DomainError> {
        let pattern = query.search.as_ref().map(|s| format!("%{}%", s));
        let offset = (query.page.saturating_sub(1) * query.per_page) as i64;
        let limit = query.per_page as i64;

        let (total, rows) = match &pattern {
            Some(pattern) => {
                let total: i64 = sqlx::query_scalar(
                    "SELECT COUNT(*) FROM users WHERE name ILIKE $1 OR address ILIKE $1",
                )
                .bind(pattern)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| DomainError::storage(format!("Failed to count users: {}", e)))?;

                let rows = sqlx::query(
                    r#"
                    SELECT id, name, phone_number, address, created_at, updated_at
                    FROM users
                    WHERE name ILIKE $1 OR address ILIKE $1
                    ORDER BY created_at, id
                    OFFSET $2 LIMIT $3
                    "#,
                )
                .bind(pattern)
                .bind(offset)
                .bind(limit)
                .fetch_all(&self.pool)
                .await
                .map_err(|e| DomainError::storage(format!("Failed to search users: {}", e)))?;

                (total, rows)
            }
            None => {
                let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
                    .fetch_one(&self.pool)
                    .await
                    .map_err(|e| DomainError::storage(format!("Failed to count users: {}", e)))?;

                let rows = sqlx::query(
                    r#"
                    SELECT id, name, phone_number, address, created_at, updated_at
                    FROM users
                    ORDER BY created_at, id
                    OFFSET $1 LIMIT $2
                    "#,
                )
                .bind(offset)
                .bind(limit)
                .fetch_all(&self.pool)
                .await
                .map_err(|e| DomainError::storage(format!("Failed to list users: {}", e)))?;

                (total, rows)
            }
        };

        let mut users = Vec::with_capacity(rows.len());

        for row in rows {
            users.push(row_to_user(&row)?);
        }

        Ok(UserPage {
            users,
            total: total as usize,
        })
    }

    async fn count(&self) -> Result<usize, DomainError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to count users: {}", e)))?;

        Ok(count as usize)
    }
}
