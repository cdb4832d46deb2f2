//! User Registry API
//!
//! A CRUD REST service for user records keyed by national ID, with:
//! - Checksum validation for national IDs and format validation for phones
//! - Optional JWT authentication for request attribution
//! - In-memory or PostgreSQL storage backends
//! - A companion HTTP client with client-side fail-fast validation

pub mod api;
pub mod cli;
pub mod client;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use api::state::AppState;
use infrastructure::account::{AccountService, Argon2Hasher, InMemoryAccountRepository};
use infrastructure::auth::{JwtConfig, JwtService};
use infrastructure::user::{InMemoryUserRepository, PostgresUserRepository, UserService};
use rand::Rng;
use tracing::{info, warn};

/// Create the application state with all services initialized
pub async fn create_app_state() -> anyhow::Result<AppState> {
    create_app_state_with_config(&AppConfig::default()).await
}

/// Create the application state with custom configuration
pub async fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    // User storage backend
    let user_service: Arc<dyn api::state::UserServiceTrait> =
        match config.storage.backend.to_lowercase().as_str() {
            "postgres" => {
                let database_url = std::env::var("DATABASE_URL").map_err(|_| {
                    anyhow::anyhow!(
                        "DATABASE_URL environment variable is required for the postgres backend"
                    )
                })?;

                info!("Connecting to PostgreSQL...");
                let pool = sqlx::PgPool::connect(&database_url)
                    .await
                    .map_err(|e| anyhow::anyhow!("Failed to connect to PostgreSQL: {}", e))?;
                info!("PostgreSQL connection established");

                let repository = PostgresUserRepository::new(pool);
                repository
                    .ensure_schema()
                    .await
                    .map_err(|e| anyhow::anyhow!("Failed to prepare schema: {}", e))?;

                Arc::new(UserService::new(Arc::new(repository)))
            }
            other => {
                if other != "memory" {
                    warn!(
                        "Unknown storage backend '{}', falling back to in-memory",
                        other
                    );
                }
                info!("Using in-memory user storage");
                Arc::new(UserService::new(Arc::new(InMemoryUserRepository::new())))
            }
        };

    // Operator accounts
    let account_service: Arc<dyn api::state::AccountServiceTrait> = Arc::new(
        AccountService::new(
            Arc::new(InMemoryAccountRepository::new()),
            Arc::new(Argon2Hasher::new()),
        ),
    );

    create_initial_admin_account(account_service.as_ref()).await?;

    // JWT service
    let jwt_secret = config
        .auth
        .jwt_secret
        .clone()
        .or_else(|| std::env::var("JWT_SECRET").ok())
        .unwrap_or_else(|| {
            warn!(
                "No JWT secret configured. Generating a random one; \
                tokens will NOT survive a restart. Set JWT_SECRET or \
                auth.jwt_secret for stable sessions."
            );
            generate_random_secret()
        });

    let jwt_service = Arc::new(JwtService::new(JwtConfig::new(
        jwt_secret,
        config.auth.jwt_expiration_minutes,
    )));

    Ok(AppState::new(user_service, account_service, jwt_service))
}

/// Generate a random JWT secret
fn generate_random_secret() -> String {
    use rand::distributions::Alphanumeric;

    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(64)
        .map(char::from)
        .collect()
}

/// Generate a random password for the initial admin account
fn generate_random_password() -> String {
    use rand::distributions::Alphanumeric;

    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(16)
        .map(char::from)
        .collect()
}

/// Create an initial admin account if none exist
async fn create_initial_admin_account(
    account_service: &dyn api::state::AccountServiceTrait,
) -> anyhow::Result<()> {
    if account_service.count().await? > 0 {
        return Ok(());
    }

    let (password, from_env) = match std::env::var("ADMIN_DEFAULT_PASSWORD") {
        Ok(p) if !p.is_empty() => (p, true),
        _ => (generate_random_password(), false),
    };

    account_service.create("admin", &password).await?;

    info!("===========================================");
    info!("Initial admin account created!");
    info!("Username: admin");

    if from_env {
        info!("Password: (set via ADMIN_DEFAULT_PASSWORD)");
    } else {
        info!("Password: {}", password);
    }

    info!("Please change this password after first login.");
    info!("===========================================");

    Ok(())
}
