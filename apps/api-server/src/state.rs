//! Application state - shared across all handlers.

use std::sync::Arc;

use zero_core::ports::{TaskRepository, UserRepository};
use zero_core::services::{AuthService, TaskStore, UserDirectory};
use zero_infra::{Argon2PasswordService, InMemoryStore, JwtConfig, JwtTokenService};

#[cfg(feature = "postgres")]
use zero_infra::{DatabaseConnections, PostgresTaskRepository, PostgresUserRepository};

use crate::config::AppConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthService>,
    pub users: Arc<UserDirectory>,
    pub tasks: Arc<TaskStore>,
    #[cfg(feature = "postgres")]
    pub db: Option<Arc<DatabaseConnections>>,
}

impl AppState {
    /// Build the application state, on PostgreSQL when it is configured and
    /// reachable, otherwise on the in-memory store.
    pub async fn new(config: &AppConfig) -> Self {
        if let Some(state) = Self::connect(config).await {
            tracing::info!("Application state initialized (postgres)");
            return state;
        }

        tracing::info!("Application state initialized (in-memory)");
        Self::in_memory(config.jwt.clone())
    }

    #[cfg(feature = "postgres")]
    async fn connect(config: &AppConfig) -> Option<Self> {
        let Some(db_config) = &config.database else {
            tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
            return None;
        };

        match DatabaseConnections::init(db_config).await {
            Ok(connections) => {
                let conn = Arc::new(connections);
                let mut state = Self::from_repositories(
                    Arc::new(PostgresUserRepository::from_shared(conn.main.clone())),
                    Arc::new(PostgresTaskRepository::from_shared(conn.main.clone())),
                    config.jwt.clone(),
                );
                state.db = Some(conn);
                Some(state)
            }
            Err(e) => {
                tracing::error!(
                    "Failed to connect to database: {}. Using in-memory fallback.",
                    e
                );
                None
            }
        }
    }

    #[cfg(not(feature = "postgres"))]
    async fn connect(config: &AppConfig) -> Option<Self> {
        if config.database.is_some() {
            tracing::warn!("DATABASE_URL ignored: built without the postgres feature");
        }
        None
    }

    /// State backed by a fresh in-memory store. Data is lost on restart.
    pub fn in_memory(jwt: JwtConfig) -> Self {
        let store = InMemoryStore::new();
        Self::from_repositories(Arc::new(store.users()), Arc::new(store.tasks()), jwt)
    }

    fn from_repositories(
        user_repo: Arc<dyn UserRepository>,
        task_repo: Arc<dyn TaskRepository>,
        jwt: JwtConfig,
    ) -> Self {
        let passwords = Arc::new(Argon2PasswordService::new());
        let tokens = Arc::new(JwtTokenService::new(jwt));

        Self {
            auth: Arc::new(AuthService::new(
                user_repo.clone(),
                tokens,
                passwords.clone(),
            )),
            users: Arc::new(UserDirectory::new(user_repo, passwords)),
            tasks: Arc::new(TaskStore::new(task_repo)),
            #[cfg(feature = "postgres")]
            db: None,
        }
    }
}
