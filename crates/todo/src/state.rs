//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::TodoConfig;
use crate::db::{
    InMemoryTodoRepository, InMemoryUserRepository, PgTodoRepository, PgUserRepository,
    TodoRepository, UserRepository,
};
use crate::services::AuthService;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: TodoConfig,
    pool: Option<PgPool>,
    users: Arc<dyn UserRepository>,
    todos: Arc<dyn TodoRepository>,
}

impl AppState {
    /// Create state that keeps everything in process memory.
    #[must_use]
    pub fn in_memory(config: TodoConfig) -> Self {
        Self::with_repositories(
            config,
            None,
            Arc::new(InMemoryUserRepository::new()),
            Arc::new(InMemoryTodoRepository::new()),
        )
    }

    /// Create state backed by `PostgreSQL`.
    #[must_use]
    pub fn postgres(config: TodoConfig, pool: PgPool) -> Self {
        let users = Arc::new(PgUserRepository::new(pool.clone()));
        let todos = Arc::new(PgTodoRepository::new(pool.clone()));
        Self::with_repositories(config, Some(pool), users, todos)
    }

    /// Create state with explicit repositories.
    #[must_use]
    pub fn with_repositories(
        config: TodoConfig,
        pool: Option<PgPool>,
        users: Arc<dyn UserRepository>,
        todos: Arc<dyn TodoRepository>,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                users,
                todos,
            }),
        }
    }

    #[must_use]
    pub fn config(&self) -> &TodoConfig {
        &self.inner.config
    }

    /// Get the database pool, if the API runs on `PostgreSQL`.
    #[must_use]
    pub fn pool(&self) -> Option<&PgPool> {
        self.inner.pool.as_ref()
    }

    #[must_use]
    pub fn todos(&self) -> &dyn TodoRepository {
        self.inner.todos.as_ref()
    }

    /// Authentication service over this state's accounts.
    #[must_use]
    pub fn auth(&self) -> AuthService<'_> {
        AuthService::new(self.inner.users.as_ref())
    }
}
