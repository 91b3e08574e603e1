//! User and token repositories.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tokio::sync::RwLock;

use tutorial_core::{UserId, Username};

use super::{RepositoryError, conflict_on_unique, next_id};
use crate::models::{AuthToken, User};

/// Storage for accounts and their API tokens.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Create an account.
    ///
    /// Returns `RepositoryError::Conflict` if the username is taken.
    async fn create(&self, username: &Username, password_hash: &str)
    -> Result<User, RepositoryError>;

    /// Look up an account with its password hash.
    async fn get_password_hash(
        &self,
        username: &Username,
    ) -> Result<Option<(User, String)>, RepositoryError>;

    /// Return the user's token, storing `candidate` if they have none yet.
    async fn get_or_create_token(
        &self,
        user_id: UserId,
        candidate: AuthToken,
    ) -> Result<AuthToken, RepositoryError>;

    /// Resolve a token to its owner.
    async fn get_by_token(&self, token: &AuthToken) -> Result<Option<User>, RepositoryError>;
}

// =============================================================================
// In-memory accounts
// =============================================================================

#[derive(Debug, Default)]
struct Accounts {
    users: Vec<(User, String)>,
    tokens: HashMap<AuthToken, UserId>,
}

/// Accounts held in process memory.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    accounts: RwLock<Accounts>,
}

impl InMemoryUserRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(
        &self,
        username: &Username,
        password_hash: &str,
    ) -> Result<User, RepositoryError> {
        let mut accounts = self.accounts.write().await;

        if accounts.users.iter().any(|(u, _)| &u.username == username) {
            return Err(RepositoryError::Conflict(
                "username already exists".to_owned(),
            ));
        }

        let id = next_id(accounts.users.iter().map(|(u, _)| u.id.as_i32()))?;
        let user = User {
            id: UserId::new(id),
            username: username.clone(),
            created_at: Utc::now(),
        };
        accounts
            .users
            .push((user.clone(), password_hash.to_owned()));
        Ok(user)
    }

    async fn get_password_hash(
        &self,
        username: &Username,
    ) -> Result<Option<(User, String)>, RepositoryError> {
        Ok(self
            .accounts
            .read()
            .await
            .users
            .iter()
            .find(|(u, _)| &u.username == username)
            .cloned())
    }

    async fn get_or_create_token(
        &self,
        user_id: UserId,
        candidate: AuthToken,
    ) -> Result<AuthToken, RepositoryError> {
        let mut accounts = self.accounts.write().await;

        if let Some(existing) = accounts
            .tokens
            .iter()
            .find_map(|(token, owner)| (*owner == user_id).then(|| token.clone()))
        {
            return Ok(existing);
        }

        accounts.tokens.insert(candidate.clone(), user_id);
        Ok(candidate)
    }

    async fn get_by_token(&self, token: &AuthToken) -> Result<Option<User>, RepositoryError> {
        let accounts = self.accounts.read().await;
        let Some(&user_id) = accounts.tokens.get(token) else {
            return Ok(None);
        };

        Ok(accounts
            .users
            .iter()
            .find(|(u, _)| u.id == user_id)
            .map(|(u, _)| u.clone()))
    }
}

// =============================================================================
// PostgreSQL accounts
// =============================================================================

#[derive(Debug, FromRow)]
struct UserRow {
    id: i32,
    username: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = RepositoryError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let username = Username::parse(&row.username).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid username in database: {e}"))
        })?;

        Ok(Self {
            id: UserId::new(row.id),
            username,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, FromRow)]
struct UserWithHashRow {
    #[sqlx(flatten)]
    user: UserRow,
    password_hash: String,
}

/// Accounts stored in the `users` and `auth_tokens` tables.
#[derive(Debug, Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(
        &self,
        username: &Username,
        password_hash: &str,
    ) -> Result<User, RepositoryError> {
        let row: UserRow = sqlx::query_as(
            r"
            INSERT INTO users (username, password_hash)
            VALUES ($1, $2)
            RETURNING id, username, created_at
            ",
        )
        .bind(username)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, "username"))?;

        User::try_from(row)
    }

    async fn get_password_hash(
        &self,
        username: &Username,
    ) -> Result<Option<(User, String)>, RepositoryError> {
        let row: Option<UserWithHashRow> = sqlx::query_as(
            "SELECT id, username, created_at, password_hash FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| Ok::<_, RepositoryError>((User::try_from(r.user)?, r.password_hash)))
            .transpose()
    }

    async fn get_or_create_token(
        &self,
        user_id: UserId,
        candidate: AuthToken,
    ) -> Result<AuthToken, RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO auth_tokens (key, user_id)
            VALUES ($1, $2)
            ON CONFLICT (user_id) DO NOTHING
            ",
        )
        .bind(candidate.as_str())
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        let (key,): (String,) = sqlx::query_as("SELECT key FROM auth_tokens WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;

        AuthToken::parse(&key).ok_or_else(|| {
            RepositoryError::DataCorruption(format!("malformed token for user {user_id}"))
        })
    }

    async fn get_by_token(&self, token: &AuthToken) -> Result<Option<User>, RepositoryError> {
        let row: Option<UserRow> = sqlx::query_as(
            r"
            SELECT u.id, u.username, u.created_at
            FROM auth_tokens t
            JOIN users u ON u.id = t.user_id
            WHERE t.key = $1
            ",
        )
        .bind(token.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(User::try_from).transpose()
    }
}
