//! Authentication service.
//!
//! Accounts are a username and an argon2 password hash. Signing up or
//! logging in yields the account's single API token.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use tutorial_core::Username;

use crate::db::{RepositoryError, UserRepository};
use crate::models::{AuthToken, User};

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Authentication service.
///
/// Handles signup, login and token lookup.
pub struct AuthService<'a> {
    users: &'a dyn UserRepository,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(users: &'a dyn UserRepository) -> Self {
        Self { users }
    }

    /// Register a new user and issue their token.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidUsername` if the username format is invalid.
    /// Returns `AuthError::WeakPassword` if the password doesn't meet requirements.
    /// Returns `AuthError::UserAlreadyExists` if the username is taken.
    pub async fn signup(
        &self,
        username: &str,
        password: &str,
    ) -> Result<(User, AuthToken), AuthError> {
        let username = Username::parse(username)?;
        validate_password(password)?;
        let password_hash = hash_password(password)?;

        let user = self
            .users
            .create(&username, &password_hash)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::UserAlreadyExists,
                other => AuthError::Repository(other),
            })?;

        let token = self.issue_token(&user).await?;
        Ok((user, token))
    }

    /// Check a username and password and return the user's token.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the username/password is wrong.
    pub async fn login(
        &self,
        username: &str,
        password: &str,
    ) -> Result<(User, AuthToken), AuthError> {
        // A malformed username cannot belong to anyone
        let username = Username::parse(username).map_err(|_| AuthError::InvalidCredentials)?;

        let (user, password_hash) = self
            .users
            .get_password_hash(&username)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &password_hash)?;

        let token = self.issue_token(&user).await?;
        Ok((user, token))
    }

    /// Resolve an API token to its user.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidToken` if the token is malformed or unknown.
    pub async fn authenticate(&self, key: &str) -> Result<User, AuthError> {
        let token = AuthToken::parse(key).ok_or(AuthError::InvalidToken)?;
        self.users
            .get_by_token(&token)
            .await?
            .ok_or(AuthError::InvalidToken)
    }

    async fn issue_token(&self, user: &User) -> Result<AuthToken, AuthError> {
        Ok(self
            .users
            .get_or_create_token(user.id, AuthToken::generate())
            .await?)
    }
}

/// Validate password meets requirements.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::InMemoryUserRepository;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("correct horse").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("correct horse", &hash).is_ok());
        assert!(matches!(
            verify_password("wrong horse", &hash),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_short_password_rejected() {
        assert!(matches!(
            validate_password("short"),
            Err(AuthError::WeakPassword(_))
        ));
        assert!(validate_password("longenough").is_ok());
    }

    #[tokio::test]
    async fn test_signup_then_login_returns_same_token() {
        let repo = InMemoryUserRepository::new();
        let auth = AuthService::new(&repo);

        let (user, signup_token) = auth.signup("alice", "password123").await.unwrap();
        let (same_user, login_token) = auth.login("alice", "password123").await.unwrap();

        assert_eq!(user.id, same_user.id);
        assert_eq!(signup_token, login_token);
        assert_eq!(
            auth.authenticate(login_token.as_str()).await.unwrap().id,
            user.id
        );
    }

    #[tokio::test]
    async fn test_signup_duplicate_username() {
        let repo = InMemoryUserRepository::new();
        let auth = AuthService::new(&repo);

        auth.signup("alice", "password123").await.unwrap();
        assert!(matches!(
            auth.signup("alice", "another-password").await,
            Err(AuthError::UserAlreadyExists)
        ));
    }

    #[tokio::test]
    async fn test_login_failures_are_indistinguishable() {
        let repo = InMemoryUserRepository::new();
        let auth = AuthService::new(&repo);
        auth.signup("alice", "password123").await.unwrap();

        for (username, password) in [
            ("alice", "wrong-password"),
            ("nobody", "password123"),
            ("bad name!", "password123"),
        ] {
            assert!(matches!(
                auth.login(username, password).await,
                Err(AuthError::InvalidCredentials)
            ));
        }
    }

    #[tokio::test]
    async fn test_authenticate_rejects_unknown_tokens() {
        let repo = InMemoryUserRepository::new();
        let auth = AuthService::new(&repo);

        assert!(matches!(
            auth.authenticate("not-a-token").await,
            Err(AuthError::InvalidToken)
        ));
        assert!(matches!(
            auth.authenticate(AuthToken::generate().as_str()).await,
            Err(AuthError::InvalidToken)
        ));
    }
}
