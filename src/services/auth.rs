//! Authentication service

use std::sync::Arc;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::Utc;
use validator::Validate;

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::user::{LoginRequest, NewUser, RegisterUser, User, UserClaims},
    repository::UsersRepository,
};

const INVALID_CREDENTIALS: &str = "Invalid username or password";

/// Verified against when the username is unknown, so both paths pay for one argon2 run
const DUMMY_PASSWORD_HASH: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$2qjO9d/LQfwO5WHyCc6m+g$uhtb5S0yA9/eop54CWqWl/+vQwdrIjohx5sT3hAHozU";

#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UsersRepository>,
    config: AuthConfig,
}

impl AuthService {
    pub fn new(users: Arc<dyn UsersRepository>, config: AuthConfig) -> Self {
        Self { users, config }
    }

    /// Register a new user account
    pub async fn register(&self, request: RegisterUser) -> AppResult<User> {
        if let Err(errors) = request.validate() {
            tracing::warn!("Register: invalid payload: {}", errors);
            return Err(errors.into());
        }

        let existing = self
            .users
            .find_by_username(&request.username)
            .await
            .map_err(|e| failure("register", e))?;
        if existing.is_some() {
            tracing::warn!("Register: username {} already taken", request.username);
            return Err(AppError::Conflict("Username is already taken".to_string()));
        }

        let password_hash = self.hash_password(&request.password)?;
        let user = self
            .users
            .create(NewUser {
                username: request.username,
                password_hash,
            })
            .await
            .map_err(|e| failure("register", e))?;

        tracing::info!("Registered user id={} ({})", user.id, user.username);
        Ok(user)
    }

    /// Authenticate a user and return a JWT token
    pub async fn login(&self, request: LoginRequest) -> AppResult<(String, User)> {
        if let Err(errors) = request.validate() {
            tracing::warn!("Login: invalid payload: {}", errors);
            return Err(errors.into());
        }

        let user = self
            .users
            .find_by_username(&request.username)
            .await
            .map_err(|e| failure("login", e))?;

        let verified = match &user {
            Some(user) => verify_password(&user.password_hash, &request.password)?,
            None => {
                verify_password(DUMMY_PASSWORD_HASH, &request.password)?;
                false
            }
        };
        let user = match user {
            Some(user) if verified => user,
            _ => {
                tracing::warn!("Login: rejected credentials for {}", request.username);
                return Err(AppError::Authentication(INVALID_CREDENTIALS.to_string()));
            }
        };

        let token = self.create_token(&user)?;
        tracing::info!("Login: user id={} authenticated", user.id);
        Ok((token, user))
    }

    /// Load the user behind validated token claims
    pub async fn current_user(&self, claims: &UserClaims) -> AppResult<User> {
        match self.users.find_by_id(claims.user_id).await {
            Ok(Some(user)) => Ok(user),
            Ok(None) => {
                tracing::warn!("Token for unknown user id={}", claims.user_id);
                Err(AppError::Authentication("User no longer exists".to_string()))
            }
            Err(e) => Err(failure("current user", e)),
        }
    }

    /// Decode and validate a bearer token
    pub fn verify_token(&self, token: &str) -> AppResult<UserClaims> {
        UserClaims::from_token(token, &self.config.jwt_secret)
            .map_err(|e| AppError::Authentication(e.to_string()))
    }

    fn create_token(&self, user: &User) -> AppResult<String> {
        let now = Utc::now().timestamp();
        let exp = now + (self.config.jwt_expiration_hours as i64 * 3600);

        let claims = UserClaims {
            sub: user.username.clone(),
            user_id: user.id,
            exp,
            iat: now,
        };

        claims.create_token(&self.config.jwt_secret).map_err(|e| {
            tracing::error!("Failed to create token: {}", e);
            AppError::Internal(format!("Failed to create token: {}", e))
        })
    }

    /// Hash a password using Argon2
    pub fn hash_password(&self, password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| {
                tracing::error!("Failed to hash password: {}", e);
                AppError::Internal(format!("Failed to hash password: {}", e))
            })?;
        Ok(hash.to_string())
    }
}

/// Verify password against stored hash
fn verify_password(password_hash: &str, password: &str) -> AppResult<bool> {
    let parsed_hash = PasswordHash::new(password_hash).map_err(|e| {
        tracing::error!("Stored password hash is unreadable: {}", e);
        AppError::Internal("Invalid password hash".to_string())
    })?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

fn failure(operation: &str, error: AppError) -> AppError {
    tracing::error!("{}: user store operation failed: {}", operation, error);
    AppError::Internal(error.to_string())
}
