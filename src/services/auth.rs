//! Authentication service
//!
//! Provides:
//! - Credential verification with bcrypt
//! - JWT issuance, verification, and refresh
//!
//! Tokens are single HS256 JWTs with a short lifetime and a refresh
//! window anchored to the original issue time (`orig_iat`): a still-valid
//! token can be exchanged for a fresh one until the window closes, after
//! which the user must log in again.

use bcrypt::{hash, verify};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::db::{Database, UserRecord};

/// JWT claims carried by every issued token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// User ID (subject)
    pub sub: String,
    /// Username
    pub username: String,
    /// Whether the user holds staff privileges
    pub staff: bool,
    /// Expiration timestamp
    pub exp: i64,
    /// Issued at timestamp
    pub iat: i64,
    /// Original issue timestamp, preserved across refreshes
    pub orig_iat: i64,
}

/// Authentication failures surfaced to the API boundary
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Account is disabled")]
    AccountDisabled,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Refresh window has expired")]
    RefreshWindowClosed,

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// Auth service configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// JWT signing secret
    pub jwt_secret: String,
    /// Token lifetime in seconds
    pub token_lifetime: i64,
    /// Refresh window in seconds, measured from `orig_iat`
    pub refresh_window: i64,
    /// Bcrypt cost factor
    pub bcrypt_cost: u32,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "change-me-in-production".to_string(),
            token_lifetime: 5 * 60,
            refresh_window: 7 * 24 * 60 * 60,
            bcrypt_cost: bcrypt::DEFAULT_COST,
        }
    }
}

/// Result of a successful login or refresh
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub claims: TokenClaims,
}

/// Authentication service
#[derive(Clone)]
pub struct AuthService {
    db: Database,
    config: AuthConfig,
}

impl AuthService {
    /// Create a new auth service
    pub fn new(db: Database, config: AuthConfig) -> Self {
        Self { db, config }
    }

    /// Hash a password with bcrypt
    pub fn hash_password(&self, password: &str) -> Result<String, AuthError> {
        hash(password, self.config.bcrypt_cost)
            .map_err(|e| AuthError::Internal(anyhow::anyhow!("Failed to hash password: {}", e)))
    }

    /// Verify a password against a stored hash
    pub fn verify_password(&self, password: &str, hashed: &str) -> Result<bool, AuthError> {
        verify(password, hashed)
            .map_err(|e| AuthError::Internal(anyhow::anyhow!("Failed to verify password: {}", e)))
    }

    /// Verify credentials and issue a token.
    ///
    /// Also stamps the user's last-login time.
    pub async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<(UserRecord, IssuedToken), AuthError> {
        let users = self.db.users();

        let user = users
            .get_by_username(username)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !user.is_active {
            return Err(AuthError::AccountDisabled);
        }

        if !self.verify_password(password, &user.password_hash)? {
            return Err(AuthError::InvalidCredentials);
        }

        let issued = self.sign_token(&user.id, &user.username, user.is_staff, None)?;
        users.update_last_login(&user.id).await?;

        Ok((user, issued))
    }

    /// Validate a token's signature and expiry, returning its claims
    pub fn verify_token(&self, token: &str) -> Result<TokenClaims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;

        let data = decode::<TokenClaims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret.as_bytes()),
            &validation,
        )
        .map_err(|e| AuthError::InvalidToken(e.to_string()))?;

        Ok(data.claims)
    }

    /// Exchange a still-valid token for a fresh one.
    ///
    /// The original issue time travels with the token; once
    /// `orig_iat + refresh_window` has passed, refresh is refused.
    pub fn refresh_token(&self, token: &str) -> Result<IssuedToken, AuthError> {
        let claims = self.verify_token(token)?;

        let now = Utc::now().timestamp();
        if claims.orig_iat + self.config.refresh_window < now {
            return Err(AuthError::RefreshWindowClosed);
        }

        self.sign_token(&claims.sub, &claims.username, claims.staff, Some(claims.orig_iat))
    }

    /// Sign a token for the given identity
    fn sign_token(
        &self,
        sub: &str,
        username: &str,
        staff: bool,
        orig_iat: Option<i64>,
    ) -> Result<IssuedToken, AuthError> {
        let now = Utc::now();
        let exp = now + Duration::seconds(self.config.token_lifetime);

        let claims = TokenClaims {
            sub: sub.to_string(),
            username: username.to_string(),
            staff,
            exp: exp.timestamp(),
            iat: now.timestamp(),
            orig_iat: orig_iat.unwrap_or_else(|| now.timestamp()),
        };

        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.config.jwt_secret.as_bytes()),
        )
        .map_err(|e| AuthError::Internal(anyhow::anyhow!("Failed to sign token: {}", e)))?;

        Ok(IssuedToken { token, claims })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
    use std::str::FromStr;

    async fn test_service(config: AuthConfig) -> AuthService {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .unwrap()
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .unwrap();
        let db = Database::new(pool);
        crate::db::run_migrations(db.pool()).await.unwrap();
        AuthService::new(db, config)
    }

    fn fast_config() -> AuthConfig {
        // Minimum bcrypt cost keeps the tests quick
        AuthConfig {
            bcrypt_cost: 4,
            ..AuthConfig::default()
        }
    }

    fn sample_user(service: &AuthService, password: &str) -> UserRecord {
        UserRecord {
            id: "user-1".to_string(),
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password_hash: service.hash_password(password).unwrap(),
            first_name: String::new(),
            last_name: String::new(),
            avatar_path: None,
            bio: None,
            location: None,
            website: None,
            is_staff: false,
            is_active: true,
            joined_at: String::new(),
            last_login_at: None,
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    #[tokio::test]
    async fn test_password_hash_and_verify() {
        let service = test_service(fast_config()).await;
        let hashed = service.hash_password("hunter2").unwrap();
        assert_ne!(hashed, "hunter2");
        assert!(service.verify_password("hunter2", &hashed).unwrap());
        assert!(!service.verify_password("wrong", &hashed).unwrap());
    }

    #[tokio::test]
    async fn test_token_roundtrip() {
        let service = test_service(fast_config()).await;
        let user = sample_user(&service, "hunter2");

        let issued = service
            .sign_token(&user.id, &user.username, user.is_staff, None)
            .unwrap();
        let claims = service.verify_token(&issued.token).unwrap();

        assert_eq!(claims.sub, "user-1");
        assert_eq!(claims.username, "alice");
        assert!(!claims.staff);
        assert_eq!(claims.iat, claims.orig_iat);
    }

    #[tokio::test]
    async fn test_tampered_token_rejected() {
        let service = test_service(fast_config()).await;
        let user = sample_user(&service, "hunter2");

        let issued = service
            .sign_token(&user.id, &user.username, user.is_staff, None)
            .unwrap();
        let mut tampered = issued.token.clone();
        // Flip a character in the signature segment
        let flip = if tampered.ends_with('A') { 'B' } else { 'A' };
        tampered.pop();
        tampered.push(flip);

        assert_matches!(
            service.verify_token(&tampered),
            Err(AuthError::InvalidToken(_))
        );
    }

    #[tokio::test]
    async fn test_expired_token_rejected() {
        let config = AuthConfig {
            token_lifetime: -120,
            ..fast_config()
        };
        let service = test_service(config).await;
        let user = sample_user(&service, "hunter2");

        let issued = service
            .sign_token(&user.id, &user.username, user.is_staff, None)
            .unwrap();
        assert_matches!(
            service.verify_token(&issued.token),
            Err(AuthError::InvalidToken(_))
        );
    }

    #[tokio::test]
    async fn test_refresh_preserves_origin() {
        let service = test_service(fast_config()).await;
        let user = sample_user(&service, "hunter2");

        let first = service
            .sign_token(&user.id, &user.username, user.is_staff, None)
            .unwrap();
        let refreshed = service.refresh_token(&first.token).unwrap();

        assert_eq!(refreshed.claims.orig_iat, first.claims.orig_iat);
        assert!(service.verify_token(&refreshed.token).is_ok());
    }

    #[tokio::test]
    async fn test_refresh_window_closes() {
        let config = AuthConfig {
            refresh_window: -1,
            ..fast_config()
        };
        let service = test_service(config).await;
        let user = sample_user(&service, "hunter2");

        let issued = service
            .sign_token(&user.id, &user.username, user.is_staff, None)
            .unwrap();
        assert_matches!(
            service.refresh_token(&issued.token),
            Err(AuthError::RefreshWindowClosed)
        );
    }

    #[tokio::test]
    async fn test_authenticate_against_store() {
        let service = test_service(fast_config()).await;
        let users = service.db.users();

        let hash = service.hash_password("correct horse").unwrap();
        users
            .create(crate::db::CreateUser {
                username: "bob".to_string(),
                email: "bob@example.com".to_string(),
                password_hash: hash,
                first_name: None,
                last_name: None,
                is_staff: false,
            })
            .await
            .unwrap();

        let (user, issued) = service.authenticate("bob", "correct horse").await.unwrap();
        assert_eq!(user.username, "bob");
        assert!(service.verify_token(&issued.token).is_ok());

        assert_matches!(
            service.authenticate("bob", "battery staple").await,
            Err(AuthError::InvalidCredentials)
        );
        assert_matches!(
            service.authenticate("nobody", "whatever").await,
            Err(AuthError::InvalidCredentials)
        );
    }
}
