//! Login, token refresh and bearer-token resolution.

use std::sync::Arc;

use crate::domain::User;
use crate::error::DomainError;
use crate::ports::{PasswordService, TokenService, UserRepository};

pub const TOKEN_TYPE: &str = "Bearer";

/// A freshly issued bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessToken {
    pub access_token: String,
    pub token_type: &'static str,
    pub expires_in: i64,
}

pub struct AuthService {
    users: Arc<dyn UserRepository>,
    tokens: Arc<dyn TokenService>,
    passwords: Arc<dyn PasswordService>,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        tokens: Arc<dyn TokenService>,
        passwords: Arc<dyn PasswordService>,
    ) -> Self {
        Self {
            users,
            tokens,
            passwords,
        }
    }

    /// Exchange email and password for a token.
    ///
    /// An unknown email and a wrong password fail the same way.
    pub async fn login(&self, email: &str, password: &str) -> Result<AccessToken, DomainError> {
        let user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or(DomainError::InvalidCredentials)?;

        if !self.passwords.verify(password, &user.password_hash) {
            tracing::debug!(user_id = user.id, "Password mismatch");
            return Err(DomainError::InvalidCredentials);
        }

        self.issue(&user)
    }

    /// Issue a new token for an already authenticated user.
    pub fn refresh(&self, user: &User) -> Result<AccessToken, DomainError> {
        self.issue(user)
    }

    /// Resolve a bearer token to the user it names.
    ///
    /// Every failure - bad signature, expiry, missing subject, unknown
    /// subject - collapses into `Unauthorized`.
    pub async fn resolve(&self, token: &str) -> Result<User, DomainError> {
        let claims = self.tokens.validate_token(token).map_err(|e| {
            tracing::debug!(reason = %e, "Bearer token rejected");
            DomainError::Unauthorized
        })?;

        self.users
            .find_by_email(&claims.subject)
            .await?
            .ok_or_else(|| {
                tracing::debug!("Bearer token names an unknown subject");
                DomainError::Unauthorized
            })
    }

    fn issue(&self, user: &User) -> Result<AccessToken, DomainError> {
        let access_token = self
            .tokens
            .generate_token(&user.email)
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        Ok(AccessToken {
            access_token,
            token_type: TOKEN_TYPE,
            expires_in: self.tokens.expiration_seconds(),
        })
    }
}
