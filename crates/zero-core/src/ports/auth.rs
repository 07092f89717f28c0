//! Authentication ports.

/// Claims carried by a validated bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenClaims {
    /// Email of the identity the token was issued to.
    pub subject: String,
    pub issued_at: i64,
    pub expires_at: i64,
}

/// Issues and validates signed, time-limited bearer tokens.
///
/// Implementations hold their signing configuration immutably; the current
/// time is read on every call.
pub trait TokenService: Send + Sync {
    /// Issue a token for the given subject email.
    fn generate_token(&self, subject: &str) -> Result<String, AuthError>;

    /// Verify signature and expiry, and decode the claims.
    fn validate_token(&self, token: &str) -> Result<TokenClaims, AuthError>;

    /// Lifetime of freshly issued tokens.
    fn expiration_seconds(&self) -> i64;
}

/// Password hashing service.
pub trait PasswordService: Send + Sync {
    /// Hash a plain text password with a fresh salt.
    fn hash(&self, password: &str) -> Result<String, AuthError>;

    /// Verify a password against a hash. Malformed hashes never match.
    fn verify(&self, password: &str, hash: &str) -> bool;
}

/// Authentication errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Missing authorization header")]
    MissingAuth,

    #[error("Hashing error: {0}")]
    HashingError(String),
}
