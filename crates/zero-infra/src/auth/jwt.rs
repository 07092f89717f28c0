//! JWT token service implementation.

use chrono::{DateTime, TimeDelta, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use zero_core::ports::{AuthError, TokenClaims, TokenService};

const DEFAULT_SECRET: &str = "change-me-in-production";

/// JWT signing configuration. Built once at startup and never mutated.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub algorithm: Algorithm,
    pub expiration_minutes: i64,
    pub issuer: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: DEFAULT_SECRET.to_string(),
            algorithm: Algorithm::HS256,
            expiration_minutes: 30,
            issuer: "zero-api".to_string(),
        }
    }
}

impl JwtConfig {
    /// Load from `JWT_SECRET`, `JWT_ALGORITHM`, `JWT_EXPIRATION_MINUTES` and
    /// `JWT_ISSUER`, falling back to the defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let secret = std::env::var("JWT_SECRET").unwrap_or(defaults.secret);

        // Warn if using default secret in production
        if secret == DEFAULT_SECRET {
            let is_production = std::env::var("RUST_ENV")
                .map(|v| v == "production" || v == "prod")
                .unwrap_or(false);

            if is_production {
                tracing::error!(
                    "SECURITY: Using default JWT secret in production! Set JWT_SECRET environment variable."
                );
            } else {
                tracing::warn!("Using default JWT secret. Set JWT_SECRET for production use.");
            }
        }

        let algorithm = match std::env::var("JWT_ALGORITHM") {
            Ok(name) => parse_hmac_algorithm(&name).unwrap_or_else(|| {
                tracing::warn!(algorithm = %name, "Unsupported JWT_ALGORITHM, using HS256");
                Algorithm::HS256
            }),
            Err(_) => defaults.algorithm,
        };

        Self {
            secret,
            algorithm,
            expiration_minutes: std::env::var("JWT_EXPIRATION_MINUTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.expiration_minutes),
            issuer: std::env::var("JWT_ISSUER").unwrap_or(defaults.issuer),
        }
    }
}

/// Only shared-secret algorithms make sense with a single secret string.
fn parse_hmac_algorithm(name: &str) -> Option<Algorithm> {
    match name.to_ascii_uppercase().as_str() {
        "HS256" => Some(Algorithm::HS256),
        "HS384" => Some(Algorithm::HS384),
        "HS512" => Some(Algorithm::HS512),
        _ => None,
    }
}

/// Internal JWT claims structure for serialization.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    sub: Option<String>, // subject email
    exp: i64, // expiration timestamp
    #[serde(default)]
    iat: i64, // issued at
    iss: String,
}

/// JWT-based token service.
pub struct JwtTokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    config: JwtConfig,
}

impl JwtTokenService {
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        let mut validation = Validation::new(config.algorithm);
        validation.set_issuer(&[&config.issuer]);
        validation.leeway = 0;

        Self {
            encoding_key,
            decoding_key,
            validation,
            config,
        }
    }

    fn generate_token_at(&self, subject: &str, now: DateTime<Utc>) -> Result<String, AuthError> {
        let exp = now + TimeDelta::minutes(self.config.expiration_minutes);

        let claims = Claims {
            sub: Some(subject.to_string()),
            exp: exp.timestamp(),
            iat: now.timestamp(),
            iss: self.config.issuer.clone(),
        };

        encode(
            &Header::new(self.config.algorithm),
            &claims,
            &self.encoding_key,
        )
        .map_err(|e| AuthError::InvalidToken(e.to_string()))
    }
}

impl TokenService for JwtTokenService {
    fn generate_token(&self, subject: &str) -> Result<String, AuthError> {
        self.generate_token_at(subject, Utc::now())
    }

    fn validate_token(&self, token: &str) -> Result<TokenClaims, AuthError> {
        let token_data =
            decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
                match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                    _ => AuthError::InvalidToken(e.to_string()),
                }
            })?;

        let claims = token_data.claims;
        let subject = claims
            .sub
            .filter(|s| !s.is_empty())
            .ok_or_else(|| AuthError::InvalidToken("missing subject".to_string()))?;

        Ok(TokenClaims {
            subject,
            issued_at: claims.iat,
            expires_at: claims.exp,
        })
    }

    fn expiration_seconds(&self) -> i64 {
        self.config.expiration_minutes * 60
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret-key".to_string(),
            algorithm: Algorithm::HS256,
            expiration_minutes: 30,
            issuer: "test-issuer".to_string(),
        }
    }

    fn sign(claims: &serde_json::Value, secret: &str) -> String {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn test_round_trip_returns_subject() {
        let service = JwtTokenService::new(test_config());

        let token = service.generate_token("test@example.com").unwrap();
        let claims = service.validate_token(&token).unwrap();

        assert_eq!(claims.subject, "test@example.com");
        assert_eq!(claims.expires_at - claims.issued_at, 30 * 60);
    }

    #[test]
    fn test_token_expires_after_ttl() {
        let service = JwtTokenService::new(test_config());
        let issued = Utc::now() - TimeDelta::minutes(31);

        let token = service.generate_token_at("test@example.com", issued).unwrap();

        assert!(matches!(
            service.validate_token(&token),
            Err(AuthError::TokenExpired)
        ));
    }

    #[test]
    fn test_token_still_valid_inside_ttl() {
        let service = JwtTokenService::new(test_config());
        let issued = Utc::now() - TimeDelta::minutes(29);

        let token = service.generate_token_at("test@example.com", issued).unwrap();

        assert!(service.validate_token(&token).is_ok());
    }

    #[test]
    fn test_validate_invalid_token() {
        let service = JwtTokenService::new(test_config());

        let result = service.validate_token("invalid-token");

        assert!(matches!(result.unwrap_err(), AuthError::InvalidToken(_)));
    }

    #[test]
    fn test_validate_wrong_secret() {
        let service = JwtTokenService::new(test_config());
        let forged = JwtTokenService::new(JwtConfig {
            secret: "another-secret".to_string(),
            ..test_config()
        });

        let token = forged.generate_token("test@example.com").unwrap();

        assert!(matches!(
            service.validate_token(&token),
            Err(AuthError::InvalidToken(_))
        ));
    }

    #[test]
    fn test_validate_wrong_issuer_token() {
        let service1 = JwtTokenService::new(JwtConfig {
            issuer: "issuer1".to_string(),
            ..test_config()
        });
        let service2 = JwtTokenService::new(JwtConfig {
            issuer: "issuer2".to_string(),
            ..test_config()
        });

        let token = service1.generate_token("test@test.com").unwrap();

        assert!(service2.validate_token(&token).is_err());
    }

    #[test]
    fn test_validate_missing_subject() {
        let service = JwtTokenService::new(test_config());
        let exp = (Utc::now() + TimeDelta::minutes(5)).timestamp();

        let token = sign(
            &serde_json::json!({ "exp": exp, "iss": "test-issuer" }),
            "test-secret-key",
        );

        assert!(matches!(
            service.validate_token(&token),
            Err(AuthError::InvalidToken(_))
        ));
    }

    #[test]
    fn test_validate_empty_subject() {
        let service = JwtTokenService::new(test_config());
        let exp = (Utc::now() + TimeDelta::minutes(5)).timestamp();

        let token = sign(
            &serde_json::json!({ "sub": "", "exp": exp, "iss": "test-issuer" }),
            "test-secret-key",
        );

        assert!(matches!(
            service.validate_token(&token),
            Err(AuthError::InvalidToken(_))
        ));
    }

    #[test]
    fn test_validate_rejects_other_algorithm() {
        let service = JwtTokenService::new(test_config());
        let exp = (Utc::now() + TimeDelta::minutes(5)).timestamp();

        let token = encode(
            &Header::new(Algorithm::HS512),
            &serde_json::json!({ "sub": "a@b.com", "exp": exp, "iss": "test-issuer" }),
            &EncodingKey::from_secret(b"test-secret-key"),
        )
        .unwrap();

        assert!(service.validate_token(&token).is_err());
    }

    #[test]
    fn test_expiration_seconds() {
        let service = JwtTokenService::new(test_config());

        assert_eq!(service.expiration_seconds(), 1800);
    }

    #[test]
    fn test_parse_hmac_algorithm() {
        assert_eq!(parse_hmac_algorithm("hs384"), Some(Algorithm::HS384));
        assert_eq!(parse_hmac_algorithm("RS256"), None);
    }
}
