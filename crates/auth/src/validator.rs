//! Token verification.
//!
//! The identity provider signs session tokens with HS256; the API only needs
//! to verify the signature and the claim time window.

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use thiserror::Error;

use crate::claims::{SessionClaims, TokenValidationError, validate_claims};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// The token could not be decoded or its signature did not verify.
    #[error("invalid session token")]
    InvalidToken,

    /// The token decoded but its claims are outside their validity window.
    #[error(transparent)]
    Claims(#[from] TokenValidationError),
}

/// Verifies a bearer token and returns its session claims.
pub trait JwtValidator: Send + Sync {
    fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<SessionClaims, AuthError>;
}

/// HS256 validator sharing a secret with the identity provider.
pub struct Hs256JwtValidator {
    key: DecodingKey,
}

impl Hs256JwtValidator {
    pub fn new(secret: Vec<u8>) -> Self {
        Self {
            key: DecodingKey::from_secret(&secret),
        }
    }
}

impl JwtValidator for Hs256JwtValidator {
    fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<SessionClaims, AuthError> {
        // Claims carry RFC3339 timestamps rather than numeric `exp`/`iat`, so
        // the time window is checked by `validate_claims` instead of the decoder.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        let data = jsonwebtoken::decode::<SessionClaims>(token, &self.key, &validation)
            .map_err(|_| AuthError::InvalidToken)?;

        validate_claims(&data.claims, now)?;
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use globaltrade_core::UserId;
    use jsonwebtoken::{EncodingKey, Header};

    fn mint(secret: &str, claims: &SessionClaims) -> String {
        jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .expect("failed to encode jwt")
    }

    fn fresh_claims() -> SessionClaims {
        let now = Utc::now();
        SessionClaims {
            sub: UserId::new(),
            issued_at: now - Duration::minutes(1),
            expires_at: now + Duration::minutes(10),
        }
    }

    #[test]
    fn valid_token_round_trips() {
        let claims = fresh_claims();
        let token = mint("secret", &claims);

        let validator = Hs256JwtValidator::new(b"secret".to_vec());
        let decoded = validator.validate(&token, Utc::now()).unwrap();
        assert_eq!(decoded.sub, claims.sub);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = mint("secret", &fresh_claims());

        let validator = Hs256JwtValidator::new(b"other-secret".to_vec());
        assert_eq!(
            validator.validate(&token, Utc::now()),
            Err(AuthError::InvalidToken)
        );
    }

    #[test]
    fn expired_token_is_rejected() {
        let now = Utc::now();
        let claims = SessionClaims {
            sub: UserId::new(),
            issued_at: now - Duration::hours(2),
            expires_at: now - Duration::hours(1),
        };
        let token = mint("secret", &claims);

        let validator = Hs256JwtValidator::new(b"secret".to_vec());
        assert_eq!(
            validator.validate(&token, now),
            Err(AuthError::Claims(TokenValidationError::Expired))
        );
    }

    #[test]
    fn garbage_token_is_rejected() {
        let validator = Hs256JwtValidator::new(b"secret".to_vec());
        assert_eq!(
            validator.validate("not-a-jwt", Utc::now()),
            Err(AuthError::InvalidToken)
        );
    }
}
