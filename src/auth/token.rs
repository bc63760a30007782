use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, instrument};

use super::types::Claims;
use crate::shared::AppError;

/// Lifetime of every issued token
pub const TOKEN_TTL_MINUTES: i64 = 10;

/// Source of the current time for issuance and expiry checks
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum AuthError {
    /// Bad signature, malformed payload and expiry all collapse here
    #[error("Invalid token")]
    InvalidToken,

    #[error("Could not create token: {0}")]
    Signing(String),
}

impl From<AuthError> for AppError {
    fn from(error: AuthError) -> Self {
        match error {
            AuthError::InvalidToken => AppError::Unauthorized("Invalid token".to_string()),
            AuthError::Signing(msg) => AppError::JwtError(msg),
        }
    }
}

/// Issues and verifies HS256 tokens with one key for the life of the process
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    clock: Arc<dyn Clock>,
}

impl TokenService {
    pub fn new(secret: &str) -> Self {
        Self::with_clock(secret, Arc::new(SystemClock))
    }

    pub fn with_clock(secret: &str, clock: Arc<dyn Clock>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked against the injected clock in `verify`.
        validation.validate_exp = false;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            clock,
        }
    }

    /// Creates a signed token that expires ten minutes from now
    #[instrument(skip(self, role))]
    pub fn issue(&self, username: &str, role: &str) -> Result<String, AuthError> {
        let now = self.clock.now();
        let exp = (now + Duration::minutes(TOKEN_TTL_MINUTES)).timestamp() as usize;

        debug!(exp_timestamp = exp, "Issuing token");

        let claims = Claims {
            username: username.to_string(),
            role: role.to_string(),
            exp,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key).map_err(|e| {
            debug!(error = %e, "Failed to sign token");
            AuthError::Signing(e.to_string())
        })
    }

    /// Checks signature and expiry, returning the claims only when both hold
    #[instrument(skip(self, token))]
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                debug!(error = %e, "Failed to decode token");
                AuthError::InvalidToken
            })?;

        let now = self.clock.now().timestamp();
        if now >= claims.exp as i64 {
            debug!(exp = claims.exp, now, "Token has expired");
            return Err(AuthError::InvalidToken);
        }

        debug!(username = %claims.username, role = %claims.role, "Token verified");
        Ok(claims)
    }
}
