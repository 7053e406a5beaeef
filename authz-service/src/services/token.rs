use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::config::TokenConfig;

/// Token service for identity token issuance and validation.
///
/// Stateless: there is no revocation list, expiry is the only deactivation
/// mechanism. Rotating the signing secret invalidates every outstanding
/// token.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
    access_token_expiration_ms: i64,
    refresh_token_expiration_ms: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

/// Signed claims carried by every identity token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject (user ID)
    pub sub: String,
    /// Issuer
    pub iss: String,
    /// Issued at (Unix timestamp, milliseconds)
    pub iat: i64,
    /// Expiration time (Unix timestamp, milliseconds)
    pub exp: i64,
    /// Access and refresh tokens are not interchangeable.
    pub typ: TokenType,
}

/// Token validation failures. Fails closed: any verification failure is a
/// rejection, never a partial identity.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TokenError {
    #[error("invalid signature")]
    InvalidSignature,
    #[error("token expired")]
    Expired,
    #[error("wrong issuer")]
    WrongIssuer,
    #[error("wrong token type")]
    WrongTokenType,
}

/// Identity established by a successfully validated token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedToken {
    pub user_id: Uuid,
    pub token_type: TokenType,
}

impl TokenService {
    pub fn new(config: &TokenConfig) -> Result<Self, anyhow::Error> {
        if config.secret.is_empty() {
            anyhow::bail!("token signing secret must not be empty");
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            issuer: config.issuer.clone(),
            access_token_expiration_ms: config.access_token_expiration_ms,
            refresh_token_expiration_ms: config.refresh_token_expiration_ms,
        })
    }

    fn lifetime_ms(&self, token_type: TokenType) -> i64 {
        match token_type {
            TokenType::Access => self.access_token_expiration_ms,
            TokenType::Refresh => self.refresh_token_expiration_ms,
        }
    }

    /// Issue a signed token for the user, valid from `now` for the
    /// configured lifetime of the token type.
    pub fn issue(
        &self,
        user_id: Uuid,
        token_type: TokenType,
        now: DateTime<Utc>,
    ) -> Result<String, anyhow::Error> {
        let expires_at = now + Duration::milliseconds(self.lifetime_ms(token_type));

        let claims = TokenClaims {
            sub: user_id.to_string(),
            iss: self.issuer.clone(),
            iat: now.timestamp_millis(),
            exp: expires_at.timestamp_millis(),
            typ: token_type,
        };

        let header = Header::new(Algorithm::HS256);
        encode(&header, &claims, &self.encoding_key)
            .map_err(|e| anyhow::anyhow!("failed to encode token: {}", e))
    }

    /// Verify signature, issuer, and expiry against the supplied `now`.
    ///
    /// Expiry is checked here rather than by the JWT library so the caller
    /// controls the clock; the bound is exclusive (`now >= exp` fails).
    pub fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<ValidatedToken, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        let data = decode::<TokenClaims>(token, &self.decoding_key, &validation)
            .map_err(|_| TokenError::InvalidSignature)?;
        let claims = data.claims;

        if claims.iss != self.issuer {
            return Err(TokenError::WrongIssuer);
        }

        if now.timestamp_millis() >= claims.exp {
            return Err(TokenError::Expired);
        }

        let user_id = Uuid::parse_str(&claims.sub).map_err(|_| TokenError::InvalidSignature)?;

        Ok(ValidatedToken {
            user_id,
            token_type: claims.typ,
        })
    }

    /// Validate and additionally require a specific token type.
    pub fn validate_typed(
        &self,
        token: &str,
        expected: TokenType,
        now: DateTime<Utc>,
    ) -> Result<ValidatedToken, TokenError> {
        let validated = self.validate(token, now)?;
        if validated.token_type != expected {
            return Err(TokenError::WrongTokenType);
        }
        Ok(validated)
    }
}
