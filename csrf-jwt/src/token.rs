use crate::error::CodecError;
use chrono::{DateTime, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, TokenData, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

/// Claims carried by every CSRF token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CsrfClaims {
    /// Random nonce, unique per token
    pub jti: String,

    /// Name of the cookie the token was issued into
    pub sub: String,

    /// Issued at (unix seconds)
    pub iat: i64,

    /// Expiry (unix seconds)
    pub exp: i64,
}

impl CsrfClaims {
    /// Fresh claims for a token staged under `cookie_name`, valid for `ttl`.
    pub fn new(cookie_name: impl Into<String>, ttl: Duration) -> Self {
        let now = Utc::now().timestamp();
        let ttl = i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX);

        Self {
            jti: Uuid::new_v4().to_string(),
            sub: cookie_name.into(),
            iat: now,
            exp: now.saturating_add(ttl),
        }
    }
}

/// A signed CSRF token together with its decoded claims.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsrfToken {
    value: String,
    claims: CsrfClaims,
}

impl CsrfToken {
    pub fn new(value: String, claims: CsrfClaims) -> Self {
        Self { value, claims }
    }

    /// The encoded token, as sent in the header and cookie
    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn claims(&self) -> &CsrfClaims {
        &self.claims
    }

    pub fn nonce(&self) -> &str {
        &self.claims.jti
    }

    /// Cookie the token belongs in
    pub fn cookie_name(&self) -> &str {
        &self.claims.sub
    }

    pub fn issued_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.claims.iat, 0).unwrap_or_default()
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.claims.exp, 0).unwrap_or_default()
    }

    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at()
    }

    /// Seconds until expiry, floored at zero
    pub fn remaining_secs(&self) -> u64 {
        u64::try_from(self.claims.exp - Utc::now().timestamp()).unwrap_or(0)
    }
}

/// Signing primitive behind the guard.
///
/// [`JwtCodec`] is the stock implementation; anything that can sign claims
/// and later verify them (signature and expiry) can stand in for it.
pub trait TokenCodec: Send + Sync {
    fn sign(&self, claims: &CsrfClaims) -> Result<String, CodecError>;

    fn verify(&self, token: &str) -> Result<CsrfClaims, CodecError>;
}

/// HS256 JWT codec
pub struct JwtCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtCodec {
    pub fn new(secret: &[u8], leeway: u64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = leeway;
        validation.validate_exp = true;
        validation.set_required_spec_claims(&["exp", "iat", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
        }
    }
}

impl TokenCodec for JwtCodec {
    fn sign(&self, claims: &CsrfClaims) -> Result<String, CodecError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| CodecError::Signing(e.to_string()))
    }

    fn verify(&self, token: &str) -> Result<CsrfClaims, CodecError> {
        let token_data: TokenData<CsrfClaims> =
            decode(token, &self.decoding_key, &self.validation).map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => CodecError::Expired,
                ErrorKind::InvalidSignature => CodecError::InvalidSignature,
                _ => CodecError::Malformed(e.to_string()),
            })?;

        Ok(token_data.claims)
    }
}
