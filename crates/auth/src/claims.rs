use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use unshift_core::{DomainError, UserId};

use crate::Principal;

/// JWT claims model.
///
/// Mirrors the identity the token was issued for; the role flag travels in the
/// token so request handling never needs a user lookup to authorize.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JwtClaims {
    pub id: UserId,
    pub email: String,
    pub username: String,
    pub is_manager: bool,

    /// Issued-at timestamp.
    #[serde(with = "chrono::serde::ts_seconds")]
    pub iat: DateTime<Utc>,

    /// Expiration timestamp.
    #[serde(with = "chrono::serde::ts_seconds")]
    pub exp: DateTime<Utc>,
}

impl JwtClaims {
    pub fn into_principal(self) -> Principal {
        Principal {
            id: self.id,
            email: self.email,
            username: self.username,
            is_manager: self.is_manager,
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenValidationError {
    #[error("token has expired")]
    Expired,

    #[error("token not yet valid (iat is in the future)")]
    NotYetValid,

    #[error("invalid token time window (exp <= iat)")]
    InvalidTimeWindow,

    #[error("malformed or unsigned token: {0}")]
    Malformed(String),

    #[error("failed to sign token: {0}")]
    Signing(String),
}

impl From<TokenValidationError> for DomainError {
    fn from(value: TokenValidationError) -> Self {
        match value {
            TokenValidationError::Signing(msg) => DomainError::internal(msg),
            other => DomainError::unauthenticated(other.to_string()),
        }
    }
}

/// Deterministically validate the claim time window.
///
/// Signature checks happen in [`JwtValidator::validate`] before this runs.
pub fn validate_claims(claims: &JwtClaims, now: DateTime<Utc>) -> Result<(), TokenValidationError> {
    if claims.exp <= claims.iat {
        return Err(TokenValidationError::InvalidTimeWindow);
    }
    if now < claims.iat {
        return Err(TokenValidationError::NotYetValid);
    }
    if now >= claims.exp {
        return Err(TokenValidationError::Expired);
    }
    Ok(())
}

/// Verifies a bearer credential.
pub trait JwtValidator: Send + Sync {
    fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<JwtClaims, TokenValidationError>;

    /// Verify and resolve straight to a [`Principal`].
    fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<Principal, TokenValidationError> {
        self.validate(token, now).map(JwtClaims::into_principal)
    }
}

/// Mints bearer credentials.
pub trait TokenIssuer: Send + Sync {
    fn issue(&self, principal: &Principal, now: DateTime<Utc>) -> Result<String, TokenValidationError>;
}

/// HMAC-SHA256 signed tokens with a fixed lifetime.
#[derive(Clone)]
pub struct Hs256Jwt {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl core::fmt::Debug for Hs256Jwt {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Hs256Jwt").field("ttl", &self.ttl).finish_non_exhaustive()
    }
}

impl Hs256Jwt {
    /// Tokens live ten days unless configured otherwise.
    pub const DEFAULT_TTL_HOURS: i64 = 240;

    pub fn new(secret: &[u8]) -> Self {
        Self::with_ttl(secret, Duration::hours(Self::DEFAULT_TTL_HOURS))
    }

    pub fn with_ttl(secret: &[u8], ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn claims_for(&self, principal: &Principal, now: DateTime<Utc>) -> JwtClaims {
        JwtClaims {
            id: principal.id,
            email: principal.email.clone(),
            username: principal.username.clone(),
            is_manager: principal.is_manager,
            iat: now,
            exp: now + self.ttl,
        }
    }

    fn validation() -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        // Time checks run in `validate_claims` against the caller's clock.
        validation.validate_exp = false;
        validation.required_spec_claims.clear();
        validation
    }
}

impl JwtValidator for Hs256Jwt {
    fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<JwtClaims, TokenValidationError> {
        let data = jsonwebtoken::decode::<JwtClaims>(token, &self.decoding, &Self::validation())
            .map_err(|e| TokenValidationError::Malformed(e.to_string()))?;
        validate_claims(&data.claims, now)?;
        Ok(data.claims)
    }
}

impl TokenIssuer for Hs256Jwt {
    fn issue(&self, principal: &Principal, now: DateTime<Utc>) -> Result<String, TokenValidationError> {
        let claims = self.claims_for(principal, now);
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| TokenValidationError::Signing(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use unshift_core::ErrorKind;

    fn principal(is_manager: bool) -> Principal {
        Principal {
            id: UserId::new(),
            email: "ann@example.com".to_string(),
            username: "ann".to_string(),
            is_manager,
        }
    }

    #[test]
    fn issued_token_verifies_to_same_principal() {
        let jwt = Hs256Jwt::new(b"secret");
        let now = Utc::now();
        let p = principal(true);

        let token = jwt.issue(&p, now).unwrap();
        let verified = jwt.verify(&token, now + Duration::minutes(1)).unwrap();

        assert_eq!(verified, p);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let now = Utc::now();
        let token = Hs256Jwt::new(b"secret").issue(&principal(false), now).unwrap();

        let err = Hs256Jwt::new(b"other").verify(&token, now).unwrap_err();
        assert!(matches!(err, TokenValidationError::Malformed(_)));
    }

    #[test]
    fn expired_token_is_rejected() {
        let jwt = Hs256Jwt::with_ttl(b"secret", Duration::minutes(5));
        let now = Utc::now();
        let token = jwt.issue(&principal(false), now).unwrap();

        let err = jwt.verify(&token, now + Duration::minutes(6)).unwrap_err();
        assert_eq!(err, TokenValidationError::Expired);
        assert_eq!(DomainError::from(err).kind(), ErrorKind::Unauthenticated);
    }

    #[test]
    fn garbage_token_is_malformed() {
        let jwt = Hs256Jwt::new(b"secret");
        assert!(matches!(
            jwt.verify("not.a.token", Utc::now()),
            Err(TokenValidationError::Malformed(_))
        ));
    }

    #[test]
    fn claims_time_window_rules() {
        let now = Utc::now();
        let mut claims = Hs256Jwt::new(b"s").claims_for(&principal(false), now);

        assert_eq!(validate_claims(&claims, now - Duration::seconds(1)), Err(TokenValidationError::NotYetValid));
        assert!(validate_claims(&claims, now).is_ok());

        claims.exp = claims.iat;
        assert_eq!(validate_claims(&claims, now), Err(TokenValidationError::InvalidTimeWindow));
    }

    #[test]
    fn claims_use_camel_case_and_epoch_seconds() {
        let now = Utc::now();
        let claims = Hs256Jwt::new(b"s").claims_for(&principal(true), now);
        let json = serde_json::to_value(&claims).unwrap();

        assert_eq!(json["isManager"], true);
        assert_eq!(json["iat"].as_i64().unwrap(), now.timestamp());
    }
}
