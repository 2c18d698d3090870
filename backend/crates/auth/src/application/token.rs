//! Token Issuer
//!
//! HS256 JWTs with claims `{ userId, jti, iat, exp }`. Access and refresh
//! tokens are signed with different secrets, so neither verifies as the
//! other. Verification allows no clock leeway.

use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::config::AuthConfig;
use crate::domain::value_object::UserId;
use crate::error::{AuthError, AuthResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    #[serde(rename = "userId")]
    pub user_id: Uuid,
    /// Random per token; two tokens minted in the same second still differ
    pub jti: Uuid,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn user_id(&self) -> UserId {
        UserId::from_uuid(self.user_id)
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        Utc.timestamp_opt(self.exp, 0)
            .single()
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }
}

/// Signed token plus the claims inside it.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub claims: Claims,
}

#[derive(Clone)]
struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenKeys {
    fn new(secret: &str, ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }
}

#[derive(Clone)]
pub struct TokenIssuer {
    access: TokenKeys,
    refresh: TokenKeys,
    validation: Validation,
}

impl TokenIssuer {
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        Self {
            access: TokenKeys::new(&config.access_token_secret, config.access_token_ttl),
            refresh: TokenKeys::new(&config.refresh_token_secret, config.refresh_token_ttl),
            validation,
        }
    }

    pub fn issue_access_token(&self, user_id: &UserId) -> AuthResult<IssuedToken> {
        Self::issue(&self.access, user_id)
    }

    pub fn issue_refresh_token(&self, user_id: &UserId) -> AuthResult<IssuedToken> {
        Self::issue(&self.refresh, user_id)
    }

    pub fn verify_access_token(&self, token: &str) -> AuthResult<Claims> {
        self.verify(&self.access, token)
    }

    pub fn verify_refresh_token(&self, token: &str) -> AuthResult<Claims> {
        self.verify(&self.refresh, token)
    }

    fn issue(keys: &TokenKeys, user_id: &UserId) -> AuthResult<IssuedToken> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            user_id: *user_id.as_uuid(),
            jti: Uuid::new_v4(),
            iat: now,
            exp: now + keys.ttl.as_secs() as i64,
        };
        let token = Self::sign(keys, &claims)?;
        Ok(IssuedToken { token, claims })
    }

    fn sign(keys: &TokenKeys, claims: &Claims) -> AuthResult<String> {
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), claims, &keys.encoding)
            .map_err(AuthError::TokenSigning)
    }

    fn verify(&self, keys: &TokenKeys, token: &str) -> AuthResult<Claims> {
        jsonwebtoken::decode::<Claims>(token, &keys.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!(error = %e, "Token verification failed");
                AuthError::Unauthorized
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issuer() -> TokenIssuer {
        TokenIssuer::new(&AuthConfig::new("access-secret", "refresh-secret"))
    }

    #[test]
    fn test_access_roundtrip() {
        let issuer = issuer();
        let user_id = UserId::new();
        let issued = issuer.issue_access_token(&user_id).unwrap();

        let claims = issuer.verify_access_token(&issued.token).unwrap();
        assert_eq!(claims.user_id(), user_id);
        assert_eq!(claims.exp - claims.iat, 900);
        assert_eq!(claims, issued.claims);
    }

    #[test]
    fn test_refresh_lifetime() {
        let issued = issuer().issue_refresh_token(&UserId::new()).unwrap();
        assert_eq!(issued.claims.exp - issued.claims.iat, 7 * 24 * 3600);
    }

    #[test]
    fn test_token_ids_are_unique() {
        let issuer = issuer();
        let user_id = UserId::new();
        let a = issuer.issue_refresh_token(&user_id).unwrap();
        let b = issuer.issue_refresh_token(&user_id).unwrap();
        assert_ne!(a.claims.jti, b.claims.jti);
        assert_ne!(a.token, b.token);
    }

    #[test]
    fn test_classes_do_not_cross_verify() {
        let issuer = issuer();
        let user_id = UserId::new();
        let access = issuer.issue_access_token(&user_id).unwrap();
        let refresh = issuer.issue_refresh_token(&user_id).unwrap();

        assert!(matches!(
            issuer.verify_refresh_token(&access.token),
            Err(AuthError::Unauthorized)
        ));
        assert!(matches!(
            issuer.verify_access_token(&refresh.token),
            Err(AuthError::Unauthorized)
        ));
    }

    #[test]
    fn test_expired_token_rejected() {
        let issuer = issuer();
        let now = Utc::now().timestamp();
        let claims = Claims {
            user_id: Uuid::new_v4(),
            jti: Uuid::new_v4(),
            iat: now - 1000,
            exp: now - 100,
        };
        let token = TokenIssuer::sign(&issuer.access, &claims).unwrap();
        assert!(matches!(
            issuer.verify_access_token(&token),
            Err(AuthError::Unauthorized)
        ));
    }

    #[test]
    fn test_garbage_rejected() {
        assert!(issuer().verify_access_token("not.a.jwt").is_err());
        assert!(issuer().verify_access_token("").is_err());
    }

    #[test]
    fn test_claims_wire_names() {
        let issued = issuer().issue_access_token(&UserId::new()).unwrap();
        let json = serde_json::to_value(&issued.claims).unwrap();
        assert!(json.get("userId").is_some());
        assert!(json.get("jti").is_some());
        assert!(json.get("user_id").is_none());
    }
}
