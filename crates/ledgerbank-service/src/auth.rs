//! Authentication extractor.
//!
//! Requests carry an HS256 bearer token issued by the upstream auth layer. The `sub`
//! claim is the user's UUID.

use std::sync::Arc;

use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use ledgerbank_core::UserId;

use crate::error::ApiError;
use crate::state::AppState;

/// An authenticated user extracted from a bearer token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The user ID.
    pub user_id: UserId,
}

#[async_trait]
impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .ok_or(ApiError::Unauthorized)?;

        let claims = validate_jwt(token, state)?;

        let user_id = claims.sub.parse::<UserId>().map_err(|e| {
            tracing::debug!(error = %e, "Token subject is not a user ID");
            ApiError::Unauthorized
        })?;

        Ok(AuthUser { user_id })
    }
}

/// JWT claims accepted by the service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtClaims {
    /// Subject (user ID).
    pub sub: String,
    /// Expiration time.
    pub exp: i64,
    /// Issued at.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
    /// Issuer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
}

fn validate_jwt(token: &str, state: &AppState) -> Result<JwtClaims, ApiError> {
    let secret = state
        .config
        .jwt_secret
        .as_deref()
        .ok_or(ApiError::Unauthorized)?;

    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_aud = false;
    if let Some(issuer) = &state.config.jwt_issuer {
        validation.set_issuer(&[issuer]);
    }

    let token_data = decode::<JwtClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| {
        tracing::debug!(error = %e, "JWT validation failed");
        ApiError::Unauthorized
    })?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use ledgerbank_store::MemoryStore;

    use crate::config::ServiceConfig;

    const SECRET: &str = "unit-test-secret";

    fn state(issuer: Option<&str>) -> AppState {
        let config = ServiceConfig {
            jwt_secret: Some(SECRET.into()),
            jwt_issuer: issuer.map(String::from),
            ..ServiceConfig::default()
        };
        AppState::new(Arc::new(MemoryStore::new()), config)
    }

    fn token(sub: &str, iss: Option<&str>, secret: &str) -> String {
        let claims = JwtClaims {
            sub: sub.into(),
            exp: chrono::Utc::now().timestamp() + 3600,
            iat: Some(chrono::Utc::now().timestamp()),
            iss: iss.map(String::from),
        };
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn accepts_valid_token() {
        let user_id = UserId::generate();
        let claims = validate_jwt(&token(&user_id.to_string(), None, SECRET), &state(None)).unwrap();
        assert_eq!(claims.sub, user_id.to_string());
    }

    #[test]
    fn rejects_wrong_secret() {
        let user_id = UserId::generate();
        let result = validate_jwt(&token(&user_id.to_string(), None, "other"), &state(None));
        assert!(matches!(result, Err(ApiError::Unauthorized)));
    }

    #[test]
    fn checks_issuer_when_configured() {
        let sub = UserId::generate().to_string();
        let state = state(Some("auth.ledgerbank"));

        assert!(validate_jwt(&token(&sub, Some("auth.ledgerbank"), SECRET), &state).is_ok());
        assert!(validate_jwt(&token(&sub, Some("elsewhere"), SECRET), &state).is_err());
    }

    #[test]
    fn rejects_everything_without_secret() {
        let state = AppState::new(Arc::new(MemoryStore::new()), ServiceConfig::default());
        let sub = UserId::generate().to_string();
        assert!(validate_jwt(&token(&sub, None, SECRET), &state).is_err());
    }
}
