use axum::{
    Json,
    extract::{FromRef, FromRequestParts},
    http::{StatusCode, header::AUTHORIZATION, request::Parts},
    response::{IntoResponse, Response},
};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::Deserialize;

use crate::config::AuthKey;
use crate::presentation::http::dto::ApiResponse;

/// Claims read from a session token. Clerk only guarantees `sub`; name and
/// email are present when the session template adds them.
#[derive(Debug, Deserialize)]
struct SessionClaims {
    sub: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    email: Option<String>,
}

/// Verifies bearer session tokens locally against a configured key.
#[derive(Clone)]
pub struct TokenVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    pub fn from_auth_key(auth_key: &AuthKey) -> Result<Self, jsonwebtoken::errors::Error> {
        match auth_key {
            AuthKey::ClerkPublicKey(pem) => Ok(Self::new(
                DecodingKey::from_rsa_pem(pem.as_bytes())?,
                Algorithm::RS256,
            )),
            AuthKey::SharedSecret(secret) => Ok(Self::new(
                DecodingKey::from_secret(secret.as_bytes()),
                Algorithm::HS256,
            )),
        }
    }

    fn new(key: DecodingKey, algorithm: Algorithm) -> Self {
        let mut validation = Validation::new(algorithm);
        validation.validate_aud = false;
        validation.set_required_spec_claims(&["exp", "sub"]);
        Self { key, validation }
    }

    pub fn verify(&self, token: &str) -> Result<AuthUser, AuthRejection> {
        let data = decode::<SessionClaims>(token, &self.key, &self.validation).map_err(|e| {
            tracing::debug!(error = %e, "Session token rejected");
            AuthRejection
        })?;

        if data.claims.sub.trim().is_empty() {
            return Err(AuthRejection);
        }

        Ok(AuthUser {
            user_id: data.claims.sub,
            name: data.claims.name,
            email: data.claims.email,
        })
    }
}

/// The caller, as established by a verified session token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: String,
    pub name: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug)]
pub struct AuthRejection;

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        (
            StatusCode::UNAUTHORIZED,
            Json(ApiResponse::<()>::error(
                "UNAUTHENTICATED".to_string(),
                "not authenticated".to_string(),
                None,
            )),
        )
            .into_response()
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    TokenVerifier: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or(AuthRejection)?;

        TokenVerifier::from_ref(state).verify(token)
    }
}
