use axum::{
    extract::{FromRequestParts, Query, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use tracing::{debug, warn};

use super::error::AppError;

/// Claims carried by a label service token
///
/// Only `username` is required. `exp` is enforced when present.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<u64>,
}

impl Claims {
    /// Claims for `username` expiring `expires_in_seconds` from now
    #[must_use]
    pub fn new(username: impl Into<String>, expires_in_seconds: u64) -> Self {
        let now = now_timestamp();
        Self { username: username.into(), exp: Some(now + expires_in_seconds), iat: Some(now) }
    }
}

fn now_timestamp() -> u64 {
    chrono::Utc::now().timestamp().max(0) as u64
}

/// Identity attached to a request after its token has been verified
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub username: String,
}

impl From<Claims> for AuthenticatedUser {
    fn from(claims: Claims) -> Self {
        Self { username: claims.username }
    }
}

impl fmt::Display for AuthenticatedUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AuthenticatedUser(username={})", self.username)
    }
}

/// Token verification with the server's symmetric secret
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtService {
    /// Create new JWT service with secret
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.validate_aud = false;
        validation.leeway = 0;
        // Tokens without `exp` are accepted; `username` is checked by deserialization.
        validation.required_spec_claims.clear();

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_ref()),
            decoding_key: DecodingKey::from_secret(secret.as_ref()),
            validation,
        }
    }

    /// Encode claims into JWT token
    pub fn encode_claims(&self, claims: &Claims) -> Result<String, jsonwebtoken::errors::Error> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
    }

    /// Decode JWT token and extract claims
    pub fn decode_token(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|token_data| token_data.claims)
            .map_err(|e| {
                debug!("Failed to decode JWT: {}", e);
                match e.kind() {
                    ErrorKind::ExpiredSignature => AuthError::Expired,
                    _ => AuthError::Invalid,
                }
            })
    }
}

/// Authentication failures, all surfaced as 401
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    #[error("Missing JWT token")]
    MissingToken,

    #[error("JWT token has expired")]
    Expired,

    #[error("Invalid JWT token")]
    Invalid,

    #[error("Invalid username in JWT token")]
    UsernameMismatch,
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        AppError::Authentication { message: err.to_string() }
    }
}

/// Read the token from the `Authorization` header
///
/// Both a raw token and `Bearer <token>` are accepted.
pub fn extract_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers.get(AUTHORIZATION).ok_or(AuthError::MissingToken)?;
    let value = value.to_str().map_err(|_| AuthError::Invalid)?.trim();
    let token = value.strip_prefix("Bearer ").unwrap_or(value).trim();

    if token.is_empty() {
        return Err(AuthError::MissingToken);
    }
    Ok(token)
}

fn authenticate(jwt: &JwtService, headers: &HeaderMap) -> Result<AuthenticatedUser, AuthError> {
    let token = extract_token(headers)?;
    jwt.decode_token(token).map(AuthenticatedUser::from)
}

#[derive(Debug, Deserialize)]
struct IdentityQuery {
    username: Option<String>,
}

/// Reject requests without a valid token
pub async fn require_token(
    State(jwt): State<JwtService>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user = authenticate(&jwt, request.headers())?;

    debug!("Authenticated user: {}", user);
    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}

/// Reject requests whose token identity differs from the `username` query parameter
pub async fn require_matching_username(
    State(jwt): State<JwtService>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user = authenticate(&jwt, request.headers())?;

    let requested = Query::<IdentityQuery>::try_from_uri(request.uri())
        .ok()
        .and_then(|Query(query)| query.username);

    if requested.as_deref() != Some(user.username.as_str()) {
        warn!(
            token_username = %user.username,
            requested_username = ?requested,
            "Token identity does not match requested username"
        );
        return Err(AuthError::UsernameMismatch.into());
    }

    debug!("Authenticated user: {}", user);
    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}

/// Extract the identity inserted by the auth middleware
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or_else(|| AuthError::MissingToken.into())
    }
}
