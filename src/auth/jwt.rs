/// JWT Token Generation and Validation
///
/// Access and refresh tokens are both HS256 JWTs signed with `jwt.secret`;
/// they differ in lifetime and in the `typ` claim.

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::auth::claims::{Claims, TokenKind};
use crate::configuration::JwtSettings;
use crate::error::{AppError, AuthError};

/// Generate a new access token for a user
///
/// # Errors
/// Returns error if token generation fails
pub fn generate_access_token(
    user_id: &Uuid,
    username: &str,
    config: &JwtSettings,
) -> Result<String, AppError> {
    sign(
        Claims::new(
            *user_id,
            username.to_string(),
            TokenKind::Access,
            config.access_token_expiry,
            config.issuer.clone(),
        ),
        config,
    )
}

/// Generate a new refresh token for a user
///
/// Lives for `refresh_token_expiry_days`, the same horizon as the cookie
/// carrying it.
pub fn generate_refresh_token(
    user_id: &Uuid,
    username: &str,
    config: &JwtSettings,
) -> Result<String, AppError> {
    sign(
        Claims::new(
            *user_id,
            username.to_string(),
            TokenKind::Refresh,
            config.refresh_token_expiry_seconds(),
            config.issuer.clone(),
        ),
        config,
    )
}

fn sign(claims: Claims, config: &JwtSettings) -> Result<String, AppError> {
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(format!("Token generation failed: {}", e)))
}

/// Validate a token and check it is of the expected kind
///
/// # Errors
/// `AuthError::InvalidRefreshToken` if the token is malformed, tampered
/// with, expired, from another issuer or of the wrong kind.
pub fn validate_token(
    token: &str,
    expected: TokenKind,
    config: &JwtSettings,
) -> Result<Claims, AuthError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[&config.issuer]);

    let claims = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| {
        tracing::warn!("JWT validation error: {}", e);
        AuthError::InvalidRefreshToken
    })?;

    if claims.typ != expected {
        tracing::warn!(token_kind = ?claims.typ, "Unexpected token kind");
        return Err(AuthError::InvalidRefreshToken);
    }

    Ok(claims)
}

/// Validate a refresh token taken from the cookie
pub fn validate_refresh_token(token: &str, config: &JwtSettings) -> Result<Claims, AuthError> {
    validate_token(token, TokenKind::Refresh, config)
}
