/// Authentication Routes
///
/// Sign-up, sign-in and access token refresh. The refresh token only ever
/// travels in the `__refresh_token` HTTP-only cookie.

use actix_web::{web, HttpRequest, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::auth::{hash_password, refresh_token_cookie, validate_refresh_token, REFRESH_TOKEN_COOKIE};
use crate::configuration::{JwtSettings, PasswordSettings};
use crate::domain::{NewUser, PublicUser, User};
use crate::error::{AppError, AuthError, DatabaseError};
use crate::store::UserStore;
use crate::validators::{is_blank, validate_sign_up};

/// User registration request
///
/// Fields are optional so a missing field surfaces as a field error
/// instead of a deserialization failure.
#[derive(Deserialize)]
pub struct SignUpRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// User login request
#[derive(Deserialize)]
pub struct SignInRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: PublicUser,
}

/// Mints both tokens and attaches the refresh cookie.
fn issue_tokens(
    user: &User,
    mut response: actix_web::HttpResponseBuilder,
    jwt_config: &JwtSettings,
) -> Result<HttpResponse, AppError> {
    let access_token = user.access_token(jwt_config)?;
    let refresh_token = user.refresh_token(jwt_config)?;

    Ok(response
        .cookie(refresh_token_cookie(refresh_token, jwt_config))
        .json(AuthResponse {
            token: access_token,
            user: user.omit_password(),
        }))
}

/// POST /sign-up
///
/// # Errors
/// - 400: field validation errors, `{"errorMessage": {field: message}}`
/// - 400: username (any case) or email already registered
/// - 5xx: store failure
#[tracing::instrument(name = "Sign up", skip(form, store, jwt_config, password_config))]
pub async fn sign_up(
    form: web::Json<SignUpRequest>,
    store: web::Data<dyn UserStore>,
    jwt_config: web::Data<JwtSettings>,
    password_config: web::Data<PasswordSettings>,
) -> Result<HttpResponse, AppError> {
    let form = form.into_inner();
    let valid = validate_sign_up(
        form.username.as_deref(),
        form.email.as_deref(),
        form.password.as_deref(),
    )?;

    if store
        .find_by_username_or_email(&valid.username, &valid.email)
        .await?
        .is_some()
    {
        return Err(AuthError::UserAlreadyExists.into());
    }

    let password_hash = hash_password(valid.password, password_config.hash_cost).await?;
    let user = store
        .create(NewUser {
            username: valid.username,
            email: valid.email,
            password_hash,
        })
        .await
        .map_err(|e| match e {
            // lost a race against a concurrent sign-up
            DatabaseError::UniqueViolation(_) => AppError::Auth(AuthError::UserAlreadyExists),
            other => other.into(),
        })?;

    tracing::info!(user_id = %user.id, "User signed up");

    issue_tokens(&user, HttpResponse::Created(), jwt_config.get_ref())
}

/// POST /sign-in
///
/// # Errors
/// - 400 "Invalid credentials": blank email/password, or wrong password
/// - 400 "User does not exist": no user with that email
/// - 5xx: store failure
#[tracing::instrument(name = "Sign in", skip(form, store, jwt_config))]
pub async fn sign_in(
    form: web::Json<SignInRequest>,
    store: web::Data<dyn UserStore>,
    jwt_config: web::Data<JwtSettings>,
) -> Result<HttpResponse, AppError> {
    let form = form.into_inner();
    if is_blank(form.email.as_deref()) || is_blank(form.password.as_deref()) {
        return Err(AuthError::InvalidCredentials.into());
    }
    let email = form.email.unwrap_or_default();
    let password = form.password.unwrap_or_default();

    let user = store
        .find_by_email(email.trim())
        .await?
        .ok_or(AuthError::UserNotFound)?;

    if !user.compare_password(&password).await? {
        return Err(AuthError::InvalidCredentials.into());
    }

    tracing::info!(user_id = %user.id, "User signed in");

    issue_tokens(&user, HttpResponse::Ok(), jwt_config.get_ref())
}

/// POST /refresh
///
/// Mints a fresh access token from the refresh cookie. The cookie itself
/// is not re-issued.
///
/// # Errors
/// - 401 with an empty body for any failure, store failures included
#[tracing::instrument(name = "Refresh access token", skip(req, store, jwt_config))]
pub async fn refresh(
    req: HttpRequest,
    store: web::Data<dyn UserStore>,
    jwt_config: web::Data<JwtSettings>,
) -> Result<HttpResponse, AppError> {
    let cookie = req
        .cookie(REFRESH_TOKEN_COOKIE)
        .ok_or(AuthError::MissingRefreshToken)?;

    let claims = validate_refresh_token(cookie.value(), jwt_config.get_ref())?;
    let user_id = claims.user_id()?;

    let user = store
        .find_by_id(user_id)
        .await
        .map_err(|e| {
            tracing::error!(user_id = %user_id, error = %e, "User lookup failed during refresh");
            AuthError::InvalidRefreshToken
        })?
        .ok_or(AuthError::UnknownSubject)?;

    let token = user.access_token(jwt_config.get_ref())?;

    tracing::info!(user_id = %user.id, "Access token refreshed");

    Ok(HttpResponse::Ok().json(AuthResponse {
        token,
        user: user.omit_password(),
    }))
}
