/// Refresh token cookie
use actix_web::cookie::time::{Date, Duration, OffsetDateTime};
use actix_web::cookie::Cookie;

use crate::configuration::JwtSettings;

pub const REFRESH_TOKEN_COOKIE: &str = "__refresh_token";

/// Builds the HTTP-only cookie carrying the refresh token, expiring
/// `refresh_token_expiry_days` from now. Horizons past the calendar's
/// end clamp to its last day.
pub fn refresh_token_cookie(token: String, config: &JwtSettings) -> Cookie<'static> {
    let expires = OffsetDateTime::now_utc()
        .checked_add(Duration::seconds(config.refresh_token_expiry_seconds()))
        .unwrap_or_else(|| Date::MAX.midnight().assume_utc());

    Cookie::build(REFRESH_TOKEN_COOKIE, token)
        .http_only(true)
        .path("/")
        .expires(expires)
        .finish()
}
