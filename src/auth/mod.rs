/// Authentication module
///
/// Handles JWT token generation/validation, password hashing,
/// and the refresh token cookie.

mod claims;
mod cookie;
mod jwt;
mod password;

pub use claims::{Claims, TokenKind};
pub use cookie::{refresh_token_cookie, REFRESH_TOKEN_COOKIE};
pub use jwt::{generate_access_token, generate_refresh_token, validate_refresh_token, validate_token};
pub use password::{hash_password, verify_password};
