mod auth;
mod health_check;

pub use auth::{refresh, sign_in, sign_up, AuthResponse, SignInRequest, SignUpRequest};
pub use health_check::health_check;
