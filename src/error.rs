/// Error Handling Module
///
/// Every handler returns `Result<HttpResponse, AppError>`. Domain errors
/// (validation, authentication) map to the short `{"errorMessage": ...}`
/// bodies clients rely on; everything else falls through to the generic
/// handler, which logs it with an error id and answers with an
/// `ErrorResponse` envelope carrying the same id. The log line also sits
/// inside the request span, so it can be joined to `request_id`.

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use std::collections::BTreeMap;
use std::error::Error as StdError;
use std::fmt;

/// ============================================================================
/// 1. DOMAIN-SPECIFIC ERROR TYPES
/// ============================================================================

/// Per-field validation failures, keyed by field name.
///
/// Ordered so the JSON body is stable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<&'static str, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        // first failure per field wins
        self.0.entry(field).or_insert_with(|| message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.0.keys().copied()
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .0
            .iter()
            .map(|(field, msg)| format!("{}: {}", field, msg))
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "Validation failed ({})", joined)
    }
}

impl StdError for FieldErrors {}

/// Database operation errors
#[derive(Debug)]
pub enum DatabaseError {
    UniqueViolation(String),
    ConnectionPool(String),
    QueryExecution(String),
    Migration(String),
}

impl fmt::Display for DatabaseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatabaseError::UniqueViolation(msg) => write!(f, "Duplicate entry: {}", msg),
            DatabaseError::ConnectionPool(msg) => write!(f, "Database connection error: {}", msg),
            DatabaseError::QueryExecution(msg) => write!(f, "Query error: {}", msg),
            DatabaseError::Migration(msg) => write!(f, "Migration error: {}", msg),
        }
    }
}

impl StdError for DatabaseError {}

impl From<sqlx::Error> for DatabaseError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("23505") => {
                DatabaseError::UniqueViolation(db_err.message().to_string())
            }
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                DatabaseError::ConnectionPool(err.to_string())
            }
            _ => DatabaseError::QueryExecution(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DatabaseError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DatabaseError::Migration(err.to_string())
    }
}

/// Authentication errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    /// Sign-up collided with an existing username or email
    UserAlreadyExists,
    /// Sign-in email matched no user
    UserNotFound,
    InvalidCredentials,
    MissingRefreshToken,
    InvalidRefreshToken,
    /// Refresh token subject no longer exists
    UnknownSubject,
}

impl AuthError {
    /// Client-facing message, `None` for errors answered with an empty body.
    pub fn message(&self) -> Option<&'static str> {
        match self {
            AuthError::UserAlreadyExists => Some("User already exists"),
            AuthError::UserNotFound => Some("User does not exist"),
            AuthError::InvalidCredentials => Some("Invalid credentials"),
            AuthError::MissingRefreshToken
            | AuthError::InvalidRefreshToken
            | AuthError::UnknownSubject => None,
        }
    }
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::UserAlreadyExists => write!(f, "User already exists"),
            AuthError::UserNotFound => write!(f, "User does not exist"),
            AuthError::InvalidCredentials => write!(f, "Invalid credentials"),
            AuthError::MissingRefreshToken => write!(f, "Missing refresh token"),
            AuthError::InvalidRefreshToken => write!(f, "Invalid or expired refresh token"),
            AuthError::UnknownSubject => write!(f, "Refresh token references unknown user"),
        }
    }
}

impl StdError for AuthError {}

/// ============================================================================
/// 2. UNIFIED APPLICATION ERROR TYPE
/// ============================================================================

#[derive(Debug)]
pub enum AppError {
    Validation(FieldErrors),
    /// Malformed request body
    BadRequest(String),
    Auth(AuthError),
    Database(DatabaseError),
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Validation(e) => write!(f, "{}", e),
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::Auth(e) => write!(f, "{}", e),
            AppError::Database(e) => write!(f, "{}", e),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl StdError for AppError {}

// ============================================================================
// FROM IMPLEMENTATIONS
// ============================================================================

impl From<FieldErrors> for AppError {
    fn from(err: FieldErrors) -> Self {
        AppError::Validation(err)
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        AppError::Auth(err)
    }
}

impl From<DatabaseError> for AppError {
    fn from(err: DatabaseError) -> Self {
        AppError::Database(err)
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Database(err.into())
    }
}

impl From<actix_web::error::BlockingError> for AppError {
    fn from(err: actix_web::error::BlockingError) -> Self {
        AppError::Internal(format!("Blocking task failed: {}", err))
    }
}

// ============================================================================
// 3. HTTP RESPONSE MAPPING
// ============================================================================

/// Generic error envelope for failures the handlers do not own
#[derive(Debug, serde::Serialize)]
pub struct ErrorResponse {
    /// Id of this error, also present as `error_id` in its log line
    pub error_id: String,
    pub message: String,
    pub code: String,
    pub status: u16,
    pub timestamp: String,
}

impl ErrorResponse {
    pub fn new(error_id: String, message: String, code: String, status: u16) -> Self {
        Self {
            error_id,
            message,
            code,
            status,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

impl AppError {
    fn log_error(&self, error_id: &str) {
        match self {
            AppError::Validation(e) => {
                tracing::warn!(error_id = error_id, error = %e, "Validation error");
            }
            AppError::BadRequest(msg) => {
                tracing::warn!(error_id = error_id, error = %msg, "Malformed request");
            }
            AppError::Auth(e) => {
                tracing::warn!(error_id = error_id, error = %e, "Authentication error");
            }
            AppError::Database(e) => {
                tracing::error!(error_id = error_id, error = %e, "Database error");
            }
            AppError::Internal(msg) => {
                tracing::error!(error_id = error_id, error = %msg, "Internal error");
            }
        }
    }

    /// Code and client-safe message for the generic envelope.
    fn generic_parts(&self) -> (&'static str, String) {
        match self {
            AppError::Database(DatabaseError::ConnectionPool(_)) => (
                "SERVICE_UNAVAILABLE",
                "Database service temporarily unavailable".to_string(),
            ),
            AppError::Database(_) => ("DATABASE_ERROR", "Database error occurred".to_string()),
            _ => ("INTERNAL_ERROR", "Internal server error".to_string()),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Auth(e) => match e {
                AuthError::UserAlreadyExists
                | AuthError::UserNotFound
                | AuthError::InvalidCredentials => StatusCode::BAD_REQUEST,
                AuthError::MissingRefreshToken
                | AuthError::InvalidRefreshToken
                | AuthError::UnknownSubject => StatusCode::UNAUTHORIZED,
            },
            AppError::Database(DatabaseError::ConnectionPool(_)) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            AppError::Database(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let error_id = uuid::Uuid::new_v4().to_string();
        self.log_error(&error_id);

        let status = self.status_code();
        match self {
            AppError::Validation(errors) => {
                let fields: serde_json::Map<String, serde_json::Value> = errors
                    .0
                    .iter()
                    .map(|(field, msg)| (field.to_string(), serde_json::Value::from(msg.as_str())))
                    .collect();
                HttpResponse::build(status).json(serde_json::json!({ "errorMessage": fields }))
            }
            AppError::BadRequest(msg) => {
                HttpResponse::build(status).json(serde_json::json!({ "errorMessage": msg }))
            }
            AppError::Auth(e) => match e.message() {
                Some(msg) => {
                    HttpResponse::build(status).json(serde_json::json!({ "errorMessage": msg }))
                }
                None => HttpResponse::build(status).finish(),
            },
            _ => {
                let (code, message) = self.generic_parts();
                HttpResponse::build(status).json(ErrorResponse::new(
                    error_id,
                    message,
                    code.to_string(),
                    status.as_u16(),
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::MessageBody;

    fn body_json(response: HttpResponse) -> serde_json::Value {
        let bytes = response.into_body().try_into_bytes().unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_field_errors_keep_first_message() {
        let mut errors = FieldErrors::new();
        errors.add("email", "email is required");
        errors.add("email", "email has invalid format");
        assert_eq!(errors.get("email"), Some("email is required"));
    }

    #[test]
    fn test_validation_error_lists_fields() {
        let mut errors = FieldErrors::new();
        errors.add("username", "username is required");
        errors.add("password", "password is required");
        let err = AppError::from(errors);

        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        let body = body_json(err.error_response());
        assert_eq!(body["errorMessage"]["username"], "username is required");
        assert_eq!(body["errorMessage"]["password"], "password is required");
    }

    #[test]
    fn test_conflict_is_bad_request_with_message() {
        let err = AppError::from(AuthError::UserAlreadyExists);
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        let body = body_json(err.error_response());
        assert_eq!(body["errorMessage"], "User already exists");
    }

    #[test]
    fn test_refresh_failures_have_empty_body() {
        for err in [
            AuthError::MissingRefreshToken,
            AuthError::InvalidRefreshToken,
            AuthError::UnknownSubject,
        ] {
            let response = AppError::from(err).error_response();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
            let bytes = response.into_body().try_into_bytes().unwrap();
            assert!(bytes.is_empty());
        }
    }

    #[test]
    fn test_database_error_uses_generic_envelope() {
        let err = AppError::from(DatabaseError::QueryExecution("boom".to_string()));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(err.error_response());
        assert_eq!(body["code"], "DATABASE_ERROR");
        assert_eq!(body["status"], 500);
        // upstream detail never leaks
        assert_eq!(body["message"], "Database error occurred");
    }

    #[test]
    fn test_each_response_gets_its_own_error_id() {
        let err = AppError::Internal("boom".to_string());
        let first = body_json(err.error_response());
        let second = body_json(err.error_response());

        let first_id = first["error_id"].as_str().unwrap();
        assert!(uuid::Uuid::parse_str(first_id).is_ok());
        assert_ne!(first["error_id"], second["error_id"]);
    }

    #[test]
    fn test_pool_error_is_service_unavailable() {
        let err = AppError::from(DatabaseError::ConnectionPool("timeout".to_string()));
        assert_eq!(err.status_code(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_pool_timeout_maps_to_connection_pool() {
        let err: DatabaseError = sqlx::Error::PoolTimedOut.into();
        assert!(matches!(err, DatabaseError::ConnectionPool(_)));
    }
}
