/// Password Hashing and Verification
///
/// bcrypt is CPU bound, so both operations run on actix's blocking pool.

use actix_web::web;

use crate::error::AppError;

/// Hash a password using bcrypt at the given cost
///
/// # Errors
/// Returns error if the blocking pool is gone or bcrypt fails
pub async fn hash_password(password: String, cost: u32) -> Result<String, AppError> {
    web::block(move || bcrypt::hash(password, cost))
        .await?
        .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))
}

/// Verify a password against its hash
///
/// # Errors
/// Returns error if the stored hash is malformed
pub async fn verify_password(password: String, hash: String) -> Result<bool, AppError> {
    web::block(move || bcrypt::verify(password, &hash))
        .await?
        .map_err(|e| AppError::Internal(format!("Password verification failed: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_HASH_COST: u32 = 4;

    #[actix_web::test]
    async fn test_hash_password() {
        let password = "ValidPassword123";
        let hash = hash_password(password.to_string(), TEST_HASH_COST)
            .await
            .expect("Failed to hash password");

        assert_ne!(password, hash);
        assert!(hash.starts_with("$2"));
    }

    #[actix_web::test]
    async fn test_verify_password() {
        let hash = hash_password("ValidPassword123".to_string(), TEST_HASH_COST)
            .await
            .unwrap();

        let is_valid = verify_password("ValidPassword123".to_string(), hash)
            .await
            .expect("Failed to verify password");
        assert!(is_valid);
    }

    #[actix_web::test]
    async fn test_verify_wrong_password() {
        let hash = hash_password("ValidPassword123".to_string(), TEST_HASH_COST)
            .await
            .unwrap();

        let is_valid = verify_password("WrongPassword123".to_string(), hash)
            .await
            .expect("Failed to verify password");
        assert!(!is_valid);
    }

    #[actix_web::test]
    async fn test_malformed_hash_is_an_error() {
        let result = verify_password("whatever".to_string(), "not-a-hash".to_string()).await;
        assert!(result.is_err());
    }
}
