use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use tokio::task;

use crate::error::{QaError, QaResult};

/// Hash a password with Argon2id into a PHC string.
///
/// CPU-bound, so it runs on a blocking thread.
pub async fn hash_password(password: &str) -> QaResult<String> {
    let password = password.to_string();

    task::spawn_blocking(move || {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| QaError::Auth(format!("Failed to hash password: {e}")))
    })
    .await
    .map_err(|e| QaError::Auth(format!("Password hashing task failed: {e}")))?
}

/// Verify a password against a stored PHC hash.
pub async fn verify_password(password: &str, hash: &str) -> QaResult<bool> {
    let password = password.to_string();
    let hash = hash.to_string();

    task::spawn_blocking(move || {
        let parsed = PasswordHash::new(&hash)
            .map_err(|e| QaError::Auth(format!("Invalid password hash format: {e}")))?;

        match Argon2::default().verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(QaError::Auth(format!("Password verification failed: {e}"))),
        }
    })
    .await
    .map_err(|e| QaError::Auth(format!("Password verification task failed: {e}")))?
}
