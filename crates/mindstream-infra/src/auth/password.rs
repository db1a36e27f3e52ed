//! Admin password verification, plain or Argon2-hashed.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use mindstream_core::ports::{AdminAuthenticator, AuthError};

const DEFAULT_PASSWORD: &str = "admin123";

/// The single admin's password.
#[derive(Clone)]
pub enum AdminPassword {
    Plain(String),
    /// Argon2 PHC string, as produced by [`hash_password`].
    Hashed(String),
}

impl std::fmt::Debug for AdminPassword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Plain(_) => f.write_str("AdminPassword::Plain(***)"),
            Self::Hashed(_) => f.write_str("AdminPassword::Hashed(***)"),
        }
    }
}

impl AdminPassword {
    /// `ADMIN_PASSWORD_HASH` wins over `ADMIN_PASSWORD`.
    pub fn from_env() -> Self {
        if let Ok(hash) = std::env::var("ADMIN_PASSWORD_HASH") {
            return Self::Hashed(hash);
        }

        match std::env::var("ADMIN_PASSWORD") {
            Ok(password) => Self::Plain(password),
            Err(_) => {
                tracing::warn!(
                    "ADMIN_PASSWORD not set, using the default password. Set ADMIN_PASSWORD_HASH for production use."
                );
                Self::Plain(DEFAULT_PASSWORD.to_string())
            }
        }
    }
}

impl AdminAuthenticator for AdminPassword {
    fn verify_password(&self, password: &str) -> Result<bool, AuthError> {
        match self {
            Self::Plain(expected) => Ok(constant_time_eq(expected.as_bytes(), password.as_bytes())),
            Self::Hashed(hash) => {
                let parsed_hash =
                    PasswordHash::new(hash).map_err(|e| AuthError::HashingError(e.to_string()))?;

                Ok(Argon2::default()
                    .verify_password(password.as_bytes(), &parsed_hash)
                    .is_ok())
            }
        }
    }
}

/// Hash a password into an Argon2 PHC string for `ADMIN_PASSWORD_HASH`.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AuthError::HashingError(e.to_string()))
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_password() {
        let password = AdminPassword::Plain("letmein".to_string());

        assert!(password.verify_password("letmein").unwrap());
        assert!(!password.verify_password("letmein!").unwrap());
        assert!(!password.verify_password("").unwrap());
    }

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("secure_password_123").unwrap();
        let password = AdminPassword::Hashed(hash);

        assert!(password.verify_password("secure_password_123").unwrap());
        assert!(!password.verify_password("wrong_password").unwrap());
    }

    #[test]
    fn test_malformed_hash_is_an_error() {
        let password = AdminPassword::Hashed("not-a-phc-string".to_string());

        assert!(matches!(
            password.verify_password("anything"),
            Err(AuthError::HashingError(_))
        ));
    }

    #[test]
    fn test_debug_hides_secret() {
        let password = AdminPassword::Plain("letmein".to_string());

        assert!(!format!("{password:?}").contains("letmein"));
    }
}
