//! Admin account and password hashing

use argon2::password_hash::SaltString;
use argon2::password_hash::rand_core::OsRng;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};

use crate::core::{AdminConfig, Result, ServerError};

pub fn hash_password(password: &str) -> std::result::Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

pub fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// The single admin account allowed to sign in
#[derive(Debug, Clone)]
pub struct AdminAccount {
    email: String,
    password_hash: String,
}

impl AdminAccount {
    /// Build the account from configuration
    ///
    /// A PHC hash is required unless `allow_plain` is set, in which case a
    /// plain `ADMIN_PASSWORD` is hashed at startup.
    pub fn from_config(config: &AdminConfig, allow_plain: bool) -> Result<Self> {
        let email = config.email.trim().to_lowercase();
        if email.is_empty() {
            return Err(ServerError::config("ADMIN_EMAIL must not be empty"));
        }

        let password_hash = match (&config.password_hash, &config.password) {
            (Some(hash), _) => {
                PasswordHash::new(hash).map_err(|e| {
                    ServerError::config(format!("ADMIN_PASSWORD_HASH is not a valid PHC string: {e}"))
                })?;
                hash.clone()
            }
            (None, Some(plain)) if allow_plain => hash_password(plain)
                .map_err(|e| ServerError::config(format!("failed to hash ADMIN_PASSWORD: {e}")))?,
            (None, Some(_)) => {
                return Err(ServerError::config(
                    "ADMIN_PASSWORD is only accepted in development, set ADMIN_PASSWORD_HASH",
                ));
            }
            (None, None) if allow_plain => {
                tracing::warn!(
                    "No admin password configured, admin sign-in is disabled until ADMIN_PASSWORD or ADMIN_PASSWORD_HASH is set"
                );
                String::new()
            }
            (None, None) => {
                return Err(ServerError::config("ADMIN_PASSWORD_HASH must be set"));
            }
        };

        Ok(Self {
            email,
            password_hash,
        })
    }

    /// Account with an already hashed password
    pub fn with_hash(email: impl Into<String>, password_hash: impl Into<String>) -> Self {
        Self {
            email: email.into().trim().to_lowercase(),
            password_hash: password_hash.into(),
        }
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    /// Check a sign-in attempt
    ///
    /// Email is compared case-insensitively after trimming. The password
    /// hash is always verified so a wrong email costs the same time.
    pub fn verify(&self, email: &str, password: &str) -> bool {
        let password_ok = verify_password(password, &self.password_hash);
        let email_ok = email.trim().to_lowercase() == self.email;
        password_ok && email_ok
    }
}
