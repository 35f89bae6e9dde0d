//! Admin authentication for the bulk reset.

use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::paste::storage::PasteStorage;
use crate::paste::token;
use crate::paste::{PasteError, PasteServer};

type HmacSha256 = Hmac<Sha256>;

/// Environment variable holding the admin password.
pub const ADMIN_PASSWORD_ENV: &str = "BURNBOX_ADMIN_PASSWORD";

/// Length of the password generated when none is configured.
const GENERATED_PASSWORD_LENGTH: usize = 16;

/// Guards the reset operation behind a password.
///
/// The password itself is never kept. At construction it is tagged with
/// HMAC-SHA256 under a random per-process key; candidates are tagged the same
/// way and compared with `verify_slice`, which runs in constant time.
///
/// # Example
///
/// ```rust
/// use burnbox::{AdminControl, PasteError, PasteServer};
///
/// # async fn example() -> Result<(), PasteError> {
/// let server = PasteServer::builder().build_and_init().await?;
/// let admin = AdminControl::new("hunter2")?;
///
/// assert!(matches!(
///     admin.reset_all("wrong", &server).await,
///     Err(PasteError::Unauthorized)
/// ));
/// admin.reset_all("hunter2", &server).await?;
/// # Ok(())
/// # }
/// ```
pub struct AdminControl {
    key: Vec<u8>,
    tag: Vec<u8>,
}

impl AdminControl {
    /// Creates an admin guard for `password`.
    pub fn new(password: &str) -> Result<Self, PasteError> {
        let mut key = Vec::with_capacity(32);
        key.extend_from_slice(uuid::Uuid::new_v4().as_bytes());
        key.extend_from_slice(uuid::Uuid::new_v4().as_bytes());

        let tag = Self::mac(&key, password)?.finalize().into_bytes().to_vec();
        Ok(Self { key, tag })
    }

    /// Reads the password from `BURNBOX_ADMIN_PASSWORD`.
    ///
    /// When the variable is unset or blank a random password is generated
    /// and logged as a warning, so a fresh deployment still has a usable
    /// reset.
    pub fn from_env() -> Result<Self, PasteError> {
        match std::env::var(ADMIN_PASSWORD_ENV) {
            Ok(password) if !password.trim().is_empty() => Self::new(password.trim()),
            _ => {
                let password = token::random_token(GENERATED_PASSWORD_LENGTH);
                tracing::warn!(
                    "{} not set, using generated admin password: {}",
                    ADMIN_PASSWORD_ENV,
                    password
                );
                Self::new(&password)
            }
        }
    }

    fn mac(key: &[u8], password: &str) -> Result<HmacSha256, PasteError> {
        let mut mac =
            HmacSha256::new_from_slice(key).map_err(|e| PasteError::CryptoError(e.to_string()))?;
        mac.update(password.as_bytes());
        Ok(mac)
    }

    /// Returns true if `candidate` matches the admin password.
    pub fn authenticate(&self, candidate: &str) -> bool {
        match Self::mac(&self.key, candidate) {
            Ok(mac) => mac.verify_slice(&self.tag).is_ok(),
            Err(_) => false,
        }
    }

    /// Authenticates `candidate` and, on success, resets the server.
    ///
    /// Clears every paste, the quota and both usage counters. Returns the
    /// number of pastes discarded.
    pub async fn reset_all<S: PasteStorage + 'static>(
        &self,
        candidate: &str,
        server: &PasteServer<S>,
    ) -> Result<usize, PasteError> {
        if !self.authenticate(candidate) {
            tracing::warn!("rejected admin reset with a bad password");
            return Err(PasteError::Unauthorized);
        }
        server.reset().await
    }
}

impl std::fmt::Debug for AdminControl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminControl").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_authenticate() -> Result<(), PasteError> {
        let admin = AdminControl::new("correct horse")?;

        assert!(admin.authenticate("correct horse"));
        assert!(!admin.authenticate("correct horse "));
        assert!(!admin.authenticate(""));
        assert!(!admin.authenticate("Correct horse"));

        Ok(())
    }

    #[test]
    fn test_same_password_different_keys() -> Result<(), PasteError> {
        let first = AdminControl::new("same")?;
        let second = AdminControl::new("same")?;

        assert_ne!(first.tag, second.tag);
        assert!(first.authenticate("same"));
        assert!(second.authenticate("same"));

        Ok(())
    }

    #[test]
    fn test_debug_hides_secrets() -> Result<(), PasteError> {
        let admin = AdminControl::new("secret")?;
        assert_eq!(format!("{admin:?}"), "AdminControl { .. }");
        Ok(())
    }

    #[test]
    #[serial]
    fn test_from_env() -> Result<(), PasteError> {
        unsafe {
            std::env::set_var(ADMIN_PASSWORD_ENV, "from-the-env");
        }
        let admin = AdminControl::from_env()?;
        assert!(admin.authenticate("from-the-env"));

        unsafe {
            std::env::remove_var(ADMIN_PASSWORD_ENV);
        }
        Ok(())
    }

    #[test]
    #[serial]
    fn test_from_env_generates_password_when_unset() -> Result<(), PasteError> {
        unsafe {
            std::env::remove_var(ADMIN_PASSWORD_ENV);
        }
        let admin = AdminControl::from_env()?;
        assert!(!admin.authenticate(""));
        Ok(())
    }

    #[tokio::test]
    async fn test_reset_all() -> Result<(), PasteError> {
        let server = PasteServer::builder().build_and_init().await?;
        let admin = AdminControl::new("hunter2")?;

        let token = server.create("to be wiped").await?;

        assert!(matches!(
            admin.reset_all("hunter3", &server).await,
            Err(PasteError::Unauthorized)
        ));
        assert!(server.probe(&token).await?);
        assert_eq!(server.stats().created, 1);

        assert_eq!(admin.reset_all("hunter2", &server).await?, 1);
        assert!(!server.probe(&token).await?);
        assert_eq!(server.stats().created, 0);

        Ok(())
    }
}
