use std::sync::Arc;

use argon2::{Argon2, PasswordHash, PasswordVerifier};
use tracing::{debug, info, instrument, warn};

use super::domain::{LoginInput, RoleGrant, UserCredential};
use super::repository::CredentialRepository;
use crate::errors::ServiceError;

/// Credential check service independent of web framework
pub struct AuthCheckService {
    repo: Arc<dyn CredentialRepository>,
}

/// Stored values in PHC form (`$argon2id$...`) are verified as Argon2 hashes; anything
/// else is compared literally.
fn password_matches(stored: &str, supplied: &str) -> bool {
    if stored.starts_with("$argon2") {
        match PasswordHash::new(stored) {
            Ok(parsed) => Argon2::default().verify_password(supplied.as_bytes(), &parsed).is_ok(),
            Err(e) => {
                warn!(error = %e, "stored argon2 hash is malformed");
                false
            }
        }
    } else {
        stored == supplied
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

impl AuthCheckService {
    pub fn new(repo: Arc<dyn CredentialRepository>) -> Self { Self { repo } }

    /// Return the role of the first stored row whose username and password both match.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use service::auth::{AuthCheckService, domain::LoginInput, repository::mock::MockCredentialRepository};
    /// let repo = MockCredentialRepository::default().with_user("admin", "secret", "admin");
    /// let svc = AuthCheckService::new(Arc::new(repo));
    /// let ok = LoginInput { username: Some("admin".into()), password: Some("secret".into()) };
    /// assert_eq!(tokio_test::block_on(svc.verify(ok)).unwrap().role, "admin");
    /// let bad = LoginInput { username: Some("admin".into()), password: Some("guess".into()) };
    /// assert!(tokio_test::block_on(svc.verify(bad)).is_err());
    /// ```
    #[instrument(skip(self, input), fields(username = ?input.username))]
    pub async fn verify(&self, input: LoginInput) -> Result<RoleGrant, ServiceError> {
        let (Some(username), Some(password)) = (present(&input.username), present(&input.password)) else {
            return Err(ServiceError::Validation("Username and password are required.".into()));
        };

        let rows = self
            .repo
            .find_by_username(username)
            .await
            .map_err(|e| ServiceError::store("An error occurred. Please try again.", e))?;
        debug!(candidates = rows.len(), "credential rows loaded");

        match rows.into_iter().find(|u: &UserCredential| password_matches(&u.password, password)) {
            Some(user) => {
                info!(%username, role = %user.role, "login_succeeded");
                Ok(RoleGrant { role: user.role })
            }
            None => {
                info!(%username, "login_rejected");
                Err(ServiceError::Unauthorized("Invalid username or password.".into()))
            }
        }
    }
}
