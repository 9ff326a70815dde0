use async_trait::async_trait;
use models::errors::ModelError;
use sea_orm::DatabaseConnection;

use super::domain::UserCredential;

/// Read-only access to credential rows.
#[async_trait]
pub trait CredentialRepository: Send + Sync {
    /// All rows for `username` in storage order.
    async fn find_by_username(&self, username: &str) -> Result<Vec<UserCredential>, ModelError>;
}

pub struct SeaOrmCredentialRepository {
    pub db: DatabaseConnection,
}

#[async_trait]
impl CredentialRepository for SeaOrmCredentialRepository {
    async fn find_by_username(&self, username: &str) -> Result<Vec<UserCredential>, ModelError> {
        Ok(models::user::find_by_username(&self.db, username)
            .await?
            .into_iter()
            .map(UserCredential::from)
            .collect())
    }
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MockCredentialRepository {
        rows: Mutex<Vec<UserCredential>>,
        pub unavailable: bool,
    }

    impl MockCredentialRepository {
        pub fn unavailable() -> Self { Self { unavailable: true, ..Default::default() } }

        pub fn with_user(self, username: &str, password: &str, role: &str) -> Self {
            self.rows.lock().unwrap().push(UserCredential {
                username: username.into(),
                password: password.into(),
                role: role.into(),
            });
            self
        }
    }

    #[async_trait]
    impl CredentialRepository for MockCredentialRepository {
        async fn find_by_username(&self, username: &str) -> Result<Vec<UserCredential>, ModelError> {
            if self.unavailable {
                return Err(ModelError::Db("connection refused".into()));
            }
            Ok(self.rows.lock().unwrap().iter().filter(|u| u.username == username).cloned().collect())
        }
    }
}
