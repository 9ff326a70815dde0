use async_trait::async_trait;
use models::errors::ModelError;
use sea_orm::DatabaseConnection;

use super::domain::Message;

#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// Most recent first.
    async fn list_for_contact(&self, contact_id: i32) -> Result<Vec<Message>, ModelError>;
    async fn append(&self, contact_id: i32, message: Option<String>) -> Result<Message, ModelError>;
}

/// SeaORM-backed repository implementation.
pub struct SeaOrmMessageRepository {
    pub db: DatabaseConnection,
}

#[async_trait]
impl MessageRepository for SeaOrmMessageRepository {
    async fn list_for_contact(&self, contact_id: i32) -> Result<Vec<Message>, ModelError> {
        Ok(models::message::list_for_contact(&self.db, contact_id).await?.into_iter().map(Message::from).collect())
    }

    async fn append(&self, contact_id: i32, message: Option<String>) -> Result<Message, ModelError> {
        Ok(models::message::create(&self.db, contact_id, message).await?.into())
    }
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use super::*;
    use chrono::Utc;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MockMessageRepository {
        rows: Mutex<Vec<Message>>,
        pub read_only: bool,
    }

    impl MockMessageRepository {
        /// Every write fails, as with a store refusing inserts.
        pub fn read_only() -> Self { Self { read_only: true, ..Default::default() } }
    }

    #[async_trait]
    impl MessageRepository for MockMessageRepository {
        async fn list_for_contact(&self, contact_id: i32) -> Result<Vec<Message>, ModelError> {
            let mut out: Vec<Message> = self.rows.lock().unwrap().iter().filter(|m| m.contact_id == contact_id).cloned().collect();
            out.sort_by(|a, b| b.message_timestamp.cmp(&a.message_timestamp).then(b.id.cmp(&a.id)));
            Ok(out)
        }

        async fn append(&self, contact_id: i32, message: Option<String>) -> Result<Message, ModelError> {
            if self.read_only {
                return Err(ModelError::Db("cannot execute INSERT in a read-only transaction".into()));
            }
            let message = message.ok_or_else(|| ModelError::Db("NOT NULL constraint failed: message.message".into()))?;
            let mut rows = self.rows.lock().unwrap();
            let m = Message { id: rows.len() as i32 + 1, contact_id, message, message_timestamp: Utc::now().into() };
            rows.push(m.clone());
            Ok(m)
        }
    }
}
