use std::sync::Arc;

use tracing::{info, instrument, warn};

use super::domain::Message;
use super::repository::MessageRepository;
use crate::errors::ServiceError;

/// Message thread service. Contact ids are not checked for existence.
pub struct MessageService {
    repo: Arc<dyn MessageRepository>,
}

impl MessageService {
    pub fn new(repo: Arc<dyn MessageRepository>) -> Self { Self { repo } }

    /// All messages of a contact, most recent first. Unknown ids give an empty list.
    #[instrument(skip(self))]
    pub async fn list_for_contact(&self, contact_id: i32) -> Result<Vec<Message>, ServiceError> {
        self.repo
            .list_for_contact(contact_id)
            .await
            .map_err(|e| ServiceError::store("Error fetching Messages", e))
    }

    /// Append a message stamped with the current time.
    ///
    /// Any failed write, a missing contact id included, is reported as `Conflict`.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use service::message::{MessageService, repository::mock::MockMessageRepository};
    /// let svc = MessageService::new(Arc::new(MockMessageRepository::default()));
    /// tokio_test::block_on(svc.append(Some(1), Some("hello".into()))).unwrap();
    /// let thread = tokio_test::block_on(svc.list_for_contact(1)).unwrap();
    /// assert_eq!(thread[0].message, "hello");
    /// assert!(tokio_test::block_on(svc.append(None, Some("lost".into()))).is_err());
    /// ```
    #[instrument(skip(self, message))]
    pub async fn append(&self, contact_id: Option<i32>, message: Option<String>) -> Result<Message, ServiceError> {
        let Some(contact_id) = contact_id else {
            warn!("message append without contact id");
            return Err(ServiceError::Conflict("Error adding message: contactId is required".into()));
        };
        let created = self.repo.append(contact_id, message).await.map_err(|e| {
            warn!(error = %e, contact_id, "message insert failed");
            ServiceError::Conflict(format!("Error adding message: {e}"))
        })?;
        info!(message_id = created.id, contact_id, "message_appended");
        Ok(created)
    }
}
