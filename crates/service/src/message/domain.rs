use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: i32,
    pub contact_id: i32,
    pub message: String,
    pub message_timestamp: DateTime<FixedOffset>,
}

impl From<models::message::Model> for Message {
    fn from(m: models::message::Model) -> Self {
        Self { id: m.id, contact_id: m.contact_id, message: m.message, message_timestamp: m.message_timestamp }
    }
}
