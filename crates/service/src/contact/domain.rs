use serde::{Deserialize, Serialize};

/// Contact as exposed to callers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub id: i32,
    pub contact_name: String,
    pub phone_number: String,
    pub message: String,
    pub image_url: Option<String>,
}

impl From<models::contact::Model> for Contact {
    fn from(m: models::contact::Model) -> Self {
        Self {
            id: m.id,
            contact_name: m.contact_name,
            phone_number: m.phone_number,
            message: m.message,
            image_url: m.image_url,
        }
    }
}

/// Text fields supplied on create/update. Presence is not checked here;
/// absent values are handed to the store as-is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactFields {
    pub contact_name: Option<String>,
    pub phone_number: Option<String>,
    pub message: Option<String>,
}

impl ContactFields {
    pub fn new(contact_name: &str, phone_number: &str, message: &str) -> Self {
        Self {
            contact_name: Some(contact_name.to_string()),
            phone_number: Some(phone_number.to_string()),
            message: Some(message.to_string()),
        }
    }

    /// Names of the fields that were not supplied.
    pub fn missing(&self) -> Vec<&'static str> {
        let mut out = Vec::new();
        if self.contact_name.is_none() { out.push("contact_name"); }
        if self.phone_number.is_none() { out.push("phone_number"); }
        if self.message.is_none() { out.push("message"); }
        out
    }
}

/// Uploaded image attached to a create request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}
