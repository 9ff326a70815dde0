use serde::{Deserialize, Serialize};

/// Login input; either field may be absent in the request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginInput {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Stored credential row (read-only)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserCredential {
    pub username: String,
    pub password: String,
    pub role: String,
}

impl From<models::user::Model> for UserCredential {
    fn from(m: models::user::Model) -> Self {
        Self { username: m.username, password: m.password, role: m.role }
    }
}

/// Result of a successful check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleGrant {
    pub role: String,
}
