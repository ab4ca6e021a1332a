use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::RegisterRequest;
use uuid::Uuid;

/// Stored as given; passwords are compared in plain text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password: String,
    pub created_at: DateTime<Utc>,
}

impl From<RegisterRequest> for UserRecord {
    fn from(request: RegisterRequest) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: request.name,
            email: request.email,
            password: request.password,
            created_at: Utc::now(),
        }
    }
}

/// Per-email entry of the `/users` listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub name: String,
    pub password: String,
}

impl From<&UserRecord> for UserProfile {
    fn from(user: &UserRecord) -> Self {
        Self {
            name: user.name.clone(),
            password: user.password.clone(),
        }
    }
}
