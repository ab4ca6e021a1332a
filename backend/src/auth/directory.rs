use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use async_trait::async_trait;
use shared::ErrorResponse;
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::models::UserRecord;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DirectoryError {
    #[error("Email already registered")]
    DuplicateEmail,
    #[error("Invalid credentials")]
    InvalidCredentials,
}

impl ResponseError for DirectoryError {
    fn status_code(&self) -> StatusCode {
        match self {
            DirectoryError::DuplicateEmail => StatusCode::BAD_REQUEST,
            DirectoryError::InvalidCredentials => StatusCode::UNAUTHORIZED,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: self.to_string(),
        })
    }
}

#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn register(&self, user: UserRecord) -> Result<(), DirectoryError>;

    /// Returns the stored display name.
    async fn login(&self, email: &str, password: &str) -> Result<String, DirectoryError>;

    async fn list_users(&self) -> Vec<UserRecord>;
}

/// Process-memory directory keyed by email; lost on restart.
#[derive(Default)]
pub struct InMemoryDirectory {
    users: RwLock<HashMap<String, UserRecord>>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserDirectory for InMemoryDirectory {
    async fn register(&self, user: UserRecord) -> Result<(), DirectoryError> {
        let mut users = self.users.write().await;
        if users.contains_key(&user.email) {
            log::warn!("Registration rejected, email already registered: {}", user.email);
            return Err(DirectoryError::DuplicateEmail);
        }
        log::info!("Registered user {}", user.email);
        users.insert(user.email.clone(), user);
        Ok(())
    }

    async fn login(&self, email: &str, password: &str) -> Result<String, DirectoryError> {
        let users = self.users.read().await;
        match users.get(email) {
            Some(user) if user.password == password => {
                log::info!("Login succeeded for {}", email);
                Ok(user.name.clone())
            }
            _ => {
                log::warn!("Login failed for {}", email);
                Err(DirectoryError::InvalidCredentials)
            }
        }
    }

    async fn list_users(&self) -> Vec<UserRecord> {
        let mut users: Vec<UserRecord> = self.users.read().await.values().cloned().collect();
        users.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        users
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::RegisterRequest;
    use std::sync::Arc;

    fn user(name: &str, email: &str, password: &str) -> UserRecord {
        UserRecord::from(RegisterRequest {
            name: name.into(),
            email: email.into(),
            password: password.into(),
        })
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected_and_first_record_kept() {
        let directory = InMemoryDirectory::new();
        directory.register(user("Ada", "a@x.com", "pw1")).await.unwrap();

        let err = directory
            .register(user("Impostor", "a@x.com", "pw2"))
            .await
            .unwrap_err();
        assert_eq!(err, DirectoryError::DuplicateEmail);

        let users = directory.list_users().await;
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].name, "Ada");
        assert_eq!(users[0].password, "pw1");
    }

    #[tokio::test]
    async fn login_returns_stored_name() {
        let directory = InMemoryDirectory::new();
        directory.register(user("Ada", "a@x.com", "pw1")).await.unwrap();

        assert_eq!(directory.login("a@x.com", "pw1").await.unwrap(), "Ada");
        assert_eq!(
            directory.login("a@x.com", "wrong").await,
            Err(DirectoryError::InvalidCredentials)
        );
        assert_eq!(
            directory.login("nobody@x.com", "pw1").await,
            Err(DirectoryError::InvalidCredentials)
        );
    }

    #[tokio::test]
    async fn concurrent_registrations_keep_email_unique() {
        let directory = Arc::new(InMemoryDirectory::new());
        let attempts = (0..16).map(|i| {
            let directory = directory.clone();
            async move {
                directory
                    .register(user(&format!("user{}", i), "same@x.com", "pw"))
                    .await
            }
        });

        let results = futures::future::join_all(attempts).await;

        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        assert_eq!(directory.list_users().await.len(), 1);
    }

    #[tokio::test]
    async fn lists_every_record() {
        let directory = InMemoryDirectory::new();
        directory.register(user("Ada", "a@x.com", "pw1")).await.unwrap();
        directory.register(user("Bob", "b@x.com", "pw2")).await.unwrap();

        let mut emails: Vec<String> = directory
            .list_users()
            .await
            .into_iter()
            .map(|u| u.email)
            .collect();
        emails.sort();
        assert_eq!(emails, vec!["a@x.com", "b@x.com"]);
    }
}
