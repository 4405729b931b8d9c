use thiserror::Error;

use crate::db_types::{NewNotification, Notification};

#[allow(async_fn_in_trait)]
pub trait NotificationManagement {
    /// Inserts the notifications in a single atomic transaction. Either all of them are stored, or none are.
    async fn insert_notifications(
        &self,
        notifications: &[NewNotification],
    ) -> Result<Vec<Notification>, NotificationApiError>;

    /// All notifications addressed to the user, newest first.
    async fn notifications_for_user(&self, user_id: &str) -> Result<Vec<Notification>, NotificationApiError>;
}

#[derive(Debug, Clone, Error)]
pub enum NotificationApiError {
    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<sqlx::Error> for NotificationApiError {
    fn from(e: sqlx::Error) -> Self {
        NotificationApiError::DatabaseError(e.to_string())
    }
}
