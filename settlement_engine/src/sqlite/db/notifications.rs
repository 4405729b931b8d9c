use chrono::Utc;
use sqlx::SqliteConnection;

use crate::{
    db_types::{NewNotification, Notification},
    traits::NotificationApiError,
};

pub async fn insert_notification(
    notification: &NewNotification,
    conn: &mut SqliteConnection,
) -> Result<Notification, NotificationApiError> {
    let notification = sqlx::query_as(
        r#"
            INSERT INTO notifications (
                user_id,
                title,
                message,
                notification_type,
                related_request_id,
                is_read,
                created_at
            ) VALUES ($1, $2, $3, $4, $5, FALSE, $6)
            RETURNING *;
        "#,
    )
    .bind(&notification.user_id)
    .bind(&notification.title)
    .bind(&notification.message)
    .bind(&notification.notification_type)
    .bind(&notification.related_request_id)
    .bind(Utc::now())
    .fetch_one(conn)
    .await?;
    Ok(notification)
}

pub async fn notifications_for_user(
    user_id: &str,
    conn: &mut SqliteConnection,
) -> Result<Vec<Notification>, NotificationApiError> {
    let notifications = sqlx::query_as(
        r#"
            SELECT * FROM notifications
            WHERE user_id = $1
            ORDER BY id DESC;
        "#,
    )
    .bind(user_id)
    .fetch_all(conn)
    .await?;
    Ok(notifications)
}
