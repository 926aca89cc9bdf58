use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{error, info, instrument};
use uuid::Uuid;

/// A message for the person operating the inventory screens.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Notification {
    pub id: Uuid,
    pub message: String,
    #[serde(rename = "type")]
    pub notification_type: NotificationType,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    Success,
    Error,
}

impl Notification {
    pub fn new(notification_type: NotificationType, message: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            message: message.into(),
            notification_type,
            created_at: Utc::now(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NotificationType::Success, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NotificationType::Error, message)
    }
}

#[derive(Debug, Error)]
pub enum NotificationError {
    #[error("Delivery failed: {0}")]
    Delivery(String),
}

#[async_trait]
pub trait NotificationService: Send + Sync {
    async fn send(&self, notification: Notification) -> Result<(), NotificationError>;
}

/// Keeps every notification in memory, newest last.
#[derive(Debug, Clone, Default)]
pub struct InMemoryNotificationService {
    sent: Arc<RwLock<Vec<Notification>>>,
}

impl InMemoryNotificationService {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn all(&self) -> Vec<Notification> {
        self.sent.read().await.clone()
    }

    pub async fn messages(&self) -> Vec<String> {
        self.sent
            .read()
            .await
            .iter()
            .map(|n| n.message.clone())
            .collect()
    }

    pub async fn last(&self) -> Option<Notification> {
        self.sent.read().await.last().cloned()
    }

    pub async fn clear(&self) {
        self.sent.write().await.clear();
    }
}

#[async_trait]
impl NotificationService for InMemoryNotificationService {
    async fn send(&self, notification: Notification) -> Result<(), NotificationError> {
        self.sent.write().await.push(notification);
        Ok(())
    }
}

/// Writes notifications to the tracing log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotificationService;

#[async_trait]
impl NotificationService for TracingNotificationService {
    #[instrument(skip(self, notification), fields(id = %notification.id))]
    async fn send(&self, notification: Notification) -> Result<(), NotificationError> {
        match notification.notification_type {
            NotificationType::Success => info!("{}", notification.message),
            NotificationType::Error => error!("{}", notification.message),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn in_memory_service_records_in_order() {
        let service = InMemoryNotificationService::new();
        service.send(Notification::success("Amber successfully saved")).await.unwrap();
        service.send(Notification::error("Unable to reach inventory service")).await.unwrap();

        assert_eq!(
            service.messages().await,
            ["Amber successfully saved", "Unable to reach inventory service"]
        );
        let last = service.last().await.unwrap();
        assert_eq!(last.notification_type, NotificationType::Error);

        service.clear().await;
        assert!(service.all().await.is_empty());
    }

    #[tokio::test]
    async fn tracing_service_always_delivers() {
        let service = TracingNotificationService;
        assert!(service.send(Notification::success("saved")).await.is_ok());
        assert!(service.send(Notification::error("failed")).await.is_ok());
    }

    #[test]
    fn notification_serializes_type_tag() {
        let json = serde_json::to_value(Notification::success("ok")).unwrap();
        assert_eq!(json["type"], "success");
        assert_eq!(json["message"], "ok");
    }
}
