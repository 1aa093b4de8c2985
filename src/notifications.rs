//! Notification Center
//!
//! App-lifetime list of transient messages shared by every page. Each
//! notification is removed automatically once its lifetime elapses, or
//! earlier when dismissed. Listeners can follow changes through a broadcast
//! channel.
//!
//! Identifiers are the creation instant in Unix milliseconds, so two
//! notifications created within the same millisecond share an id.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, RwLock};

/// Identifier of a notification (creation time, Unix ms)
pub type NotificationId = i64;

/// Default lifetime of a notification
pub const DEFAULT_TTL: Duration = Duration::from_millis(4000);

/// Severity of a notification
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    #[default]
    Success,
    Error,
    Warning,
}

/// A transient message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: NotificationId,
    pub message: String,
    pub kind: NotificationKind,
}

/// Change feed for renderers
#[derive(Debug, Clone, PartialEq)]
pub enum NotificationEvent {
    Added(Notification),
    Removed(NotificationId),
}

/// Shared handle to the notification list
#[derive(Clone)]
pub struct NotificationCenter {
    entries: Arc<RwLock<Vec<Notification>>>,
    events: broadcast::Sender<NotificationEvent>,
    ttl: Duration,
}

impl Default for NotificationCenter {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

impl NotificationCenter {
    /// Create the center. Call once at startup and hand clones to each page.
    pub fn new(ttl: Duration) -> Self {
        let (events, _) = broadcast::channel(64);
        Self {
            entries: Arc::new(RwLock::new(Vec::new())),
            events,
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Append a notification and schedule its removal.
    ///
    /// Must be called from within a tokio runtime. The removal timer is
    /// detached and cannot be cancelled; dismissing first makes it a no-op.
    pub async fn add(&self, message: impl Into<String>, kind: NotificationKind) -> NotificationId {
        let notification = Notification {
            id: chrono::Utc::now().timestamp_millis(),
            message: message.into(),
            kind,
        };
        let id = notification.id;

        tracing::debug!(id, kind = ?kind, message = %notification.message, "Notification added");

        self.entries.write().await.push(notification.clone());
        let _ = self.events.send(NotificationEvent::Added(notification));

        let center = self.clone();
        let ttl = self.ttl;
        tokio::spawn(async move {
            tokio::time::sleep(ttl).await;
            center.remove(id).await;
        });

        id
    }

    pub async fn success(&self, message: impl Into<String>) -> NotificationId {
        self.add(message, NotificationKind::Success).await
    }

    pub async fn error(&self, message: impl Into<String>) -> NotificationId {
        self.add(message, NotificationKind::Error).await
    }

    pub async fn warning(&self, message: impl Into<String>) -> NotificationId {
        self.add(message, NotificationKind::Warning).await
    }

    /// Drop every notification with this id; unknown ids are ignored
    pub async fn remove(&self, id: NotificationId) {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|n| n.id != id);
        let removed = entries.len() != before;
        drop(entries);

        if removed {
            let _ = self.events.send(NotificationEvent::Removed(id));
        }
    }

    /// Current notifications in display order
    pub async fn list(&self) -> Vec<Notification> {
        self.entries.read().await.clone()
    }

    /// Follow additions and removals
    pub fn subscribe(&self) -> broadcast::Receiver<NotificationEvent> {
        self.events.subscribe()
    }
}
