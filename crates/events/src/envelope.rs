use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::Topic;

/// Envelope for a delivered notification.
///
/// One envelope is built per publish; every recipient gets a clone carrying the
/// same `notification_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationEnvelope<M> {
    notification_id: Uuid,
    topic: Topic,
    published_at: DateTime<Utc>,
    payload: M,
}

impl<M> NotificationEnvelope<M> {
    pub fn new(topic: Topic, published_at: DateTime<Utc>, payload: M) -> Self {
        Self {
            notification_id: Uuid::now_v7(),
            topic,
            published_at,
            payload,
        }
    }

    pub fn notification_id(&self) -> Uuid {
        self.notification_id
    }

    pub fn topic(&self) -> Topic {
        self.topic
    }

    pub fn published_at(&self) -> DateTime<Utc> {
        self.published_at
    }

    pub fn payload(&self) -> &M {
        &self.payload
    }

    pub fn into_payload(self) -> M {
        self.payload
    }
}
