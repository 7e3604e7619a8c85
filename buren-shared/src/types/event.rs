use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// RabbitMQ Event envelope wrapping all domain events.
///
/// Routing key format: `buren.{domain}.{entity}.{action}`
/// Example: `buren.identity.user.registered`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event<T: Serialize> {
    pub id: Uuid,
    pub source: String,
    pub event_type: String,
    pub timestamp: DateTime<Utc>,
    pub correlation_id: Option<Uuid>,
    pub user_id: Option<Uuid>,
    pub data: T,
}

impl<T: Serialize> Event<T> {
    pub fn new(source: impl Into<String>, event_type: impl Into<String>, data: T) -> Self {
        Self {
            id: Uuid::now_v7(),
            source: source.into(),
            event_type: event_type.into(),
            timestamp: Utc::now(),
            correlation_id: None,
            user_id: None,
            data,
        }
    }

    pub fn with_user(mut self, user_id: Uuid) -> Self {
        self.user_id = Some(user_id);
        self
    }

    pub fn with_correlation(mut self, correlation_id: Uuid) -> Self {
        self.correlation_id = Some(correlation_id);
        self
    }
}

/// RabbitMQ routing keys
pub mod routing_keys {
    // Identity events
    pub const IDENTITY_USER_REGISTERED: &str = "buren.identity.user.registered";

    // Feed events
    pub const FEED_POST_CREATED: &str = "buren.feed.post.created";
    pub const FEED_COMMENT_CREATED: &str = "buren.feed.comment.created";
    pub const FEED_NOTIFICATION_CREATED: &str = "buren.feed.notification.created";
}

/// Common event data payloads
pub mod payloads {
    use serde::{Deserialize, Serialize};
    use uuid::Uuid;

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct UserRegistered {
        pub user_id: Uuid,
        pub email: String,
        pub hallway: String,
        pub location: String,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct PostCreated {
        pub post_id: Uuid,
        pub author_id: Uuid,
        pub category: String,
        pub hallway: String,
        pub location: String,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct CommentCreated {
        pub comment_id: Uuid,
        pub post_id: Uuid,
        pub author_id: Uuid,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct NotificationCreated {
        pub notification_id: Uuid,
        pub recipient_id: Uuid,
        pub post_id: Uuid,
        pub comment_count: i64,
    }
}
