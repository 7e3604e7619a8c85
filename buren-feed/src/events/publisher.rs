use uuid::Uuid;

use buren_shared::clients::rabbitmq::RabbitMQClient;
use buren_shared::types::event::{payloads, routing_keys, Event};

pub async fn publish_post_created(
    rabbitmq: &RabbitMQClient,
    post_id: Uuid,
    author_id: Uuid,
    category: &str,
    hallway: &str,
    location: &str,
) {
    let event = Event::new(
        "buren-feed",
        routing_keys::FEED_POST_CREATED,
        payloads::PostCreated {
            post_id,
            author_id,
            category: category.to_string(),
            hallway: hallway.to_string(),
            location: location.to_string(),
        },
    )
    .with_user(author_id);

    if let Err(e) = rabbitmq.publish(routing_keys::FEED_POST_CREATED, &event).await {
        tracing::error!(error = %e, "failed to publish post.created event");
    }
}

pub async fn publish_comment_created(
    rabbitmq: &RabbitMQClient,
    comment_id: Uuid,
    post_id: Uuid,
    author_id: Uuid,
) {
    let event = Event::new(
        "buren-feed",
        routing_keys::FEED_COMMENT_CREATED,
        payloads::CommentCreated {
            comment_id,
            post_id,
            author_id,
        },
    )
    .with_user(author_id);

    if let Err(e) = rabbitmq.publish(routing_keys::FEED_COMMENT_CREATED, &event).await {
        tracing::error!(error = %e, "failed to publish comment.created event");
    }
}

pub async fn publish_notification_created(
    rabbitmq: &RabbitMQClient,
    notification_id: Uuid,
    recipient_id: Uuid,
    post_id: Uuid,
    comment_count: i64,
) {
    let event = Event::new(
        "buren-feed",
        routing_keys::FEED_NOTIFICATION_CREATED,
        payloads::NotificationCreated {
            notification_id,
            recipient_id,
            post_id,
            comment_count,
        },
    )
    .with_user(recipient_id);

    if let Err(e) = rabbitmq.publish(routing_keys::FEED_NOTIFICATION_CREATED, &event).await {
        tracing::error!(error = %e, "failed to publish notification.created event");
    }
}
