use uuid::Uuid;

use buren_shared::clients::rabbitmq::RabbitMQClient;
use buren_shared::types::event::{payloads, routing_keys, Event};

pub async fn publish_user_registered(
    rabbitmq: &RabbitMQClient,
    user_id: Uuid,
    email: &str,
    hallway: &str,
    location: &str,
) {
    let event = Event::new(
        "buren-identity",
        routing_keys::IDENTITY_USER_REGISTERED,
        payloads::UserRegistered {
            user_id,
            email: email.to_string(),
            hallway: hallway.to_string(),
            location: location.to_string(),
        },
    )
    .with_user(user_id);

    if let Err(e) = rabbitmq.publish(routing_keys::IDENTITY_USER_REGISTERED, &event).await {
        tracing::error!(error = %e, "failed to publish user.registered event");
    }
}
