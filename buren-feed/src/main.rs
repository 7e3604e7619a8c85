use axum::routing::{delete, get};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

mod clients;
mod config;
mod events;
mod feed;
mod models;
mod notifications;
mod routes;
mod schema;
mod services;

use clients::identity::IdentityClient;
use config::AppConfig;
use buren_shared::clients::db::{create_pool, DbPool};
use buren_shared::clients::rabbitmq::RabbitMQClient;

pub struct AppState {
    pub db: DbPool,
    pub config: AppConfig,
    pub rabbitmq: RabbitMQClient,
    pub identity: IdentityClient,
    pub metrics_handle: metrics_exporter_prometheus::PrometheusHandle,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    buren_shared::middleware::init_tracing("buren-feed");

    let config = AppConfig::load()?;
    let port = config.port;

    // Set JWT_SECRET env var for the auth extractor middleware
    std::env::set_var("JWT_SECRET", &config.jwt_secret);

    let db = create_pool(&config.database_url);
    let rabbitmq = RabbitMQClient::connect(&config.rabbitmq_url).await?;
    let identity = IdentityClient::new(&config.identity_service_url);
    let metrics_handle = buren_shared::middleware::init_metrics();

    let state = Arc::new(AppState { db, config, rabbitmq, identity, metrics_handle });

    let app = Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/metrics", get(routes::health::metrics))
        .route("/posts", get(routes::posts::get_feed).post(routes::posts::create_post))
        .route("/posts/:id", get(routes::posts::get_post))
        .route(
            "/posts/:id/comments",
            get(routes::comments::list_comments).post(routes::comments::create_comment),
        )
        .route("/comments/:id", get(routes::comments::get_comment))
        .route("/notifications", delete(routes::notifications::deliver_notifications))
        .layer(axum::middleware::from_fn(buren_shared::middleware::metrics_middleware))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = format!("0.0.0.0:{port}");
    tracing::info!(addr = %addr, "buren-feed starting");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
