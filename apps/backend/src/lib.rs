pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;

use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::db::Database;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
    pub config: Arc<Config>,
}

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    tracing::info!("Connecting to database...");
    let db = Database::connect(&config.database_url, config.max_connections).await?;

    tracing::info!("Running migrations...");
    db.run_migrations().await?;

    let addr = config.bind_addr();
    let state = AppState {
        db: Arc::new(db),
        config: Arc::new(config),
    };

    let app = build_router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Build the API router (without transport layers)
pub fn build_router(state: AppState) -> Router {
    let protected_routes = Router::new()
        // User routes
        .route("/api/users/me", get(routes::users::me))
        // Course structure routes
        .route("/api/courses", post(routes::courses::create))
        .route(
            "/api/courses/{course_id}",
            get(routes::courses::get).delete(routes::courses::delete),
        )
        .route(
            "/api/courses/{course_id}/modules",
            post(routes::courses::create_module),
        )
        .route(
            "/api/courses/{course_id}/modules/order",
            put(routes::courses::reorder_modules),
        )
        .route("/api/modules/{module_id}", delete(routes::courses::delete_module))
        .route(
            "/api/modules/{module_id}/lessons",
            post(routes::courses::create_lesson),
        )
        .route(
            "/api/modules/{module_id}/lessons/order",
            put(routes::courses::reorder_lessons),
        )
        .route("/api/lessons/{lesson_id}", delete(routes::courses::delete_lesson))
        // Progress routes
        .route("/api/courses/{course_id}/enroll", post(routes::progress::enroll))
        .route(
            "/api/courses/{course_id}/progress",
            get(routes::progress::course_progress),
        )
        .route(
            "/api/lessons/{lesson_id}/progress",
            get(routes::progress::lesson_status).put(routes::progress::set_lesson_status),
        )
        .route("/api/progress", get(routes::progress::overview))
        // Points routes
        .route("/api/points/me", get(routes::points::summary))
        .route("/api/leaderboard", get(routes::points::leaderboard))
        // Feed routes
        .route("/api/posts", post(routes::feed::create_post))
        .route(
            "/api/posts/{post_id}/comments",
            post(routes::feed::create_comment),
        )
        .route(
            "/api/posts/{post_id}/like",
            put(routes::feed::like).delete(routes::feed::unlike),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            routes::auth::auth_middleware,
        ));

    Router::new()
        .route("/health", get(health_check))
        .route("/api/users/register", post(routes::users::register))
        .merge(protected_routes)
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}
