//! QA Dashboard Web Server
//!
//! Axum-based REST API plus the WebSocket endpoint that streams live updates.

pub mod auth;
pub mod error;
pub mod routes;
pub mod state;
pub mod websocket;

use axum::{
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use qa_core::config::CorsPolicy;
use std::net::SocketAddr;
use tower_http::{
    cors::{AllowHeaders, AllowMethods, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::warn;

pub use state::AppState;

/// Create the application router.
pub fn create_router(state: AppState, cors: &CorsPolicy) -> Router {
    let api_routes = Router::new()
        // Accounts
        .route("/register", post(routes::users::register))
        .route("/login", post(routes::users::login))
        .route("/me", get(routes::users::me))
        // Questions
        .route(
            "/questions",
            get(routes::questions::list_questions).post(routes::questions::create_question),
        )
        .route(
            "/questions/{id}",
            get(routes::questions::get_question).put(routes::questions::update_question),
        )
        // Responses
        .route(
            "/questions/{id}/responses",
            get(routes::responses::list_responses).post(routes::responses::create_response),
        );

    Router::new()
        .route("/", get(routes::health::root))
        .nest("/api", api_routes)
        .route("/ws", get(websocket::ws_handler))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(cors))
        .with_state(state)
}

fn cors_layer(policy: &CorsPolicy) -> CorsLayer {
    match policy {
        CorsPolicy::AllowAll => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
        CorsPolicy::Origins(origins) => {
            let origins: Vec<HeaderValue> = origins
                .iter()
                .filter_map(|origin| match origin.parse() {
                    Ok(value) => Some(value),
                    Err(_) => {
                        warn!(%origin, "Skipping invalid CORS origin");
                        None
                    }
                })
                .collect();

            CorsLayer::new()
                .allow_origin(origins)
                .allow_credentials(true)
                .allow_methods(AllowMethods::mirror_request())
                .allow_headers(AllowHeaders::mirror_request())
        }
    }
}

/// Run the web server until Ctrl-C.
pub async fn run_server(
    state: AppState,
    cors: &CorsPolicy,
    addr: SocketAddr,
) -> anyhow::Result<()> {
    let app = create_router(state, cors);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Web server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Web server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}
