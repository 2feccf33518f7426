pub mod extract;
pub mod health;
pub mod openapi;
pub mod state;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
    middleware::{Next, from_fn, from_fn_with_state},
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
};
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;

use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::blog::handlers as blogs;
use crate::config::ServerConfig;
use crate::user_auth::{handlers as users, token_extractor};
use state::AppState;

/// Log method, path, status and latency of every request.
async fn request_logger(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    let started = Instant::now();

    let response = next.run(request).await;

    tracing::info!(
        %method,
        %path,
        status = response.status().as_u16(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "request"
    );
    response
}

async fn unknown_endpoint() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        axum::Json(crate::error::ErrorBody {
            error: "unknown endpoint".to_string(),
        }),
    )
}

/// Build the complete HTTP router.
pub fn build_router(state: Arc<AppState>) -> Router {
    // ==========================================================================
    // Blog Routes - the bearer token is only consulted on create and delete
    // ==========================================================================
    let blog_mutations = Router::new()
        .route("/", post(blogs::create_blog))
        .route("/{id}", delete(blogs::delete_blog))
        .route_layer(from_fn_with_state(state.clone(), token_extractor));

    let blog_routes = Router::new()
        .route("/", get(blogs::list_blogs))
        .route("/{id}", put(blogs::update_blog))
        .merge(blog_mutations);

    // ==========================================================================
    // User Routes
    // ==========================================================================
    let user_routes = Router::new().route("/", get(users::list_users).post(users::register));

    Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/login", post(users::login))
        .nest("/api/blogs", blog_routes)
        .nest("/api/users", user_routes)
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", openapi::ApiDoc::openapi()))
        .fallback(unknown_endpoint)
        .layer(CorsLayer::permissive())
        .layer(from_fn(request_logger))
}

/// Resolves on Ctrl-C or SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("Shutdown signal received");
}

/// Start the HTTP server and serve until `shutdown` resolves.
pub async fn run_server(
    config: &ServerConfig,
    state: Arc<AppState>,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> anyhow::Result<()> {
    let app = build_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr).await.map_err(|e| {
        anyhow::anyhow!(
            "Failed to bind to {}: {} (port {} may already be in use)",
            addr,
            e,
            config.port
        )
    })?;

    tracing::info!("Server listening on http://{}", addr);
    tracing::info!("API Docs: http://{}/docs", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    tracing::info!("Server stopped");
    Ok(())
}

