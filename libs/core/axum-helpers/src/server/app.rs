use super::cors::cors_layer;
use super::security::security_headers;
use super::shutdown::ShutdownCoordinator;
use crate::errors::handlers::not_found;
use axum::{Router, middleware};
use core_config::{Environment, server::ServerConfig};
use std::future::Future;
use std::io;
use tower_http::compression::CompressionLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{Level, info, warn};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Wrap the API routes with docs and the cross-cutting layers.
///
/// - `apis` is nested under `/api` and must already carry its state
/// - OpenAPI JSON at `/api-docs/openapi.json`, Swagger UI at `/swagger-ui`
/// - JSON 404 fallback, request tracing, security headers, CORS, compression
///
/// Health routes are merged by the caller since readiness depends on the
/// app's own resources.
pub fn create_router<T>(
    apis: Router,
    server: &ServerConfig,
    environment: &Environment,
) -> io::Result<Router>
where
    T: OpenApi + 'static,
{
    let cors = cors_layer(server, environment)?;

    Ok(Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", T::openapi()))
        .nest("/api", apis)
        .fallback(not_found)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(middleware::from_fn(security_headers))
        .layer(cors)
        .layer(CompressionLayer::new()))
}

/// Serve `router` until SIGINT/SIGTERM, then run `cleanup` bounded by
/// `server.shutdown_timeout`.
pub async fn create_production_app<F>(
    router: Router,
    server: &ServerConfig,
    cleanup: F,
) -> io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let coordinator = ShutdownCoordinator::new();
    let shutdown_timeout = server.shutdown_timeout;

    let listener = tokio::net::TcpListener::bind(server.address()).await?;
    info!(address = %listener.local_addr()?, "Server listening");

    let cleanup_trigger = coordinator.clone();
    let cleanup_handle = tokio::spawn(async move {
        cleanup_trigger.wait().await;
        info!(timeout = ?shutdown_timeout, "Running cleanup");
        match tokio::time::timeout(shutdown_timeout, cleanup).await {
            Ok(()) => info!("Cleanup completed"),
            Err(_) => warn!(timeout = ?shutdown_timeout, "Cleanup timed out, forcing shutdown"),
        }
    });

    let signal_source = coordinator.clone();
    let serve_result = axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(async move { signal_source.wait_for_signal().await })
        .await
        .inspect_err(|e| tracing::error!(error = ?e, "Server error"));

    // Server may also stop on error; cleanup runs either way
    coordinator.shutdown();
    cleanup_handle.await.ok();

    serve_result
}
