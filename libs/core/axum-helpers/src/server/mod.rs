//! Router assembly, health endpoints and graceful shutdown.
//!
//! ```ignore
//! use axum_helpers::server::{create_production_app, create_router, health_router};
//! use core_config::app_info;
//!
//! let router = create_router::<ApiDoc>(api_routes, &config.server, &config.environment)?
//!     .merge(health_router(app_info!()));
//!
//! create_production_app(router, &config.server, async move { db.close().await.ok(); }).await?;
//! ```

pub mod app;
pub mod cors;
pub mod health;
pub mod security;
pub mod shutdown;

pub use app::{create_production_app, create_router};
pub use cors::cors_layer;
pub use health::{HealthCheckFuture, HealthResponse, health_router, run_health_checks};
pub use security::security_headers;
pub use shutdown::{ShutdownCoordinator, shutdown_signal};
