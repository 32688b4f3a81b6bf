//! # Axum Helpers
//!
//! Shared HTTP plumbing for the accounts service.
//!
//! - **[`errors`]**: `AppError` with stable [`ErrorCode`]s and a uniform JSON body
//! - **[`extractors`]**: `ValidatedJson` and `IdPath`, rejecting through `AppError`
//! - **[`server`]**: router assembly, CORS, `/health`, readiness helpers, graceful shutdown

pub mod errors;
pub mod extractors;
pub mod server;

pub use errors::{AppError, ErrorCode, ErrorResponse};
pub use extractors::{IdPath, ValidatedJson};
pub use server::{
    HealthCheckFuture, HealthResponse, ShutdownCoordinator, create_production_app, create_router,
    health_router, run_health_checks, shutdown_signal,
};
