//! Application state management.
//!
//! Shared state handed to routers and the readiness endpoint.

use domain_users::VerificationSender;
use std::sync::Arc;

/// Cloned per router (inexpensive Arc clones)
#[derive(Clone)]
pub struct AppState {
    /// Application configuration loaded from environment variables
    pub config: crate::config::Config,
    /// PostgreSQL pool; `None` runs the in-memory repository
    pub db: Option<database::postgres::DatabaseConnection>,
    /// Verification side effect of account creation
    pub sender: Arc<dyn VerificationSender>,
}
