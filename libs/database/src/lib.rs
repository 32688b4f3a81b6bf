//! PostgreSQL connection plumbing for the accounts service
//!
//! Connection pool settings come from [`postgres::PostgresConfig`], which can be
//! built by hand or loaded with `core_config::FromEnv`. Startup connections are
//! retried with exponential backoff so the API tolerates a database that comes
//! up a few seconds after it.
//!
//! ```ignore
//! use core_config::FromEnv;
//! use database::postgres::{self, PostgresConfig};
//! use migration::Migrator;
//!
//! let config = PostgresConfig::from_env()?;
//! let db = postgres::connect_from_config_with_retry(config, None).await?;
//! postgres::run_migrations::<Migrator>(&db, "accounts_api").await?;
//! ```

pub mod common;
pub mod postgres;

pub use common::{DatabaseError, DatabaseResult};
